use std::ffi::OsStr;
use std::process::{Command, Output};

fn aph<S: AsRef<OsStr>>(args: &[S]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aph"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run aph")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn not_enough_arguments_fails() {
    let output = aph(&["1s", "1", "64MB", "16"]);
    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with("aph: not enough arguments provided\n"));
    assert!(out.contains("usage: aph"));
}

#[test]
fn prints_report_with_literal_salt() {
    let output = aph(&["2ms", "1", "64KB", "16", "password", "saltsalt"]);
    assert!(output.status.success());

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(&lines[..8], &[
        "Generation Results:",
        "Time: 2ms",
        "Threads: 1",
        "Memory: 64KB",
        "Length: 16",
        "",
        "Key: password",
        "Salt: saltsalt",
    ]);
    assert!(lines[9].starts_with("Hash: $argon2id$v=19$m=64,t=2,p=1$c2FsdHNhbHQ$"));

    let hash = lines[9].trim_start_matches("Hash: ");
    assert_eq!(lines[10], format!("Hash Length: {}", hash.len()));
    assert!(lines[11].starts_with("Generation Time: "));
    assert!(lines[11].ends_with("ms"));
}

#[test]
fn generated_salt_is_base64() {
    let output = aph(&["1ms", "1", "32KB", "16", "password"]);
    assert!(output.status.success());

    let out = stdout(&output);
    let salt_line = out.lines().find(|l| l.starts_with("Salt: ")).unwrap();
    // 16 random bytes encode to 22 characters without padding
    assert_eq!(salt_line.len(), "Salt: ".len() + 22);
    assert!(!salt_line.ends_with('='));
}

#[test]
fn malformed_stamp_fails() {
    let output = aph(&["32", "1", "64MB", "16", "password"]);
    assert!(!output.status.success());
    assert_eq!(stdout(&output), "aph: provided stamp was malformed: '32'\n");
}

#[test]
fn out_of_range_threads_fail() {
    let output = aph(&["1ms", "300", "64MB", "16", "password"]);
    assert!(!output.status.success());
    assert!(stdout(&output).starts_with("aph: invalid parameter: threads 300"));
}

#[cfg(unix)]
#[test]
fn non_utf8_password_fails_cleanly() {
    use std::os::unix::ffi::OsStrExt;

    let password = OsStr::from_bytes(&[0xff, 0xfe]);
    let args = [OsStr::new("2ms"), OsStr::new("1"), OsStr::new("64KB"), OsStr::new("16"), password];
    let output = aph(&args);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "aph: argument 5 is not valid UTF-8\n");
    assert!(!String::from_utf8_lossy(&output.stderr).contains("panicked"));
}
