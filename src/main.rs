use std::process::ExitCode;

use aph::config::{self, Invocation, USAGE};
use aph::error::AphError;
use aph::report;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(kind = e.kind(), error = %e, "invocation failed");
            println!("aph: {e}");
            if e.wants_usage() {
                println!("{USAGE}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String, AphError> {
    let args = config::decode_args(std::env::args_os().skip(1))?;
    let invocation = Invocation::from_args(&args)?;

    tracing::info!(
        time = invocation.time,
        threads = invocation.threads,
        memory = invocation.memory,
        length = invocation.length,
        salted = invocation.salt.is_some(),
        "starting aph"
    );

    let result = invocation.run()?;
    Ok(report::render(&result, invocation.salt_format()))
}
