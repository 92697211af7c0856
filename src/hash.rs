use std::time::{Duration, Instant};

use rand::RngCore;
use rand::rngs::OsRng;

use crate::argon2id::{Argon2id, ParamError, Params};
use crate::error::AphError;

/// Length of the salt generated when the caller does not supply one.
pub const SALT_LEN: usize = 16;

/// Everything known about one generated hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashResult {
    pub time: u32,
    pub threads: u8,
    pub memory: u32,
    pub length: u32,
    pub key: String,
    pub hash: String,
    pub characters: usize,
    pub duration: Duration,
    pub salt: Vec<u8>,
}

/// Hashes `key` with a freshly generated random salt.
pub fn generate_hash(
    time: i64,
    threads: i64,
    memory: i64,
    length: i64,
    key: &str,
) -> Result<HashResult, AphError> {
    let params = validate(time, threads, memory, length)?;

    let mut salt = vec![0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    hash_with_params(params, key, salt)
}

/// Hashes `key` with the caller's salt, used verbatim.
pub fn generate_hash_with_salt(
    time: i64,
    threads: i64,
    memory: i64,
    length: i64,
    key: &str,
    salt: &str,
) -> Result<HashResult, AphError> {
    let params = validate(time, threads, memory, length)?;
    hash_with_params(params, key, salt.as_bytes().to_vec())
}

fn validate(time: i64, threads: i64, memory: i64, length: i64) -> Result<Params, ParamError> {
    let t_cost = narrow::<u32>("time cost", time, u32::MAX.into())?;
    let p_cost = narrow::<u8>("threads", threads, u8::MAX.into())?;
    let m_cost = narrow::<u32>("memory", memory, u32::MAX.into())?;
    let output_len = narrow::<u32>("length", length, u32::MAX.into())?;
    Params::new(t_cost, m_cost, p_cost, output_len)
}

fn narrow<T: TryFrom<i64>>(name: &'static str, value: i64, max: u64) -> Result<T, ParamError> {
    T::try_from(value).map_err(|_| ParamError::OutOfRange { name, value, max })
}

fn hash_with_params(params: Params, key: &str, salt: Vec<u8>) -> Result<HashResult, AphError> {
    let argon = Argon2id::new(params);
    tracing::debug!(
        t_cost = params.t_cost(),
        m_cost = params.m_cost(),
        p_cost = params.p_cost(),
        output_len = params.output_len(),
        salt_len = salt.len(),
        "generating hash"
    );

    let start = Instant::now();
    let hash = argon.hash_encoded(key.as_bytes(), &salt);
    let duration = start.elapsed();
    let hash = hash?;

    tracing::debug!(elapsed = ?duration, characters = hash.len(), "hash generated");

    Ok(HashResult {
        time: params.t_cost(),
        threads: params.p_cost(),
        memory: params.m_cost(),
        length: params.output_len(),
        key: key.to_owned(),
        characters: hash.len(),
        hash,
        duration,
        salt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXED: &str = "$argon2id$v=19$m=65536,t=1,p=1$bXlzYWx0$siUWf7GXJ34";

    #[test]
    fn random_salt_result_echoes_parameters() {
        let result = generate_hash(2, 1, 64, 16, "mypassword").unwrap();
        assert_eq!(result.time, 2);
        assert_eq!(result.threads, 1);
        assert_eq!(result.memory, 64);
        assert_eq!(result.length, 16);
        assert_eq!(result.key, "mypassword");
        assert_eq!(result.salt.len(), SALT_LEN);
        assert_eq!(result.characters, result.hash.len());
        assert!(result.hash.starts_with("$argon2id$v=19$m=64,t=2,p=1$"));
    }

    #[test]
    fn fixed_salt_matches_known_hash() {
        let result = generate_hash_with_salt(1, 1, 65536, 8, "mypassword", "mysalt").unwrap();
        assert_eq!(result.time, 1);
        assert_eq!(result.threads, 1);
        assert_eq!(result.memory, 65536);
        assert_eq!(result.length, 8);
        assert_eq!(result.key, "mypassword");
        assert_eq!(result.salt, b"mysalt");
        assert_eq!(result.hash, FIXED);
        assert_eq!(result.characters, 51);
    }

    #[test]
    fn fixed_salt_is_deterministic() {
        let first = generate_hash_with_salt(3, 2, 256, 32, "key", "some salt").unwrap();
        let second = generate_hash_with_salt(3, 2, 256, 32, "key", "some salt").unwrap();
        assert_eq!(first.hash, second.hash);
    }

    #[test]
    fn random_salt_differs_between_calls() {
        let first = generate_hash(1, 1, 32, 16, "key").unwrap();
        let second = generate_hash(1, 1, 32, 16, "key").unwrap();
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
    }

    #[test]
    fn characters_track_hash_length() {
        for length in [4, 8, 31, 64, 65, 200] {
            let result = generate_hash_with_salt(1, 1, 32, length, "key", "").unwrap();
            assert_eq!(result.characters, result.hash.len());
        }
    }

    #[test]
    fn threads_must_fit_in_a_byte() {
        let err = generate_hash(1, 256, 4096, 16, "key").unwrap_err();
        assert!(matches!(
            err,
            AphError::Parameter(ParamError::OutOfRange { name: "threads", value: 256, max: 255 })
        ));
    }

    #[test]
    fn negative_values_are_out_of_range() {
        let err = generate_hash_with_salt(1, 1, -64, 16, "key", "salt").unwrap_err();
        assert!(matches!(
            err,
            AphError::Parameter(ParamError::OutOfRange { name: "memory", .. })
        ));
    }

    #[test]
    fn time_cost_must_fit_in_32_bits() {
        let err = generate_hash(i64::from(u32::MAX) + 1, 1, 64, 16, "key").unwrap_err();
        assert!(matches!(
            err,
            AphError::Parameter(ParamError::OutOfRange { name: "time cost", .. })
        ));
    }

    #[test]
    fn primitive_minimums_are_parameter_errors() {
        let err = generate_hash(0, 1, 64, 16, "key").unwrap_err();
        assert!(matches!(err, AphError::Parameter(ParamError::TooFewPasses)));

        let err = generate_hash(1, 4, 16, 16, "key").unwrap_err();
        assert!(matches!(err, AphError::Parameter(ParamError::MemoryTooSmall(32))));
    }
}
