use std::ffi::OsString;

use crate::error::AphError;
use crate::hash::{self, HashResult};
use crate::report::SaltFormat;
use crate::stamp;

pub const USAGE: &str = "usage: aph <time> <threads> <memory> <length> <password> [salt]";

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Milliseconds from the time stamp; handed to Argon2id as the time cost.
    pub time: i64,
    pub threads: i64,
    /// Kilobytes from the memory stamp.
    pub memory: i64,
    pub length: i64,
    pub key: String,
    pub salt: Option<String>,
}

impl Invocation {
    /// Builds an invocation from the arguments following the program name.
    pub fn from_args(args: &[String]) -> Result<Self, AphError> {
        if args.len() < 5 {
            return Err(AphError::Usage("not enough arguments provided"));
        }
        if args.len() > 6 {
            return Err(AphError::Usage("too many arguments provided"));
        }

        Ok(Self {
            time: stamp::parse_duration(&args[0])?,
            threads: parse_integer("threads", &args[1])?,
            memory: stamp::parse_size(&args[2])?,
            length: parse_integer("length", &args[3])?,
            key: args[4].clone(),
            salt: args.get(5).cloned(),
        })
    }

    pub fn salt_format(&self) -> SaltFormat {
        match self.salt {
            Some(_) => SaltFormat::Literal,
            None => SaltFormat::Base64,
        }
    }

    pub fn run(&self) -> Result<HashResult, AphError> {
        match &self.salt {
            Some(salt) => hash::generate_hash_with_salt(
                self.time,
                self.threads,
                self.memory,
                self.length,
                &self.key,
                salt,
            ),
            None => hash::generate_hash(
                self.time,
                self.threads,
                self.memory,
                self.length,
                &self.key,
            ),
        }
    }
}

/// Decodes raw arguments as UTF-8. Positions are counted from 1 after the
/// program name.
pub fn decode_args<I>(args: I) -> Result<Vec<String>, AphError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            arg.into_string()
                .map_err(|_| AphError::InvalidArgument { position: i + 1 })
        })
        .collect()
}

fn parse_integer(name: &'static str, value: &str) -> Result<i64, AphError> {
    value.parse().map_err(|_| AphError::InvalidInteger {
        name,
        value: value.to_owned(),
    })
}
