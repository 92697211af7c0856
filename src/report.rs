use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;

use crate::hash::HashResult;

/// How the salt line of the report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltFormat {
    /// The salt is shown exactly as the caller typed it.
    Literal,
    /// Generated salt bytes, shown as unpadded base64.
    Base64,
}

pub fn render(result: &HashResult, salt_format: SaltFormat) -> String {
    let salt = match salt_format {
        SaltFormat::Literal => String::from_utf8_lossy(&result.salt).into_owned(),
        SaltFormat::Base64 => STANDARD_NO_PAD.encode(&result.salt),
    };

    format!(
        "Generation Results:\n\
         Time: {}ms\n\
         Threads: {}\n\
         Memory: {}KB\n\
         Length: {}\n\
         \n\
         Key: {}\n\
         Salt: {}\n\
         \n\
         Hash: {}\n\
         Hash Length: {}\n\
         Generation Time: {}ms\n",
        result.time,
        result.threads,
        result.memory,
        result.length,
        result.key,
        salt,
        result.hash,
        result.characters,
        result.duration.as_millis(),
    )
}
