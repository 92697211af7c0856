//! Generate Argon2id hashes from human-friendly parameters and report how
//! long generation took.

pub mod argon2id;
pub mod config;
pub mod error;
pub mod hash;
pub mod report;
pub mod stamp;
