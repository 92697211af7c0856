//! Parsing of the shorthand stamps accepted for time and memory, such as
//! `500ms`, `1.5s`, `64MB` or `0.75GB`.
//!
//! Milliseconds and kilobytes are atomic: a fractional count of either is
//! rejected instead of being silently truncated. Coarser units may be
//! fractional and are truncated toward zero after conversion.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AphError;

// Anchored: text around a stamp (`500msx`, ` 1s`) is rejected, not skipped.
static DURATION_STAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)(ms|s)$").expect("duration stamp pattern"));

static SIZE_STAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)(KB|MB|GB)$").expect("size stamp pattern"));

/// Parses `Xs` or `Xms` into milliseconds.
pub fn parse_duration(stamp: &str) -> Result<i64, AphError> {
    let (value, unit) = split(&DURATION_STAMP, stamp)?;
    match unit {
        "ms" => atomic(value, stamp),
        "s" => Ok(scale(value, 1000.0)),
        _ => Err(AphError::MalformedStamp(stamp.to_owned())),
    }
}

/// Parses `XKB`, `XMB` or `XGB` into kilobytes.
pub fn parse_size(stamp: &str) -> Result<i64, AphError> {
    let (value, unit) = split(&SIZE_STAMP, stamp)?;
    match unit {
        "KB" => atomic(value, stamp),
        "MB" => Ok(scale(value, 1024.0)),
        "GB" => Ok(scale(value, 1024.0 * 1024.0)),
        _ => Err(AphError::MalformedStamp(stamp.to_owned())),
    }
}

fn split<'a>(pattern: &Regex, stamp: &'a str) -> Result<(f64, &'a str), AphError> {
    let malformed = || AphError::MalformedStamp(stamp.to_owned());

    let captures = pattern.captures(stamp).ok_or_else(malformed)?;
    let (Some(number), Some(unit)) = (captures.get(1), captures.get(2)) else {
        return Err(malformed());
    };

    let value: f64 = number.as_str().parse().map_err(|_| malformed())?;
    if !value.is_finite() {
        return Err(malformed());
    }

    Ok((value, unit.as_str()))
}

fn atomic(value: f64, stamp: &str) -> Result<i64, AphError> {
    if value.fract() != 0.0 {
        return Err(AphError::SplitAtomicUnit(stamp.to_owned()));
    }
    Ok(value as i64)
}

// `as` truncates toward zero and saturates at i64::MAX.
fn scale(value: f64, factor: f64) -> i64 {
    (value * factor) as i64
}
