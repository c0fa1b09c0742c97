use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{LotteryError, Result};

/// Parses `value` with a strftime-style `format`; `location` ends up in the error.
pub fn parse_date(
    value: &str,
    format: &str,
    location: impl FnOnce() -> String,
) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), format).map_err(|_| LotteryError::Format {
        value: value.to_string(),
        expected: format!("date '{format}'"),
        location: location(),
    })
}

pub fn format_date(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

pub fn parse_number(value: &str, location: impl FnOnce() -> String) -> Result<u8> {
    value.trim().parse::<u8>().map_err(|_| LotteryError::Format {
        value: value.to_string(),
        expected: "draw number".to_string(),
        location: location(),
    })
}

/// FDJ archives are Latin-1; every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
