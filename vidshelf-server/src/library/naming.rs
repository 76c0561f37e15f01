//! Storage names for checked-in files.
//!
//! A file checked in at `2025-12-20 12:34:56.789` is stored as `5jegi3ahwk5.<ext>`: the decimal
//! number `20251220123456789` written in base 36.

use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Timelike};

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Writes `n` in lowercase base 36.
pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Returns the decimal number `YYYYMMDDHHMMSSmmm` for the given time.
pub fn timestamp_value(dt: &NaiveDateTime) -> u64 {
    let millis = dt.nanosecond() / 1_000_000 % 1000;
    let digits = format!("{}{millis:03}", dt.format("%Y%m%d%H%M%S"));
    digits.parse().unwrap_or_default()
}

pub fn make_timestamp_name(dt: &NaiveDateTime) -> String {
    to_base36(timestamp_value(dt))
}

/// Hands out storage names that are strictly increasing, even when two files are checked in
/// within the same millisecond.
#[derive(Debug, Default)]
pub struct NameGenerator {
    last: Option<u64>,
}

impl NameGenerator {
    pub fn next_name(&mut self, dt: &NaiveDateTime) -> String {
        let value = match self.last {
            Some(last) => timestamp_value(dt).max(last + 1),
            None => timestamp_value(dt),
        };
        self.last = Some(value);
        to_base36(value)
    }
}

/// Returns `target` if nothing exists there yet. Otherwise appends `_1`, `_2`, ... to the file
/// stem until the path is free.
pub async fn unique_target_path(target: &Path) -> std::io::Result<PathBuf> {
    if !tokio::fs::try_exists(target).await? {
        return Ok(target.to_path_buf());
    }

    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = target
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut suffix = 1;
    loop {
        let candidate = target.with_file_name(format!("{stem}_{suffix}{extension}"));
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}
