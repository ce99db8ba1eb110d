use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Longest sanitized name kept, leaving room for the timestamp prefix.
const MAX_NAME_LEN: usize = 200;

/// Name used when nothing usable survives sanitization.
const FALLBACK_NAME: &str = "upload";

/// How stored files are arranged below the upload directory.
///
/// Parsed case-insensitively, so `IMGDROP_LAYOUT=Dated` works too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum StorageLayout {
    /// `{upload_dir}/{name}`
    #[default]
    Flat,
    /// `{upload_dir}/{YYYY}/{MM}/{DD}/{name}`
    Dated,
}

/// Where an accepted upload will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Path relative to the upload directory, `/`-separated.
    pub key: String,
    /// Final path component of `key`.
    pub filename: String,
}

impl std::str::FromStr for StorageLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(StorageLayout::Flat),
            "dated" => Ok(StorageLayout::Dated),
            other => Err(format!(
                "unknown storage layout '{other}', expected 'flat' or 'dated'"
            )),
        }
    }
}

impl TryFrom<String> for StorageLayout {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl StorageLayout {
    /// Compute the destination of `original_name` uploaded at `now`.
    ///
    /// `stamp` is the millisecond prefix; it comes from [`UploadClock`] so it
    /// can differ from `now` when uploads arrive within the same millisecond.
    pub fn destination(self, now: DateTime<Utc>, stamp: i64, original_name: &str) -> Destination {
        let filename = format!("{}-{}", stamp, sanitize_filename(original_name));
        let key = match self {
            StorageLayout::Flat => filename.clone(),
            StorageLayout::Dated => format!(
                "{:04}/{:02}/{:02}/{}",
                now.year(),
                now.month(),
                now.day(),
                filename
            ),
        };
        Destination { key, filename }
    }
}

/// Reduce a client-supplied name to a safe single path component.
///
/// Only the last component survives (browsers on some platforms send full
/// paths), and anything other than ASCII alphanumerics, `.` and `-` is
/// replaced with `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    if sanitized.chars().all(|c| c == '.') {
        FALLBACK_NAME.to_string()
    } else {
        sanitized
    }
}

/// Monotonic millisecond clock shared by all upload requests.
///
/// Never hands out the same stamp twice within a process.
#[derive(Debug, Default)]
pub struct UploadClock {
    last: AtomicI64,
}

impl UploadClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `now_ms`, or one past the previous stamp if the clock has not advanced.
    pub fn next_stamp(&self, now_ms: i64) -> i64 {
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now_ms.max(previous + 1);
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => previous = actual,
            }
        }
    }
}
