use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body returned by `POST /api/upload`.
///
/// Failures carry only `success` and `error`, so every other field
/// falls back to its default when a failure body is decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub image_url: String,
    /// The stored (sanitized, timestamp-prefixed) file name.
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn stored(image_url: String, filename: String, size: u64) -> Self {
        Self {
            success: true,
            image_url,
            filename,
            size,
            error: None,
        }
    }
}

/// An image uploaded during the current browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub id: String,
    pub url: String,
    pub filename: String,
    pub uploaded_at: String,
}

/// Settings the browser needs to render the uploader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Origin prefixed to relative image URLs, e.g. `http://localhost:8080`.
    pub public_origin: String,
    pub max_file_size: u64,
    /// Human-readable list such as `JPEG, PNG, GIF, WebP`.
    pub accepted_types: String,
}

/// A file found in the shared upload directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub url: String,
    pub filename: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

/// Body returned by `GET /api/images`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageListResponse {
    pub images: Vec<StoredImage>,
}

/// Format a byte count the way limits are shown to users ("10 MB", "512 KB").
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;

    if bytes >= MB {
        if bytes % MB == 0 {
            format!("{} MB", bytes / MB)
        } else {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        }
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} bytes", bytes)
    }
}
