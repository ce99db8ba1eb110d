use crate::error::AppError;
use crate::models::upload::format_size;

/// Largest accepted upload: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Room left in the request body limit for multipart boundaries and part headers.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Which files the upload handler accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    max_file_size: u64,
    allowed_mime_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_FILE_SIZE,
            DEFAULT_ALLOWED_MIME_TYPES.iter().map(|s| s.to_string()),
        )
    }
}

impl UploadPolicy {
    pub fn new(max_file_size: u64, allowed_mime_types: impl IntoIterator<Item = String>) -> Self {
        Self {
            max_file_size,
            allowed_mime_types: allowed_mime_types
                .into_iter()
                .map(|m| normalize_mime(&m))
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn allowed_mime_types(&self) -> &[String] {
        &self.allowed_mime_types
    }

    /// Reject content types outside the allow-list.
    ///
    /// Case and parameters are ignored: `image/PNG; q=1` matches `image/png`.
    pub fn check_content_type(&self, content_type: &str) -> Result<(), AppError> {
        let mime = normalize_mime(content_type);
        if self.allowed_mime_types.iter().any(|allowed| *allowed == mime) {
            Ok(())
        } else {
            Err(AppError::UnsupportedType {
                content_type: content_type.trim().to_string(),
                allowed: self.accepted_types(),
            })
        }
    }

    /// Reject a running byte count above the ceiling.
    pub fn check_size(&self, len: u64) -> Result<(), AppError> {
        if len > self.max_file_size {
            Err(self.too_large())
        } else {
            Ok(())
        }
    }

    pub fn too_large(&self) -> AppError {
        AppError::FileTooLarge {
            limit: format_size(self.max_file_size),
        }
    }

    /// Allow-list rendered for people, e.g. `JPEG, PNG, GIF, WebP`.
    pub fn accepted_types(&self) -> String {
        self.allowed_mime_types
            .iter()
            .map(|m| mime_label(m))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Request body limit for the upload route.
    ///
    /// Slightly above the file ceiling so oversized files are caught while
    /// streaming, with the handler's own error message.
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.max_file_size.saturating_add(MULTIPART_OVERHEAD))
            .unwrap_or(usize::MAX)
    }
}

fn normalize_mime(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

fn mime_label(mime: &str) -> String {
    match mime {
        "image/jpeg" => "JPEG".to_string(),
        "image/png" => "PNG".to_string(),
        "image/gif" => "GIF".to_string(),
        "image/webp" => "WebP".to_string(),
        "image/svg+xml" => "SVG".to_string(),
        other => other
            .rsplit('/')
            .next()
            .unwrap_or(other)
            .to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_default_image_types() {
        let policy = UploadPolicy::default();
        for mime in ["image/jpeg", "image/png", "image/gif", "image/webp"] {
            assert!(policy.check_content_type(mime).is_ok(), "{mime} should be allowed");
        }
    }

    #[test]
    fn content_type_match_ignores_case_and_parameters() {
        let policy = UploadPolicy::default();
        assert!(policy.check_content_type("Image/PNG; charset=binary").is_ok());
    }

    #[test]
    fn rejects_other_types_listing_the_allowed_ones() {
        let policy = UploadPolicy::default();
        let err = policy.check_content_type("text/plain").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported file type 'text/plain'. Allowed types: JPEG, PNG, GIF, WebP"
        );

        assert!(policy.check_content_type("image/svg+xml").is_err());
        assert!(policy.check_content_type("application/octet-stream").is_err());
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        let policy = UploadPolicy::default();
        assert!(policy.check_size(DEFAULT_MAX_FILE_SIZE).is_ok());

        let err = policy.check_size(DEFAULT_MAX_FILE_SIZE + 1).unwrap_err();
        assert_eq!(err.to_string(), "File is too large. The size limit is 10 MB");
    }

    #[test]
    fn custom_allow_list_is_normalized() {
        let policy = UploadPolicy::new(1024, vec![" IMAGE/SVG+XML ".to_string(), String::new()]);
        assert_eq!(policy.allowed_mime_types(), ["image/svg+xml".to_string()]);
        assert_eq!(policy.accepted_types(), "SVG");
        assert!(policy.check_content_type("image/svg+xml").is_ok());
    }

    #[test]
    fn body_limit_leaves_room_for_framing() {
        let policy = UploadPolicy::new(1000, Vec::new());
        assert_eq!(policy.body_limit(), 1000 + 64 * 1024);
    }
}
