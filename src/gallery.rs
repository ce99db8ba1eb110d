//! Browser-side upload state.
//!
//! Kept free of DOM types so the transitions can be tested natively; the
//! components feed in the response, the clock and the display timestamp.

use crate::models::upload::{ImageInfo, UploadResponse};

/// How long the "Copied!" label stays on a card.
pub const COPIED_RESET_MS: u32 = 1_000;

/// Shown when the request itself fails or the reply cannot be decoded.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Upload failed. Please try again.";

/// Shown when the clipboard rejects a write.
pub const CLIPBOARD_FAILURE_MESSAGE: &str = "Could not copy the URL to the clipboard.";

/// Shown when a file arrives while another upload is still running.
pub const UPLOAD_IN_PROGRESS_MESSAGE: &str =
    "An upload is already in progress. Drop the file again once it finishes.";

/// Shown in place of an image the proxy cannot serve (yet).
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='400' height='300' viewBox='0 0 400 300'%3E%3Crect width='400' height='300' fill='%23e5e7eb'/%3E%3Ctext x='200' y='155' font-family='sans-serif' font-size='18' fill='%236b7280' text-anchor='middle'%3EImage not available%3C/text%3E%3C/svg%3E";

/// Whether an upload is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
}

impl UploadPhase {
    pub fn is_uploading(self) -> bool {
        self == UploadPhase::Uploading
    }

    /// Move to `Uploading`. Fails with the message to show the user when an
    /// upload is already running.
    pub fn begin(&mut self) -> Result<(), &'static str> {
        if self.is_uploading() {
            return Err(UPLOAD_IN_PROGRESS_MESSAGE);
        }
        *self = UploadPhase::Uploading;
        Ok(())
    }

    pub fn finish(&mut self) {
        *self = UploadPhase::Idle;
    }
}

/// Result of feeding a handler reply into the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Added(ImageInfo),
    /// The handler refused the file; carries its message verbatim.
    Rejected(String),
}

/// Images uploaded during this session, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    entries: Vec<ImageInfo>,
}

impl Gallery {
    pub fn entries(&self) -> &[ImageInfo] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply a handler reply received at `now_ms`.
    ///
    /// Successful replies append one entry; failures leave the gallery untouched.
    pub fn record(&mut self, response: UploadResponse, uploaded_at: String, now_ms: i64) -> UploadOutcome {
        if !response.success {
            let message = response
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| TRANSPORT_FAILURE_MESSAGE.to_string());
            return UploadOutcome::Rejected(message);
        }

        let image = ImageInfo {
            id: self.next_id(now_ms),
            url: response.image_url,
            filename: response.filename,
            uploaded_at,
        };
        self.entries.push(image.clone());
        UploadOutcome::Added(image)
    }

    /// The timestamp, suffixed when an earlier entry already used it.
    fn next_id(&self, now_ms: i64) -> String {
        let base = now_ms.to_string();
        if !self.entries.iter().any(|e| e.id == base) {
            return base;
        }
        (1..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| !self.entries.iter().any(|e| &e.id == candidate))
            .unwrap_or(base)
    }
}

/// The `src` to swap in after an image failed to load.
///
/// `None` once the placeholder itself is showing, so a failing placeholder
/// cannot loop.
pub fn fallback_image_src(current: &str) -> Option<&'static str> {
    (current != PLACEHOLDER_IMAGE).then_some(PLACEHOLDER_IMAGE)
}

/// Turn a URL returned by the handler into one the browser can open.
///
/// Root-relative paths are served by the reverse proxy at `public_origin`;
/// anything else is already absolute.
pub fn absolute_image_url(public_origin: &str, url: &str) -> String {
    if url.starts_with('/') {
        format!("{}{}", public_origin.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(name: &str) -> UploadResponse {
        UploadResponse::stored(
            format!("/uploads/images/{name}"),
            name.to_string(),
            10,
        )
    }

    fn rejected(message: &str) -> UploadResponse {
        UploadResponse {
            success: false,
            error: Some(message.to_string()),
            ..UploadResponse::default()
        }
    }

    #[test]
    fn consecutive_uploads_keep_submission_order() {
        let mut gallery = Gallery::default();
        for n in 0..5 {
            let outcome = gallery.record(stored(&format!("{n}-x.png")), "now".into(), 1000 + n);
            assert!(matches!(outcome, UploadOutcome::Added(_)));
        }

        let names: Vec<_> = gallery.entries().iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, ["0-x.png", "1-x.png", "2-x.png", "3-x.png", "4-x.png"]);
    }

    #[test]
    fn rejection_leaves_gallery_unchanged() {
        let mut gallery = Gallery::default();
        gallery.record(stored("1-a.png"), "now".into(), 1);

        let outcome = gallery.record(rejected("File is too large"), "now".into(), 2);

        assert_eq!(outcome, UploadOutcome::Rejected("File is too large".into()));
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn rejection_without_message_uses_generic_text() {
        let mut gallery = Gallery::default();
        let outcome = gallery.record(
            UploadResponse {
                success: false,
                ..UploadResponse::default()
            },
            "now".into(),
            1,
        );
        assert_eq!(
            outcome,
            UploadOutcome::Rejected(TRANSPORT_FAILURE_MESSAGE.into())
        );
        assert!(gallery.is_empty());
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut gallery = Gallery::default();
        gallery.record(stored("a.png"), "now".into(), 42);
        gallery.record(stored("b.png"), "now".into(), 42);
        gallery.record(stored("c.png"), "now".into(), 42);

        let ids: Vec<_> = gallery.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["42", "42-1", "42-2"]);
    }

    #[test]
    fn entry_copies_response_fields() {
        let mut gallery = Gallery::default();
        let UploadOutcome::Added(image) =
            gallery.record(stored("7-cat.gif"), "10/16/2026, 12:00:00".into(), 7)
        else {
            panic!("expected the upload to be added");
        };

        assert_eq!(image.url, "/uploads/images/7-cat.gif");
        assert_eq!(image.filename, "7-cat.gif");
        assert_eq!(image.uploaded_at, "10/16/2026, 12:00:00");
    }

    #[test]
    fn phase_allows_one_upload_at_a_time() {
        let mut phase = UploadPhase::default();
        assert_eq!(phase.begin(), Ok(()));
        assert_eq!(phase.begin(), Err(UPLOAD_IN_PROGRESS_MESSAGE));
        assert!(phase.is_uploading());
        phase.finish();
        assert!(!phase.is_uploading());
        assert_eq!(phase.begin(), Ok(()));
    }

    #[test]
    fn relative_urls_get_the_public_origin() {
        assert_eq!(
            absolute_image_url("http://localhost:8080/", "/uploads/images/1-a.png"),
            "http://localhost:8080/uploads/images/1-a.png"
        );
        assert_eq!(
            absolute_image_url("http://localhost:8080", "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn broken_image_falls_back_to_placeholder_once() {
        let src = "http://localhost:8080/uploads/images/1-cat.png";
        assert_eq!(fallback_image_src(src), Some(PLACEHOLDER_IMAGE));
        assert_eq!(fallback_image_src(PLACEHOLDER_IMAGE), None);
        assert!(PLACEHOLDER_IMAGE.starts_with("data:image/svg+xml,"));
    }
}
