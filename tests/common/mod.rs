#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum_test::multipart::{MultipartForm, Part};
use tempfile::TempDir;

use imgdrop::api::routes::api_router;
use imgdrop::config::Settings;
use imgdrop::state::AppState;

/// Holds a temporary shared directory and the Axum router writing into it.
///
/// The directory is removed when this struct is dropped.
pub struct TestEnv {
    _dir: TempDir,
    pub upload_dir: PathBuf,
    pub settings: Settings,
    pub router: Router,
}

impl TestEnv {
    /// Default settings rooted at a fresh temporary directory.
    pub fn start() -> Self {
        Self::start_with(|_| {})
    }

    /// Like [`TestEnv::start`], letting the caller adjust the settings first.
    pub fn start_with(configure: impl FnOnce(&mut Settings)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let upload_dir = dir.path().join("shared-uploads").join("images");

        let mut settings = Settings::with_upload_dir(&upload_dir);
        configure(&mut settings);

        let leptos_options = leptos::prelude::LeptosOptions::builder()
            .output_name("imgdrop")
            .build();

        let app_state = AppState::new(settings.clone(), leptos_options);

        // --- Build Router (API routes only, no Leptos SSR) ---
        let router = api_router(&app_state).with_state(app_state);

        Self {
            _dir: dir,
            upload_dir,
            settings,
            router,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Map an `imageUrl` returned by the handler back to the file on disk.
    pub fn path_for_url(&self, url: &str) -> PathBuf {
        let prefix = format!("{}/", self.settings.public_path);
        let key = url
            .strip_prefix(&prefix)
            .unwrap_or_else(|| panic!("URL '{url}' is outside '{prefix}'"));
        self.upload_dir.join(key)
    }

    /// Every regular file currently under the upload directory.
    pub fn stored_files(&self) -> Vec<PathBuf> {
        if !self.upload_dir.exists() {
            return Vec::new();
        }
        walkdir::WalkDir::new(&self.upload_dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect()
    }
}

/// Helper: upload `bytes` as the `file` field.
pub async fn upload(
    server: &axum_test::TestServer,
    file_name: &str,
    mime_type: &str,
    bytes: Vec<u8>,
) -> axum_test::TestResponse {
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes).file_name(file_name).mime_type(mime_type),
    );

    server.post("/api/upload").multipart(form).await
}

/// A minimal 1x1 PNG.
pub fn png_bytes() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
        0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, // bit depth, color type, CRC
        0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, // IDAT chunk
        0x08, 0xD7, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, // compressed data
        0x00, 0x02, 0x00, 0x01, 0xE2, 0x21, 0xBC, 0x33, // CRC
        0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, // IEND chunk
        0xAE, 0x42, 0x60, 0x82,
    ]
}

/// `len` bytes that start like a JPEG, with a non-repeating tail.
pub fn jpeg_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend((0..len.saturating_sub(4)).map(|i| (i % 251) as u8));
    bytes.truncate(len);
    bytes
}
