use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::upload::ClientConfig;
use crate::policy::{UploadPolicy, DEFAULT_ALLOWED_MIME_TYPES, DEFAULT_MAX_FILE_SIZE};
use crate::storage::layout::StorageLayout;

/// Prefix of every environment variable read by [`Settings::from_env`].
pub const ENV_PREFIX: &str = "IMGDROP";

/// Upload settings.
///
/// Defaults are overlaid by `IMGDROP_*` environment variables, e.g.
/// `IMGDROP_UPLOAD_DIR=/srv/shared-uploads/images` or
/// `IMGDROP_ALLOWED_MIME_TYPES=image/png,image/webp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Shared directory written by the handler and served by the reverse proxy.
    pub upload_dir: PathBuf,
    /// URL path under which the reverse proxy serves `upload_dir`.
    pub public_path: String,
    /// Origin the browser prefixes to relative image URLs.
    pub public_origin: String,
    pub max_file_size: u64,
    pub allowed_mime_types: Vec<String>,
    pub layout: StorageLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("shared-uploads/images"),
            public_path: "/uploads/images".to_string(),
            public_origin: "http://localhost:8080".to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            layout: StorageLayout::Flat,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::load(environment())
    }

    /// Defaults with a different upload directory (useful for testing).
    pub fn with_upload_dir(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            ..Self::default()
        }
    }

    fn load(env: config::Environment) -> Result<Self, AppError> {
        let defaults = config::Config::try_from(&Settings::default())
            .map_err(|e| AppError::Config(e.to_string()))?;

        let settings: Settings = config::Config::builder()
            .add_source(defaults)
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Config(e.to_string()))?;

        settings.validated()
    }

    fn validated(mut self) -> Result<Self, AppError> {
        if self.max_file_size == 0 {
            return Err(AppError::Config("max_file_size must be greater than zero".into()));
        }

        self.allowed_mime_types.retain(|m| !m.trim().is_empty());
        if self.allowed_mime_types.is_empty() {
            return Err(AppError::Config("allowed_mime_types must not be empty".into()));
        }

        if !self.public_path.starts_with('/') {
            return Err(AppError::Config(format!(
                "public_path must start with '/', got '{}'",
                self.public_path
            )));
        }
        let trimmed = self.public_path.trim_end_matches('/').to_string();
        self.public_path = trimmed;

        self.public_origin = self.public_origin.trim_end_matches('/').to_string();

        Ok(self)
    }

    pub fn policy(&self) -> UploadPolicy {
        UploadPolicy::new(self.max_file_size, self.allowed_mime_types.iter().cloned())
    }

    /// Public URL of a stored key.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_path.trim_end_matches('/'), key)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            public_origin: self.public_origin.clone(),
            max_file_size: self.max_file_size,
            accepted_types: self.policy().accepted_types(),
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("allowed_mime_types")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_from(vars: &[(&str, &str)]) -> Result<Settings, AppError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::load(environment().source(Some(map)))
    }

    #[test]
    fn defaults_apply_without_environment() {
        let settings = load_from(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.max_file_size, 10 * 1024 * 1024);
        assert_eq!(settings.layout, StorageLayout::Flat);
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = load_from(&[
            ("IMGDROP_UPLOAD_DIR", "/srv/uploads"),
            ("IMGDROP_MAX_FILE_SIZE", "2048"),
            ("IMGDROP_LAYOUT", "dated"),
            ("IMGDROP_ALLOWED_MIME_TYPES", "image/png,image/webp"),
            ("IMGDROP_PUBLIC_ORIGIN", "https://cdn.example.com/"),
        ])
        .unwrap();

        assert_eq!(settings.upload_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(settings.max_file_size, 2048);
        assert_eq!(settings.layout, StorageLayout::Dated);
        assert_eq!(settings.allowed_mime_types, vec!["image/png", "image/webp"]);
        assert_eq!(settings.public_origin, "https://cdn.example.com");
    }

    #[test]
    fn layout_from_environment_ignores_case() {
        let settings = load_from(&[("IMGDROP_LAYOUT", "DATED")]).unwrap();
        assert_eq!(settings.layout, StorageLayout::Dated);

        let err = load_from(&[("IMGDROP_LAYOUT", "weekly")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn rejects_relative_public_path() {
        let err = load_from(&[("IMGDROP_PUBLIC_PATH", "uploads")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn rejects_zero_size_limit() {
        let err = load_from(&[("IMGDROP_MAX_FILE_SIZE", "0")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn public_url_joins_path_and_key() {
        let settings = Settings::default();
        assert_eq!(
            settings.public_url("2026/01/02/1-a.png"),
            "/uploads/images/2026/01/02/1-a.png"
        );
    }

    #[test]
    fn client_config_describes_the_policy() {
        let config = Settings::default().client_config();
        assert_eq!(config.public_origin, "http://localhost:8080");
        assert_eq!(config.accepted_types, "JPEG, PNG, GIF, WebP");
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }
}
