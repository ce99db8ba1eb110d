use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

use crate::error::AppError;

/// Metadata of a file held by an [`ImageStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Path relative to the store root, `/`-separated.
    pub key: String,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

/// Trait for the shared image directory.
///
/// Abstracted as a trait so tests can use an in-memory store.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `content` under `key`.
    ///
    /// Never overwrites: returns [`AppError::AlreadyExists`] when `key` is taken.
    async fn put_new(&self, key: &str, content: &[u8]) -> Result<(), AppError>;

    /// List every stored file.
    async fn list(&self) -> Result<Vec<StoredObject>, AppError>;
}

/// Filesystem implementation of [`ImageStore`], rooted at the shared upload directory.
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put_new(&self, key: &str, content: &[u8]) -> Result<(), AppError> {
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(AppError::AlreadyExists(key.to_string()));
            }
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to create '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        let written = async {
            file.write_all(content).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                tracing::warn!(
                    path = %path.display(),
                    error = %cleanup,
                    "Failed to remove partially written upload"
                );
            }
            return Err(AppError::Storage(format!(
                "Failed to write '{}': {}",
                path.display(),
                e
            )));
        }

        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredObject>, AppError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || walk_store(&root))
            .await
            .map_err(|e| AppError::Internal(format!("Listing task failed: {}", e)))
    }
}

/// Collect every regular, non-hidden file below `root`.
fn walk_store(root: &Path) -> Vec<StoredObject> {
    if !root.exists() {
        return Vec::new();
    }

    let mut objects = Vec::new();
    let entries = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| !entry.file_name().to_string_lossy().starts_with('.'));

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry in upload directory");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "Skipping file without metadata");
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let modified_at = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        objects.push(StoredObject {
            key,
            size: metadata.len(),
            modified_at,
        });
    }

    objects.sort_by(|a, b| {
        a.modified_at
            .cmp(&b.modified_at)
            .then_with(|| a.key.cmp(&b.key))
    });
    objects
}
