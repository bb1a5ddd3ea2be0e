//! Mock object store for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::storage::{ObjectStore, StorageError, UploadOptions};

/// A recorded upload for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    /// Remote key the object was stored under.
    pub key: String,
    /// Local path the bytes came from.
    pub source: PathBuf,
    /// Options passed by the caller.
    pub options: UploadOptions,
}

/// Mock implementation of the ObjectStore trait.
///
/// Uploads read the source file like the real store does, so a missing
/// artifact surfaces as `SourceUnreadable`. Successful uploads are
/// recorded and become visible to `exists`.
#[derive(Debug)]
pub struct MockObjectStore {
    uploads: RwLock<Vec<RecordedUpload>>,
    existing: RwLock<HashSet<String>>,
    next_error: RwLock<Option<StorageError>>,
    cdn_template: String,
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockObjectStore {
    /// Create a new mock store with the default CDN template.
    pub fn new() -> Self {
        Self {
            uploads: RwLock::new(Vec::new()),
            existing: RwLock::new(HashSet::new()),
            next_error: RwLock::new(None),
            cdn_template: "https://mock-bucket.mock-region.cdn.example.com/{key}".to_string(),
        }
    }

    /// Create a mock store with a custom CDN template; `{key}` is
    /// substituted per call.
    pub fn with_cdn_template(cdn_template: impl Into<String>) -> Self {
        Self {
            cdn_template: cdn_template.into(),
            ..Self::new()
        }
    }

    /// All recorded uploads, in call order.
    pub async fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.read().await.clone()
    }

    /// Pre-populate an existing key (for testing `exists`).
    pub async fn add_existing(&self, key: &str) {
        self.existing.write().await.insert(key.to_string());
    }

    /// Configure the next upload to fail with the given error.
    pub async fn set_next_error(&self, error: StorageError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<StorageError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn upload(
        &self,
        source: &Path,
        key: &str,
        options: UploadOptions,
    ) -> Result<(), StorageError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        // Read the source like the real backend would; a wrong fallback
        // path must fail here, not silently succeed.
        tokio::fs::metadata(source)
            .await
            .map_err(|e| StorageError::SourceUnreadable {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;

        self.uploads.write().await.push(RecordedUpload {
            key: key.to_string(),
            source: source.to_path_buf(),
            options,
        });
        self.existing.write().await.insert(key.to_string());
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.existing.read().await.contains(key)
    }

    fn cdn_url(&self, key: &str) -> String {
        self.cdn_template.replace("{key}", key)
    }
}
