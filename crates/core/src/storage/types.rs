//! Types for object storage operations.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {message}")]
    SourceUnreadable { path: PathBuf, message: String },

    #[error("Upload failed for key {key}: {message}")]
    UploadFailed { key: String, message: String },
}

/// Per-upload overrides.
///
/// Fields left unset fall back to the store's defaults: a `public-read`
/// ACL for non-private stores, and a content type guessed from the key's
/// file extension.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub acl: Option<String>,
    pub content_type: Option<String>,
}

/// Trait for object storage backends.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Upload a local file under the given key.
    async fn upload(
        &self,
        source: &Path,
        key: &str,
        options: UploadOptions,
    ) -> Result<(), StorageError>;

    /// Whether an object with the given key exists.
    ///
    /// Any backend error during the check is logged and reported as
    /// "does not exist"; callers cannot distinguish absence from a
    /// failed check.
    async fn exists(&self, key: &str) -> bool;

    /// Public URL under which the object for `key` is retrievable.
    fn cdn_url(&self, key: &str) -> String;
}
