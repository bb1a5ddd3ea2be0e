//! S3-compatible object store implementation.

use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::StorageConfig;

use super::types::{ObjectStore, StorageError, UploadOptions};

/// ACL applied by default when the store is not private.
const DEFAULT_PUBLIC_ACL: &str = "public-read";

/// Object store over any S3-compatible backend.
pub struct S3ObjectStore {
    client: Client,
    config: StorageConfig,
}

impl S3ObjectStore {
    /// Builds the client from the storage configuration.
    ///
    /// The endpoint template has `{region}` substituted at construction;
    /// credentials are the configured static key pair.
    pub async fn connect(config: StorageConfig) -> Self {
        let endpoint_url = config.endpoint_url.replace("{region}", &config.region);

        let aws_config = aws_config::from_env()
            .endpoint_url(&endpoint_url)
            .region(Region::new(config.region.clone()))
            .credentials_provider(Credentials::new(
                config.key.clone(),
                config.secret.clone(),
                None,
                None,
                "static",
            ))
            .load()
            .await;

        let client = Client::new(&aws_config);
        debug!(endpoint = %endpoint_url, bucket = %config.bucket, "Object store ready");

        Self { client, config }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn name(&self) -> &str {
        "s3"
    }

    async fn upload(
        &self,
        source: &Path,
        key: &str,
        options: UploadOptions,
    ) -> Result<(), StorageError> {
        let body = ByteStream::from_path(source)
            .await
            .map_err(|e| StorageError::SourceUnreadable {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(body);

        let acl = options
            .acl
            .or_else(|| (!self.config.private).then(|| DEFAULT_PUBLIC_ACL.to_string()));
        if let Some(acl) = acl {
            request = request.acl(ObjectCannedAcl::from(acl.as_str()));
        }

        match options
            .content_type
            .or_else(|| mime_guess::from_path(key).first().map(|m| m.to_string()))
        {
            Some(content_type) => request = request.content_type(content_type),
            None => warn!(key, "Unable to guess content type, uploading without one"),
        }

        request
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        debug!(key, "Uploaded object");
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        match self
            .client
            .head_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => {
                // Absence and transport/auth failures are reported
                // identically; see DESIGN.md.
                warn!(
                    key,
                    bucket = %self.config.bucket,
                    error = %e,
                    "Existence check failed, treating as absent"
                );
                false
            }
        }
    }

    fn cdn_url(&self, key: &str) -> String {
        self.config
            .cdn_url
            .replace("{bucket}", &self.config.bucket)
            .replace("{region}", &self.config.region)
            .replace("{key}", key)
    }
}
