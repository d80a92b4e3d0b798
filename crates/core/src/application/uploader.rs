// Upload Facade
// Content is written once; the tag write is retried with bounded backoff.

use crate::application::retry::RetryPolicy;
use crate::domain::TagSet;
use crate::port::{content_type_for_key, ObjectStorage, StorageError};
use std::sync::Arc;
use tracing::info;

pub struct Uploader {
    storage: Arc<dyn ObjectStorage>,
    tag_retry: RetryPolicy,
}

impl Uploader {
    pub fn new(storage: Arc<dyn ObjectStorage>, tag_retry: RetryPolicy) -> Self {
        Self { storage, tag_retry }
    }

    /// Create the bucket if absent (idempotent)
    pub async fn ensure_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.storage.ensure_bucket(bucket).await
    }

    /// Remove all objects from the bucket
    pub async fn clear_bucket(&self, bucket: &str) -> Result<u64, StorageError> {
        let removed = self.storage.clear_bucket(bucket).await?;
        info!(bucket = %bucket, removed, "Bucket cleared");
        Ok(removed)
    }

    /// Upload one object, then attach its tags
    ///
    /// # Errors
    /// - StorageError::Put if the content write fails (not retried)
    /// - StorageError::Tagging if every tag write attempt fails
    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        content: Vec<u8>,
        tags: &TagSet,
    ) -> Result<(), StorageError> {
        let content_type = content_type_for_key(key);
        self.storage
            .put_object(bucket, key, content, content_type)
            .await?;

        if !tags.is_empty() {
            self.tag_retry
                .run(key, || self.storage.put_object_tags(bucket, key, tags))
                .await?;
        }
        Ok(())
    }
}
