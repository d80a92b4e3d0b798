// Object Storage Port (S3-compatible service)

use crate::domain::TagSet;
use async_trait::async_trait;
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Bucket operation failed for {bucket}: {message}")]
    Bucket { bucket: String, message: String },

    #[error("Upload of {key} to {bucket} failed: {message}")]
    Put {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Tagging of {key} in {bucket} failed: {message}")]
    Tagging {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Client error: {0}")]
    Client(String),
}

/// Object storage primitives used by the uploader
///
/// Implementations:
/// - S3ObjectStorage: AWS SDK client (MinIO, S3)
/// - mocks::InMemoryObjectStorage: tests
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Create the bucket if it does not exist (idempotent)
    async fn ensure_bucket(&self, bucket: &str) -> Result<(), StorageError>;

    /// Remove every object in the bucket
    ///
    /// # Returns
    /// Number of objects removed
    async fn clear_bucket(&self, bucket: &str) -> Result<u64, StorageError>;

    /// Write object content (single attempt)
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Replace the tag set of an existing object
    async fn put_object_tags(&self, bucket: &str, key: &str, tags: &TagSet)
        -> Result<(), StorageError>;
}

/// Content type inferred from the object key extension
pub fn content_type_for_key(key: &str) -> &'static str {
    let key = key.to_ascii_lowercase();
    match key.rsplit_once('.').map(|(_, ext)| ext) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::{BTreeMap, HashMap, HashSet};
    use std::sync::Mutex;

    type KeyPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

    /// Object as stored by the in-memory backend
    #[derive(Debug, Clone)]
    pub struct StoredObject {
        pub content: Vec<u8>,
        pub content_type: String,
        pub tags: TagSet,
    }

    /// In-memory object storage with failure injection
    #[derive(Default)]
    pub struct InMemoryObjectStorage {
        buckets: Mutex<HashMap<String, BTreeMap<String, StoredObject>>>,
        put_attempts: Mutex<Vec<String>>,
        tag_attempts: Mutex<HashMap<String, u32>>,
        failing_buckets: Mutex<HashSet<String>>,
        fail_put: Option<KeyPredicate>,
        fail_tags: Option<KeyPredicate>,
        transient_tag_failures: u32,
    }

    impl InMemoryObjectStorage {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-create a bucket with existing objects
        pub fn with_bucket(self, bucket: &str, keys: &[&str]) -> Self {
            {
                let mut buckets = self.buckets.lock().unwrap();
                let objects = buckets.entry(bucket.to_string()).or_default();
                for key in keys {
                    objects.insert(
                        key.to_string(),
                        StoredObject {
                            content: Vec::new(),
                            content_type: content_type_for_key(key).to_string(),
                            tags: TagSet::new(),
                        },
                    );
                }
            }
            self
        }

        /// Every put for a matching key fails
        pub fn fail_put_when(mut self, pred: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
            self.fail_put = Some(Box::new(pred));
            self
        }

        /// Every tag write for a matching key fails
        pub fn fail_tags_when(
            mut self,
            pred: impl Fn(&str) -> bool + Send + Sync + 'static,
        ) -> Self {
            self.fail_tags = Some(Box::new(pred));
            self
        }

        /// The first `n` tag writes of every object fail
        pub fn with_transient_tag_failures(mut self, n: u32) -> Self {
            self.transient_tag_failures = n;
            self
        }

        /// Bucket operations on `bucket` fail
        pub fn fail_bucket(self, bucket: &str) -> Self {
            self.failing_buckets
                .lock()
                .unwrap()
                .insert(bucket.to_string());
            self
        }

        pub fn has_bucket(&self, bucket: &str) -> bool {
            self.buckets.lock().unwrap().contains_key(bucket)
        }

        pub fn objects(&self, bucket: &str) -> BTreeMap<String, StoredObject> {
            self.buckets
                .lock()
                .unwrap()
                .get(bucket)
                .cloned()
                .unwrap_or_default()
        }

        pub fn object_count(&self) -> usize {
            self.buckets.lock().unwrap().values().map(|b| b.len()).sum()
        }

        /// Keys passed to `put_object`, in call order
        pub fn put_attempts(&self) -> Vec<String> {
            self.put_attempts.lock().unwrap().clone()
        }

        pub fn tag_attempts(&self, key: &str) -> u32 {
            self.tag_attempts
                .lock()
                .unwrap()
                .get(key)
                .copied()
                .unwrap_or(0)
        }

        fn check_bucket(&self, bucket: &str) -> Result<(), StorageError> {
            if self.failing_buckets.lock().unwrap().contains(bucket) {
                return Err(StorageError::Bucket {
                    bucket: bucket.to_string(),
                    message: "injected failure".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ObjectStorage for InMemoryObjectStorage {
        async fn ensure_bucket(&self, bucket: &str) -> Result<(), StorageError> {
            self.check_bucket(bucket)?;
            self.buckets
                .lock()
                .unwrap()
                .entry(bucket.to_string())
                .or_default();
            Ok(())
        }

        async fn clear_bucket(&self, bucket: &str) -> Result<u64, StorageError> {
            self.check_bucket(bucket)?;
            let mut buckets = self.buckets.lock().unwrap();
            Ok(buckets
                .get_mut(bucket)
                .map(|objects| {
                    let n = objects.len() as u64;
                    objects.clear();
                    n
                })
                .unwrap_or(0))
        }

        async fn put_object(
            &self,
            bucket: &str,
            key: &str,
            content: Vec<u8>,
            content_type: &str,
        ) -> Result<(), StorageError> {
            self.put_attempts.lock().unwrap().push(key.to_string());

            let put_err = |message: &str| StorageError::Put {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: message.to_string(),
            };
            if self.fail_put.as_ref().is_some_and(|f| f(key)) {
                return Err(put_err("injected failure"));
            }

            let mut buckets = self.buckets.lock().unwrap();
            let objects = buckets
                .get_mut(bucket)
                .ok_or_else(|| put_err("no such bucket"))?;
            objects.insert(
                key.to_string(),
                StoredObject {
                    content,
                    content_type: content_type.to_string(),
                    tags: TagSet::new(),
                },
            );
            Ok(())
        }

        async fn put_object_tags(
            &self,
            bucket: &str,
            key: &str,
            tags: &TagSet,
        ) -> Result<(), StorageError> {
            let attempt = {
                let mut attempts = self.tag_attempts.lock().unwrap();
                let n = attempts.entry(key.to_string()).or_insert(0);
                *n += 1;
                *n
            };

            let tag_err = |message: &str| StorageError::Tagging {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: message.to_string(),
            };
            if attempt <= self.transient_tag_failures {
                return Err(tag_err("transient failure"));
            }
            if self.fail_tags.as_ref().is_some_and(|f| f(key)) {
                return Err(tag_err("injected failure"));
            }

            let mut buckets = self.buckets.lock().unwrap();
            let object = buckets
                .get_mut(bucket)
                .and_then(|objects| objects.get_mut(key))
                .ok_or_else(|| tag_err("no such key"))?;
            object.tags = tags.clone();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_key() {
        assert_eq!(content_type_for_key("file_001_x.jpg"), "image/jpeg");
        assert_eq!(content_type_for_key("FILE.JPEG"), "image/jpeg");
        assert_eq!(content_type_for_key("file_001_x.txt"), "text/plain");
        assert_eq!(content_type_for_key("file_001_x.bin"), "application/octet-stream");
        assert_eq!(content_type_for_key("noext"), "application/octet-stream");
    }
}
