// S3 ObjectStorage Implementation

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier, Tag, Tagging,
};
use aws_sdk_s3::Client;
use seeder_core::domain::TagSet;
use seeder_core::port::{ObjectStorage, StorageError};
use std::error::Error as StdError;
use tracing::{debug, info};

use crate::connection::DEFAULT_REGION;

/// Max keys per DeleteObjects request
const DELETE_BATCH_SIZE: usize = 1000;

// Full error chain; the SDK's plain Display is just "service error"
fn describe(err: &(dyn StdError + 'static)) -> String {
    DisplayErrorContext(err).to_string()
}

fn bucket_error(bucket: &str, err: &(dyn StdError + 'static)) -> StorageError {
    StorageError::Bucket {
        bucket: bucket.to_string(),
        message: describe(err),
    }
}

/// Convert a tag map into the S3 tagging document
pub fn build_tagging(tags: &TagSet) -> Result<Tagging, String> {
    let tag_set = tags
        .iter()
        .map(|(key, value)| Tag::builder().key(key).value(value).build())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| describe(&e))?;

    Tagging::builder()
        .set_tag_set(Some(tag_set))
        .build()
        .map_err(|e| describe(&e))
}

pub struct S3ObjectStorage {
    client: Client,
}

impl S3ObjectStorage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn region(&self) -> String {
        self.client
            .config()
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    /// All keys in the bucket; None if the bucket does not exist
    async fn list_keys(&self, bucket: &str) -> Result<Option<Vec<String>>, StorageError> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut req = self.client.list_objects_v2().bucket(bucket);
            if let Some(token) = continuation.as_deref() {
                req = req.continuation_token(token);
            }

            let resp = match req.send().await {
                Ok(resp) => resp,
                Err(err) => {
                    let missing = err
                        .as_service_error()
                        .map(|e| e.is_no_such_bucket())
                        .unwrap_or(false);
                    if missing {
                        return Ok(None);
                    }
                    return Err(bucket_error(bucket, &err));
                }
            };

            keys.extend(
                resp.contents()
                    .iter()
                    .filter_map(|obj| obj.key().map(str::to_string)),
            );

            match resp.next_continuation_token() {
                Some(token) if !token.is_empty() => continuation = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(Some(keys))
    }

    async fn delete_batch(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError> {
        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| bucket_error(bucket, &e))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(true)
            .build()
            .map_err(|e| bucket_error(bucket, &e))?;

        let resp = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| bucket_error(bucket, &e))?;

        if let Some(failed) = resp.errors().first() {
            return Err(StorageError::Bucket {
                bucket: bucket.to_string(),
                message: format!(
                    "failed to delete {} ({} errors): {}",
                    failed.key().unwrap_or("<unknown>"),
                    resp.errors().len(),
                    failed.message().unwrap_or("no message")
                ),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn ensure_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => {
                debug!(bucket = %bucket, "Bucket exists");
                return Ok(());
            }
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false);
                if !missing {
                    return Err(bucket_error(bucket, &err));
                }
            }
        }

        let mut req = self.client.create_bucket().bucket(bucket);
        let region = self.region();
        if region != DEFAULT_REGION {
            req = req.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region.as_str()))
                    .build(),
            );
        }

        match req.send().await {
            Ok(_) => {
                info!(bucket = %bucket, "Bucket created");
                Ok(())
            }
            Err(err) => {
                // Lost a race with another creator
                let exists = err
                    .as_service_error()
                    .map(|e| e.is_bucket_already_owned_by_you() || e.is_bucket_already_exists())
                    .unwrap_or(false);
                if exists {
                    Ok(())
                } else {
                    Err(bucket_error(bucket, &err))
                }
            }
        }
    }

    async fn clear_bucket(&self, bucket: &str) -> Result<u64, StorageError> {
        let keys = match self.list_keys(bucket).await? {
            Some(keys) => keys,
            None => {
                debug!(bucket = %bucket, "Bucket absent, nothing to clear");
                return Ok(0);
            }
        };

        for batch in keys.chunks(DELETE_BATCH_SIZE) {
            self.delete_batch(bucket, batch).await?;
        }
        Ok(keys.len() as u64)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let length = content.len() as i64;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .content_length(length)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(|e| StorageError::Put {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: describe(&e),
            })?;
        Ok(())
    }

    async fn put_object_tags(
        &self,
        bucket: &str,
        key: &str,
        tags: &TagSet,
    ) -> Result<(), StorageError> {
        let tagging_error = |message: String| StorageError::Tagging {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        };

        let tagging = build_tagging(tags).map_err(tagging_error)?;
        self.client
            .put_object_tagging()
            .bucket(bucket)
            .key(key)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| tagging_error(describe(&e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tagging_preserves_pairs() {
        let mut tags = TagSet::new();
        tags.insert("env".to_string(), "qa".to_string());
        tags.insert("owner".to_string(), "seeder".to_string());

        let tagging = build_tagging(&tags).unwrap();
        let pairs: Vec<(&str, &str)> = tagging
            .tag_set()
            .iter()
            .map(|t| (t.key(), t.value()))
            .collect();
        assert_eq!(pairs, vec![("env", "qa"), ("owner", "seeder")]);
    }

    #[test]
    fn test_build_tagging_empty() {
        let tagging = build_tagging(&TagSet::new()).unwrap();
        assert!(tagging.tag_set().is_empty());
    }
}
