// Object Event (broker payload)

use super::tags::TagSet;
use serde::{Deserialize, Serialize};

/// Metadata published for every uploaded object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEvent {
    pub bucket: String,
    pub object_name: String,
    pub tags: TagSet,
}

impl ObjectEvent {
    pub fn new(bucket: impl Into<String>, object_name: impl Into<String>, tags: TagSet) -> Self {
        Self {
            bucket: bucket.into(),
            object_name: object_name.into(),
            tags,
        }
    }
}
