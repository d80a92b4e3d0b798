// Fixture Domain Model

use super::job::FileType;

/// Generated payload, consumed once by the uploader
#[derive(Debug, Clone)]
pub struct Fixture {
    pub name: String,
    pub content: Vec<u8>,
    pub file_type: FileType,
}

impl Fixture {
    pub fn new(name: impl Into<String>, content: Vec<u8>, file_type: FileType) -> Self {
        Self {
            name: name.into(),
            content,
            file_type,
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
