// Job Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Job index in `[0, file_count)`
pub type JobIndex = usize;

/// Base name shared by every generated object key
pub const OBJECT_BASE_NAME: &str = "file";

/// Fixture type requested by the run configuration
///
/// Parsed case-insensitively. Unknown names are kept so that the job can
/// still be scheduled; generation fails for them later and the job is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileType {
    Text,
    Image,
    Other(String),
}

impl FileType {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "text" => FileType::Text,
            "image" => FileType::Image,
            _ => FileType::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FileType::Text => "text",
            FileType::Image => "image",
            FileType::Other(name) => name,
        }
    }

    /// Object key extension for this type
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Text => "txt",
            FileType::Image => "jpg",
            FileType::Other(_) => "bin",
        }
    }
}

impl From<String> for FileType {
    fn from(s: String) -> Self {
        FileType::parse(&s)
    }
}

impl From<FileType> for String {
    fn from(t: FileType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single unit of work: upload one fixture of `file_type` into `bucket`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    pub index: JobIndex,
    pub bucket: String,
    pub file_type: FileType,
}

impl FileJob {
    /// 1-based ordinal used in object names
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }

    /// Build the object key: `file_001_<suffix>.txt`
    pub fn object_key(&self, unique_suffix: &str) -> String {
        format!(
            "{}_{:03}_{}.{}",
            OBJECT_BASE_NAME,
            self.ordinal(),
            unique_suffix,
            self.file_type.extension()
        )
    }
}

/// Deterministic mapping from job index to bucket and file type
///
/// Job `i` goes to `buckets[i % buckets.len()]` with type
/// `file_types[i % file_types.len()]`, whichever worker picks it up.
#[derive(Debug, Clone)]
pub struct JobPlan {
    file_count: usize,
    buckets: Vec<String>,
    file_types: Vec<FileType>,
}

impl JobPlan {
    pub fn new(file_count: usize, buckets: Vec<String>, file_types: Vec<FileType>) -> Result<Self> {
        if buckets.is_empty() {
            return Err(DomainError::EmptyAssignment("buckets"));
        }
        if file_types.is_empty() {
            return Err(DomainError::EmptyAssignment("file_types"));
        }
        Ok(Self {
            file_count,
            buckets,
            file_types,
        })
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn buckets(&self) -> &[String] {
        &self.buckets
    }

    pub fn job(&self, index: JobIndex) -> Result<FileJob> {
        if index >= self.file_count {
            return Err(DomainError::JobOutOfRange {
                index,
                file_count: self.file_count,
            });
        }
        Ok(FileJob {
            index,
            bucket: self.buckets[index % self.buckets.len()].clone(),
            file_type: self.file_types[index % self.file_types.len()].clone(),
        })
    }
}
