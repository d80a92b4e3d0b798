// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Empty assignment list: {0}")]
    EmptyAssignment(&'static str),

    #[error("Job index {index} out of range (file count {file_count})")]
    JobOutOfRange { index: usize, file_count: usize },
}

pub type Result<T> = std::result::Result<T, DomainError>;
