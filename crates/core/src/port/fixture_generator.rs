// Fixture Generator Port
// Raw payload generation per file type (text, image)

use crate::domain::{FileType, Fixture};
use thiserror::Error;

/// Generation errors
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Encoding failed: {0}")]
    Encoding(String),
}

/// Produces the payload for one fixture
///
/// CPU-bound and synchronous; payloads are small.
pub trait FixtureGenerator: Send + Sync {
    /// Generate a fixture of `file_type`
    ///
    /// # Arguments
    /// * `file_type` - Requested type
    /// * `ordinal` - 1-based job ordinal (used in the fixture name)
    ///
    /// # Errors
    /// - GenerationError::Unsupported for unknown types
    fn generate(&self, file_type: &FileType, ordinal: usize) -> Result<Fixture, GenerationError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Generator producing deterministic payloads of `ordinal` bytes
    /// (text) or `2 * ordinal` bytes (image); unknown types fail
    #[derive(Default)]
    pub struct StaticFixtureGenerator {
        calls: Mutex<Vec<(usize, FileType)>>,
    }

    impl StaticFixtureGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        /// Payload size this generator produces
        pub fn size_for(file_type: &FileType, ordinal: usize) -> Option<usize> {
            match file_type {
                FileType::Text => Some(ordinal),
                FileType::Image => Some(2 * ordinal),
                FileType::Other(_) => None,
            }
        }

        /// (ordinal, type) of every generate call
        pub fn calls(&self) -> Vec<(usize, FileType)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl FixtureGenerator for StaticFixtureGenerator {
        fn generate(&self, file_type: &FileType, ordinal: usize) -> Result<Fixture, GenerationError> {
            self.calls
                .lock()
                .unwrap()
                .push((ordinal, file_type.clone()));
            let size = Self::size_for(file_type, ordinal)
                .ok_or_else(|| GenerationError::Unsupported(file_type.to_string()))?;
            Ok(Fixture::new(
                format!("file_{:03}.{}", ordinal, file_type.extension()),
                vec![b'x'; size],
                file_type.clone(),
            ))
        }
    }
}
