// Default FixtureGenerator
//
// text  -> UUID string payload (`file_NNN.txt`)
// image -> 100x100 solid random-colour JPEG (`file_NNN.jpg`)

use crate::image_payload::{solid_jpeg, IMAGE_SIZE};
use rand::rngs::StdRng;
use rand::Rng;
use seeder_core::application::{random_uuid, RandomSource};
use seeder_core::domain::job::OBJECT_BASE_NAME;
use seeder_core::domain::{FileType, Fixture};
use seeder_core::port::{FixtureGenerator, GenerationError};
use std::sync::{Mutex, PoisonError};
use tracing::trace;

/// RNG stream for payloads; workers use streams 1..=n
const GENERATOR_STREAM: usize = 0;

/// Generator shared by all workers
///
/// With a seeded source the sequence of payloads is reproducible; which job
/// receives which payload still depends on worker scheduling.
pub struct DefaultFixtureGenerator {
    rng: Mutex<StdRng>,
}

impl DefaultFixtureGenerator {
    pub fn new(random: &RandomSource) -> Self {
        Self {
            rng: Mutex::new(random.worker_rng(GENERATOR_STREAM)),
        }
    }

    fn fixture_name(ordinal: usize, file_type: &FileType) -> String {
        format!(
            "{}_{:03}.{}",
            OBJECT_BASE_NAME,
            ordinal,
            file_type.extension()
        )
    }

    fn text_payload(&self) -> Vec<u8> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        random_uuid(&mut *rng).to_string().into_bytes()
    }

    fn image_payload(&self) -> Result<Vec<u8>, GenerationError> {
        let colour: [u8; 3] = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rng.gen()
        };
        solid_jpeg(colour, IMAGE_SIZE).map_err(|e| GenerationError::Encoding(e.to_string()))
    }
}

impl Default for DefaultFixtureGenerator {
    fn default() -> Self {
        Self::new(&RandomSource::from_entropy())
    }
}

impl FixtureGenerator for DefaultFixtureGenerator {
    fn generate(&self, file_type: &FileType, ordinal: usize) -> Result<Fixture, GenerationError> {
        let content = match file_type {
            FileType::Text => self.text_payload(),
            FileType::Image => self.image_payload()?,
            FileType::Other(name) => return Err(GenerationError::Unsupported(name.clone())),
        };

        let name = Self::fixture_name(ordinal, file_type);
        trace!(fixture = %name, bytes = content.len(), "Fixture generated");
        Ok(Fixture::new(name, content, file_type.clone()))
    }
}
