// Fixture Infrastructure - Payload Generators
// Implements: FixtureGenerator

pub mod generator;
pub mod image_payload;

pub use generator::DefaultFixtureGenerator;
pub use image_payload::{solid_jpeg, IMAGE_SIZE};
