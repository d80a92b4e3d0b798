// S3 Infrastructure Layer
// Implements the ObjectStorage port against any S3-compatible service

pub mod connection;
pub mod s3_storage;

pub use connection::{create_client, S3Settings};
pub use s3_storage::S3ObjectStorage;
