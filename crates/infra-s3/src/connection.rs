// S3 Client Setup

use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::Client;
use seeder_core::port::StorageError;
use std::time::Duration;

pub const ENV_HOST: &str = "MINIO_HOST";
pub const ENV_USER: &str = "MINIO_USER";
pub const ENV_PASSWORD: &str = "MINIO_PASSWORD";
pub const ENV_REGION: &str = "MINIO_REGION";

pub const DEFAULT_REGION: &str = "us-east-1";

const OPERATION_TIMEOUT: Duration = Duration::from_secs(60);
const CREDENTIALS_PROVIDER: &str = "fixture-seeder";

/// Connection settings for an S3-compatible endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct S3Settings {
    /// Endpoint URL including scheme
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

impl S3Settings {
    /// Read settings from the MINIO_* environment variables
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup
    ///
    /// # Errors
    /// StorageError::Client if host, user or password is missing or blank
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StorageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        match (required(ENV_HOST), required(ENV_USER), required(ENV_PASSWORD)) {
            (Some(host), Some(access_key), Some(secret_key)) => Ok(Self {
                endpoint: endpoint_url(&host),
                access_key,
                secret_key,
                region: required(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            }),
            _ => Err(StorageError::Client(format!(
                "environment variables {}, {} and {} are required",
                ENV_HOST, ENV_USER, ENV_PASSWORD
            ))),
        }
    }
}

/// Full endpoint URL; plain hosts get `http://`
pub fn endpoint_url(host: &str) -> String {
    if host.starts_with("https://") || host.starts_with("http://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", host.trim_end_matches('/'))
    }
}

/// Create an S3 client with path-style addressing and static credentials
///
/// SDK-level retries are disabled: content writes are attempted once and
/// tag writes are retried by the application.
pub fn create_client(settings: &S3Settings) -> Client {
    let credentials = Credentials::new(
        settings.access_key.clone(),
        settings.secret_key.clone(),
        None,
        None,
        CREDENTIALS_PROVIDER,
    );

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()))
        .endpoint_url(settings.endpoint.clone())
        .credentials_provider(credentials)
        .force_path_style(true)
        .retry_config(RetryConfig::disabled())
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(OPERATION_TIMEOUT)
                .build(),
        )
        .build();

    Client::from_conf(config)
}
