//! Configuration module
//!
//! Process-wide settings for the derivative service: source/derivative
//! bucket, resolution allow-list, key prefix, redirect base URL, storage
//! backend selection, and HTTP bind address. Loaded once at startup and
//! treated as immutable afterwards.

use std::env;

use crate::storage_types::StorageBackend;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Storage container holding both source objects and derivatives.
    pub bucket: String,
    /// Resolution tokens (`"WxH"`) admitted by the policy. Empty = unrestricted.
    pub allowed_resolutions: Vec<String>,
    /// Optional key prefix joined to the original key with `/` before lookups.
    pub prefix: Option<String>,
    /// Base URL used to compose the redirect target after a successful transform.
    pub public_base_url: String,
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub aws_region: Option<String>,
    pub aws_endpoint_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StorageBackend::S3,
        };

        Ok(Config {
            bucket: env::var("BUCKET").unwrap_or_default(),
            allowed_resolutions: parse_resolution_list(
                &env::var("ALLOWED_RESOLUTIONS").unwrap_or_default(),
            ),
            prefix: env::var("PREFIX").ok().filter(|p| !p.is_empty()),
            public_base_url: env::var("URL").unwrap_or_default(),
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            aws_endpoint_url: env::var("AWS_ENDPOINT_URL").ok(),
            server_host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
        })
    }

    /// Fail fast on settings the service cannot run without.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.public_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "URL must be set: it is the base of every redirect target"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.bucket.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "BUCKET must be set when using the s3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using the local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Comma-separated allow-list entries, trimmed, empties dropped.
fn parse_resolution_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
