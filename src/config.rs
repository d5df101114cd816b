use std::{env, net::SocketAddr};

use dotenvy::dotenv;
use thiserror::Error;
use tracing::Level;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("invalid host or port: {0}")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    S3 {
        endpoint: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretConfig {
    Static { access_codes: String },
    Aws { secret_id: String, field: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: Level,
    pub bucket: String,
    pub region: String,
    pub public_host: Option<String>,
    pub storage: StorageConfig,
    pub secrets: SecretConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable lookup, `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or =
            |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let port = var_or("PORT", "8080");
        let port: u16 = port.parse().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port.clone(),
        })?;

        let log_level = var_or("LOG_LEVEL", "info");
        let log_level: Level = log_level.parse().map_err(|_| ConfigError::Invalid {
            name: "LOG_LEVEL",
            value: log_level.clone(),
        })?;

        let storage = match var_or("STORAGE_TYPE", "memory").as_str() {
            "memory" => StorageConfig::Memory,
            "s3" => StorageConfig::S3 {
                endpoint: lookup("S3_ENDPOINT"),
            },
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_TYPE",
                    value: other.to_string(),
                });
            }
        };

        let secrets = match var_or("SECRET_SOURCE", "static").as_str() {
            "static" => SecretConfig::Static {
                access_codes: lookup("ACCESS_CODES")
                    .ok_or(ConfigError::Missing("ACCESS_CODES"))?,
            },
            "aws" => SecretConfig::Aws {
                secret_id: lookup("SECRET_ID").ok_or(ConfigError::Missing("SECRET_ID"))?,
                field: var_or("SECRET_FIELD", "ShadowShareAccessCode"),
            },
            other => {
                return Err(ConfigError::Invalid {
                    name: "SECRET_SOURCE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port,
            log_level,
            bucket: var_or("S3_BUCKET_NAME", "internal-tools-credentials"),
            region: var_or("AWS_REGION", "us-east-1"),
            public_host: lookup("S3_PUBLIC_HOST"),
            storage,
            secrets,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}
