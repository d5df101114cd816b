mod aws;
mod static_source;

pub use aws::{AwsSecretSource, extract_access_codes};
pub use static_source::StaticSecretSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::errors::BackendError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("secret unavailable: {0}")]
    Unavailable(String),
    #[error("secret misconfigured: {0}")]
    Misconfigured(String),
}

impl From<SecretError> for BackendError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::Unavailable(msg) => BackendError::SecretUnavailable(msg),
            SecretError::Misconfigured(msg) => BackendError::SecretMisconfigured(msg),
        }
    }
}

/// Where the valid access codes live. Returns the raw comma separated list.
#[async_trait]
pub trait SecretSource: Send + Sync + 'static {
    async fn fetch_credential_set(&self) -> Result<String, SecretError>;
}
