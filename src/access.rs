//! Passphrase gate in front of the portal.
//!
//! Plain set membership against the current access codes: no hashing, no
//! lockout. The code list is fetched fresh on every check so rotation in the
//! secret store takes effect immediately.

use std::sync::Arc;

use crate::errors::{ApiError, AuthError, BackendError};
use crate::secrets::SecretSource;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    codes: Vec<String>,
}

impl CredentialSet {
    /// Splits on `,`, trims every entry and skips the empty ones.
    pub fn parse(raw: &str) -> Self {
        let codes = raw
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();
        Self { codes }
    }

    pub fn contains(&self, passphrase: &str) -> bool {
        self.codes.iter().any(|code| code == passphrase)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[derive(Clone)]
pub struct AccessGate {
    source: Arc<dyn SecretSource>,
}

impl AccessGate {
    pub fn new(source: Arc<dyn SecretSource>) -> Self {
        Self { source }
    }

    /// `true` only when the passphrase is one of the current codes. Any
    /// failure reaching the secret source counts as a rejection.
    pub async fn check_access(&self, passphrase: &str) -> bool {
        self.verify(passphrase).await.is_ok()
    }

    pub async fn verify(&self, passphrase: &str) -> Result<(), ApiError> {
        if passphrase.is_empty() {
            return Err(AuthError::MissingPassphrase.into());
        }

        let raw = self.source.fetch_credential_set().await.map_err(|e| {
            tracing::error!(error = %e, "failed to fetch access codes");
            BackendError::from(e)
        })?;

        let credentials = CredentialSet::parse(&raw);
        if credentials.contains(passphrase) {
            tracing::info!("access granted");
            Ok(())
        } else {
            tracing::warn!(known_codes = credentials.len(), "access denied");
            Err(AuthError::Mismatch.into())
        }
    }
}
