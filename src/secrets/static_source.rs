use super::*;

/// Access codes handed in through configuration.
#[derive(Debug, Clone)]
pub struct StaticSecretSource {
    raw: String,
}

impl StaticSecretSource {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

#[async_trait]
impl SecretSource for StaticSecretSource {
    async fn fetch_credential_set(&self) -> Result<String, SecretError> {
        Ok(self.raw.clone())
    }
}
