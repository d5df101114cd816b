use super::*;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::Client;

/// Access codes stored in AWS Secrets Manager as a JSON document, the list
/// itself under `field`.
#[derive(Clone)]
pub struct AwsSecretSource {
    client: Client,
    secret_id: String,
    field: String,
}

impl AwsSecretSource {
    pub async fn new(region: &str, secret_id: String, field: String) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: Client::new(&config),
            secret_id,
            field,
        }
    }
}

#[async_trait]
impl SecretSource for AwsSecretSource {
    async fn fetch_credential_set(&self) -> Result<String, SecretError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_id)
            .send()
            .await
            .map_err(|e| SecretError::Unavailable(format!("{e:?}")))?;

        let secret = output.secret_string().unwrap_or_default();
        extract_access_codes(secret, &self.field)
    }
}

/// Pulls the raw access code list out of a secret string.
pub fn extract_access_codes(secret: &str, field: &str) -> Result<String, SecretError> {
    if secret.is_empty() {
        return Err(SecretError::Unavailable("secret value is empty".into()));
    }

    let document: serde_json::Value = serde_json::from_str(secret)
        .map_err(|e| SecretError::Misconfigured(format!("secret is not JSON: {e}")))?;

    match document.get(field).and_then(|v| v.as_str()) {
        Some(codes) if !codes.is_empty() => Ok(codes.to_string()),
        _ => Err(SecretError::Misconfigured(format!(
            "{field} key not found in secret"
        ))),
    }
}
