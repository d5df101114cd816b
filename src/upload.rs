use bytes::Bytes;
use mime::Mime;
use serde::Serialize;

use crate::errors::{ApiError, ValidationError};
use crate::keys::derive_key;
use crate::policy::{StorageTier, policy_for};
use crate::storage::StoreGateway;
use crate::validator::validate;

/// A single file upload, checked for shape at the boundary.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    /// Recorded as the object's content type; never used for acceptance.
    pub declared_mime_type: Mime,
    pub size_bytes: u64,
    pub tier: StorageTier,
    pub content: Bytes,
}

impl UploadRequest {
    /// The tier is checked before anything else. An absent tier means `temp`.
    pub fn from_parts(
        file_name: Option<String>,
        content_type: Option<&str>,
        tier: Option<&str>,
        content: Option<Bytes>,
    ) -> Result<Self, ValidationError> {
        let tier = match tier {
            Some(raw) => raw.parse::<StorageTier>()?,
            None => StorageTier::Temp,
        };

        let (file_name, content) = match (file_name, content) {
            (Some(name), Some(content)) if !name.is_empty() => (name, content),
            _ => return Err(ValidationError::MissingFile),
        };

        let declared_mime_type = content_type
            .and_then(|ct| ct.parse().ok())
            .unwrap_or(mime::TEXT_PLAIN);

        Ok(Self {
            file_name,
            declared_mime_type,
            size_bytes: content.len() as u64,
            tier,
            content,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<StorageTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_label: Option<String>,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl UploadResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            file_name: None,
            size_bytes: None,
            tier: None,
            retention_label: None,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Clone)]
pub struct UploadService {
    gateway: StoreGateway,
}

impl UploadService {
    pub fn new(gateway: StoreGateway) -> Self {
        Self { gateway }
    }

    pub async fn upload(&self, request: UploadRequest) -> Result<UploadResult, ApiError> {
        let policy = policy_for(request.tier);

        if let Err(err) = validate(&request, policy) {
            tracing::info!(
                file_name = %request.file_name,
                tier = %request.tier,
                size_bytes = request.size_bytes,
                reason = %err,
                "upload rejected"
            );
            return Err(err.into());
        }

        let key = derive_key(policy, &request.file_name);
        let stored = self
            .gateway
            .store(
                &key,
                request.content,
                request.declared_mime_type.as_ref(),
                &request.file_name,
            )
            .await?;

        tracing::info!(key = %key, tier = %request.tier, "upload complete");

        Ok(UploadResult {
            success: stored.success,
            url: Some(stored.public_url),
            file_name: Some(request.file_name),
            size_bytes: Some(request.size_bytes),
            tier: Some(request.tier),
            retention_label: Some(policy.retention_label.to_string()),
            error_message: None,
        })
    }
}
