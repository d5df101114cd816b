mod in_memory;
mod s3;

pub use in_memory::{InMemoryStorage, StoredObject};
pub use s3::S3Storage;

use std::{collections::HashMap, sync::Arc, time::Instant};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use thiserror::Error;

use crate::errors::BackendError;
use crate::keys::StorageKey;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("configuration error: {0}")]
    Config(String),
}

/// The object store the uploads end up in.
#[async_trait]
pub trait ObjectStorage: Send + Sync + 'static {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<(), StorageError>;

    /// Where the object at `key` can be fetched from once written.
    fn public_url_for(&self, key: &str) -> String;
}

/// `https://{bucket}.{host}/{key}`, the virtual-hosted addressing S3 uses.
pub fn virtual_hosted_url(bucket: &str, host: &str, key: &str) -> String {
    format!("https://{bucket}.{host}/{key}")
}

pub fn default_public_host(region: &str) -> String {
    format!("s3.{region}.amazonaws.com")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreResult {
    pub success: bool,
    pub public_url: String,
}

#[derive(Clone)]
pub struct StoreGateway {
    storage: Arc<dyn ObjectStorage>,
}

impl StoreGateway {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    pub async fn store(
        &self,
        key: &StorageKey,
        content: Bytes,
        content_type: &str,
        original_name: &str,
    ) -> Result<StoreResult, BackendError> {
        let metadata = HashMap::from([
            ("originalName".to_string(), original_name.to_string()),
            (
                "uploadTime".to_string(),
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ]);

        let size = content.len();
        let start = Instant::now();

        self.storage
            .put(key.as_str(), content, content_type, &metadata)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "object store write failed"
                );
                BackendError::WriteError(e.to_string())
            })?;

        tracing::info!(
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "object stored"
        );

        Ok(StoreResult {
            success: true,
            public_url: self.storage.public_url_for(key.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::derive_key;
    use crate::policy::{StorageTier, policy_for};

    struct BrokenStorage;

    #[async_trait]
    impl ObjectStorage for BrokenStorage {
        async fn put(
            &self,
            _key: &str,
            _bytes: Bytes,
            _content_type: &str,
            _metadata: &HashMap<String, String>,
        ) -> Result<(), StorageError> {
            Err(StorageError::WriteFailed("connection reset".into()))
        }

        fn public_url_for(&self, key: &str) -> String {
            format!("https://nowhere/{key}")
        }
    }

    #[tokio::test]
    async fn stores_with_audit_metadata() {
        let storage = Arc::new(InMemoryStorage::new("uploads", "s3.eu-west-1.amazonaws.com"));
        let gateway = StoreGateway::new(storage.clone());
        let key = derive_key(policy_for(StorageTier::Temp), "secrets.env");

        let result = gateway
            .store(&key, Bytes::from_static(b"A=1"), "text/plain", "secrets.env")
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(
            result.public_url,
            format!("https://uploads.s3.eu-west-1.amazonaws.com/{key}")
        );

        let stored = storage.get(key.as_str()).await.expect("object written");
        assert_eq!(stored.bytes, Bytes::from_static(b"A=1"));
        assert_eq!(stored.content_type, "text/plain");
        assert_eq!(stored.metadata["originalName"], "secrets.env");
        assert!(stored.metadata["uploadTime"].ends_with('Z'));
    }

    #[tokio::test]
    async fn write_failure_becomes_backend_error() {
        let gateway = StoreGateway::new(Arc::new(BrokenStorage));
        let key = derive_key(policy_for(StorageTier::Media), "clip.mp4");

        let err = gateway
            .store(&key, Bytes::from_static(b"x"), "video/mp4", "clip.mp4")
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::WriteError(msg) if msg.contains("connection reset")));
    }
}
