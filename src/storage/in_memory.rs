use super::*;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: String,
    pub metadata: HashMap<String, String>,
}

/// Keeps objects in process memory. Handy for local runs and tests; URLs are
/// built as if the objects lived in `bucket`.
#[derive(Clone)]
pub struct InMemoryStorage {
    bucket: String,
    host: String,
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

impl InMemoryStorage {
    pub fn new(bucket: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            host: host.into(),
            objects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<(), StorageError> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
                metadata: metadata.clone(),
            },
        );
        Ok(())
    }

    fn public_url_for(&self, key: &str) -> String {
        virtual_hosted_url(&self.bucket, &self.host, key)
    }
}
