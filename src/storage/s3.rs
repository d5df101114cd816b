use super::*;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};

/// S3 (or S3-compatible) bucket behind `object_store`.
///
/// Credentials come from the usual `AWS_*` environment variables.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    public_host: String,
}

impl S3Storage {
    /// * `endpoint_url` - custom endpoint for S3-compatible providers (MinIO etc.)
    /// * `public_host` - host the public URL is built on, defaults to
    ///   `s3.{region}.amazonaws.com`
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_host: Option<String>,
    ) -> Result<Self, StorageError> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(Self {
            store,
            bucket,
            public_host: public_host.unwrap_or_else(|| default_public_host(&region)),
        })
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<(), StorageError> {
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        for (name, value) in metadata {
            attributes.insert(Attribute::Metadata(name.clone().into()), value.clone().into());
        }

        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&Path::from(key), PutPayload::from(bytes), opts)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        tracing::debug!(bucket = %self.bucket, key = %key, "S3 put complete");
        Ok(())
    }

    fn public_url_for(&self, key: &str) -> String {
        virtual_hosted_url(&self.bucket, &self.public_host, key)
    }
}
