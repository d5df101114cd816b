use std::{error::Error, process::ExitCode, sync::Arc};

use shadowshare::{
    access::AccessGate,
    config::{AppConfig, SecretConfig, StorageConfig},
    routes,
    secrets::{AwsSecretSource, SecretSource, StaticSecretSource},
    storage::{InMemoryStorage, ObjectStorage, S3Storage, StoreGateway, default_public_host},
    upload::UploadService,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let storage: Arc<dyn ObjectStorage> = match &config.storage {
        StorageConfig::Memory => {
            tracing::warn!("using in-memory storage, uploads are lost on restart");
            Arc::new(InMemoryStorage::new(
                config.bucket.clone(),
                config
                    .public_host
                    .clone()
                    .unwrap_or_else(|| default_public_host(&config.region)),
            ))
        }
        StorageConfig::S3 { endpoint } => Arc::new(S3Storage::new(
            config.bucket.clone(),
            config.region.clone(),
            endpoint.clone(),
            config.public_host.clone(),
        )?),
    };

    let secrets: Arc<dyn SecretSource> = match &config.secrets {
        SecretConfig::Static { access_codes } => {
            Arc::new(StaticSecretSource::new(access_codes.clone()))
        }
        SecretConfig::Aws { secret_id, field } => Arc::new(
            AwsSecretSource::new(&config.region, secret_id.clone(), field.clone()).await,
        ),
    };

    let uploads = Arc::new(UploadService::new(StoreGateway::new(storage)));
    let gate = Arc::new(AccessGate::new(secrets));
    let app = routes::router(uploads, gate);

    let addr = config.socket_addr()?;
    tracing::info!(bucket = %config.bucket, "Server running on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
