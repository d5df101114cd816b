use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{
        DefaultBodyLimit, Multipart,
        multipart::{Field, MultipartError},
        rejection::JsonRejection,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::access::AccessGate;
use crate::errors::{ApiError, AuthError, ValidationError};
use crate::policy::{StorageTier, largest_limit, largest_policy, policy_for};
use crate::upload::{UploadRequest, UploadResult, UploadService};
use crate::validator::too_large;

/// Room left for multipart framing on top of the largest file.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

pub fn router(uploads: Arc<UploadService>, gate: Arc<AccessGate>) -> Router {
    let body_limit = usize::try_from(largest_limit() + MULTIPART_OVERHEAD).unwrap_or(usize::MAX);

    Router::new()
        .route("/health", get(health))
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/auth/validate", post(validate_access))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(uploads))
                .layer(Extension(gate)),
        )
}

async fn health() -> &'static str {
    "OK\nAPI Version: 1.0"
}

#[derive(Debug, Default)]
struct UploadForm {
    file_name: Option<String>,
    content_type: Option<String>,
    tier: Option<String>,
    content: Option<Bytes>,
}

/// Reads the `file` part and the `storageType` (alias `tier`) part.
async fn read_form(multipart: &mut Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return Err(body_error(err, form.tier.as_deref())),
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => read_file(field, &mut form).await?,
            Some("storageType") | Some("tier") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| body_error(e, form.tier.as_deref()))?;
                form.tier = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_file(field: Field<'_>, form: &mut UploadForm) -> Result<(), ApiError> {
    form.file_name = field.file_name().map(|s| s.to_string());
    form.content_type = field.content_type().map(|s| s.to_string());
    let content = field
        .bytes()
        .await
        .map_err(|e| body_error(e, form.tier.as_deref()))?;
    form.content = Some(content);
    Ok(())
}

/// A body cut off by the transport limit is reported like any other
/// oversized file: against the requested tier when it was already read,
/// otherwise against the largest tier.
fn body_error(err: MultipartError, tier: Option<&str>) -> ApiError {
    if err.status() != StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %err, "unreadable upload body");
        return err.into();
    }

    tracing::info!(tier = ?tier, "upload body over transport limit");
    oversized_body(tier).into()
}

fn oversized_body(tier: Option<&str>) -> ValidationError {
    match tier.map(str::parse::<StorageTier>) {
        Some(Ok(tier)) => too_large(policy_for(tier)),
        Some(Err(invalid)) => invalid,
        None => too_large(largest_policy()),
    }
}

async fn upload(
    Extension(service): Extension<Arc<UploadService>>,
    mut multipart: Multipart,
) -> Response {
    match handle_upload(&service, &mut multipart).await {
        Ok(result) => Json(result).into_response(),
        Err(err) => {
            (err.status(), Json(UploadResult::failed(err.public_message()))).into_response()
        }
    }
}

async fn handle_upload(
    service: &UploadService,
    multipart: &mut Multipart,
) -> Result<UploadResult, ApiError> {
    let form = read_form(multipart).await?;
    let request = UploadRequest::from_parts(
        form.file_name,
        form.content_type.as_deref(),
        form.tier.as_deref(),
        form.content,
    )?;
    service.upload(request).await
}

#[derive(Debug, Deserialize)]
struct AuthRequest {
    #[serde(default, alias = "password")]
    passphrase: Option<String>,
}

async fn validate_access(
    Extension(gate): Extension<Arc<AccessGate>>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let passphrase = match payload {
        Ok(Json(AuthRequest {
            passphrase: Some(passphrase),
        })) if !passphrase.is_empty() => passphrase,
        _ => return Err(AuthError::MissingPassphrase.into()),
    };

    gate.verify(&passphrase).await?;
    Ok(Json(json!({ "success": true })))
}
