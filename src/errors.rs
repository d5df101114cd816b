use axum::{
    Json,
    extract::multipart::MultipartError,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::policy::StorageTier;

/// Rejections the client can fix by changing what it sends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid storage type '{0}'. Expected one of: temp, media, permanent.")]
    InvalidTier(String),
    #[error("No file provided")]
    MissingFile,
    #[error("Invalid file type for {tier} storage. Allowed types: {allowed}.")]
    UnsupportedType { tier: StorageTier, allowed: String },
    #[error("File too large. Maximum size for {tier} storage is {limit}.")]
    TooLarge {
        tier: StorageTier,
        limit_bytes: u64,
        limit: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Password is required")]
    MissingPassphrase,
    #[error("Invalid password")]
    Mismatch,
}

/// Failures of the external collaborators. Never shown to the client verbatim.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("secret source unavailable: {0}")]
    SecretUnavailable(String),
    #[error("secret source misconfigured: {0}")]
    SecretMisconfigured(String),
    #[error("object store write failed: {0}")]
    WriteError(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Multipart(#[from] MultipartError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::MissingPassphrase) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::Mismatch) => StatusCode::UNAUTHORIZED,
            ApiError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Multipart(err) => err.status(),
        }
    }

    /// The message safe to hand to the caller.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(err) => err.to_string(),
            ApiError::Auth(err) => err.to_string(),
            ApiError::Backend(BackendError::WriteError(_)) => {
                "Upload failed. Please try again.".to_string()
            }
            ApiError::Backend(_) => "Authentication failed. Please try again.".to_string(),
            ApiError::Multipart(err) => err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.public_message(),
        });

        (self.status(), Json(body)).into_response()
    }
}
