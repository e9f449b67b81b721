use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::processor::ExtractError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no file was uploaded")]
    NoFile,

    #[error("invalid multipart request: {0}")]
    Multipart(#[from] MultipartError),

    #[error("unknown extraction provider: {0}")]
    UnknownProvider(String),

    #[error("extraction provider not configured: {0}")]
    ProviderNotConfigured(&'static str),

    #[error("unknown extraction mode: {0}")]
    UnknownMode(String),

    #[error("extraction failed")]
    Extraction {
        #[from]
        source: ExtractError,
    },

    #[error("invalid invoice payload: {0}")]
    Validation(String),

    #[error("invoice not found")]
    NotFound,

    #[error("store error")]
    Store(#[from] rusqlite::Error),

    #[error("store lock poisoned")]
    StoreLock,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            AppError::NoFile => (
                StatusCode::BAD_REQUEST,
                "No file was uploaded.",
                None,
            ),
            AppError::Multipart(source) => (
                StatusCode::BAD_REQUEST,
                "Invalid multipart request.",
                Some(source.to_string()),
            ),
            AppError::UnknownProvider(provider) => (
                StatusCode::BAD_REQUEST,
                "Unknown extraction provider.",
                Some(provider.clone()),
            ),
            AppError::ProviderNotConfigured(provider) => (
                StatusCode::BAD_REQUEST,
                "Extraction provider is not configured.",
                Some((*provider).to_string()),
            ),
            AppError::UnknownMode(mode) => (
                StatusCode::BAD_REQUEST,
                "Unknown extraction mode.",
                Some(mode.clone()),
            ),
            AppError::Extraction { source } => match source {
                ExtractError::UnsupportedType(mime) => (
                    StatusCode::BAD_REQUEST,
                    "Unsupported file type. Please upload a PDF or an image.",
                    Some(mime.clone()),
                ),
                ExtractError::UnreadableDocument => (
                    StatusCode::BAD_REQUEST,
                    "Could not read text from the PDF.",
                    None,
                ),
                ExtractError::MalformedResponse => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The AI returned an unexpected format. Please try again.",
                    None,
                ),
                ExtractError::Gateway(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred during extraction.",
                    None,
                ),
            },
            AppError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                "Failed to save invoice.",
                Some(details.clone()),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "Invoice not found.",
                None,
            ),
            AppError::Store(_) | AppError::StoreLock => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred.",
                None,
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let mut body = ErrorResponse::new(message);
        if let Some(details) = details {
            body = body.with_details(details);
        }

        (status, Json(body)).into_response()
    }
}
