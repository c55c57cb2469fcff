//! # API Errors
//!
//! Errors raised while serving a request. None of them reach the
//! transport: the response codec turns each into a JSON error body.

use axum::http::StatusCode;
use thiserror::Error;

use crate::storage::StorageError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Request body could not be read off the connection
    #[error("Corpo da requisição ilegível: {0}")]
    UnreadableBody(String),

    /// Request body is not valid UTF-8
    #[error("Corpo da requisição não é UTF-8 válido")]
    InvalidEncoding,

    /// Request body is not valid JSON
    #[error("JSON inválido: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Request body is JSON but not an object
    #[error("Corpo da requisição deve ser um objeto JSON")]
    NotAnObject,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store file could not be read or written
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Blocking store task did not complete
    #[error("Falha interna: {0}")]
    TaskFailed(String),
}

impl ApiError {
    /// HTTP status used when conventional status codes are enabled
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnreadableBody(_)
            | ApiError::InvalidEncoding
            | ApiError::InvalidJson(_)
            | ApiError::NotAnObject => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) | ApiError::TaskFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
