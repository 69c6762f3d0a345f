use serde::Deserialize;
use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Resource not found: {}", .0.as_deref().unwrap_or("-"))]
    NotFound(Option<String>),

    #[error("Authentication failed: {}", .0.as_deref().unwrap_or("-"))]
    Unauthorized(Option<String>),

    #[error("Request failed with status {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Error payload of the remote API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl StorageError {
    /// Classifies a non-success response by status, keeping the payload's message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .filter(|m| !m.trim().is_empty());

        match status {
            404 => StorageError::NotFound(message),
            401 | 403 => StorageError::Unauthorized(message),
            _ => StorageError::Rejected { status, message },
        }
    }
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(message) => ApplicationError::NotFound(message),
            StorageError::Unauthorized(message) => ApplicationError::Unauthorized(message),
            StorageError::Rejected { status, message } => {
                ApplicationError::Rejected { status, message }
            }
            StorageError::NetworkError(msg) => ApplicationError::NetworkError(msg),
            StorageError::InvalidResponse(msg) => ApplicationError::InvalidResponse(msg),
            StorageError::InternalError(msg) => {
                ApplicationError::NetworkError(format!("Storage error: {}", msg))
            }
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            StorageError::NetworkError("Request timeout".to_string())
        } else if error.is_connect() {
            StorageError::NetworkError(format!("Connection failed: {}", error))
        } else if error.is_decode() {
            StorageError::InvalidResponse(error.to_string())
        } else if let Some(status) = error.status() {
            StorageError::from_response(status.as_u16(), "")
        } else {
            StorageError::InternalError(error.to_string())
        }
    }
}
