//! Error types for txboard-api
//!
//! Every failure is rendered as `{"message": ..., "error": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use txboard_core::CoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("{message}: {error}")]
    BadRequest { message: String, error: String },

    #[error("{message}: {error}")]
    Internal { message: String, error: String },
}

/// JSON body of a failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub error: String,
}

impl ApiError {
    /// Wrap a core failure under an operation-level message
    pub fn from_core(message: &str, error: &CoreError) -> Self {
        if error.is_client_error() {
            ApiError::BadRequest {
                message: message.to_string(),
                error: error.to_string(),
            }
        } else {
            ApiError::Internal {
                message: message.to_string(),
                error: error.to_string(),
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::NotFound { resource } => ErrorBody {
                message: "Not found".to_string(),
                error: format!("No route for {}", resource),
            },
            ApiError::BadRequest { message, error } | ApiError::Internal { message, error } => {
                ErrorBody {
                    message: message.clone(),
                    error: error.clone(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
