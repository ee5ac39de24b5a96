//! Service-level routes

use axum::http::Uri;

use crate::ApiError;

/// Plain-text banner at the root path
pub async fn index() -> &'static str {
    "server running.!"
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// JSON 404 for unknown routes
pub async fn fallback(uri: Uri) -> ApiError {
    ApiError::NotFound {
        resource: uri.path().to_string(),
    }
}
