//! Transactions API endpoints
//!
//! Endpoints:
//! - api_initialize: Replace the store with the upstream dataset (JSON)
//! - api_transactions: Page of matching transactions plus total (JSON)

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use txboard_core::{DefaultErrorLogger, ErrorContext, ErrorLogger, Page, TransactionFilter, TransactionPage};

use crate::{ApiError, AppState};

/// Body of a successful initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Re-seed the record store from the upstream dataset
pub async fn api_initialize(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    match state.loader.initialize(state.store.as_ref()).await {
        Ok(_) => Ok(Json(MessageResponse {
            message: "Database initialized successfully".to_string(),
        })),
        Err(e) => {
            let context = ErrorContext::new("initialize_database")
                .with_data("url", serde_json::json!(state.loader.url()));
            DefaultErrorLogger.log_error(&e, &context);
            Err(ApiError::from_core("Failed to initialize database", &e))
        }
    }
}

/// List transactions with search, month filter and pagination
///
/// Query parameters: `search`, `month`, `page` (1-based), `perPage`.
pub async fn api_transactions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TransactionPage>, ApiError> {
    let search = params.get("search").map(|s| s.as_str());
    let month = params.get("month").map(|s| s.as_str());
    let page = Page::from_params(
        params.get("page").map(|s| s.as_str()),
        params.get("perPage").map(|s| s.as_str()),
        &state.config.pagination,
    );

    let context = || {
        ErrorContext::new("list_transactions")
            .with_data("search", serde_json::json!(search))
            .with_data("month", serde_json::json!(month))
            .with_data("page", serde_json::json!(page.number))
            .with_data("perPage", serde_json::json!(page.per_page))
    };

    let filter = TransactionFilter::build(search, month).map_err(|e| {
        DefaultErrorLogger.log_error(&e, &context());
        ApiError::from_core("Failed to list transactions", &e)
    })?;

    log::debug!(
        "Listing transactions: search={:?} month={:?} page={} perPage={}",
        search,
        filter.month,
        page.number,
        page.per_page
    );

    let result = state.store.list(&filter, page).await.map_err(|e| {
        DefaultErrorLogger.log_error(&e, &context());
        ApiError::from_core("Failed to list transactions", &e)
    })?;

    Ok(Json(result))
}
