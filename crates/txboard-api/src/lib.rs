//! HTTP API server
//!
//! Routes are organized into modules:
//! - routes::transactions: Dataset initialization, transaction listing
//! - routes::system: Banner, health check, JSON 404

pub mod error;
pub mod routes;

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use txboard_config::Config;
use txboard_core::{DatasetLoader, StoreRef};

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: StoreRef,
    pub loader: Arc<DatasetLoader>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::system::{fallback, health_check, index};
    use routes::transactions::{api_initialize, api_transactions};

    let cors_enable = state.config.server.cors_enable;

    let router = Router::new()
        .route("/", get(index))
        .route("/api/health", get(health_check))
        .route("/api/initialize", get(api_initialize))
        .route("/api/transactions", get(api_transactions))
        .fallback(fallback)
        .with_state(state);

    if cors_enable {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Bind the configured address and serve until the process stops
pub async fn start_server(config: Config, store: StoreRef, loader: Arc<DatasetLoader>) -> std::io::Result<()> {
    let addr = config.bind_address();
    let state = AppState { store, loader, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting txboard server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - GET /api/initialize (Re-seed from upstream dataset)");
    log::info!("  - GET /api/transactions (search, month, page, perPage)");
    log::info!("  - GET /api/health");

    axum::serve(listener, router).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use txboard_config::DatasetConfig;
    use txboard_core::{MemoryStore, TransactionRecord};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tx(id: i64, title: &str, price: f64, date_of_sale: &str) -> TransactionRecord {
        TransactionRecord {
            id,
            title: title.to_string(),
            price,
            description: String::new(),
            category: String::new(),
            image: String::new(),
            sold: false,
            date_of_sale: date_of_sale.to_string(),
        }
    }

    async fn app(records: Vec<TransactionRecord>, dataset_url: &str) -> (Router, StoreRef) {
        let store: StoreRef = Arc::new(MemoryStore::new());
        store.replace_all(records).await.unwrap();

        let mut config = Config::default();
        config.dataset = DatasetConfig {
            url: dataset_url.to_string(),
            ..DatasetConfig::default()
        };
        let loader = Arc::new(DatasetLoader::new(&config.dataset).unwrap());

        let state = AppState {
            store: store.clone(),
            loader,
            config,
        };
        (create_router(state), store)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn ids(body: &serde_json::Value) -> Vec<i64> {
        body["transactions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_list_month_and_search() {
        let (router, _) = app(
            vec![
                tx(1, "Chair", 109.0, "2022-03-05"),
                tx(2, "Desk", 50.0, "2022-04-01"),
            ],
            "http://127.0.0.1:1/data.json",
        )
        .await;

        let (status, body) =
            get_json(router, "/api/transactions?month=march&search=109&page=1&perPage=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(ids(&body), vec![1]);
        assert_eq!(body["transactions"][0]["dateOfSale"], "2022-03-05");
    }

    #[tokio::test]
    async fn test_list_defaults_and_paging() {
        let records = (1..=15).map(|i| tx(i, "Item", 1.0, "2022-01-01")).collect();
        let (router, _) = app(records, "http://127.0.0.1:1/data.json").await;

        let (status, body) = get_json(router.clone(), "/api/transactions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 15);
        assert_eq!(ids(&body), (1..=10).collect::<Vec<i64>>());

        let (_, body) = get_json(router, "/api/transactions?page=2&perPage=10").await;
        assert_eq!(ids(&body), (11..=15).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_list_invalid_month_is_bad_request() {
        let (router, _) = app(vec![], "http://127.0.0.1:1/data.json").await;

        let (status, body) = get_json(router, "/api/transactions?month=Smarch").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Failed to list transactions");
        assert!(body["error"].as_str().unwrap().contains("Smarch"));
    }

    #[tokio::test]
    async fn test_initialize_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 5, "title": "Lamp", "price": 20, "description": "", "category": "home",
                 "image": "", "sold": true, "dateOfSale": "2022-06-01T00:00:00+00:00"}
            ])))
            .mount(&server)
            .await;

        let (router, store) = app(
            vec![tx(1, "Old", 1.0, "2020-01-01"), tx(2, "Older", 1.0, "2020-01-01")],
            &format!("{}/data.json", server.uri()),
        )
        .await;

        let (status, body) = get_json(router, "/api/initialize").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Database initialized successfully");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_initialize_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let (router, store) = app(
            vec![tx(1, "Keep", 1.0, "2020-01-01")],
            &format!("{}/data.json", server.uri()),
        )
        .await;

        let (status, body) = get_json(router, "/api/initialize").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to initialize database");
        assert!(body["error"].as_str().unwrap().contains("502"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (router, _) = app(vec![], "http://127.0.0.1:1/data.json").await;

        let (status, body) = get_json(router, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("/api/nope"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let (router, _) = app(vec![], "http://127.0.0.1:1/data.json").await;

        let response = router
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }
}
