//! Record store abstraction and backends

use async_trait::async_trait;
use std::sync::Arc;
use txboard_config::{StoreBackend, StoreConfig};

use crate::error::CoreResult;
use crate::models::{TransactionPage, TransactionRecord};
use crate::query::{Page, TransactionFilter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Shared store handle
pub type StoreRef = Arc<dyn TransactionStore>;

/// The single collection of transaction records
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Replace the whole collection with `records`
    ///
    /// Readers see either the previous contents or the new ones, never an
    /// empty or partial collection. On error the previous contents stay.
    async fn replace_all(&self, records: Vec<TransactionRecord>) -> CoreResult<usize>;

    /// Matching records for one page plus the total match count
    async fn list(&self, filter: &TransactionFilter, page: Page) -> CoreResult<TransactionPage>;

    /// Number of stored records
    async fn count(&self) -> CoreResult<usize>;
}

/// Open the backend selected in the configuration
pub fn open_store(config: &StoreConfig) -> CoreResult<StoreRef> {
    match config.backend {
        StoreBackend::Memory => {
            log::info!("Using in-memory record store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Sqlite => {
            log::info!("Using SQLite record store at {}", config.path.display());
            Ok(Arc::new(SqliteStore::open(&config.path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record;
    use txboard_config::PaginationConfig;

    fn dataset() -> Vec<TransactionRecord> {
        let mut records = vec![
            record(1, "Chair", 109.0, "2022-03-05"),
            record(2, "Desk", 50.0, "2022-04-01"),
            record(3, "Cotton Shirt", 15.5, "2021-03-20T10:00:00+00:00"),
            record(4, "Lamp", 109.0, "2022-11-02"),
            record(5, "Shirt Rack", 75.0, "2022-03-01T00:30:00+05:30"),
            record(6, "Äpfel Korb", 12.0, "2022-03-05 10:00:00"),
            record(7, "Stool", 30.0, "2022-03-05T10:00"),
            record(8, "Vase", 18.0, " 2022-03-05"),
        ];
        records[1].category = "office shirt supplies".to_string();
        records
    }

    async fn backends() -> Vec<(&'static str, StoreRef)> {
        let memory: StoreRef = Arc::new(MemoryStore::new());
        let sqlite: StoreRef = Arc::new(SqliteStore::open_in_memory().unwrap());
        for (_, store) in [("memory", &memory), ("sqlite", &sqlite)] {
            store.replace_all(dataset()).await.unwrap();
        }
        vec![("memory", memory), ("sqlite", sqlite)]
    }

    fn ids(page: &TransactionPage) -> Vec<i64> {
        page.transactions.iter().map(|t| t.id).collect()
    }

    #[tokio::test]
    async fn test_backends_agree() {
        let cases: Vec<(Option<&str>, Option<&str>)> = vec![
            (None, None),
            (Some("shirt"), None),
            (Some("109"), None),
            (None, Some("march")),
            (None, Some("feb")),
            (Some("109"), Some("march")),
            (Some("SHIRT"), Some("March")),
            (Some("äpfel"), None),
            (Some("ÄPFEL"), Some("mar")),
            (Some("korb"), None),
        ];

        let stores = backends().await;
        for (search, month) in cases {
            let filter = TransactionFilter::build(search, month).unwrap();
            let expected = filter.paginate(&dataset(), Page::new(1, 10));
            for (name, store) in &stores {
                let page = store.list(&filter, Page::new(1, 10)).await.unwrap();
                assert_eq!(
                    ids(&page),
                    ids(&expected),
                    "{} backend, search={:?} month={:?}",
                    name,
                    search,
                    month
                );
                assert_eq!(page.total, expected.total);
            }
        }
    }

    #[tokio::test]
    async fn test_pagination_keeps_store_order() {
        for (name, store) in backends().await {
            let filter = TransactionFilter::default();
            let first = store.list(&filter, Page::new(1, 2)).await.unwrap();
            let second = store.list(&filter, Page::new(2, 2)).await.unwrap();
            let third = store.list(&filter, Page::new(3, 2)).await.unwrap();

            let fifth = store.list(&filter, Page::new(5, 2)).await.unwrap();

            assert_eq!(ids(&first), vec![1, 2], "{}", name);
            assert_eq!(ids(&second), vec![3, 4], "{}", name);
            assert_eq!(ids(&third), vec![5, 6], "{}", name);
            assert!(fifth.transactions.is_empty(), "{}", name);
            assert_eq!(fifth.total, 8, "{}", name);
        }
    }

    #[tokio::test]
    async fn test_huge_page_is_empty() {
        let config = PaginationConfig::default();
        let pages = [
            Page::new(usize::MAX / 2, 10),
            Page::new(1 << 40, 10),
            Page::from_params(Some("99999999999999999999"), Some("10"), &config),
        ];

        for (name, store) in backends().await {
            for page in pages {
                let result = store.list(&TransactionFilter::default(), page).await.unwrap();
                assert!(result.transactions.is_empty(), "{} backend, {:?}", name, page);
                assert_eq!(result.total, 8, "{}", name);
            }
        }
    }

    #[tokio::test]
    async fn test_month_and_unicode_search_agree() {
        for (name, store) in backends().await {
            let march = TransactionFilter::build(None, Some("march")).unwrap();
            let page = store.list(&march, Page::new(1, 10)).await.unwrap();
            assert_eq!(ids(&page), vec![1, 3, 6, 7, 8], "{}", name);

            let apples = TransactionFilter::build(Some("äpfel"), None).unwrap();
            let page = store.list(&apples, Page::new(1, 10)).await.unwrap();
            assert_eq!(ids(&page), vec![6], "{}", name);
        }
    }

    #[tokio::test]
    async fn test_replace_all_discards_previous_records() {
        for (name, store) in backends().await {
            let replacement = vec![
                record(10, "Mirror", 30.0, "2022-05-05"),
                record(11, "Rug", 45.0, "2022-06-06"),
            ];
            assert_eq!(store.replace_all(replacement).await.unwrap(), 2);
            assert_eq!(store.count().await.unwrap(), 2, "{}", name);

            let page = store
                .list(&TransactionFilter::default(), Page::new(1, 10))
                .await
                .unwrap();
            assert_eq!(ids(&page), vec![10, 11], "{}", name);
        }
    }

    #[tokio::test]
    async fn test_open_store_from_config() {
        let config = StoreConfig {
            backend: StoreBackend::Sqlite,
            path: ":memory:".into(),
        };
        let store = open_store(&config).unwrap();
        assert_eq!(store.count().await.unwrap(), 0);

        let store = open_store(&StoreConfig::default()).unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
