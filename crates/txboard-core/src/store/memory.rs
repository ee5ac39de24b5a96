//! In-process record store
//!
//! The collection is an immutable snapshot behind a lock. Readers clone the
//! `Arc` and release the lock before filtering; `replace_all` builds the new
//! snapshot first and only then swaps the pointer.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::TransactionStore;
use crate::error::{CoreError, CoreResult};
use crate::models::{TransactionPage, TransactionRecord};
use crate::query::{Page, TransactionFilter};

#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Arc<Vec<TransactionRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&self) -> CoreResult<Arc<Vec<TransactionRecord>>> {
        self.snapshot
            .read()
            .map(|guard| Arc::clone(&guard))
            .map_err(|_| CoreError::Store {
                message: "memory store lock poisoned".to_string(),
            })
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn replace_all(&self, records: Vec<TransactionRecord>) -> CoreResult<usize> {
        let staged = Arc::new(records);
        let count = staged.len();

        let mut guard = self.snapshot.write().map_err(|_| CoreError::Store {
            message: "memory store lock poisoned".to_string(),
        })?;
        *guard = staged;

        log::debug!("Memory store swapped in {} records", count);
        Ok(count)
    }

    async fn list(&self, filter: &TransactionFilter, page: Page) -> CoreResult<TransactionPage> {
        let snapshot = self.current()?;
        Ok(filter.paginate(snapshot.iter(), page))
    }

    async fn count(&self) -> CoreResult<usize> {
        Ok(self.current()?.len())
    }
}
