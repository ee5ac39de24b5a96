//! Transaction records, listing queries and record stores
//!
//! - models: the transaction record and result page
//! - month: calendar month parsing for the month filter
//! - query: search/month filter and pagination
//! - store: the record store trait with memory and SQLite backends
//! - loader: upstream dataset fetch and full-store replace

pub mod error;
pub mod loader;
pub mod models;
pub mod month;
pub mod query;
pub mod store;

pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity};
pub use loader::DatasetLoader;
pub use models::{TransactionPage, TransactionRecord};
pub use month::Month;
pub use query::{parse_numeric_search, Page, SearchFilter, TransactionFilter};
pub use store::{open_store, MemoryStore, SqliteStore, StoreRef, TransactionStore};
