//! Transactions module - dataset initialization and listing
//!
//! Routes:
//! - GET /api/initialize - Re-seed the record store from the upstream dataset
//! - GET /api/transactions - Search, month filter and pagination (JSON)

pub mod api;

pub use api::{api_initialize, api_transactions, MessageResponse};
