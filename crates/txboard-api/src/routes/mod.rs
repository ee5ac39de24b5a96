//! Route handlers
//!
//! - transactions: dataset initialization and the listing endpoint
//! - system: banner, health check, unknown-route fallback

pub mod system;
pub mod transactions;
