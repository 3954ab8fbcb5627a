//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod billing;
pub mod user;

pub use billing::{BillRow, BillingRepository};
pub use user::{UserRecord, UserRepository};
