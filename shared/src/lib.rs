//! Power Bills Shared Library
//!
//! This crate contains the wire types, models, and validation helpers
//! shared between the backend and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{BillingRecord, NewBillingRecord, User};
pub use types::*;
