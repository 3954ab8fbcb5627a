//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! routes and repositories.

pub mod billing;
pub mod user;

pub use billing::BillingService;
pub use user::UserService;
