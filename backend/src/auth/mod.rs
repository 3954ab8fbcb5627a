//! Authentication module
//!
//! Provides JWT-based authentication with bcrypt password hashing.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::{require_auth, AuthUser};
pub use password::{PasswordService, BCRYPT_COST};
