//! User service for signup and login
//!
//! Login failures are collapsed into a single [`ApiError::AuthFailed`] so a
//! caller cannot tell an unknown email from a wrong password.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::UserRepository;
use power_bills_shared::validation::{validate_email, validate_password};
use power_bills_shared::{InsertResult, User};
use sqlx::PgPool;
use tracing::{debug, info, warn};

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user
    ///
    /// Only the email and the bcrypt hash are stored.
    pub async fn register(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<InsertResult, ApiError> {
        let email = email.trim();
        validate_email(email).map_err(ApiError::SignupRejected)?;
        validate_password(password).map_err(ApiError::SignupRejected)?;

        if UserRepository::email_exists(pool, email)
            .await
            .map_err(ApiError::SignupFailed)?
        {
            debug!("Signup rejected: email already registered");
            metrics::counter!("auth_signup_total", "outcome" => "duplicate").increment(1);
            return Err(ApiError::EmailTaken);
        }

        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .map_err(ApiError::SignupFailed)?;

        // The unique constraint still guards against a concurrent signup
        // slipping past the existence check.
        let user = UserRepository::create(pool, email, &password_hash)
            .await
            .map_err(ApiError::SignupFailed)?;

        info!(user_id = %user.id, "User registered");
        metrics::counter!("auth_signup_total", "outcome" => "success").increment(1);

        Ok(InsertResult::new(user.id))
    }

    /// Login with email and password, returning a signed access token
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let result = Self::try_login(pool, jwt_service, email, password).await;

        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::counter!("auth_login_total", "outcome" => outcome).increment(1);

        result
    }

    async fn try_login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        // Stored emails are trimmed at signup
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::AuthFailed);
        }

        let user: User = UserRepository::find_by_email(pool, email)
            .await
            .map_err(|e| {
                warn!("Login lookup failed: {:?}", e);
                ApiError::AuthFailed
            })?
            .ok_or(ApiError::AuthFailed)?
            .into();

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(|e| {
                warn!(user_id = %user.id, "Password verification errored: {:?}", e);
                ApiError::AuthFailed
            })?;

        if !valid {
            debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(ApiError::AuthFailed);
        }

        let token = jwt_service.issue(&user.email, user.id).map_err(|e| {
            warn!("Token issuance failed: {:?}", e);
            ApiError::AuthFailed
        })?;

        info!(user_id = %user.id, "User logged in");
        Ok(token)
    }
}
