//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction. The database pool
//! lives here and nowhere else; handlers receive it explicitly.

use crate::auth::JwtService;
use crate::config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use sqlx::PgPool;

/// Shared application state
///
/// All fields are cheap to clone: `PgPool`, the JWT keys and the
/// Prometheus handle are internally reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// JWT service with keys derived from the configured secret
    pub jwt: JwtService,
    /// Prometheus render handle, present when a recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the JWT keys from the config secret; call once at startup.
    pub fn new(db: PgPool, config: &AppConfig) -> Self {
        let jwt = JwtService::new(
            config.jwt.secret.expose_secret(),
            config.jwt.access_token_expiry_secs,
        );

        Self {
            db,
            jwt,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle so `/metrics` can render it
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
