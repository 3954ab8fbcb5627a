//! Authentication routes
//!
//! Registration and login are the only API routes reachable without a
//! bearer token.

use crate::error::{ApiError, ApiResult};
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use power_bills_shared::{
    InsertResult, LoginRequest, LoginResponse, RegisterRequest, SuccessResponse,
};
use tracing::debug;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login Successful!";

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/registration", post(register))
        .route("/login", post(login))
}

/// Register a new user
///
/// POST /api/registration
///
/// Every failure, an unreadable body included, answers with the same
/// `{success: false, message}` envelope.
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse<InsertResult>>> {
    let Json(req) = payload.map_err(|rejection| ApiError::SignupRejected(rejection.body_text()))?;

    let result = UserService::register(state.db(), &req.email, &req.password).await?;
    Ok(Json(SuccessResponse::ok(result)))
}

/// Login with email and password
///
/// POST /api/login
///
/// The body is extracted leniently: an unreadable body fails exactly like
/// wrong credentials.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload.map_err(|rejection| {
        debug!("Unreadable login body: {}", rejection);
        ApiError::AuthFailed
    })?;

    let access_token =
        UserService::login(state.db(), state.jwt(), &req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        success: true,
        access_token,
        message: LOGIN_SUCCESS_MESSAGE.to_string(),
    }))
}
