//! Application error handling
//!
//! This module provides unified error handling for the API, converting
//! internal errors to HTTP responses. Auth and storage failures use fixed,
//! generic bodies; the underlying cause only goes to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use power_bills_shared::{
    AuthError, AuthFailedResponse, BillError, ErrorDetail, ErrorResponse, FailureResponse,
    MessageResponse,
};
use thiserror::Error;
use tracing::{debug, error};

pub const UNAUTHORIZED_MESSAGE: &str = "UnAuthorized access";
pub const FORBIDDEN_MESSAGE: &str = "Forbidden access";
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed!";
pub const SIGNUP_FAILED_MESSAGE: &str = "Signup failed!";
pub const SERVER_ERROR_MESSAGE: &str = "There was a server side error!";

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    /// No `Authorization` header on a protected route
    #[error("Missing authorization header")]
    AuthMissing,

    /// Token present but malformed, wrongly signed or expired
    #[error("Invalid or expired token")]
    AuthInvalid,

    /// Login rejected; the cause is deliberately not distinguished
    #[error("Authentication failed")]
    AuthFailed,

    #[error("Email already registered")]
    EmailTaken,

    /// Registration body unreadable or its fields invalid
    #[error("Signup rejected: {0}")]
    SignupRejected(String),

    #[error("Signup failed: {0}")]
    SignupFailed(#[source] anyhow::Error),

    #[error("Storage failure: {0}")]
    StorageFailure(#[source] anyhow::Error),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::AuthMissing,
            AuthError::InvalidToken | AuthError::TokenExpired => ApiError::AuthInvalid,
        }
    }
}

impl From<BillError> for ApiError {
    fn from(err: BillError) -> Self {
        ApiError::invalid_field(err.field(), err.to_string())
    }
}

fn gate_rejection(status: StatusCode, text: &str) -> Response {
    (
        status,
        Json(MessageResponse {
            message: text.to_string(),
        }),
    )
        .into_response()
}

fn failure(status: StatusCode, text: &str) -> Response {
    (status, Json(FailureResponse::new(text))).into_response()
}

fn detail(status: StatusCode, code: &str, message: String, field: Option<String>) -> Response {
    let body = Json(ErrorResponse {
        error: ErrorDetail {
            code: code.to_string(),
            message,
            field,
        },
    });
    (status, body).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::AuthMissing => gate_rejection(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE),
            ApiError::AuthInvalid => gate_rejection(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE),
            ApiError::AuthFailed => (
                StatusCode::UNAUTHORIZED,
                Json(AuthFailedResponse {
                    error: AUTH_FAILED_MESSAGE.to_string(),
                }),
            )
                .into_response(),
            ApiError::EmailTaken => failure(StatusCode::CONFLICT, SIGNUP_FAILED_MESSAGE),
            ApiError::SignupRejected(reason) => {
                debug!("Signup rejected: {}", reason);
                failure(StatusCode::BAD_REQUEST, SIGNUP_FAILED_MESSAGE)
            }
            ApiError::SignupFailed(err) => {
                error!("Signup failed: {:?}", err);
                failure(StatusCode::INTERNAL_SERVER_ERROR, SIGNUP_FAILED_MESSAGE)
            }
            ApiError::StorageFailure(err) => {
                error!("Storage failure: {:?}", err);
                failure(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE)
            }
            ApiError::Validation { message, field } => {
                detail(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, field)
            }
            ApiError::BadRequest(msg) => detail(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
