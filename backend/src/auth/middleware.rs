//! Authentication gate
//!
//! Every billing route sits behind [`require_auth`]. A request moves
//! through these states:
//!
//! - no `Authorization` header, or a blank one: rejected with 401 before
//!   the handler runs
//! - header present: the token after the first space is verified
//! - bad signature, malformed or expired token: rejected with 403
//! - valid token: [`AuthUser`] is inserted into the request extensions and
//!   the handler runs

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use power_bills_shared::AuthError;
use tracing::debug;

/// Identity decoded from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
    pub user_id: String,
}

/// Pull the bearer token out of the headers
///
/// The scheme word is not checked: whatever follows the first space is
/// treated as the token.
fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .filter(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace))
        .ok_or(AuthError::MissingToken)?;

    value
        .to_str()
        .ok()
        .and_then(|header| header.split_once(' '))
        .map(|(_, token)| token)
        .ok_or(AuthError::InvalidToken)
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
    let token = extract_token(headers)?;
    let claims = state.jwt().verify(token)?;

    Ok(AuthUser {
        email: claims.email,
        user_id: claims.user_id,
    })
}

/// Middleware that rejects requests without a valid bearer token
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match authenticate(&state, request.headers()) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Err(err) => {
            debug!(reason = %err, path = %request.uri().path(), "Rejected unauthenticated request");
            let reason = match err {
                AuthError::MissingToken => "missing",
                AuthError::TokenExpired => "expired",
                _ => "invalid",
            };
            metrics::counter!("auth_gate_rejections_total", "reason" => reason).increment(1);
            Err(err.into())
        }
    }
}

/// Extractor for the identity attached by [`require_auth`]
///
/// Only usable on routes behind the gate; elsewhere it rejects with 401.
#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::AuthMissing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_token(&HeaderMap::new()), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_blank_header_counts_as_missing() {
        assert_eq!(extract_token(&headers_with("")), Err(AuthError::MissingToken));
        assert_eq!(extract_token(&headers_with("   ")), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_token_after_first_space() {
        assert_eq!(extract_token(&headers_with("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(extract_token(&headers_with("Token xyz")), Ok("xyz"));
    }

    #[test]
    fn test_header_without_space_is_invalid() {
        assert_eq!(
            extract_token(&headers_with("Bearer")),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_non_utf8_header_is_invalid() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap());
        assert_eq!(extract_token(&headers), Err(AuthError::InvalidToken));
    }
}
