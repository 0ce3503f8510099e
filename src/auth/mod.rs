//! Session-based authorization middleware.
//!
//! Every council route requires the caller's session to carry the
//! Administrator role. Session issuance happens elsewhere; this layer only
//! resolves the opaque token and checks the role.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::models::Role;
use crate::AppState;

/// Cookie carrying the session token for browser callers.
pub const SESSION_COOKIE: &str = "session";

/// Middleware gating all council routes on an administrator session.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match authorize(&state, request.headers()).await {
        Ok(_login) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}

/// Resolve the caller's session and require the Administrator role.
/// Returns the session's login on success.
async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    let token = session_token(headers)
        .ok_or_else(|| AppError::Unauthorized("Missing session token".to_string()))?;

    let login = state
        .repo
        .session_login(&token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown session".to_string()))?;

    match state.repo.role_of(&login).await? {
        Role::Administrator => Ok(login),
        Role::Ordinary => Err(AppError::Unauthorized(
            "Administrator access required".to_string(),
        )),
    }
}

/// Extract the session token from the Authorization bearer header or the
/// session cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    if bearer.is_some() {
        return bearer;
    }

    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(cookie_value)
}

/// Find the session cookie in a Cookie header value.
fn cookie_value(cookie_header: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_from_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc-123"),
        );
        assert_eq!(session_token(&headers), Some("abc-123".to_string()));
    }

    #[test]
    fn test_session_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=tok-9; lang=en"),
        );
        assert_eq!(session_token(&headers), Some("tok-9".to_string()));
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session=from-cookie"),
        );
        assert_eq!(session_token(&headers), Some("from-header".to_string()));
    }

    #[test]
    fn test_missing_token() {
        let headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        let mut other_cookie = HeaderMap::new();
        other_cookie.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_token(&other_cookie), None);
    }
}
