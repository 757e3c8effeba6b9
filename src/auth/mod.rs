//! Admin session authentication.
//!
//! Sessions are opaque tokens stored server-side. A request is authenticated
//! only if its token matches an unexpired row in the sessions table; nothing
//! the client holds is trusted on its own.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::db::Repository;
use crate::errors::AppError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "landing_session";

/// Session authentication layer.
///
/// On success the [`AdminSession`](crate::models::AdminSession) is attached to
/// the request extensions for handlers to read.
pub async fn session_auth_layer(
    repo: Arc<Repository>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers()) else {
        return unauthorized_response("Login required");
    };

    match repo.get_session(&token).await {
        Ok(Some(session)) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Ok(None) => unauthorized_response("Session expired or invalid"),
        Err(e) => e.into_response(),
    }
}

/// Extract the session token from the cookie or a bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE).or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Check submitted credentials against the configured admin account.
///
/// Always false when no admin account is configured.
pub fn verify_credentials(config: &Config, email: &str, password: &str) -> bool {
    let (Some(expected_email), Some(expected_password)) =
        (&config.admin_email, &config.admin_password)
    else {
        return false;
    };

    // Both comparisons always run
    let email_ok = constant_time_compare(email, expected_email);
    let password_ok = constant_time_compare(password, expected_password);
    email_ok & password_ok
}

/// `Set-Cookie` value issuing a session.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value removing the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized_response(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}
