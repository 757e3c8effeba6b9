//! Admin login/logout endpoints.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Duration;

use super::{success, ApiResponse, ApiResult};
use crate::auth;
use crate::errors::AppError;
use crate::models::{AdminSession, LoginRequest, LoginResponse};
use crate::AppState;

/// POST /api/auth/login - Exchange admin credentials for a session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !auth::verify_credentials(&state.config, request.email.trim(), &request.password) {
        tracing::warn!(email = %request.email, "Rejected admin login");
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let ttl = Duration::hours(state.config.session_ttl_hours);
    let session = state
        .repo
        .create_session(request.email.trim(), ttl)
        .await?;
    tracing::info!(email = %session.email, expires_at = %session.expires_at, "Admin logged in");

    let cookie = auth::session_cookie(
        &session.token,
        ttl.num_seconds(),
        state.config.secure_cookies,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiResponse::new(LoginResponse {
            token: session.token,
            email: session.email,
            expires_at: session.expires_at,
        }),
    ))
}

/// POST /api/auth/logout - End the current session, if any.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = auth::session_token(&headers) {
        state.repo.delete_session(&token).await?;
        tracing::info!("Admin logged out");
    }

    Ok((
        [(
            header::SET_COOKIE,
            auth::clear_session_cookie(state.config.secure_cookies),
        )],
        ApiResponse::new(()),
    ))
}

/// GET /api/auth/session - The session making this request.
pub async fn current_session(Extension(session): Extension<AdminSession>) -> ApiResult<AdminSession> {
    success(session)
}
