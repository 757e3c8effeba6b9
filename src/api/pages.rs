//! Public page endpoints. No session is required.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::PublishedPage;
use crate::render::render_not_found;
use crate::AppState;

/// GET /api/pages/:slug - Published business as JSON.
pub async fn get_published_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<PublishedPage> {
    match state.repo.get_active_business_by_slug(&slug).await? {
        Some(business) => {
            let renderer = business.template.renderer().name();
            success(PublishedPage { business, renderer })
        }
        None => Err(AppError::NotFound(format!("Business {} not found", slug))),
    }
}

/// GET /:slug - Published business rendered with its template.
pub async fn render_published_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    match state.repo.get_active_business_by_slug(&slug).await {
        Ok(Some(business)) => Html(business.template.renderer().render(&business)).into_response(),
        Ok(None) => {
            tracing::debug!(slug = %slug, "No published business for slug");
            (StatusCode::NOT_FOUND, Html(render_not_found())).into_response()
        }
        Err(e) => e.into_response(),
    }
}
