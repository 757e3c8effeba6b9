//! Admin business endpoints. All routes here sit behind the session gate.

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Business, BusinessForm, SetActiveRequest, Template};
use crate::normalize::{is_reserved_slug, slugify};
use crate::render::select_renderer;
use crate::AppState;

/// GET /api/businesses - List all businesses, newest first.
pub async fn list_businesses(State(state): State<AppState>) -> ApiResult<Vec<Business>> {
    success(state.repo.list_businesses().await?)
}

/// GET /api/businesses/:id - Get a single business.
pub async fn get_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Business> {
    match state.repo.get_business(&id).await? {
        Some(business) => success(business),
        None => Err(AppError::NotFound(format!("Business {} not found", id))),
    }
}

/// GET /api/businesses/:id/form - Edit-form state for a business.
pub async fn get_business_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BusinessForm> {
    match state.repo.get_business(&id).await? {
        Some(business) => success(business.to_form()),
        None => Err(AppError::NotFound(format!("Business {} not found", id))),
    }
}

/// POST /api/businesses - Create and publish a business.
pub async fn create_business(
    State(state): State<AppState>,
    Json(form): Json<BusinessForm>,
) -> ApiResult<Business> {
    validate_form(&form)?;
    let slug = slugify(&form.name);
    if slug.is_empty() {
        return Err(AppError::Validation(
            "Business name must contain at least one letter or digit".to_string(),
        ));
    }
    if is_reserved_slug(&slug) {
        return Err(AppError::Validation(format!(
            "Business name produces the reserved URL /{}",
            slug
        )));
    }

    let business = state.repo.create_business(&form).await?;
    tracing::info!(id = %business.id, slug = %business.slug, "Business created");
    success(business)
}

/// PUT /api/businesses/:id - Replace a business and all of its children.
pub async fn update_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<BusinessForm>,
) -> ApiResult<Business> {
    validate_form(&form)?;

    let business = state.repo.update_business(&id, &form).await?;
    tracing::info!(
        id = %business.id,
        photos = business.photos.len(),
        testimonials = business.testimonials.len(),
        sections = business.custom_sections.len(),
        "Business updated"
    );
    success(business)
}

/// DELETE /api/businesses/:id - Delete a business and its children.
pub async fn delete_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.repo.delete_business(&id).await?;
    tracing::info!(id = %id, "Business deleted");
    success(())
}

/// POST /api/businesses/:id/toggle-active - Flip the publication flag.
pub async fn toggle_business_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Business> {
    let business = state.repo.toggle_business_active(&id).await?;
    tracing::info!(id = %id, active = business.active, "Business publication toggled");
    success(business)
}

/// PUT /api/businesses/:id/active - Set the publication flag.
pub async fn set_business_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetActiveRequest>,
) -> ApiResult<Business> {
    let business = state.repo.set_business_active(&id, request.active).await?;
    tracing::info!(id = %id, active = business.active, "Business publication set");
    success(business)
}

/// Query parameters for previews.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub template: Option<String>,
}

/// GET /api/businesses/:id/preview - Render a business whether or not it is published.
///
/// `?template=` renders with another layout without saving it.
pub async fn preview_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<Html<String>, AppError> {
    let business = state
        .repo
        .get_business(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Business {} not found", id)))?;

    let renderer = match query.template.as_deref() {
        Some(template) => select_renderer(Some(template)),
        None => business.template.renderer(),
    };
    Ok(Html(renderer.render(&business)))
}

/// GET /api/templates - Template names available to the edit form.
pub async fn list_templates() -> ApiResult<Vec<&'static str>> {
    success(Template::ALL.iter().map(|t| t.as_str()).collect())
}

/// Validate a submitted business form.
fn validate_form(form: &BusinessForm) -> Result<(), AppError> {
    if form.name.trim().is_empty() {
        return Err(AppError::Validation("Business name is required".to_string()));
    }
    if form.phone.trim().is_empty() {
        return Err(AppError::Validation("Phone is required".to_string()));
    }
    if form.photos.iter().any(|url| url.trim().is_empty()) {
        return Err(AppError::Validation("Photo URLs cannot be empty".to_string()));
    }
    let links = form
        .photos
        .iter()
        .map(|url| ("Photo URL", url))
        .chain([
            ("Map embed URL", &form.map_embed_url),
            ("Google Maps URL", &form.google_maps_url),
        ]);
    for (field, url) in links {
        if !url.trim().is_empty() && !is_web_url(url.trim()) {
            return Err(AppError::Validation(format!(
                "{} must start with http:// or https:// (got {})",
                field, url
            )));
        }
    }
    if let Some(t) = form
        .testimonials
        .iter()
        .find(|t| !(1..=5).contains(&t.rating))
    {
        return Err(AppError::Validation(format!(
            "Testimonial rating must be between 1 and 5 (got {})",
            t.rating
        )));
    }
    if let Some(color) = form.primary_color.as_deref() {
        if !color.trim().is_empty() && !is_hex_color(color.trim()) {
            return Err(AppError::Validation(format!(
                "Primary color must be a hex color like #2563eb (got {})",
                color
            )));
        }
    }
    Ok(())
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

fn is_web_url(value: &str) -> bool {
    let lowered = value.to_ascii_lowercase();
    lowered.starts_with("https://") || lowered.starts_with("http://")
}
