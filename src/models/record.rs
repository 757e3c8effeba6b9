//! Storage-side row shapes.
//!
//! Field names follow the persisted (snake_case) column names. The normalizer
//! is the only code that translates between these and the view model.

use serde::{Deserialize, Serialize};

/// A stored photo row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRow {
    pub file_url: String,
    pub display_order: i64,
}

/// A stored testimonial row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialRow {
    pub rating: i32,
    pub text: String,
    pub author: String,
    pub display_order: i64,
}

/// A stored custom section row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSectionRow {
    pub title: String,
    pub content: String,
    pub display_order: i64,
}

/// A business row joined with its child rows, children in storage order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub phone: String,
    pub hours: String,
    pub services: String,
    pub address: String,
    pub map_embed_url: Option<String>,
    pub google_maps_url: Option<String>,
    pub primary_color: Option<String>,
    pub template: Option<String>,
    pub active: bool,
    pub created_at: String,
    #[serde(default)]
    pub photos: Vec<PhotoRow>,
    #[serde(default)]
    pub testimonials: Vec<TestimonialRow>,
    #[serde(default)]
    pub custom_sections: Vec<CustomSectionRow>,
}

/// Parent columns written on insert or update.
///
/// `active` is not part of the payload: inserts publish immediately and
/// updates leave the flag alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessPayload {
    pub slug: String,
    pub name: String,
    pub phone: String,
    pub hours: String,
    pub services: String,
    pub address: String,
    pub map_embed_url: Option<String>,
    pub google_maps_url: Option<String>,
    pub primary_color: Option<String>,
    pub template: Option<String>,
}

/// Photo insert row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    pub business_id: String,
    pub file_url: String,
    pub display_order: i64,
}

/// Testimonial insert row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestimonial {
    pub business_id: String,
    pub rating: i32,
    pub text: String,
    pub author: String,
    pub display_order: i64,
}

/// Custom section insert row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomSection {
    pub business_id: String,
    pub title: String,
    pub content: String,
    pub display_order: i64,
}

/// Everything needed to persist a submitted business.
///
/// Child rows assume a replace-all write: existing children of the business
/// are deleted before these are inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePayload {
    pub business: BusinessPayload,
    pub photos: Vec<NewPhoto>,
    pub testimonials: Vec<NewTestimonial>,
    pub custom_sections: Vec<NewCustomSection>,
}
