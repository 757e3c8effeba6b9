//! Business view model consumed by rendering and by the admin edit form.

use serde::{Deserialize, Serialize};

use super::Template;

/// A customer review shown on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub rating: i32,
    pub text: String,
    pub author: String,
}

/// A free-form titled block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSection {
    pub title: String,
    pub content: String,
}

/// A fully normalized business.
///
/// Defaultable scalars are never absent and child collections are always
/// present and ordered, so renderers only check for emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub phone: String,
    pub hours: String,
    pub services: String,
    pub address: String,
    pub map_embed_url: String,
    pub google_maps_url: String,
    pub testimonials: Vec<Testimonial>,
    pub photos: Vec<String>,
    pub custom_sections: Vec<CustomSection>,
    pub primary_color: String,
    pub active: bool,
    pub template: Template,
    pub created_at: String,
}

impl Business {
    /// The edit-form state for this business.
    pub fn to_form(&self) -> BusinessForm {
        BusinessForm {
            name: self.name.clone(),
            phone: self.phone.clone(),
            hours: self.hours.clone(),
            services: self.services.clone(),
            address: self.address.clone(),
            map_embed_url: self.map_embed_url.clone(),
            google_maps_url: self.google_maps_url.clone(),
            testimonials: self.testimonials.clone(),
            photos: self.photos.clone(),
            custom_sections: self.custom_sections.clone(),
            primary_color: Some(self.primary_color.clone()),
            template: Some(self.template),
        }
    }
}

/// Request body for creating or updating a business.
///
/// Child lists are submitted in display order; resubmitting is the only way
/// to reorder them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub services: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub map_embed_url: String,
    #[serde(default)]
    pub google_maps_url: String,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub custom_sections: Vec<CustomSection>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub template: Option<Template>,
}

/// Public lookup response: the business plus the renderer it publishes with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedPage {
    pub business: Business,
    pub renderer: &'static str,
}

/// Request body for explicitly setting the publication flag.
#[derive(Debug, Clone, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}
