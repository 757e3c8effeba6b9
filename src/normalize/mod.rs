//! Record normalizer.
//!
//! Translates between the stored shape (one business row plus three
//! independently ordered child row sets) and the [`Business`] view model.

use crate::models::{
    Business, BusinessForm, BusinessPayload, BusinessRecord, CustomSection, NewCustomSection,
    NewPhoto, NewTestimonial, Template, Testimonial, WritePayload,
};

/// Brand color used when a business has none stored.
pub const DEFAULT_PRIMARY_COLOR: &str = "#2563eb";

/// Slugs that collide with the server's own top-level paths.
pub const RESERVED_SLUGS: &[&str] = &["api", "health"];

/// Build the view model from a stored row and its joined children.
///
/// Children are ordered by `display_order`; rows sharing an order keep the
/// order they were read in.
pub fn normalize_for_read(record: BusinessRecord) -> Business {
    let photos = sort_by_display_order(record.photos, |p| p.display_order)
        .into_iter()
        .map(|p| p.file_url)
        .collect();

    let testimonials = sort_by_display_order(record.testimonials, |t| t.display_order)
        .into_iter()
        .map(|t| Testimonial {
            rating: t.rating,
            text: t.text,
            author: t.author,
        })
        .collect();

    let custom_sections = sort_by_display_order(record.custom_sections, |s| s.display_order)
        .into_iter()
        .map(|s| CustomSection {
            title: s.title,
            content: s.content,
        })
        .collect();

    Business {
        id: record.id,
        slug: record.slug,
        name: record.name,
        phone: record.phone,
        hours: record.hours,
        services: record.services,
        address: record.address,
        map_embed_url: record.map_embed_url.unwrap_or_default(),
        google_maps_url: record.google_maps_url.unwrap_or_default(),
        testimonials,
        photos,
        custom_sections,
        primary_color: record
            .primary_color
            .as_deref()
            .and_then(non_empty)
            .map(|c| expand_hex_color(&c))
            .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string()),
        active: record.active,
        template: Template::resolve(record.template.as_deref()),
        created_at: record.created_at,
    }
}

/// Build the storage payload for a submitted form.
///
/// An existing slug is kept as-is; only a business without one gets a slug
/// derived from its name. Child rows are tagged with their zero-based
/// position and `business_id`.
pub fn denormalize_for_write(
    form: &BusinessForm,
    business_id: &str,
    existing_slug: Option<&str>,
) -> WritePayload {
    let slug = match existing_slug.filter(|s| !s.is_empty()) {
        Some(slug) => slug.to_string(),
        None => slugify(&form.name),
    };

    let business = BusinessPayload {
        slug,
        name: form.name.clone(),
        phone: form.phone.clone(),
        hours: form.hours.clone(),
        services: form.services.clone(),
        address: form.address.clone(),
        map_embed_url: non_empty(&form.map_embed_url),
        google_maps_url: non_empty(&form.google_maps_url),
        primary_color: form
            .primary_color
            .as_deref()
            .and_then(non_empty)
            .map(|c| expand_hex_color(&c)),
        template: form.template.map(|t| t.as_str().to_string()),
    };

    let photos = form
        .photos
        .iter()
        .enumerate()
        .map(|(idx, url)| NewPhoto {
            business_id: business_id.to_string(),
            file_url: url.clone(),
            display_order: idx as i64,
        })
        .collect();

    let testimonials = form
        .testimonials
        .iter()
        .enumerate()
        .map(|(idx, t)| NewTestimonial {
            business_id: business_id.to_string(),
            rating: t.rating,
            text: t.text.clone(),
            author: t.author.clone(),
            display_order: idx as i64,
        })
        .collect();

    let custom_sections = form
        .custom_sections
        .iter()
        .enumerate()
        .map(|(idx, s)| NewCustomSection {
            business_id: business_id.to_string(),
            title: s.title.clone(),
            content: s.content.clone(),
            display_order: idx as i64,
        })
        .collect();

    WritePayload {
        business,
        photos,
        testimonials,
        custom_sections,
    }
}

/// Derive a URL slug from a business name.
///
/// Lowercases, then collapses every run of characters outside `[a-z0-9]`
/// into a single hyphen. Hyphens are never leading or trailing.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Whether a slug would be shadowed by a fixed route.
pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Expand `#rgb` shorthand to `#rrggbb`. Other values pass through unchanged.
///
/// Renderers append an alpha pair to the color, which only works on the
/// six-digit form.
pub fn expand_hex_color(color: &str) -> String {
    match color.strip_prefix('#') {
        Some(hex) if hex.len() == 3 && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            let mut expanded = String::with_capacity(7);
            expanded.push('#');
            for ch in hex.chars() {
                expanded.push(ch);
                expanded.push(ch);
            }
            expanded.to_ascii_lowercase()
        }
        _ => color.to_string(),
    }
}

// `sort_by_key` is stable, which keeps ties in storage order.
fn sort_by_display_order<T>(mut rows: Vec<T>, key: impl Fn(&T) -> i64) -> Vec<T> {
    rows.sort_by_key(|row| key(row));
    rows
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
