//! Page rendering.
//!
//! Each [`Template`] maps to exactly one renderer. Renderers take a
//! normalized [`Business`] and produce a complete HTML document.

mod classic;
mod minimal;
mod modern;

pub use classic::ClassicRenderer;
pub use minimal::MinimalRenderer;
pub use modern::ModernRenderer;

use chrono::{Datelike, Utc};

use crate::models::{Business, Template};

/// A layout strategy for a published business page.
pub trait PageRenderer: Send + Sync {
    /// Name of the template this renderer implements.
    fn name(&self) -> &'static str;

    /// Render the full HTML document for a business.
    fn render(&self, business: &Business) -> String;
}

static CLASSIC: ClassicRenderer = ClassicRenderer;
static MODERN: ModernRenderer = ModernRenderer;
static MINIMAL: MinimalRenderer = MinimalRenderer;

impl Template {
    /// The renderer for this template.
    pub fn renderer(self) -> &'static dyn PageRenderer {
        match self {
            Template::Classic => &CLASSIC,
            Template::Modern => &MODERN,
            Template::Minimal => &MINIMAL,
        }
    }
}

/// Select a renderer from a raw discriminator value.
///
/// Absent and unrecognized values select the classic layout.
pub fn select_renderer(template: Option<&str>) -> &'static dyn PageRenderer {
    Template::resolve(template).renderer()
}

/// The page shown when a slug has no published business.
pub fn render_not_found() -> String {
    document(
        "Business Not Found",
        r#"<main style="min-height:100vh;display:flex;align-items:center;justify-content:center;background:#f3f4f6;text-align:center">
<div>
<h1 style="font-size:2.25rem;color:#1f2937">Business Not Found</h1>
<p style="color:#4b5563">This business page doesn't exist or has been deactivated.</p>
</div>
</main>"#,
    )
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Filled stars for a 1-5 rating.
pub(crate) fn stars(rating: i32) -> String {
    "★".repeat(rating.clamp(0, 5) as usize)
}

pub(crate) fn footer_line(business: &Business) -> String {
    format!("© {} {}", Utc::now().year(), escape_html(&business.name))
}

/// Wrap a body in a standalone HTML document.
pub(crate) fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
</head>
<body style="margin:0;font-family:system-ui,sans-serif">
{}
</body>
</html>
"#,
        escape_html(title),
        body
    )
}
