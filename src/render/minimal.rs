use super::{document, escape_html, footer_line, stars, PageRenderer};
use crate::models::Business;

/// Sparse typographic layout with small uppercase headings.
pub struct MinimalRenderer;

impl PageRenderer for MinimalRenderer {
    fn name(&self) -> &'static str {
        "minimal"
    }

    fn render(&self, business: &Business) -> String {
        let color = escape_html(&business.primary_color);
        let heading = format!(
            "font-size:.875rem;text-transform:uppercase;letter-spacing:.1em;color:{}",
            color
        );
        let mut body = String::new();

        body.push_str(&format!(
            r#"<main style="max-width:42rem;margin:0 auto;padding:4rem 1.5rem">
<header style="margin-bottom:3rem"><h1 style="font-weight:300">{name}</h1>
<a href="tel:{phone}" style="color:{color};border:1px solid {color};padding:.75rem 1.5rem;text-decoration:none">{phone}</a></header>
<section style="margin-bottom:3rem"><h2 style="{heading}">Services</h2><p>{services}</p></section>
<section style="margin-bottom:3rem"><h3 style="{heading}">Hours</h3><p style="white-space:pre-line">{hours}</p></section>
"#,
            color = color,
            heading = heading,
            name = escape_html(&business.name),
            phone = escape_html(&business.phone),
            services = escape_html(&business.services),
            hours = escape_html(&business.hours),
        ));

        for section in &business.custom_sections {
            body.push_str(&format!(
                r#"<section data-section="custom" style="margin-bottom:3rem"><h3 style="{}">{}</h3><p style="white-space:pre-wrap">{}</p></section>
"#,
                heading,
                escape_html(&section.title),
                escape_html(&section.content),
            ));
        }

        if !business.photos.is_empty() {
            body.push_str(&format!(
                r#"<section data-section="photos" style="margin-bottom:3rem"><h3 style="{}">Work</h3>"#,
                heading
            ));
            for (idx, photo) in business.photos.iter().enumerate() {
                body.push_str(&format!(
                    r#"<img src="{}" alt="Work {}" style="width:100%;margin-bottom:1rem">"#,
                    escape_html(photo),
                    idx + 1
                ));
            }
            body.push_str("</section>\n");
        }

        if !business.testimonials.is_empty() {
            body.push_str(&format!(
                r#"<section data-section="testimonials" style="margin-bottom:3rem"><h3 style="{}">Reviews</h3>"#,
                heading
            ));
            for testimonial in &business.testimonials {
                body.push_str(&format!(
                    r#"<blockquote style="margin:0 0 2rem"><span style="color:{}">{}</span><p style="font-weight:300">{}</p><p style="font-size:.875rem">{}</p></blockquote>"#,
                    color,
                    stars(testimonial.rating),
                    escape_html(&testimonial.text),
                    escape_html(&testimonial.author),
                ));
            }
            if !business.google_maps_url.is_empty() {
                body.push_str(&format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer" style="color:{}">More Reviews →</a>"#,
                    escape_html(&business.google_maps_url),
                    color
                ));
            }
            body.push_str("</section>\n");
        }

        body.push_str(&format!(
            r#"<section style="margin-bottom:3rem"><h3 style="{}">Location</h3><p>{}</p>"#,
            heading,
            escape_html(&business.address)
        ));
        if !business.map_embed_url.is_empty() {
            body.push_str(&format!(
                r#"<iframe src="{}" style="width:100%;height:16rem;border:0" loading="lazy"></iframe>"#,
                escape_html(&business.map_embed_url)
            ));
        }
        body.push_str("</section>\n");

        body.push_str(&format!(
            r#"<footer style="font-size:.75rem;color:#9ca3af;text-align:center">{}</footer>
</main>"#,
            footer_line(business)
        ));

        document(&business.name, &body)
    }
}
