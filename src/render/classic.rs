use super::{document, escape_html, footer_line, stars, PageRenderer};
use crate::models::Business;

/// Single-column layout with a colored header and alternating bands.
pub struct ClassicRenderer;

impl PageRenderer for ClassicRenderer {
    fn name(&self) -> &'static str {
        "classic"
    }

    fn render(&self, business: &Business) -> String {
        let color = escape_html(&business.primary_color);
        let mut body = String::new();

        body.push_str(&format!(
            r#"<header style="color:#fff;padding:1.5rem;background:linear-gradient(to right,{color},{color}dd)">
<h1>{name}</h1>
<a href="tel:{phone}" style="display:block;background:#fff;color:{color};text-align:center;padding:1rem;border-radius:.5rem;font-weight:bold;text-decoration:none">CALL NOW: {phone}</a>
</header>
<section style="padding:1.5rem;border-bottom:1px solid #e5e7eb"><h2>Services</h2><p>{services}</p></section>
<section style="padding:1.5rem;background:#f9fafb;border-bottom:1px solid #e5e7eb"><h3>Hours</h3><p style="white-space:pre-line">{hours}</p></section>
"#,
            color = color,
            name = escape_html(&business.name),
            phone = escape_html(&business.phone),
            services = escape_html(&business.services),
            hours = escape_html(&business.hours),
        ));

        for (idx, section) in business.custom_sections.iter().enumerate() {
            let background = if idx % 2 == 0 { "#fff" } else { "#f9fafb" };
            body.push_str(&format!(
                r#"<section data-section="custom" style="padding:1.5rem;background:{};border-bottom:1px solid #e5e7eb"><h3>{}</h3><p style="white-space:pre-wrap">{}</p></section>
"#,
                background,
                escape_html(&section.title),
                escape_html(&section.content),
            ));
        }

        body.push_str(&format!(
            r#"<section style="padding:1.5rem;border-bottom:1px solid #e5e7eb"><h3>Service Area</h3><p>{}</p>"#,
            escape_html(&business.address)
        ));
        if !business.map_embed_url.is_empty() {
            body.push_str(&format!(
                r#"<iframe src="{}" style="width:100%;height:16rem;border:0" loading="lazy"></iframe>"#,
                escape_html(&business.map_embed_url)
            ));
        }
        body.push_str("</section>\n");

        if !business.photos.is_empty() {
            body.push_str(
                r#"<section data-section="photos" style="padding:1.5rem;border-bottom:1px solid #e5e7eb"><h3>Our Work</h3><div style="display:grid;grid-template-columns:1fr 1fr;gap:1rem">"#,
            );
            for (idx, photo) in business.photos.iter().enumerate() {
                body.push_str(&format!(
                    r#"<img src="{}" alt="Work {}" style="width:100%;height:12rem;object-fit:cover;border-radius:.5rem">"#,
                    escape_html(photo),
                    idx + 1
                ));
            }
            body.push_str("</div></section>\n");
        }

        if !business.testimonials.is_empty() {
            body.push_str(
                r#"<section data-section="testimonials" style="padding:1.5rem;background:#f9fafb"><h3>What Our Customers Say</h3>"#,
            );
            for testimonial in &business.testimonials {
                body.push_str(&format!(
                    r#"<blockquote style="background:#fff;padding:1rem;border-radius:.5rem;margin:0 0 1rem"><div><span style="color:#facc15">{}</span> {}/5</div><p>{}</p><p>— {}</p></blockquote>"#,
                    stars(testimonial.rating),
                    testimonial.rating,
                    escape_html(&testimonial.text),
                    escape_html(&testimonial.author),
                ));
            }
            if !business.google_maps_url.is_empty() {
                body.push_str(&format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer" style="color:{}">See all reviews on Google Maps →</a>"#,
                    escape_html(&business.google_maps_url),
                    color
                ));
            }
            body.push_str("</section>\n");
        }

        body.push_str(&format!(
            r#"<footer style="background:#1f2937;color:#fff;padding:1.5rem;text-align:center">{}</footer>"#,
            footer_line(business)
        ));

        document(&business.name, &body)
    }
}
