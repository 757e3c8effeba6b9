use super::{document, escape_html, footer_line, stars, PageRenderer};
use crate::models::Business;

/// Card-based layout under a full-width hero.
pub struct ModernRenderer;

const CARD: &str = "background:#fff;border-radius:1rem;box-shadow:0 10px 25px rgba(0,0,0,.1);padding:2rem;margin-bottom:2rem";

impl PageRenderer for ModernRenderer {
    fn name(&self) -> &'static str {
        "modern"
    }

    fn render(&self, business: &Business) -> String {
        let color = escape_html(&business.primary_color);
        let mut body = String::new();

        body.push_str(&format!(
            r#"<header style="background:linear-gradient(135deg,{color}dd 0%,{color} 100%);color:#fff;padding:3rem 1.5rem">
<h1 style="font-size:3rem;font-weight:800">{name}</h1>
<a href="tel:{phone}" style="display:inline-block;background:#fff;color:{color};padding:1rem 2rem;border-radius:9999px;font-weight:bold;text-decoration:none">{phone}</a>
</header>
<main style="max-width:56rem;margin:0 auto;padding:2rem 1.5rem;background:#f9fafb">
<section style="{card}"><h2 style="color:{color}">Our Services</h2><p>{services}</p></section>
<section style="{card}"><h3>Business Hours</h3><p style="white-space:pre-line">{hours}</p></section>
"#,
            color = color,
            card = CARD,
            name = escape_html(&business.name),
            phone = escape_html(&business.phone),
            services = escape_html(&business.services),
            hours = escape_html(&business.hours),
        ));

        for section in &business.custom_sections {
            body.push_str(&format!(
                r#"<section data-section="custom" style="{}"><h3 style="color:{}">{}</h3><p style="white-space:pre-wrap">{}</p></section>
"#,
                CARD,
                color,
                escape_html(&section.title),
                escape_html(&section.content),
            ));
        }

        if !business.photos.is_empty() {
            body.push_str(&format!(
                r#"<section data-section="photos" style="{}"><h3 style="color:{}">Our Work</h3><div style="display:grid;grid-template-columns:1fr 1fr;gap:1.5rem">"#,
                CARD, color
            ));
            for (idx, photo) in business.photos.iter().enumerate() {
                body.push_str(&format!(
                    r#"<img src="{}" alt="Work {}" style="width:100%;height:14rem;object-fit:cover;border-radius:.75rem">"#,
                    escape_html(photo),
                    idx + 1
                ));
            }
            body.push_str("</div></section>\n");
        }

        if !business.testimonials.is_empty() {
            body.push_str(&format!(
                r#"<section data-section="testimonials" style="{}"><h3 style="color:{}">Client Reviews</h3>"#,
                CARD, color
            ));
            for testimonial in &business.testimonials {
                body.push_str(&format!(
                    r#"<blockquote style="border-left:4px solid {};padding-left:1rem;margin:0 0 1.5rem"><span style="color:#facc15">{}</span><p style="font-style:italic">"{}"</p><p style="font-weight:600">{}</p></blockquote>"#,
                    color,
                    stars(testimonial.rating),
                    escape_html(&testimonial.text),
                    escape_html(&testimonial.author),
                ));
            }
            if !business.google_maps_url.is_empty() {
                body.push_str(&format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer" style="color:{}">Read more reviews on Google Maps →</a>"#,
                    escape_html(&business.google_maps_url),
                    color
                ));
            }
            body.push_str("</section>\n");
        }

        body.push_str(&format!(
            r#"<section style="{}"><h3>Service Area</h3><p>{}</p>"#,
            CARD,
            escape_html(&business.address)
        ));
        if !business.map_embed_url.is_empty() {
            body.push_str(&format!(
                r#"<iframe src="{}" style="width:100%;height:18rem;border:0;border-radius:.75rem" loading="lazy"></iframe>"#,
                escape_html(&business.map_embed_url)
            ));
        }
        body.push_str("</section>\n</main>\n");

        body.push_str(&format!(
            r#"<footer style="background:{};color:#fff;padding:2rem;text-align:center">{}</footer>"#,
            color,
            footer_line(business)
        ));

        document(&business.name, &body)
    }
}
