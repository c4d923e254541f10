//! Cover page rendering for EPUB.
//!
//! The cover image itself is embedded by the builder; this page displays it
//! and carries EPUB's cover reference type so e-readers treat it as the cover.

use super::xhtml_page;

/// File name of the cover image inside the EPUB, keeping the image's
/// extension so readers can sniff the type.
pub fn image_name(mime: &str) -> String {
    let ext = match mime {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/svg+xml" => "svg",
        "image/webp" => "webp",
        _ => "jpg",
    };
    format!("cover.{ext}")
}

/// Render the cover page as XHTML.
pub fn render(title: &str, lang: &str, image_name: &str) -> String {
    let body = format!(
        r#"<img src="{src}" alt="{alt}"/>"#,
        src = image_name,
        alt = html_escape::encode_double_quoted_attribute(title),
    );
    xhtml_page(lang, title, "cover", &body)
}
