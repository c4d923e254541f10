//! Chapter documents for EPUB.
//!
//! A chapter is titled by its first sub-heading when it has one, otherwise by
//! a localised "Chapter N" label. Footnote ids are rewritten into valid XML
//! ids, since labels such as `[^1]` would otherwise produce `id="1"`.

use super::xhtml_page;
use crate::locale::Locale;
use crate::manuscript::Chapter;
use anyhow::{Context, Result};
use lol_html::{element, rewrite_str, text, RewriteStrSettings};
use percent_encoding::percent_decode_str;
use std::cell::{Cell, RefCell};

/// Find the text of the first `<h{level}>` element in an HTML fragment.
pub fn first_heading(html: &str, level: u64) -> Result<Option<String>> {
    let selector = format!("h{level}");
    let seen = Cell::new(0usize);
    let title = RefCell::new(String::new());

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!(selector, |_el| {
                    seen.set(seen.get() + 1);
                    Ok(())
                }),
                text!(selector, |chunk| {
                    if seen.get() == 1 {
                        title.borrow_mut().push_str(chunk.as_str());
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .with_context(|| format!("Failed to scan chapter HTML for <{selector}>"))?;

    if seen.get() == 0 {
        return Ok(None);
    }
    let title = html_escape::decode_html_entities(title.into_inner().trim()).to_string();
    Ok(Some(title).filter(|t| !t.is_empty()))
}

/// The table of contents title for a chapter.
pub fn title(chapter: &Chapter, heading_level: u64, locale: &Locale) -> Result<String> {
    Ok(match first_heading(&chapter.html, heading_level)? {
        Some(heading) => heading,
        None => format!("{} {}", locale.chapter, chapter.index + 1),
    })
}

/// Render the chapter as a complete XHTML document.
pub fn render(chapter: &Chapter, title: &str, lang: &str) -> Result<String> {
    let body = prefix_footnote_ids(&chapter.html)?;
    Ok(xhtml_page(lang, title, "chapter", &body))
}

/// Rewrite footnote definition ids and the links pointing at them.
pub fn prefix_footnote_ids(html: &str) -> Result<String> {
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!(".footnote-definition[id]", |el| {
                    if let Some(id) = el.get_attribute("id") {
                        el.set_attribute("id", &footnote_id(&id))?;
                    }
                    Ok(())
                }),
                element!(".footnote-reference a[href^='#']", |el| {
                    if let Some(href) = el.get_attribute("href") {
                        let label = percent_decode_str(href.trim_start_matches('#'))
                            .decode_utf8_lossy();
                        let target = footnote_id(&label);
                        el.set_attribute("href", &format!("#{target}"))?;
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .with_context(|| "Failed to rewrite footnote ids")
}

/// An XML id for a footnote label. Characters an id can't hold become `-`.
fn footnote_id(label: &str) -> String {
    let label: String = label
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("fn-{label}")
}
