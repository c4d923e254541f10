//! EPUB rendering orchestration.
//!
//! Coordinates the generation of every EPUB component: optional cover,
//! copyright page, inline table of contents, and one document per chapter.
//! Uses the `epub-builder` crate which handles the EPUB packaging
//! requirements (OPF manifest, NCX navigation, ZIP structure with proper MIME
//! type). Chapter documents are named by position (`ch_00000.xhtml`, ...) so
//! rebuilding a book with the same chapters produces the same layout.

mod chapter;
mod copyright;
mod cover;

use super::config::EPUB;
use crate::locale::LocaleTable;
use crate::manuscript::{Manuscript, Target};
use crate::sinks::{Outcome, Sink, DEFAULT_AUTHOR, DEFAULT_LANG, DEFAULT_TITLE};
use crate::library::Shelf;
use crate::template::Template;
use anyhow::{Context, Result};
use epub_builder::{EpubBuilder, EpubContent, ReferenceType, ZipLibrary};
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use uuid::Uuid;

/// Builds one EPUB per manuscript.
///
/// The copyright template and stylesheet are loaded once and shared by every
/// book in the run.
pub struct EpubSink<'a> {
    config: &'a EPUB,
    locales: &'a LocaleTable,
    copyright: Template,
    stylesheet: String,
}

impl<'a> EpubSink<'a> {
    pub fn new(config: &'a EPUB, locales: &'a LocaleTable) -> Result<EpubSink<'a>> {
        let copyright = Template::load(&config.copyright_template)?;
        let stylesheet = std::fs::read_to_string(&config.stylesheet).with_context(|| {
            format!("Failed to read stylesheet: {}", config.stylesheet.display())
        })?;
        std::fs::create_dir_all(&config.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                config.output_dir.display()
            )
        })?;

        Ok(EpubSink {
            config,
            locales,
            copyright,
            stylesheet,
        })
    }

    /// Package a manuscript as an EPUB, unless the book already exists.
    pub fn assemble(&self, manuscript: &Manuscript) -> Result<Outcome> {
        let metadata = &manuscript.metadata;
        let outfile = self.config.outfile(metadata.filename());
        if outfile.exists() {
            info!("{} already exists, skipping", outfile.display());
            return Ok(Outcome::Skipped(outfile));
        }

        let lang = metadata.lang().unwrap_or_else(|| DEFAULT_LANG.to_string());
        let lang = lang.as_str();
        let locale = self
            .locales
            .get(lang)
            .with_context(|| format!("Can't localise book {}", metadata.filename()))?;
        let title = metadata.title().unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let title = title.as_str();
        let mut authors = metadata.authors();
        if authors.is_empty() {
            authors.push(DEFAULT_AUTHOR.to_string());
        }

        // create epub builder
        let zip = ZipLibrary::new().map_err(|e| anyhow::Error::from_boxed(e.into()))
            .with_context(|| "Failed to create ZIP library for EPUB")?;
        let mut builder = EpubBuilder::new(zip).map_err(|e| anyhow::Error::from_boxed(e.into()))
            .with_context(|| "Failed to build builder")?;

        // set metadata
        builder.set_uuid(book_uuid(
            metadata.identifier().as_deref(),
            metadata.filename(),
        ));
        builder
            .metadata("title", title)
            .map_err(|e| anyhow::Error::from_boxed(e.into()))
            .with_context(|| "Failed to set title metadata")?;
        builder
            .metadata("lang", lang)
            .map_err(|e| anyhow::Error::from_boxed(e.into()))
            .with_context(|| "Failed to set language metadata")?;
        builder
            .metadata("generator", "quire")
            .map_err(|e| anyhow::Error::from_boxed(e.into()))
            .with_context(|| "Failed to set generator metadata")?;
        builder
            .metadata("toc_name", locale.toc.as_str())
            .map_err(|e| anyhow::Error::from_boxed(e.into()))
            .with_context(|| "Failed to set table of contents title")?;
        for author in &authors {
            builder
                .metadata("author", author.as_str())
                .map_err(|e| anyhow::Error::from_boxed(e.into()))
                .with_context(|| format!("Failed to add author metadata for author: {}", author))?;
        }

        builder
            .stylesheet(self.stylesheet.as_bytes())
            .map_err(|e| anyhow::Error::from_boxed(e.into()))
            .with_context(|| "Failed to add stylesheet")?;

        // add cover image and page if configured
        if let Some(cover_path) = metadata.cover() {
            let cover_path = Path::new(&cover_path);
            let image_data = std::fs::read(cover_path)
                .with_context(|| format!("Failed to read cover image: {}", cover_path.display()))?;
            let mime = mime_from_path(cover_path);
            let image_name = cover::image_name(mime);
            builder
                .add_cover_image(&image_name, image_data.as_slice(), mime)
                .map_err(|e| anyhow::Error::from_boxed(e.into()))
                .with_context(|| {
                    format!(
                        "Failed to add cover image to EPUB: {}",
                        cover_path.display()
                    )
                })?;

            let cover_html = cover::render(title, lang, &image_name);
            builder
                .add_content(
                    EpubContent::new("cover.xhtml", cover_html.as_bytes())
                        .reftype(ReferenceType::Cover),
                )
                .map_err(|e| anyhow::Error::from_boxed(e.into()))
                .with_context(|| "Failed to add cover page")?;
        }

        // add copyright page
        let release_date = metadata
            .release_date()
            .unwrap_or_else(|| chrono::Local::now().format("%B %d, %Y").to_string());
        let vars = copyright::template_vars(
            metadata,
            title,
            &authors.join(", "),
            lang,
            locale,
            &release_date,
        );
        let copyright_title = format!("{}: {}", locale.copyright, title);
        let copyright_html = copyright::render(&self.copyright, &vars, &copyright_title, lang)?;
        builder
            .add_content(
                EpubContent::new("copyright.xhtml", copyright_html.as_bytes())
                    .reftype(ReferenceType::Copyright),
            )
            .map_err(|e| anyhow::Error::from_boxed(e.into()))
            .with_context(|| "Failed to add copyright page")?;

        // table of contents follows the front section
        builder.inline_toc();

        // add chapters
        let heading_level = manuscript.title_heading_level();
        for chapter in &manuscript.chapters {
            let chapter_title = chapter::title(chapter, heading_level, locale)?;
            let html = chapter::render(chapter, &chapter_title, lang)?;
            builder
                .add_content(
                    EpubContent::new(chapter.file_name(), html.as_bytes())
                        .title(chapter_title.as_str())
                        .reftype(ReferenceType::Text),
                )
                .map_err(|e| anyhow::Error::from_boxed(e.into()))
                .with_context(|| {
                    format!("Failed to add chapter {} to EPUB", chapter.index + 1)
                })?;
        }

        // write epub to file
        let output_file = File::create(&outfile)
            .with_context(|| format!("Failed to create EPUB file: {}", outfile.display()))?;
        let writer = BufWriter::new(output_file);
        builder
            .generate(writer)
            .map_err(|e| anyhow::Error::from_boxed(e.into()))
            .with_context(|| format!("Failed to generate EPUB file: {}", outfile.display()))?;

        info!(
            "created {} ({} chapters)",
            outfile.display(),
            manuscript.chapters.len()
        );
        Ok(Outcome::Created(outfile))
    }
}

impl Sink for EpubSink<'_> {
    fn target(&self) -> Target {
        Target::Epub
    }

    fn render_book(&mut self, _shelf: &Shelf, manuscript: &Manuscript) -> Result<Outcome> {
        self.assemble(manuscript)
    }
}

/// The book's unique identifier.
///
/// Identifiers that are already UUIDs are used as-is; anything else, or the
/// output file name when there is no identifier, is hashed into a name-based
/// UUID so rebuilding a book keeps its identity.
pub fn book_uuid(identifier: Option<&str>, filename: &str) -> Uuid {
    match identifier {
        Some(id) => Uuid::parse_str(id.trim())
            .unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())),
        None => Uuid::new_v5(&Uuid::NAMESPACE_URL, filename.as_bytes()),
    }
}

/// Wrap an HTML fragment in an XHTML document linked to the book stylesheet.
pub(crate) fn xhtml_page(lang: &str, title: &str, class: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
    <meta http-equiv="Content-Type" content="text/html; charset=UTF-8"/>
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="stylesheet.css"/>
</head>
<body>
<div class="{class}">
{body}
</div>
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(lang),
        title = html_escape::encode_text(title),
        class = class,
        body = body,
    )
}

/// Determine MIME type from file extension.
fn mime_from_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
