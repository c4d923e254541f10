//! Static HTML site generation for manuscripts.
//!
//! Every book becomes a single page at `<build>/<author>/<book>.html`. Once an
//! author's books are done an index page listing them is written to
//! `<build>/<author>/index.html`, and the run finishes with a root index at
//! `<build>/index.html` linking every author. Pages are regenerated on every
//! run.

mod config;
mod rendering;

pub use config::HTML;
use rendering::{AuthorLink, BookLink};

use crate::library::Shelf;
use crate::manuscript::{Manuscript, Target};
use crate::sinks::{Outcome, Sink, DEFAULT_AUTHOR, DEFAULT_LANG, DEFAULT_TITLE};
use crate::template::Template;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Placeholders the page template may use.
pub const PAGE_VARIABLES: [&str; 3] = ["title", "lang", "content"];

/// Builds the static site, one author at a time.
pub struct SiteSink<'a> {
    config: &'a HTML,
    template: Template,
    /// Books written for the author currently being processed
    books: Vec<BookLink>,
    /// Authors whose index pages have been written
    authors: Vec<AuthorLink>,
}

impl<'a> SiteSink<'a> {
    pub fn new(config: &'a HTML) -> Result<SiteSink<'a>> {
        let template = Template::load(&config.base_template)?;
        template.ensure_only(&PAGE_VARIABLES).with_context(|| {
            format!(
                "Page template {} may only use {{title}}, {{lang}} and {{content}}",
                config.base_template.display()
            )
        })?;

        Ok(SiteSink {
            config,
            template,
            books: Vec::new(),
            authors: Vec::new(),
        })
    }

    fn author_dir(&self, shelf: &Shelf) -> PathBuf {
        self.config.build_dir.join(&shelf.name)
    }
}

impl Sink for SiteSink<'_> {
    fn target(&self) -> Target {
        Target::Html
    }

    fn render_book(&mut self, shelf: &Shelf, manuscript: &Manuscript) -> Result<Outcome> {
        let metadata = &manuscript.metadata;
        let title = metadata
            .title()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let authors = metadata.authors();
        let author = if authors.is_empty() {
            DEFAULT_AUTHOR.to_string()
        } else {
            authors.join(", ")
        };
        let lang = metadata.lang().unwrap_or_else(|| DEFAULT_LANG.to_string());

        let html = rendering::page(
            &self.template,
            &format!("{title} - {author}"),
            &lang,
            &rendering::book_content(manuscript),
        )?;

        let folder = self.author_dir(shelf);
        let outfile = folder.join(metadata.filename());
        write_page(&folder, &outfile, &html)?;

        self.books.push(BookLink {
            title,
            author,
            href: format!("/{}/{}", shelf.name, metadata.filename()),
        });
        Ok(Outcome::Created(outfile))
    }

    fn finish_shelf(&mut self, shelf: &Shelf) -> Result<()> {
        let books = std::mem::take(&mut self.books);
        let Some(first) = books.first() else {
            warn!(
                "no books were built for {}, leaving it out of the index",
                shelf.name
            );
            return Ok(());
        };

        let author = first.author.clone();
        let html = rendering::page(
            &self.template,
            &author,
            &self.config.index_lang,
            &rendering::author_index_content(&author, &books),
        )?;
        let folder = self.author_dir(shelf);
        write_page(&folder, &folder.join("index.html"), &html)?;

        self.authors.push(AuthorLink {
            name: author,
            href: format!("/{}/index.html", shelf.name),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let html = rendering::page(
            &self.template,
            &self.config.index_title,
            &self.config.index_lang,
            &rendering::root_index_content(&self.config.index_title, &self.authors),
        )?;
        write_page(
            &self.config.build_dir,
            &self.config.build_dir.join("index.html"),
            &html,
        )
    }
}

fn write_page(folder: &Path, outfile: &Path, html: &str) -> Result<()> {
    std::fs::create_dir_all(folder)
        .with_context(|| format!("Failed to create directory: {}", folder.display()))?;
    std::fs::write(outfile, html)
        .with_context(|| format!("Failed to write page: {}", outfile.display()))?;
    info!("created {}", outfile.display());
    Ok(())
}
