//! Parsing Markdown manuscripts into metadata and rendered chapters.
//!
//! A manuscript is a UTF-8 Markdown file that may open with a YAML front
//! matter block delimited by `---`. Parsing produces the front matter values
//! (plus derived `filename`, `page_break` and `credits` keys) and the body
//! split into chapters, each rendered to HTML. Parsing is deterministic: the
//! same text and path always yield the same manuscript.

mod chapters;
pub use chapters::*;

mod credits;

pub mod front_matter;

mod metadata;
pub use metadata::*;

use crate::errors::ManuscriptError;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;

/// A parsed manuscript, ready to be handed to a sink.
#[derive(Debug, Clone)]
pub struct Manuscript {
    pub metadata: Metadata,
    pub chapters: Vec<Chapter>,
}

impl Manuscript {
    /// Read and parse the manuscript at `path`.
    pub fn load(path: &Path, target: Target) -> Result<Manuscript> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manuscript: {}", path.display()))?;
        let manuscript = Manuscript::parse(&text, &path.to_string_lossy(), target)
            .with_context(|| format!("Failed to parse manuscript: {}", path.display()))?;
        debug!(
            "parsed {} into {} chapter(s), front matter keys: {}",
            path.display(),
            manuscript.chapters.len(),
            manuscript.metadata.keys().collect::<Vec<_>>().join(", ")
        );
        Ok(manuscript)
    }

    /// Parse manuscript text. `source_path` only contributes the output file
    /// name.
    pub fn parse(
        text: &str,
        source_path: &str,
        target: Target,
    ) -> Result<Manuscript, ManuscriptError> {
        let (yaml, body) = front_matter::split(text)?;
        let mut metadata = Metadata::new(front_matter::parse(yaml)?);

        metadata.insert(FILENAME, derive_filename(source_path, target));

        let page_break = metadata
            .get_text(PAGE_BREAK)
            .unwrap_or_else(|| DEFAULT_PAGE_BREAK.to_string());
        metadata.insert(PAGE_BREAK, page_break.as_str());

        let entries = credits::from_front_matter(metadata.get(CREDITS));
        metadata.insert(CREDITS, credits::render(&entries));

        let chapters = match metadata.chapter_heading_level() {
            Some(level) => match heading_level(level) {
                Some(level) => split_on_headings(body, level),
                None => {
                    warn!(
                        "{source_path}: ignoring {CHAPTER_HEADING_LEVEL} {level}, expected 1 to 6"
                    );
                    split_on_page_breaks(body, &page_break)
                }
            },
            None => split_on_page_breaks(body, &page_break),
        };

        Ok(Manuscript { metadata, chapters })
    }

    /// The heading level whose first occurrence names a chapter.
    pub fn title_heading_level(&self) -> u64 {
        self.metadata
            .chapter_heading_level()
            .filter(|level| heading_level(*level).is_some())
            .unwrap_or(2)
    }
}
