//! EPUB generation for manuscripts.
//!
//! This module converts a parsed `Manuscript` into an EPUB ebook with:
//! - Optional cover page built from the `cover` front matter image
//! - Copyright page rendered from a template with the front matter substituted in
//! - Inline table of contents titled in the book's language
//! - One document per chapter, titled by the chapter's first sub-heading or a
//!   localised "Chapter N" label
//!
//! Books that already exist in the output directory are skipped, so a run can
//! be repeated after adding manuscripts without rebuilding everything.

mod config;
mod rendering;

pub use config::EPUB;
pub use rendering::EpubSink;
