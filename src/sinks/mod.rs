use crate::library::Shelf;
use crate::manuscript::{Manuscript, Target};
use anyhow::Result;
use std::path::PathBuf;

mod epub;
pub use epub::*;

mod html;
pub use html::*;

pub const DEFAULT_TITLE: &str = "Book Title";
pub const DEFAULT_AUTHOR: &str = "Author Name";
pub const DEFAULT_LANG: &str = "en";

/// What a sink did with one manuscript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(PathBuf),
    /// The output already existed and was left alone
    Skipped(PathBuf),
}

/// An output format the library can be bound into.
///
/// The batch driver calls `render_book` for every manuscript on a shelf, then
/// `finish_shelf` for that shelf, and `finish` once all shelves are done.
pub trait Sink {
    /// The output kind manuscripts should be parsed for.
    fn target(&self) -> Target;

    fn render_book(&mut self, shelf: &Shelf, manuscript: &Manuscript) -> Result<Outcome>;

    fn finish_shelf(&mut self, _shelf: &Shelf) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
