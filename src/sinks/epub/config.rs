//! EPUB output configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// EPUB output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::upper_case_acronyms)]
pub struct EPUB {
    /// Directory the `.epub` files are written to
    pub output_dir: PathBuf,
    /// Template for the copyright page. Any scalar front matter key may be
    /// used as a placeholder, along with {language}, {release_date} and
    /// {credits}.
    pub copyright_template: PathBuf,
    /// Stylesheet embedded in every book
    pub stylesheet: PathBuf,
}

impl Default for EPUB {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            copyright_template: PathBuf::from("partials").join("copyright.html"),
            stylesheet: PathBuf::from("styles").join("style.css"),
        }
    }
}

impl EPUB {
    /// Where the book with the given derived file name is written.
    pub fn outfile(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }
}
