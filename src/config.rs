//! The `quire.toml` configuration file.
//!
//! Every setting has a default, so the file is optional and may set only the
//! values that differ.

use crate::locale::Locale;
use crate::sinks::{EPUB, HTML};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Complete configuration for a quire project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Directory holding one sub-directory of manuscripts per author
    pub books_dir: PathBuf,
    /// Glob matched against file names to find manuscripts
    pub manuscript_glob: String,
    pub epub: EPUB,
    pub html: HTML,
    /// Extra or replacement languages, keyed by language code
    pub locales: BTreeMap<String, Locale>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            books_dir: PathBuf::from("books"),
            manuscript_glob: "*.md".to_string(),
            epub: EPUB::default(),
            html: HTML::default(),
            locales: BTreeMap::new(),
        }
    }
}

impl Configuration {
    /// Load the configuration at `path`, or the defaults if there is no file.
    pub fn load(path: &Path) -> Result<Configuration> {
        if !path.exists() {
            info!("{} not found, using default settings", path.display());
            return Ok(Configuration::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_roundtrip_configuration() {
        let config = Configuration::default();
        let toml_str = toml::to_string_pretty(&config).expect("can serialize");
        let deserialized: Configuration = toml::from_str(&toml_str).expect("can deserialize");
        assert_eq!(deserialized.books_dir, config.books_dir);
        assert_eq!(deserialized.manuscript_glob, "*.md");
        assert_eq!(deserialized.epub.output_dir, config.epub.output_dir);
    }

    #[test]
    fn can_parse_partial_configuration() {
        let config: Configuration = toml::from_str(
            r#"
books_dir = "manuscripts"

[html]
index_title = "Writers"

[locales.nl]
language = "Nederlands"
chapter = "Hoofdstuk"
copyright = "Auteursrecht"
toc = "Inhoudsopgave"
"#,
        )
        .expect("can parse");

        assert_eq!(config.books_dir, PathBuf::from("manuscripts"));
        assert_eq!(config.html.index_title, "Writers");
        assert_eq!(config.html.build_dir, PathBuf::from("build"));
        assert_eq!(config.epub.output_dir, PathBuf::from("output"));
        assert_eq!(config.locales["nl"].chapter, "Hoofdstuk");
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = Configuration::load(&dir.path().join("quire.toml")).expect("can load");
        assert_eq!(config.manuscript_glob, "*.md");
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("quire.toml");
        std::fs::write(&path, "books_dir = [").expect("can write config");
        assert!(Configuration::load(&path).is_err());
    }
}
