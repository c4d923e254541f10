//! The `init` command: lay out a new quire project.
//!
//! Writes a default `quire.toml`, the page and copyright templates, the
//! stylesheet, and an empty books directory. Files that already exist are
//! left untouched, so `init` is safe to run in an existing project to restore
//! a deleted asset.

use crate::config::Configuration;
use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

const BASE_TEMPLATE: &str = include_str!("../assets/base.html");
const COPYRIGHT_TEMPLATE: &str = include_str!("../assets/copyright.html");
const STYLESHEET: &str = include_str!("../assets/style.css");

/// Run the init command, returning the files that were written.
pub fn run(config_path: &Path) -> Result<Vec<PathBuf>> {
    let config = if config_path.exists() {
        Configuration::load(config_path)?
    } else {
        Configuration::default()
    };

    let config_toml =
        toml::to_string_pretty(&config).with_context(|| "Failed to serialize configuration")?;

    let files = [
        (config_path.to_path_buf(), config_toml.as_str()),
        (config.html.base_template.clone(), BASE_TEMPLATE),
        (config.epub.copyright_template.clone(), COPYRIGHT_TEMPLATE),
        (config.epub.stylesheet.clone(), STYLESHEET),
    ];

    let mut written = Vec::new();
    for (path, contents) in files {
        if write_new(&path, contents)? {
            written.push(path);
        }
    }

    std::fs::create_dir_all(&config.books_dir).with_context(|| {
        format!(
            "Failed to create books directory: {}",
            config.books_dir.display()
        )
    })?;

    Ok(written)
}

/// Write `contents` to `path` unless it already exists.
fn write_new(path: &Path, contents: &str) -> Result<bool> {
    if path.exists() {
        info!("{} already exists, leaving it alone", path.display());
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("created {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::PAGE_VARIABLES;
    use crate::template::Template;

    #[test]
    fn bundled_templates_are_valid() {
        let base = Template::parse(BASE_TEMPLATE).expect("base template parses");
        base.ensure_only(&PAGE_VARIABLES)
            .expect("base template only uses page variables");
        Template::parse(COPYRIGHT_TEMPLATE).expect("copyright template parses");
    }

    #[test]
    fn init_never_overwrites() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config_path = dir.path().join("quire.toml");
        let config = Configuration {
            books_dir: dir.path().join("books"),
            epub: crate::sinks::EPUB {
                copyright_template: dir.path().join("partials").join("copyright.html"),
                stylesheet: dir.path().join("styles").join("style.css"),
                ..Default::default()
            },
            html: crate::sinks::HTML {
                base_template: dir.path().join("partials").join("base.html"),
                ..Default::default()
            },
            ..Default::default()
        };
        std::fs::write(
            &config_path,
            toml::to_string_pretty(&config).expect("can serialize"),
        )
        .expect("can write config");

        let written = run(&config_path).expect("can init");
        assert_eq!(written.len(), 3);
        assert!(config.html.base_template.is_file());
        assert!(config.epub.stylesheet.is_file());
        assert!(config.books_dir.is_dir());

        std::fs::write(&config.epub.stylesheet, "custom").expect("can edit stylesheet");
        let written = run(&config_path).expect("can init again");
        assert!(written.is_empty());
        assert_eq!(
            std::fs::read_to_string(&config.epub.stylesheet).expect("can read stylesheet"),
            "custom"
        );
    }
}
