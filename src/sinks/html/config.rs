//! Static site output configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Static HTML site output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::upper_case_acronyms)]
pub struct HTML {
    /// Root directory of the generated site
    pub build_dir: PathBuf,
    /// Page template. May only use the {title}, {lang} and {content} placeholders.
    pub base_template: PathBuf,
    /// Heading and title of the root index page
    pub index_title: String,
    /// Language of the index pages
    pub index_lang: String,
}

impl Default for HTML {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("build"),
            base_template: PathBuf::from("partials").join("base.html"),
            index_title: "Authors".to_string(),
            index_lang: "en".to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_roundtrip_html() {
        let html = HTML {
            index_title: "Writers".to_string(),
            ..HTML::default()
        };
        let toml_str = toml::to_string(&html).expect("can serialize");
        let deserialized: HTML = toml::from_str(&toml_str).expect("can deserialize");
        assert_eq!(deserialized.index_title, "Writers");
        assert_eq!(deserialized.build_dir, html.build_dir);
    }
}
