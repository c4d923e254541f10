//! Localised display strings for generated book pages.
//!
//! The table is built once per run (built-in languages plus any overrides from
//! `quire.toml`) and handed to the renderers by reference.

use crate::errors::LocaleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display strings for a single language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Name of the language, in that language.
    pub language: String,
    /// Label for untitled chapters, followed by the chapter number.
    pub chapter: String,
    pub copyright: String,
    /// Title of the table of contents.
    pub toc: String,
}

impl Locale {
    fn new(language: &str, chapter: &str, copyright: &str, toc: &str) -> Locale {
        Locale {
            language: language.to_string(),
            chapter: chapter.to_string(),
            copyright: copyright.to_string(),
            toc: toc.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocaleTable {
    locales: BTreeMap<String, Locale>,
}

impl LocaleTable {
    /// The languages shipped with quire.
    pub fn builtin() -> LocaleTable {
        let locales = [
            ("en", Locale::new("English", "Chapter", "Copyright", "Table of Contents")),
            ("es", Locale::new("Español", "Capítulo", "Derechos de autor", "Índice")),
            ("fr", Locale::new("Français", "Chapitre", "Droits d'auteur", "Table des matières")),
            ("de", Locale::new("Deutsch", "Kapitel", "Urheberrecht", "Inhaltsverzeichnis")),
            ("it", Locale::new("Italiano", "Capitolo", "Diritti d'autore", "Indice")),
            ("pt", Locale::new("Português", "Capítulo", "Direitos autorais", "Índice")),
        ]
        .into_iter()
        .map(|(code, locale)| (code.to_string(), locale))
        .collect();

        LocaleTable { locales }
    }

    /// Add or replace languages. Codes are matched case-insensitively.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, Locale>) -> LocaleTable {
        for (code, locale) in overrides {
            self.locales.insert(code.to_lowercase(), locale.clone());
        }
        self
    }

    /// Look up a language by code, falling back to its primary subtag
    /// (`en-GB` resolves to `en`). Unknown languages are an error.
    pub fn get(&self, code: &str) -> Result<&Locale, LocaleError> {
        let code = code.trim().to_lowercase();
        if let Some(locale) = self.locales.get(&code) {
            return Ok(locale);
        }

        let primary = code.split(['-', '_']).next().unwrap_or_default();
        self.locales
            .get(primary)
            .ok_or_else(|| LocaleError::Unsupported(code.clone()))
    }
}
