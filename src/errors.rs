//! Error types for manuscript parsing, localisation, and templating.
//!
//! These are the conditions callers may want to match on. Everything else
//! (missing files, packaging failures) travels as `anyhow::Error` with context
//! attached at the point of failure.

use thiserror::Error;

/// Errors raised while turning raw manuscript text into metadata and chapters.
#[derive(Error, Debug)]
pub enum ManuscriptError {
    /// The text opens with `---` but the front matter is never closed.
    #[error("front matter starts with `---` but has no closing `---` delimiter")]
    MalformedFrontMatter,

    /// The front matter block is not valid YAML.
    #[error("failed to parse YAML front matter: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// The front matter is valid YAML but not a mapping of keys to values.
    #[error("front matter must be a mapping of keys to values")]
    FrontMatterNotMapping,
}

/// Errors raised when looking up localised display strings.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocaleError {
    #[error("unsupported locale `{0}`")]
    Unsupported(String),
}

/// Errors raised while parsing or rendering a template.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// The template references a placeholder that has no value, or that is
    /// outside the set of variables the template is allowed to use.
    #[error("template references unknown variable `{{{name}}}`")]
    MissingTemplateVariable { name: String },

    /// A `{` was opened but never closed.
    #[error("unterminated placeholder starting at byte {offset}")]
    UnterminatedPlaceholder { offset: usize },

    /// A lone `}` appeared outside of a placeholder.
    #[error("unmatched `}}` at byte {offset}; use `}}}}` for a literal brace")]
    UnmatchedBrace { offset: usize },
}
