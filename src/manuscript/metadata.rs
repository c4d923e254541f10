use super::credits::scalar_to_string;
use crate::template::TemplateVars;
use serde_yaml::{Mapping, Value};

pub const FILENAME: &str = "filename";
pub const PAGE_BREAK: &str = "page_break";
pub const CREDITS: &str = "credits";
pub const CHAPTER_HEADING_LEVEL: &str = "chapter_heading_level";

/// Marker separating chapters when the front matter doesn't pick one.
pub const DEFAULT_PAGE_BREAK: &str = "<!-- pagebreak -->";

/// The kind of output a manuscript is being parsed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Epub,
    Html,
}

impl Target {
    pub fn extension(&self) -> &'static str {
        match self {
            Target::Epub => ".epub",
            Target::Html => ".html",
        }
    }
}

/// Front matter values plus the keys derived while parsing.
///
/// After parsing, `filename`, `page_break` and `credits` are always present.
/// All other keys are whatever the manuscript supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    values: Mapping,
}

impl Metadata {
    pub fn new(values: Mapping) -> Metadata {
        Metadata { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The value of `key` if it is a non-empty string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// The value of `key` as text if it is a non-blank scalar, so that
    /// unquoted values such as `title: 1984` read the same as quoted ones.
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(scalar_to_string)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn insert<V: Into<Value>>(&mut self, key: &str, value: V) {
        self.values.insert(Value::from(key), value.into());
    }

    /// Keys in definition order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().filter_map(|(key, _)| key.as_str())
    }

    pub fn filename(&self) -> &str {
        self.get_str(FILENAME).unwrap_or_default()
    }

    pub fn page_break(&self) -> &str {
        self.get_str(PAGE_BREAK).unwrap_or(DEFAULT_PAGE_BREAK)
    }

    /// Credits rendered as HTML.
    pub fn credits(&self) -> &str {
        self.values
            .get(CREDITS)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn title(&self) -> Option<String> {
        self.get_text("title")
    }

    /// The book's authors. `author` may be a single name or a list of names.
    pub fn authors(&self) -> Vec<String> {
        match self.values.get("author") {
            Some(Value::Sequence(names)) => names
                .iter()
                .filter_map(scalar_to_string)
                .filter(|name| !name.trim().is_empty())
                .collect(),
            Some(value) => scalar_to_string(value)
                .filter(|name| !name.trim().is_empty())
                .into_iter()
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn lang(&self) -> Option<String> {
        self.get_text("lang")
    }

    /// The book identifier, from `id` or `identifier`.
    pub fn identifier(&self) -> Option<String> {
        self.get_text("id").or_else(|| self.get_text("identifier"))
    }

    /// Path to the cover image, if any.
    pub fn cover(&self) -> Option<String> {
        self.get_text("cover")
    }

    /// The release date as written in the front matter.
    pub fn release_date(&self) -> Option<String> {
        self.get_text("release_date")
    }

    /// The heading level that starts a new chapter, if heading splitting was
    /// requested.
    pub fn chapter_heading_level(&self) -> Option<u64> {
        self.values.get(CHAPTER_HEADING_LEVEL).and_then(Value::as_u64)
    }

    /// All scalar values as text, for template substitution. Lists and
    /// nested records are left out.
    pub fn template_vars(&self) -> TemplateVars {
        self.values
            .iter()
            .filter_map(|(key, value)| {
                let key = key.as_str()?;
                let value = scalar_to_string(value)?;
                Some((key.to_string(), value))
            })
            .collect()
    }
}

/// Derive the output file name for a source path: the last path segment with
/// its extension replaced by the target's. Both `/` and `\` separate segments.
pub fn derive_filename(source_path: &str, target: Target) -> String {
    let name = source_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source_path);
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    format!("{stem}{}", target.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_derive_filename_for_each_target() {
        assert_eq!(derive_filename("books/jane/mybook.md", Target::Epub), "mybook.epub");
        assert_eq!(derive_filename("books/jane/mybook.md", Target::Html), "mybook.html");
    }

    #[test]
    fn filename_ignores_separator_style() {
        assert_eq!(
            derive_filename("books\\jane\\mybook.md", Target::Epub),
            "mybook.epub"
        );
        assert_eq!(derive_filename("mybook.md", Target::Html), "mybook.html");
    }

    #[test]
    fn filename_strips_only_the_last_extension() {
        assert_eq!(derive_filename("a/vol.2.md", Target::Epub), "vol.2.epub");
        assert_eq!(derive_filename("a/README", Target::Epub), "README.epub");
        assert_eq!(derive_filename("a/.hidden", Target::Epub), ".hidden.epub");
    }

    #[test]
    fn authors_accepts_a_name_or_a_list() {
        let mut metadata = Metadata::default();
        assert!(metadata.authors().is_empty());

        metadata.insert("author", "Jane Doe");
        assert_eq!(metadata.authors(), vec!["Jane Doe".to_string()]);

        let names: Value = serde_yaml::from_str("[Ann, Bob]").expect("valid yaml");
        metadata.insert("author", names);
        assert_eq!(metadata.authors(), vec!["Ann".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn template_vars_include_scalars_only() {
        let values: Mapping =
            serde_yaml::from_str("title: Dune\nyear: 1965\ntags: [a, b]").expect("valid yaml");
        let vars = Metadata::new(values).template_vars();
        assert_eq!(vars.get("title").map(String::as_str), Some("Dune"));
        assert_eq!(vars.get("year").map(String::as_str), Some("1965"));
        assert!(!vars.contains_key("tags"));
    }

    #[test]
    fn identifier_prefers_id() {
        let values: Mapping =
            serde_yaml::from_str("id: abc\nidentifier: def").expect("valid yaml");
        assert_eq!(Metadata::new(values).identifier().as_deref(), Some("abc"));
    }

    #[test]
    fn unquoted_scalars_read_as_text() {
        let values: Mapping = serde_yaml::from_str(
            "title: 1984\nid: 9780451524935\nrelease_date: 2024\nlang: ''\ncover: [a]",
        )
        .expect("valid yaml");
        let metadata = Metadata::new(values);
        assert_eq!(metadata.title().as_deref(), Some("1984"));
        assert_eq!(metadata.identifier().as_deref(), Some("9780451524935"));
        assert_eq!(metadata.release_date().as_deref(), Some("2024"));
        assert_eq!(metadata.lang(), None);
        assert_eq!(metadata.cover(), None);
    }
}
