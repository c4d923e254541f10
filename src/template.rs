//! Placeholder templates for the copyright page and site pages.
//!
//! Templates use `{name}` placeholders. Doubled braces (`{{` and `}}`) produce
//! literal braces so stylesheets and scripts can live inside a template. A
//! template is parsed once up front so that malformed text, or a placeholder
//! outside the variables a caller supports, is reported before any output is
//! written.

use crate::errors::TemplateError;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Values substituted into a template, keyed by placeholder name.
pub type TemplateVars = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template text into literal and placeholder segments.
    pub fn parse(text: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' => {
                    if matches!(chars.peek(), Some((_, '{'))) {
                        chars.next();
                        literal.push('{');
                        continue;
                    }

                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::UnterminatedPlaceholder { offset });
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name.trim().to_string()));
                }
                '}' => {
                    if matches!(chars.peek(), Some((_, '}'))) {
                        chars.next();
                        literal.push('}');
                    } else {
                        return Err(TemplateError::UnmatchedBrace { offset });
                    }
                }
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Template { segments })
    }

    /// Load and parse a template from disk.
    pub fn load(path: &Path) -> Result<Template> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template: {}", path.display()))?;
        Template::parse(&contents)
            .with_context(|| format!("Failed to parse template: {}", path.display()))
    }

    /// Names of all placeholders, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Reject templates that reference anything outside `allowed`.
    pub fn ensure_only(&self, allowed: &[&str]) -> Result<(), TemplateError> {
        match self.placeholders().find(|name| !allowed.contains(name)) {
            Some(name) => Err(TemplateError::MissingTemplateVariable {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn render(&self, vars: &TemplateVars) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        return Err(TemplateError::MissingTemplateVariable { name: name.clone() })
                    }
                },
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> TemplateVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn can_render_placeholders() {
        let template = Template::parse("<title>{title}</title><html lang=\"{lang}\">")
            .expect("can parse template");
        let html = template
            .render(&vars(&[("title", "Dune"), ("lang", "en")]))
            .expect("can render");
        assert_eq!(html, "<title>Dune</title><html lang=\"en\">");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let template =
            Template::parse("body {{ margin: 0; }} {content}").expect("can parse template");
        let html = template
            .render(&vars(&[("content", "<p>hi</p>")]))
            .expect("can render");
        assert_eq!(html, "body { margin: 0; } <p>hi</p>");
    }

    #[test]
    fn missing_value_is_reported_by_name() {
        let template = Template::parse("{title} by {author}").expect("can parse template");
        let err = template
            .render(&vars(&[("title", "Dune")]))
            .expect_err("author is missing");
        assert_eq!(
            err,
            TemplateError::MissingTemplateVariable {
                name: "author".to_string()
            }
        );
    }

    #[test]
    fn ensure_only_rejects_unknown_placeholders() {
        let template = Template::parse("{title}{lang}{content}").expect("can parse template");
        assert!(template.ensure_only(&["title", "lang", "content"]).is_ok());

        let template = Template::parse("{title}{author}").expect("can parse template");
        assert_eq!(
            template.ensure_only(&["title", "lang", "content"]),
            Err(TemplateError::MissingTemplateVariable {
                name: "author".to_string()
            })
        );
    }

    #[test]
    fn malformed_templates_fail_to_parse() {
        assert_eq!(
            Template::parse("abc {title").unwrap_err(),
            TemplateError::UnterminatedPlaceholder { offset: 4 }
        );
        assert_eq!(
            Template::parse("a } b").unwrap_err(),
            TemplateError::UnmatchedBrace { offset: 2 }
        );
    }

    #[test]
    fn placeholder_names_are_trimmed() {
        let template = Template::parse("{ title }").expect("can parse template");
        assert_eq!(template.placeholders().collect::<Vec<_>>(), vec!["title"]);
    }
}
