use log::warn;
use serde_yaml::Value;
use std::fmt;

/// A single attribution entry from the `credits` front matter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credit {
    /// Rendered verbatim.
    PlainText(String),
    /// Rendered as a link to `url` labelled `name`, followed by the role.
    Attributed {
        name: String,
        url: String,
        role: String,
    },
}

impl Credit {
    /// Interpret a YAML value as a credit.
    ///
    /// Strings are plain credits and mappings are attributed credits, with
    /// absent fields left empty. Anything else isn't a credit.
    pub fn from_value(value: &Value) -> Option<Credit> {
        match value {
            Value::String(text) => Some(Credit::PlainText(text.clone())),
            Value::Mapping(record) => {
                let field = |key: &str| {
                    record
                        .get(key)
                        .and_then(scalar_to_string)
                        .unwrap_or_default()
                };
                Some(Credit::Attributed {
                    name: field("name"),
                    url: field("url"),
                    role: field("role"),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Credit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credit::PlainText(text) => write!(f, "{text}"),
            Credit::Attributed { name, url, role } => {
                write!(f, "<a href='{url}'>{name}</a> - {role}")
            }
        }
    }
}

/// Collect the credits from the `credits` front matter value.
///
/// A lone string counts as a single credit. Entries that are neither strings
/// nor records are skipped.
pub fn from_front_matter(value: Option<&Value>) -> Vec<Credit> {
    let entries: Vec<&Value> = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(entries)) => entries.iter().collect(),
        Some(other) => vec![other],
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            let credit = Credit::from_value(entry);
            if credit.is_none() {
                warn!("ignoring credit entry that is neither text nor a record: {entry:?}");
            }
            credit
        })
        .collect()
}

/// Render credits as HTML, one per line. Blank entries are left out.
pub fn render(credits: &[Credit]) -> String {
    credits
        .iter()
        .map(|credit| credit.to_string())
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("<br>\n")
        .trim_end()
        .to_string()
}

/// Render a scalar YAML value as text. Sequences and mappings have no text form.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).expect("valid yaml")
    }

    #[test]
    fn can_render_mixed_credits() {
        let value = yaml(
            r#"
- Plain Credit
- name: A
  url: http://x
  role: editor
"#,
        );
        let credits = from_front_matter(Some(&value));
        assert_eq!(
            render(&credits),
            "Plain Credit<br>\n<a href='http://x'>A</a> - editor"
        );
    }

    #[test]
    fn records_with_missing_fields_render_empty() {
        let credit = Credit::from_value(&yaml("name: Ann")).expect("is a credit");
        assert_eq!(credit.to_string(), "<a href=''>Ann</a> - ");
    }

    #[test]
    fn a_single_string_is_one_credit() {
        let credits = from_front_matter(Some(&yaml("Cover art by Bo")));
        assert_eq!(credits, vec![Credit::PlainText("Cover art by Bo".to_string())]);
    }

    #[test]
    fn other_entries_are_skipped() {
        let credits = from_front_matter(Some(&yaml("[42, Someone, [nested]]")));
        assert_eq!(credits, vec![Credit::PlainText("Someone".to_string())]);
    }

    #[test]
    fn blank_credits_leave_no_dangling_break() {
        let credits = from_front_matter(Some(&yaml(r#"[A, "", "  ", B, ""]"#)));
        assert_eq!(render(&credits), "A<br>\nB");
    }

    #[test]
    fn no_credits_render_empty() {
        assert_eq!(render(&from_front_matter(None)), "");
    }
}
