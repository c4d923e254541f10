use crate::errors::ManuscriptError;
use serde_yaml::{Mapping, Value};

/// The literal that opens and closes a front matter block.
pub const DELIMITER: &str = "---";

/// Separate a manuscript into its YAML front matter and Markdown body.
///
/// Text that doesn't start with [`DELIMITER`] has no front matter and is all
/// body. Otherwise the text is split on the first two delimiters; anything
/// after the second one belongs to the body, so thematic breaks further down
/// are left alone.
pub fn split(text: &str) -> Result<(&str, &str), ManuscriptError> {
    if !text.starts_with(DELIMITER) {
        return Ok(("", text));
    }

    let mut parts = text.splitn(3, DELIMITER);
    let _prefix = parts.next();
    match (parts.next(), parts.next()) {
        (Some(yaml), Some(body)) => Ok((yaml, body)),
        _ => Err(ManuscriptError::MalformedFrontMatter),
    }
}

/// Parse a YAML block into a mapping. Blank and `null` blocks are empty.
pub fn parse(yaml: &str) -> Result<Mapping, ManuscriptError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ManuscriptError::FrontMatterNotMapping),
    }
}
