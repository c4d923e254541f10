//! Copyright page rendering for EPUB.
//!
//! The page body comes from a user supplied template. Every scalar front
//! matter value is available as a placeholder, with title, author and lang
//! defaulted the same way the rest of the book defaults them, plus the
//! localised language name, the release date and the rendered credits.

use super::xhtml_page;
use crate::locale::Locale;
use crate::manuscript::{Metadata, CREDITS};
use crate::template::{Template, TemplateVars};
use anyhow::{Context, Result};

/// Everything the copyright template may refer to.
pub fn template_vars(
    metadata: &Metadata,
    title: &str,
    authors: &str,
    lang: &str,
    locale: &Locale,
    release_date: &str,
) -> TemplateVars {
    let mut vars = metadata.template_vars();
    vars.insert("title".to_string(), title.to_string());
    vars.insert("author".to_string(), authors.to_string());
    vars.insert("lang".to_string(), lang.to_string());
    vars.insert("language".to_string(), locale.language.clone());
    vars.insert("release_date".to_string(), release_date.to_string());
    vars.insert(CREDITS.to_string(), metadata.credits().to_string());
    vars
}

/// Render the copyright page as XHTML.
pub fn render(
    template: &Template,
    vars: &TemplateVars,
    page_title: &str,
    lang: &str,
) -> Result<String> {
    let body = template
        .render(vars)
        .with_context(|| "Failed to render copyright page")?;
    Ok(xhtml_page(lang, page_title, "copyright", &body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TemplateError;
    use crate::locale::LocaleTable;
    use crate::manuscript::{Manuscript, Target};

    fn manuscript() -> Manuscript {
        Manuscript::parse(
            "---\ntitle: Dune\nyear: 1965\ncredits: [Cover by Bo]\n---\nbody",
            "dune.md",
            Target::Epub,
        )
        .expect("can parse")
    }

    #[test]
    fn can_render_copyright_page() {
        let manuscript = manuscript();
        let table = LocaleTable::builtin();
        let locale = table.get("en").expect("en is built in");
        let vars = template_vars(
            &manuscript.metadata,
            "Dune",
            "Frank Herbert",
            "en",
            locale,
            "June 01, 1965",
        );
        let template = Template::parse(
            "<p>{title} by {author}, {year}. Released {release_date} in {language}.</p><p>{credits}</p>",
        )
        .expect("can parse template");

        let html = render(&template, &vars, "Copyright: Dune", "en").expect("can render");
        assert!(html.contains(
            "<p>Dune by Frank Herbert, 1965. Released June 01, 1965 in English.</p><p>Cover by Bo</p>"
        ));
        assert!(html.contains("<title>Copyright: Dune</title>"));
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let manuscript = manuscript();
        let table = LocaleTable::builtin();
        let locale = table.get("en").expect("en is built in");
        let vars = template_vars(&manuscript.metadata, "Dune", "F", "en", locale, "today");
        let template = Template::parse("{publisher}").expect("can parse template");

        let err = render(&template, &vars, "Copyright", "en").expect_err("publisher is unset");
        assert_eq!(
            err.downcast_ref::<TemplateError>(),
            Some(&TemplateError::MissingTemplateVariable {
                name: "publisher".to_string()
            })
        );
    }
}
