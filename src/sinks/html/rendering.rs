//! Page content for the static site.
//!
//! Book pages carry the rendered chapters verbatim; index pages are built here
//! and every piece of text inserted into them is escaped.

use crate::manuscript::Manuscript;
use crate::template::{Template, TemplateVars};
use anyhow::{Context, Result};

/// A book as listed on its author's index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookLink {
    pub title: String,
    pub author: String,
    /// Site-absolute link to the book page
    pub href: String,
}

/// An author as listed on the root index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorLink {
    pub name: String,
    /// Site-absolute link to the author's index page
    pub href: String,
}

/// Fill the page template. `title` and `lang` are escaped; `content` is
/// already HTML.
pub fn page(template: &Template, title: &str, lang: &str, content: &str) -> Result<String> {
    let vars: TemplateVars = [
        ("title", html_escape::encode_text(title)),
        ("lang", html_escape::encode_quoted_attribute(lang)),
        ("content", content.into()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.into_owned()))
    .collect();
    template
        .render(&vars)
        .with_context(|| format!("Failed to render page: {title}"))
}

/// All chapters of a book, in order.
pub fn book_content(manuscript: &Manuscript) -> String {
    manuscript
        .chapters
        .iter()
        .map(|chapter| chapter.html.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn author_index_content(author: &str, books: &[BookLink]) -> String {
    let items = books
        .iter()
        .map(|book| {
            format!(
                "<li><a href='{}'>{}</a></li>",
                html_escape::encode_single_quoted_attribute(&book.href),
                html_escape::encode_text(&book.title)
            )
        })
        .collect::<String>();
    format!(
        "<h1>{}</h1><ul>{items}</ul>",
        html_escape::encode_text(author)
    )
}

pub fn root_index_content(heading: &str, authors: &[AuthorLink]) -> String {
    let items = authors
        .iter()
        .map(|author| {
            format!(
                "<li><a href='{}'>{}</a></li>",
                html_escape::encode_single_quoted_attribute(&author.href),
                html_escape::encode_text(&author.name)
            )
        })
        .collect::<String>();
    format!(
        "<h1>{}</h1><ul>{items}</ul>",
        html_escape::encode_text(heading)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manuscript::Target;

    #[test]
    fn book_content_joins_chapters() {
        let manuscript = Manuscript::parse(
            "one\n<!-- pagebreak -->\ntwo",
            "b.md",
            Target::Html,
        )
        .expect("can parse");
        assert_eq!(book_content(&manuscript), "<p>one</p>\n\n<p>two</p>\n");
    }

    #[test]
    fn author_index_lists_books() {
        let books = vec![
            BookLink {
                title: "Salt & Sea".to_string(),
                author: "Jane".to_string(),
                href: "/jane/salt.html".to_string(),
            },
            BookLink {
                title: "Dust".to_string(),
                author: "Jane".to_string(),
                href: "/jane/dust.html".to_string(),
            },
        ];
        assert_eq!(
            author_index_content("Jane", &books),
            "<h1>Jane</h1><ul><li><a href='/jane/salt.html'>Salt &amp; Sea</a></li>\
             <li><a href='/jane/dust.html'>Dust</a></li></ul>"
        );
    }

    #[test]
    fn root_index_lists_authors() {
        let authors = vec![AuthorLink {
            name: "Jane <J> Doe".to_string(),
            href: "/jane/index.html".to_string(),
        }];
        assert_eq!(
            root_index_content("Authors", &authors),
            "<h1>Authors</h1><ul><li><a href='/jane/index.html'>Jane &lt;J&gt; Doe</a></li></ul>"
        );
    }

    #[test]
    fn can_fill_page_template() {
        let template = Template::parse("<html lang=\"{lang}\"><title>{title}</title>{content}</html>")
            .expect("can parse template");
        let html = page(&template, "T - A", "de", "<p>x</p>").expect("can render");
        assert_eq!(html, "<html lang=\"de\"><title>T - A</title><p>x</p></html>");
    }
}
