//! Splitting a manuscript body into rendered chapters.
//!
//! Chapters are separated either by a literal page-break marker or, when the
//! front matter asks for it, by every heading of a given level. Either way the
//! output order matches the body order and a chapter's index is simply its
//! position.
//!
//! Each chapter ends up as its own document, so footnote definitions are
//! moved to the end of every chapter that references them.

use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::collections::BTreeMap;

/// One rendered chapter of a manuscript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Zero-based position within the manuscript.
    pub index: usize,
    pub html: String,
}

impl Chapter {
    /// Name of this chapter's document inside an EPUB container.
    pub fn file_name(&self) -> String {
        format!("ch_{:05}.xhtml", self.index)
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_FOOTNOTES
}

/// Render a Markdown fragment to HTML with footnote support.
pub fn render_markdown(markdown: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(markdown, markdown_options()));
    out
}

/// Split `body` on every occurrence of `page_break`, drop blank segments, and
/// render the rest.
pub fn split_on_page_breaks(body: &str, page_break: &str) -> Vec<Chapter> {
    let segments: Vec<Vec<Event>> = body
        .split(page_break)
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| Parser::new_ext(segment, markdown_options()).collect::<Vec<_>>())
        .collect();
    render_chapters(segments)
}

enum SplitState<'a> {
    /// No chapter heading seen yet; events so far form the preamble.
    AwaitingChapterHeading { preamble: Vec<Event<'a>> },
    /// Inside a chapter opened by a heading.
    AccumulatingChapterBody { events: Vec<Event<'a>> },
}

/// Split `body` so that every heading at `level` opens a new chapter.
///
/// Content before the first such heading becomes a leading chapter of its
/// own. Headings at other levels stay inside the current chapter.
pub fn split_on_headings(body: &str, level: HeadingLevel) -> Vec<Chapter> {
    let mut finished: Vec<Vec<Event>> = Vec::new();
    let mut state = SplitState::AwaitingChapterHeading {
        preamble: Vec::new(),
    };

    for event in Parser::new_ext(body, markdown_options()) {
        let opens_chapter = matches!(
            &event,
            Event::Start(Tag::Heading { level: l, .. }) if *l == level
        );

        state = match (state, opens_chapter) {
            (SplitState::AwaitingChapterHeading { preamble }, true) => {
                if !preamble.is_empty() {
                    finished.push(preamble);
                }
                SplitState::AccumulatingChapterBody {
                    events: vec![event],
                }
            }
            (SplitState::AwaitingChapterHeading { mut preamble }, false) => {
                preamble.push(event);
                SplitState::AwaitingChapterHeading { preamble }
            }
            (SplitState::AccumulatingChapterBody { events }, true) => {
                finished.push(events);
                SplitState::AccumulatingChapterBody {
                    events: vec![event],
                }
            }
            (SplitState::AccumulatingChapterBody { mut events }, false) => {
                events.push(event);
                SplitState::AccumulatingChapterBody { events }
            }
        };
    }

    match state {
        SplitState::AwaitingChapterHeading { preamble } if !preamble.is_empty() => {
            finished.push(preamble)
        }
        SplitState::AccumulatingChapterBody { events } => finished.push(events),
        _ => {}
    }

    render_chapters(finished)
}

/// A footnote definition lifted out of the chapter it was written in.
struct Footnote<'a> {
    origin: usize,
    events: Vec<Event<'a>>,
}

/// Relocate footnotes, drop chapters left empty, and render the rest.
fn render_chapters(chunks: Vec<Vec<Event<'_>>>) -> Vec<Chapter> {
    relocate_footnotes(chunks)
        .into_iter()
        .filter(|events| !events.is_empty())
        .enumerate()
        .map(|(index, events)| {
            let mut out = String::new();
            html::push_html(&mut out, events.into_iter());
            Chapter { index, html: out }
        })
        .collect()
}

/// Append each footnote definition to every chunk that references it,
/// following references made from inside other definitions. A definition
/// nobody references stays with the chunk it came from. When a label is
/// defined twice the first definition wins.
fn relocate_footnotes(chunks: Vec<Vec<Event<'_>>>) -> Vec<Vec<Event<'_>>> {
    let mut footnotes: BTreeMap<String, Footnote> = BTreeMap::new();
    let mut bodies = Vec::with_capacity(chunks.len());

    for (origin, chunk) in chunks.into_iter().enumerate() {
        let mut body = Vec::new();
        let mut open: Option<(String, Vec<Event>)> = None;

        for event in chunk {
            if let Some((_, events)) = open.as_mut() {
                let closes = matches!(event, Event::End(TagEnd::FootnoteDefinition));
                events.push(event);
                if closes {
                    if let Some((label, events)) = open.take() {
                        footnotes.entry(label).or_insert(Footnote { origin, events });
                    }
                }
                continue;
            }

            match event {
                Event::Start(Tag::FootnoteDefinition(label)) => {
                    let key = label.to_string();
                    open = Some((key, vec![Event::Start(Tag::FootnoteDefinition(label))]));
                }
                other => body.push(other),
            }
        }
        if let Some((label, events)) = open.take() {
            footnotes.entry(label).or_insert(Footnote { origin, events });
        }
        bodies.push(body);
    }

    if footnotes.is_empty() {
        return bodies;
    }

    let mut placed: Vec<&str> = Vec::new();
    let mut appendices: Vec<Vec<&str>> = Vec::with_capacity(bodies.len());
    for body in &bodies {
        let mut labels: Vec<&str> = Vec::new();
        let mut pending = referenced_labels(body);
        while let Some(label) = pending.pop() {
            if labels.contains(&label) {
                continue;
            }
            if let Some((key, footnote)) = footnotes.get_key_value(label) {
                labels.push(key.as_str());
                pending.extend(referenced_labels(&footnote.events));
            }
        }
        placed.extend(labels.iter().copied());
        appendices.push(labels);
    }

    let mut orphans: Vec<Vec<&str>> = vec![Vec::new(); bodies.len()];
    for (label, footnote) in &footnotes {
        if !placed.contains(&label.as_str()) {
            orphans[footnote.origin].push(label.as_str());
        }
    }

    bodies
        .iter()
        .zip(appendices.iter().zip(&orphans))
        .map(|(body, (referenced, unreferenced))| {
            let mut events = body.clone();
            for label in referenced.iter().chain(unreferenced) {
                if let Some(footnote) = footnotes.get(*label) {
                    events.extend(footnote.events.iter().cloned());
                }
            }
            events
        })
        .collect()
}

/// Footnote labels referenced by `events`, last reference first.
fn referenced_labels<'e>(events: &'e [Event<'_>]) -> Vec<&'e str> {
    events
        .iter()
        .rev()
        .filter_map(|event| match event {
            Event::FootnoteReference(label) => Some(&**label),
            _ => None,
        })
        .collect()
}

/// Map a numeric heading level (1-6) to a `HeadingLevel`.
pub fn heading_level(level: u64) -> Option<HeadingLevel> {
    match level {
        1 => Some(HeadingLevel::H1),
        2 => Some(HeadingLevel::H2),
        3 => Some(HeadingLevel::H3),
        4 => Some(HeadingLevel::H4),
        5 => Some(HeadingLevel::H5),
        6 => Some(HeadingLevel::H6),
        _ => None,
    }
}
