//! Quest document rendering.
//!
//! Quest files are markdown (or plain text, which renders as paragraphs).
//! Conversion uses `pulldown-cmark` with tables, strikethrough, and task lists
//! enabled; fenced code blocks are part of CommonMark.
//!
//! The title is the text of the first level-one heading in the parsed
//! document, so a `# comment` inside a fenced block never qualifies.
//!
//! Output is not sanitized: quest repositories are trusted local content and
//! raw HTML in a document is passed through.

use crate::naming;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html as md_html};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Quest file not found: {0}")]
    NotFound(String),
    #[error("Quest file is not valid UTF-8: {0}")]
    InvalidUtf8(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A quest document converted to HTML.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedQuest {
    pub path: String,
    /// Text of the first H1, falling back to the file stem
    pub title: String,
    pub html: String,
}

/// Read `rel` under `root` and render it.
///
/// Returns [`RenderError::NotFound`] when the path escapes `root`, does not
/// exist, or is not a regular file.
pub fn render_quest(root: &Path, rel: &str) -> Result<RenderedQuest, RenderError> {
    let path = naming::resolve_under(root, rel)
        .filter(|p| p.is_file())
        .ok_or_else(|| RenderError::NotFound(rel.to_string()))?;

    let bytes = fs::read(&path)?;
    let text = String::from_utf8(bytes).map_err(|_| RenderError::InvalidUtf8(rel.to_string()))?;

    let events = parse(&text);
    let title = first_h1(&events).unwrap_or_else(|| naming::stem(&path));

    Ok(RenderedQuest {
        path: rel.to_string(),
        title,
        html: events_to_html(events, text.len()),
    })
}

fn parse(text: &str) -> Vec<Event<'_>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    Parser::new_ext(text, options).collect()
}

fn events_to_html(events: Vec<Event<'_>>, source_len: usize) -> String {
    let mut html = String::with_capacity(source_len * 3 / 2);
    md_html::push_html(&mut html, events.into_iter());
    html
}

/// Plain text of the first H1, ATX or setext.
fn first_h1(events: &[Event<'_>]) -> Option<String> {
    let start = events.iter().position(|e| {
        matches!(
            e,
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            })
        )
    })?;
    let mut title = String::new();
    for event in &events[start + 1..] {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => title.push_str(t),
            Event::SoftBreak | Event::HardBreak => title.push(' '),
            _ => {}
        }
    }
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Convert markdown to an HTML fragment.
pub fn markdown_to_html(text: &str) -> String {
    events_to_html(parse(text), text.len())
}
