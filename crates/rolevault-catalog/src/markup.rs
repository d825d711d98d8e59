//! Lead-paragraph extraction from role description documents.

use pulldown_cmark::{Event, Parser, TagEnd};

use crate::Variables;

/// First non-empty paragraph of `text`, trimmed.
///
/// Paragraphs are separated by blank lines (`\n\n`); CRLF line endings are
/// normalised first.
#[must_use]
pub fn lead_paragraph(text: &str) -> Option<String> {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .trim()
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty())
        .map(str::to_owned)
}

/// Strip inline markdown markup, keeping the visible text.
///
/// Links become their label, emphasis and code spans lose their delimiters,
/// raw HTML is dropped. Line structure is kept; each line is trimmed.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());

    for event in Parser::new(text) {
        match event {
            Event::Text(t) | Event::Code(t) => plain.push_str(&t),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => {
                plain.push('\n');
            }
            _ => {}
        }
    }

    plain
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Description of a role taken from its document.
///
/// Resolves template variables, takes the lead paragraph and strips its
/// markup. Returns `None` if nothing readable is left.
#[must_use]
pub fn extract_description(document: &str, variables: &Variables) -> Option<String> {
    let resolved = variables.resolve(document);
    let paragraph = lead_paragraph(&resolved)?;
    let description = strip_markup(&paragraph);
    (!description.is_empty()).then_some(description)
}
