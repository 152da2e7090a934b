//! Title, chapter and section representation for loaded US Code documents.
//!
//! A title is the top-level division of the Code. Its chapters group sections in the
//! order they appear in the source document, and each section carries its citation,
//! heading and the statutory text split into paragraphs.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
/// Identifies a title within the corpus by its number (the "1" in "Title 1").
pub struct TitleId(pub String);

impl TitleId {
    #[must_use]
    /// Builds an identifier from a title number such as `"1"` or `"50"`.
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    #[must_use]
    /// The bare title number.
    pub fn number(&self) -> &str {
        &self.0
    }

    /// Numeric value used to sort titles, when the number is purely numeric.
    pub(crate) fn sort_key(&self) -> (u32, &str) {
        (self.0.parse().unwrap_or(u32::MAX), &self.0)
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Title {}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A title as listed in the corpus, before or after loading.
pub struct Title {
    /// Corpus identifier.
    pub id: TitleId,
    /// Display name, e.g. `TITLE 1.—GENERAL PROVISIONS`.
    pub name: String,
    /// Where the source document lives (file path or memory key).
    pub source: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Grouping of sections within a title.
pub struct Chapter {
    /// Label as it appears in the document, e.g. `Chapter 1.—RULES OF CONSTRUCTION.`
    pub label: String,
    /// Chapter number parsed from the label, if it carries one.
    pub number: Option<String>,
    /// Zero-based position of this chapter within the outline.
    pub position: usize,
    /// True for the implicit chapter holding sections with no enclosing chapter.
    pub implicit: bool,
    /// Sections in document order.
    pub sections: Vec<Section>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Smallest addressable unit of statutory text.
pub struct Section {
    /// Citation number, e.g. `101`.
    pub citation: String,
    /// Heading text without the citation prefix.
    pub heading: String,
    /// Body text, one entry per paragraph.
    pub paragraphs: Vec<String>,
}

impl Section {
    #[must_use]
    /// Full body text with paragraphs joined by line breaks.
    pub fn body(&self) -> String {
        self.paragraphs.join("\n")
    }

    #[must_use]
    /// Text searched by queries: the heading, a line break, then the body.
    pub fn searchable_text(&self) -> String {
        format!("{}\n{}", self.heading, self.body())
    }

    #[must_use]
    /// Byte range of each paragraph within [`Section::searchable_text`].
    pub fn paragraph_ranges(&self) -> Vec<Range<usize>> {
        let mut start = self.heading.len() + 1;
        self.paragraphs
            .iter()
            .map(|paragraph| {
                let range = start..start + paragraph.len();
                start = range.end + 1;
                range
            })
            .collect()
    }

    #[must_use]
    /// Whether the section carries a citation only.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    #[must_use]
    /// Display label in the corpus style, e.g. `101. Definitions`.
    pub fn label(&self) -> String {
        match (self.citation.is_empty(), self.heading.is_empty()) {
            (true, _) => self.heading.clone(),
            (false, true) => format!("{}.", self.citation),
            (false, false) => format!("{}. {}", self.citation, self.heading),
        }
    }
}
