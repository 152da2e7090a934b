//! Case-insensitive substring search over an outline.
//!
//! Each section is matched against its heading and body joined by a line break. Results come
//! back lazily, in outline order, one per matching section with every non-overlapping match
//! collected as a byte span of the original text. Searching is pure: the same outline and
//! query always give the same results.

use crate::outline::Outline;
use crate::title::{Chapter, Section};
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Part of a section a highlight falls in.
pub enum TextLocation {
    /// The section heading.
    Heading,
    /// The body paragraph at this index.
    Paragraph(usize),
}

#[derive(Clone, Debug)]
/// A matching section and where the query occurs in it.
pub struct SearchResult<'a> {
    /// Position of the section in the flattened outline.
    pub index: usize,
    /// The enclosing chapter.
    pub chapter: &'a Chapter,
    /// The matching section.
    pub section: &'a Section,
    /// Byte ranges of each match within [`Section::searchable_text`], in order.
    pub spans: Vec<Range<usize>>,
}

impl SearchResult<'_> {
    #[must_use]
    /// Number of matches in this section.
    pub fn match_count(&self) -> usize {
        self.spans.len()
    }

    #[must_use]
    /// Match ranges relative to one part of the section, for highlighting.
    ///
    /// A match that crosses the line break between parts is split between them.
    pub fn highlights(&self, location: TextLocation) -> Vec<Range<usize>> {
        let field = match location {
            TextLocation::Heading => 0..self.section.heading.len(),
            TextLocation::Paragraph(index) => {
                match self.section.paragraph_ranges().into_iter().nth(index) {
                    Some(range) => range,
                    None => return Vec::new(),
                }
            }
        };

        self.spans
            .iter()
            .filter_map(|span| {
                let start = span.start.max(field.start);
                let end = span.end.min(field.end);
                (start < end).then(|| start - field.start..end - field.start)
            })
            .collect()
    }
}

/// Lazy iterator over the sections of an outline that match a query.
pub struct SearchResults<'a> {
    outline: &'a Outline,
    query: Option<String>,
    chapter: usize,
    section: usize,
    index: usize,
}

impl<'a> Iterator for SearchResults<'a> {
    type Item = SearchResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let query = self.query.as_deref()?;

        while let Some(chapter) = self.outline.chapters.get(self.chapter) {
            let Some(section) = chapter.sections.get(self.section) else {
                self.chapter += 1;
                self.section = 0;
                continue;
            };
            let index = self.index;
            self.section += 1;
            self.index += 1;

            let spans = find_spans(&section.searchable_text(), query);
            if !spans.is_empty() {
                return Some(SearchResult {
                    index,
                    chapter,
                    section,
                    spans,
                });
            }
        }
        None
    }
}

/// Search an outline for a query, case-insensitively.
///
/// A blank query yields no results rather than every section.
#[must_use]
pub fn search<'a>(outline: &'a Outline, query: &str) -> SearchResults<'a> {
    let query = (!query.trim().is_empty()).then(|| fold_case(query));
    SearchResults {
        outline,
        query,
        chapter: 0,
        section: 0,
        index: 0,
    }
}

fn fold_case(text: &str) -> String {
    text.chars().flat_map(fold_char).collect()
}

/// Lower-cases one character. Final sigma folds to `σ` so that it matches `Σ`.
fn fold_char(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase()
        .map(|lower| if lower == 'ς' { 'σ' } else { lower })
}

/// Text folded to lower case, remembering which original character each byte came from.
struct FoldedText {
    folded: String,
    /// Original byte range of the character each folded byte was produced from.
    origin: Vec<Range<usize>>,
}

impl FoldedText {
    fn new(text: &str) -> Self {
        let mut folded = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());

        for (start, c) in text.char_indices() {
            let source = start..start + c.len_utf8();
            for lower in fold_char(c) {
                folded.push(lower);
                origin.extend(std::iter::repeat_n(source.clone(), lower.len_utf8()));
            }
        }

        Self { folded, origin }
    }

    fn original_range(&self, folded: Range<usize>) -> Range<usize> {
        self.origin[folded.start].start..self.origin[folded.end - 1].end
    }
}

/// Byte ranges in `text` of every non-overlapping occurrence of the folded query.
fn find_spans(text: &str, folded_query: &str) -> Vec<Range<usize>> {
    let haystack = FoldedText::new(text);
    haystack
        .folded
        .match_indices(folded_query)
        .map(|(start, found)| haystack.original_range(start..start + found.len()))
        .collect()
}

#[cfg(test)]
#[path = "tests/search.rs"]
mod tests;
