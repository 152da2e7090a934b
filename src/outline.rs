//! Flattening a parsed title document into the ordered chapter/section outline.
//!
//! The outline is built in one walk over the tree. `<Chapter>` and `<Section>` elements mark
//! boundaries; every other element, including a `<Chapter>` nested in another, is transparent. Sections with no enclosing chapter land
//! in an implicit "Ungrouped" chapter at the position they occur, and a chapter is only
//! emitted once it receives its first section, so chapters are never empty.

use crate::loader::{Element, Node, TitleDocument};
use crate::title::{Chapter, Section, Title};
use serde::Serialize;

/// Label given to the implicit chapter holding sections outside any chapter.
pub const UNGROUPED_LABEL: &str = "Ungrouped";

const CHAPTER: &str = "Chapter";
const SECTION: &str = "Section";
const TITLE: &str = "Title";
const CITATION_ELEMENTS: [&str; 3] = ["Num", "Number", "Citation"];
const HEADING_ELEMENTS: [&str; 2] = ["Heading", "Head"];
const PARAGRAPH_ELEMENTS: [&str; 3] = ["P", "Para", "Paragraph"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Ordered chapters and sections of one title, used for navigation and search.
pub struct Outline {
    /// The title this outline was built from.
    pub title: Title,
    /// Chapters in document order, each with its sections in document order.
    pub chapters: Vec<Chapter>,
}

#[derive(Clone, Copy, Debug)]
/// One (chapter, section) pair of the flattened outline.
pub struct OutlineEntry<'a> {
    /// Position of the section in the flattened outline.
    pub index: usize,
    /// Position of the chapter in the outline.
    pub chapter_index: usize,
    /// The enclosing chapter.
    pub chapter: &'a Chapter,
    /// The section itself.
    pub section: &'a Section,
}

impl Outline {
    #[must_use]
    /// Total number of sections across all chapters.
    pub fn section_count(&self) -> usize {
        self.chapters.iter().map(|chapter| chapter.sections.len()).sum()
    }

    #[must_use]
    /// Whether the title has no sections at all.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// All (chapter, section) pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = OutlineEntry<'_>> {
        self.chapters
            .iter()
            .enumerate()
            .flat_map(|(chapter_index, chapter)| {
                chapter
                    .sections
                    .iter()
                    .map(move |section| (chapter_index, chapter, section))
            })
            .enumerate()
            .map(|(index, (chapter_index, chapter, section))| OutlineEntry {
                index,
                chapter_index,
                chapter,
                section,
            })
    }

    #[must_use]
    /// The entry at a flattened position.
    pub fn entry(&self, index: usize) -> Option<OutlineEntry<'_>> {
        let mut offset = index;
        for (chapter_index, chapter) in self.chapters.iter().enumerate() {
            if offset < chapter.sections.len() {
                return Some(OutlineEntry {
                    index,
                    chapter_index,
                    chapter,
                    section: &chapter.sections[offset],
                });
            }
            offset -= chapter.sections.len();
        }
        None
    }

    #[must_use]
    /// Flattened position of the first section of a chapter.
    pub fn chapter_start(&self, chapter_index: usize) -> Option<usize> {
        if chapter_index >= self.chapters.len() {
            return None;
        }
        Some(
            self.chapters[..chapter_index]
                .iter()
                .map(|chapter| chapter.sections.len())
                .sum(),
        )
    }

    #[must_use]
    /// Flattened position of the first section with the given citation.
    pub fn find_section(&self, citation: &str) -> Option<usize> {
        self.iter()
            .find(|entry| entry.section.citation == citation)
            .map(|entry| entry.index)
    }
}

/// Build the outline for a parsed document.
#[must_use]
pub fn build_outline(document: &TitleDocument) -> Outline {
    let mut builder = OutlineBuilder::default();
    builder.visit(&document.root, None);

    let name = builder
        .title_name
        .unwrap_or_else(|| document.id.to_string());

    Outline {
        title: Title {
            id: document.id.clone(),
            name,
            source: document.source.clone(),
        },
        chapters: builder.chapters,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
/// Which chapter element a section belongs to; `None` means no enclosing chapter.
struct ChapterKey(Option<usize>);

#[derive(Default)]
struct OutlineBuilder {
    chapters: Vec<Chapter>,
    /// Key of each emitted chapter, parallel to `chapters`.
    keys: Vec<ChapterKey>,
    /// Serial number handed to the next `<Chapter>` element.
    next_serial: usize,
    title_name: Option<String>,
}

/// Label and number of a `<Chapter>` element whose first section has not arrived yet.
struct ChapterHead {
    key: ChapterKey,
    label: String,
    number: Option<String>,
}

impl OutlineBuilder {
    fn visit(&mut self, element: &Element, chapter: Option<&ChapterHead>) {
        match element.name.as_str() {
            // A chapter inside a chapter does not split the outer one.
            CHAPTER if chapter.is_some() => {
                for child in element.elements() {
                    self.visit(child, chapter);
                }
            }
            CHAPTER => {
                let head = self.chapter_head(element);
                for child in element.elements() {
                    self.visit(child, Some(&head));
                }
            }
            SECTION => self.visit_section(element, chapter),
            name => {
                if name == TITLE && self.title_name.is_none() {
                    self.title_name = element
                        .attribute("name")
                        .map(|value| value.trim().to_string())
                        .filter(|value| !value.is_empty());
                }
                for child in element.elements() {
                    self.visit(child, chapter);
                }
            }
        }
    }

    fn chapter_head(&mut self, element: &Element) -> ChapterHead {
        let key = ChapterKey(Some(self.next_serial));
        self.next_serial += 1;

        let label = element
            .attribute("name")
            .map(str::to_string)
            .or_else(|| child_text(element, &HEADING_ELEMENTS))
            .map(|label| collapse_whitespace(&label))
            .unwrap_or_else(|| CHAPTER.to_string());
        let number = element
            .attribute("number")
            .map(str::to_string)
            .or_else(|| chapter_number(&label));

        ChapterHead { key, label, number }
    }

    fn visit_section(&mut self, element: &Element, chapter: Option<&ChapterHead>) {
        let section = parse_section(element);
        self.target_chapter(chapter).sections.push(section);

        // Nested sections follow their parent, in the same chapter.
        for child in element.elements() {
            self.visit_nested(child, chapter);
        }
    }

    fn visit_nested(&mut self, element: &Element, chapter: Option<&ChapterHead>) {
        if element.name == SECTION {
            self.visit_section(element, chapter);
        } else {
            for child in element.elements() {
                self.visit_nested(child, chapter);
            }
        }
    }

    /// The chapter a section should be appended to, emitting it on first use.
    fn target_chapter(&mut self, head: Option<&ChapterHead>) -> &mut Chapter {
        let key = head.map_or(ChapterKey(None), |head| head.key);
        if self.keys.last() != Some(&key) {
            let position = self.chapters.len();
            let chapter = match head {
                Some(head) => Chapter {
                    label: head.label.clone(),
                    number: head.number.clone(),
                    position,
                    implicit: false,
                    sections: Vec::new(),
                },
                None => Chapter {
                    label: UNGROUPED_LABEL.to_string(),
                    number: None,
                    position,
                    implicit: true,
                    sections: Vec::new(),
                },
            };
            self.chapters.push(chapter);
            self.keys.push(key);
        }
        let last = self.chapters.len() - 1;
        &mut self.chapters[last]
    }
}

/// Extract citation, heading and paragraphs from a `<Section>` element.
///
/// The corpus form is `<Section name="101. Definitions">body</Section>`. Explicit
/// `number`/`heading` attributes or `<Num>`/`<Heading>` children take precedence over the
/// `name` attribute when present.
fn parse_section(element: &Element) -> Section {
    let (mut citation, mut heading) = element
        .attribute("name")
        .map(split_section_name)
        .unwrap_or_default();

    if let Some(value) = element
        .attribute("number")
        .map(str::to_string)
        .or_else(|| child_text(element, &CITATION_ELEMENTS))
    {
        citation = value.trim().trim_end_matches('.').to_string();
    }
    if let Some(value) = element
        .attribute("heading")
        .map(str::to_string)
        .or_else(|| child_text(element, &HEADING_ELEMENTS))
    {
        heading = collapse_whitespace(&value);
    }

    Section {
        citation,
        heading,
        paragraphs: section_paragraphs(element),
    }
}

/// Split `"101. Definitions"` into `("101", "Definitions")`.
fn split_section_name(name: &str) -> (String, String) {
    let name = name.trim();
    if let Some((number, rest)) = name.split_once('.') {
        if is_citation(number) {
            return (number.to_string(), rest.trim().to_string());
        }
    }
    (String::new(), name.to_string())
}

fn is_citation(value: &str) -> bool {
    !value.is_empty()
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Parse the number out of a label like `Chapter 12.—BANKRUPTCY.`
fn chapter_number(label: &str) -> Option<String> {
    let rest = label.get(..CHAPTER.len()).and_then(|prefix| {
        prefix
            .eq_ignore_ascii_case(CHAPTER)
            .then(|| &label[CHAPTER.len()..])
    })?;
    let number: String = rest
        .trim_start()
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect();
    is_citation(&number).then_some(number)
}

/// Body paragraphs of a section in document order.
///
/// Text and inline elements accumulate into a running paragraph that breaks on line
/// breaks; paragraph elements are always paragraphs of their own. Citation, heading and
/// nested section elements are not body text.
fn section_paragraphs(element: &Element) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut pending = String::new();

    for child in &element.children {
        match child {
            Node::Text(text) => pending.push_str(text),
            Node::Element(child) => {
                let name = child.name.as_str();
                if name == SECTION
                    || CITATION_ELEMENTS.contains(&name)
                    || HEADING_ELEMENTS.contains(&name)
                {
                    continue;
                }
                if PARAGRAPH_ELEMENTS.contains(&name) {
                    push_lines(&mut paragraphs, &pending);
                    pending.clear();
                    push_lines(&mut paragraphs, &child.text());
                } else {
                    pending.push_str(&child.text());
                }
            }
        }
    }
    push_lines(&mut paragraphs, &pending);

    paragraphs
}

fn push_lines(paragraphs: &mut Vec<String>, text: &str) {
    paragraphs.extend(
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
    );
}

fn child_text(element: &Element, names: &[&str]) -> Option<String> {
    element
        .elements()
        .find(|child| names.contains(&child.name.as_str()))
        .map(Element::text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "tests/outline.rs"]
mod tests;
