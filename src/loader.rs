//! The loader turns a title identifier into a parsed document tree.
//!
//! Retrieval goes through a [`Corpus`]; parsing uses roxmltree and then copies the borrowed
//! tree into an owned one, so the document can outlive the source text and move between
//! threads. Node order always matches document order.

use crate::corpus::Corpus;
use crate::error::{Error, LoadError, ParseError, Result, TextPosition};
use crate::outline::{self, Outline};
use crate::title::TitleId;
use roxmltree::Document;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A node in a parsed title document.
pub enum Node {
    /// Markup element with its children.
    Element(Element),
    /// Character data between elements.
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Markup element carrying a name, attributes and ordered children.
pub struct Element {
    /// Local tag name, e.g. `Section`.
    pub name: String,
    /// Attributes in source order.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in source order.
    pub children: Vec<Node>,
}

impl Element {
    #[must_use]
    /// Value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    #[must_use]
    /// All text content, including nested elements, in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A parsed title document.
pub struct TitleDocument {
    /// Title the document was loaded for.
    pub id: TitleId,
    /// Where the document text came from; empty when parsed from a bare string.
    pub source: String,
    /// Root element, either `USCode` or `Title`.
    pub root: Element,
}

/// Root element names accepted for a title document.
const ROOT_ELEMENTS: [&str; 2] = ["USCode", "Title"];

/// Parse document text into an owned tree.
///
/// # Errors
///
/// Returns [`ParseError::Xml`] if the markup is malformed, or
/// [`ParseError::UnexpectedRoot`] if it is not a title document.
pub fn parse_document(id: &TitleId, text: &str) -> std::result::Result<TitleDocument, ParseError> {
    let document = Document::parse(text).map_err(|source| {
        let pos = source.pos();
        ParseError::Xml {
            title: id.clone(),
            position: TextPosition {
                row: pos.row,
                col: pos.col,
            },
            source,
        }
    })?;

    let root = document.root_element();
    let root_name = root.tag_name().name();
    if !ROOT_ELEMENTS.contains(&root_name) {
        return Err(ParseError::UnexpectedRoot {
            title: id.clone(),
            element: root_name.to_string(),
        });
    }

    Ok(TitleDocument {
        id: id.clone(),
        source: String::new(),
        root: copy_element(root),
    })
}

/// Decode raw document bytes as UTF-8.
///
/// # Errors
///
/// Returns [`ParseError::Encoding`] positioned at the first invalid byte.
pub fn decode_document(id: &TitleId, bytes: Vec<u8>) -> std::result::Result<String, ParseError> {
    String::from_utf8(bytes).map_err(|source| {
        let valid = &source.as_bytes()[..source.utf8_error().valid_up_to()];
        let line_start = valid
            .iter()
            .rposition(|&byte| byte == b'\n')
            .map_or(0, |newline| newline + 1);
        let row = valid.iter().filter(|&&byte| byte == b'\n').count() + 1;
        let col = valid[line_start..]
            .iter()
            .filter(|&&byte| !is_continuation_byte(byte))
            .count()
            + 1;
        ParseError::Encoding {
            title: id.clone(),
            position: TextPosition {
                row: u32::try_from(row).unwrap_or(u32::MAX),
                col: u32::try_from(col).unwrap_or(u32::MAX),
            },
            source,
        }
    })
}

fn is_continuation_byte(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

fn copy_element(node: roxmltree::Node<'_, '_>) -> Element {
    let attributes = node
        .attributes()
        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
        .collect();

    let children = node
        .children()
        .filter_map(|child| {
            if child.is_element() {
                Some(Node::Element(copy_element(child)))
            } else if child.is_text() {
                child.text().map(|text| Node::Text(text.to_string()))
            } else {
                None
            }
        })
        .collect();

    Element {
        name: node.tag_name().name().to_string(),
        attributes,
        children,
    }
}

/// Fetch and parse the document for a title.
///
/// # Errors
///
/// Returns [`Error::Load`] if the corpus cannot supply the document and [`Error::Parse`]
/// if it is malformed.
pub fn load_document(corpus: &dyn Corpus, id: &TitleId) -> Result<TitleDocument> {
    let source_name = corpus.source_name(id);
    tracing::debug!(title = %id, source = %source_name, "fetching title document");

    let bytes = corpus.fetch(id).map_err(|source| {
        tracing::warn!(title = %id, source = %source_name, error = %source, "title document unavailable");
        LoadError {
            title: id.clone(),
            source_name: source_name.clone(),
            source,
        }
    })?;

    let mut document = decode_document(id, bytes)
        .and_then(|text| parse_document(id, &text))
        .map_err(|err| {
            tracing::warn!(title = %id, error = %err, "title document is malformed");
            Error::from(err)
        })?;
    document.source = source_name;
    Ok(document)
}

/// Load a title and build its outline.
///
/// # Errors
///
/// Returns [`Error::Load`] or [`Error::Parse`]; an empty document is not an error.
pub fn load_title(corpus: &dyn Corpus, id: &TitleId) -> Result<Outline> {
    let document = load_document(corpus, id)?;
    let outline = outline::build_outline(&document);
    tracing::info!(
        title = %id,
        chapters = outline.chapters.len(),
        sections = outline.section_count(),
        "loaded title"
    );
    Ok(outline)
}

#[cfg(test)]
#[path = "tests/loader.rs"]
mod tests;
