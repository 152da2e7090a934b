//! Failures surfaced while turning a title identifier into an outline.
//!
//! Only loading can fail. Searching never fails, and an empty document or a query without
//! matches are ordinary empty results and have no variant here.

use crate::title::TitleId;
use std::fmt;
use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to load {title} from {source_name}: {source}")]
/// The corpus could not supply the document for a title.
pub struct LoadError {
    /// Title that was requested.
    pub title: TitleId,
    /// File path or key the corpus tried to read.
    pub source_name: String,
    /// Underlying storage failure.
    #[source]
    pub source: io::Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// One-based row and column within the source document.
pub struct TextPosition {
    /// Line number.
    pub row: u32,
    /// Column number.
    pub col: u32,
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

#[derive(Debug, Error)]
/// The document for a title exists but is not a well-formed title document.
pub enum ParseError {
    /// The markup itself is malformed.
    #[error("malformed document for {title} at {position}: {source}")]
    Xml {
        /// Title being parsed.
        title: TitleId,
        /// Location reported by the XML parser.
        position: TextPosition,
        /// Parser diagnostic.
        #[source]
        source: roxmltree::Error,
    },
    /// The bytes are not valid UTF-8.
    #[error("{title} is not valid UTF-8 at {position}: {source}")]
    Encoding {
        /// Title being decoded.
        title: TitleId,
        /// Location of the first invalid byte.
        position: TextPosition,
        /// Decoder diagnostic.
        #[source]
        source: FromUtf8Error,
    },
    /// The markup is well-formed but its root is not a title document.
    #[error("unexpected root element <{element}> in {title}, expected <USCode> or <Title>")]
    UnexpectedRoot {
        /// Title being parsed.
        title: TitleId,
        /// Name of the root element found.
        element: String,
    },
}

impl ParseError {
    #[must_use]
    /// Location of the problem, when the parser could report one.
    pub fn position(&self) -> Option<TextPosition> {
        match self {
            Self::Xml { position, .. } | Self::Encoding { position, .. } => Some(*position),
            Self::UnexpectedRoot { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
/// Any failure of `load_title`.
pub enum Error {
    /// Retrieval failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, Error>;
