//! Corpus trait and implementations for the places title documents are stored.
//!
//! A corpus abstracts over where per-title XML documents live (a directory of static files,
//! or memory) so the loader only ever asks for the raw text of a title.

use crate::title::{Title, TitleId};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only access to the per-title documents.
pub trait Corpus {
    /// Raw document bytes for a title, undecoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing or cannot be read.
    fn fetch(&self, id: &TitleId) -> io::Result<Vec<u8>>;

    /// Human-readable location of the title's document, for diagnostics.
    fn source_name(&self, id: &TitleId) -> String;

    /// Titles available in this corpus, in title-number order.
    ///
    /// # Errors
    ///
    /// Returns an error if the corpus cannot be listed.
    fn titles(&self) -> io::Result<Vec<Title>>;
}

/// Placeholder a file pattern uses for the title number.
const NUMBER_PLACEHOLDER: &str = "{}";

/// Title documents stored as files in one directory, e.g. `xml/Title_1.xml`.
pub struct DirCorpus {
    root: PathBuf,
    prefix: String,
    suffix: String,
}

impl DirCorpus {
    #[must_use]
    /// Opens a corpus directory using a filename pattern such as `Title_{}.xml`.
    ///
    /// A pattern without `{}` has the title number appended.
    pub fn new(root: impl Into<PathBuf>, pattern: &str) -> Self {
        let (prefix, suffix) = pattern
            .split_once(NUMBER_PLACEHOLDER)
            .unwrap_or((pattern, ""));
        Self {
            root: root.into(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    #[must_use]
    /// Directory holding the documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    /// Path of the document for a title.
    pub fn path_for(&self, id: &TitleId) -> PathBuf {
        self.root
            .join(format!("{}{}{}", self.prefix, id.number(), self.suffix))
    }

    /// Extracts the title number from a filename matching the pattern.
    fn number_from_file_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        let number = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(number)
    }
}

impl Corpus for DirCorpus {
    fn fetch(&self, id: &TitleId) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(id))
    }

    fn source_name(&self, id: &TitleId) -> String {
        self.path_for(id).display().to_string()
    }

    fn titles(&self) -> io::Result<Vec<Title>> {
        let mut titles = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(number) = self.number_from_file_name(file_name) {
                let id = TitleId::new(number);
                titles.push(Title {
                    name: id.to_string(),
                    source: entry.path().display().to_string(),
                    id,
                });
            }
        }

        titles.sort_by(|a, b| a.id.sort_key().cmp(&b.id.sort_key()));
        Ok(titles)
    }
}

#[derive(Default)]
/// Title documents held in memory, keyed by title number.
pub struct MemoryCorpus {
    documents: BTreeMap<TitleId, Vec<u8>>,
}

impl MemoryCorpus {
    #[must_use]
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    /// Adds a document for a title, replacing any previous one.
    pub fn with_title(mut self, id: TitleId, document: impl Into<Vec<u8>>) -> Self {
        self.insert(id, document);
        self
    }

    /// Adds a document for a title, replacing any previous one.
    pub fn insert(&mut self, id: TitleId, document: impl Into<Vec<u8>>) {
        self.documents.insert(id, document.into());
    }
}

impl Corpus for MemoryCorpus {
    fn fetch(&self, id: &TitleId) -> io::Result<Vec<u8>> {
        self.documents.get(id).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no document for {id}"))
        })
    }

    fn source_name(&self, id: &TitleId) -> String {
        format!("memory:{}", id.number())
    }

    fn titles(&self) -> io::Result<Vec<Title>> {
        let mut titles: Vec<Title> = self
            .documents
            .keys()
            .map(|id| Title {
                id: id.clone(),
                name: id.to_string(),
                source: self.source_name(id),
            })
            .collect();
        titles.sort_by(|a, b| a.id.sort_key().cmp(&b.id.sort_key()));
        Ok(titles)
    }
}

#[cfg(test)]
#[path = "tests/corpus.rs"]
mod tests;
