//! Search across several titles at once, for the command-line JSON output.
//!
//! Each title is loaded and searched in turn. A title that fails to load is recorded and
//! skipped, so one broken document does not hide the hits in the rest of the corpus.

use crate::corpus::Corpus;
use crate::error::Error;
use crate::loader::load_title;
use crate::search::search;
use crate::title::TitleId;
use serde::Serialize;
use std::io;
use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One matching section in batch search output.
pub struct BatchHit {
    /// Display name of the title.
    pub title: String,
    /// Label of the enclosing chapter.
    pub chapter: String,
    /// Section citation.
    pub citation: String,
    /// Section heading.
    pub heading: String,
    /// Number of matches in the section.
    pub matches: usize,
    /// Byte ranges of the matches within the section's searchable text.
    pub spans: Vec<Range<usize>>,
}

#[derive(Debug, Default)]
/// Hits from every title that loaded, and the errors of those that did not.
pub struct BatchSearch {
    /// Matching sections, by title then outline order.
    pub hits: Vec<BatchHit>,
    /// Number of titles that loaded.
    pub loaded: usize,
    /// Load failures, in title order.
    pub failures: Vec<Error>,
}

impl BatchSearch {
    #[must_use]
    /// Whether every requested title failed to load.
    pub fn is_total_failure(&self) -> bool {
        self.loaded == 0 && !self.failures.is_empty()
    }
}

/// Search one title, or every title in the corpus when none is given.
///
/// # Errors
///
/// Returns an error only if the corpus cannot be listed. Titles that fail to load are
/// collected in [`BatchSearch::failures`].
pub fn search_corpus(
    corpus: &dyn Corpus,
    title: Option<&TitleId>,
    query: &str,
) -> io::Result<BatchSearch> {
    let ids = match title {
        Some(id) => vec![id.clone()],
        None => corpus.titles()?.into_iter().map(|t| t.id).collect(),
    };

    let mut batch = BatchSearch::default();
    for id in &ids {
        match load_title(corpus, id) {
            Ok(outline) => {
                batch.loaded += 1;
                batch
                    .hits
                    .extend(search(&outline, query).map(|result| BatchHit {
                        title: outline.title.name.clone(),
                        chapter: result.chapter.label.clone(),
                        citation: result.section.citation.clone(),
                        heading: result.section.heading.clone(),
                        matches: result.match_count(),
                        spans: result.spans,
                    }));
            }
            Err(err) => batch.failures.push(err),
        }
    }

    tracing::info!(
        titles = ids.len(),
        failed = batch.failures.len(),
        hits = batch.hits.len(),
        "batch search finished"
    );
    Ok(batch)
}

#[cfg(test)]
#[path = "tests/batch.rs"]
mod tests;
