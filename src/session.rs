//! The browsing session: which title is shown and which load is still allowed to land.
//!
//! Loading is the only step that may take time, so it happens off the UI thread. Every
//! request is stamped with a [`LoadTicket`] from a monotonically increasing generation, and
//! only the result carrying the latest ticket is accepted. A slow load for a title the user
//! has already moved away from can therefore never overwrite the view of the newer title.
//!
//! Outlines may be cached per title. The cache only saves work; a session without it
//! behaves the same.

use crate::error::Error;
use crate::outline::Outline;
use crate::search::{self, SearchResult};
use crate::title::TitleId;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Stamp identifying one load request.
pub struct LoadTicket {
    generation: u64,
    /// Title the request is for.
    pub title: TitleId,
}

#[derive(Debug)]
/// What the session is currently showing.
pub enum TitleStatus {
    /// No title has been selected yet.
    Idle,
    /// A load for this title is in flight.
    Loading(TitleId),
    /// The outline for the selected title is available.
    Ready,
    /// The selected title could not be loaded.
    Failed(Error),
}

#[derive(Debug)]
/// Result of asking the session to show a title.
pub enum LoadRequest {
    /// The outline was cached and is already current.
    Cached,
    /// The caller must load the title and hand the result to [`Session::finish_load`].
    Fetch(LoadTicket),
}

#[derive(Debug)]
/// Outcome of a search against the session, keeping load failures apart from empty results.
pub enum SearchOutcome<'a> {
    /// Nothing to search: no title is selected or it is still loading.
    NotReady,
    /// The selected title failed to load.
    LoadFailed(&'a Error),
    /// Matching sections, possibly none.
    Results(Vec<SearchResult<'a>>),
}

/// Session state owned by the UI layer.
pub struct Session {
    generation: u64,
    status: TitleStatus,
    outline: Option<Outline>,
    cache: Option<HashMap<TitleId, Outline>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Session {
    #[must_use]
    /// Creates an idle session, optionally caching outlines per title.
    pub fn new(cache_outlines: bool) -> Self {
        Self {
            generation: 0,
            status: TitleStatus::Idle,
            outline: None,
            cache: cache_outlines.then(HashMap::new),
        }
    }

    #[must_use]
    /// Current status of the selected title.
    pub fn status(&self) -> &TitleStatus {
        &self.status
    }

    #[must_use]
    /// Outline of the selected title, once it has loaded.
    pub fn outline(&self) -> Option<&Outline> {
        match self.status {
            TitleStatus::Ready => self.outline.as_ref(),
            _ => None,
        }
    }

    /// Selects a title, invalidating any load still in flight.
    pub fn begin_load(&mut self, title: TitleId) -> LoadRequest {
        self.generation += 1;
        self.outline = None;

        if let Some(outline) = self.cache.as_ref().and_then(|cache| cache.get(&title)) {
            tracing::debug!(title = %title, "serving outline from cache");
            self.outline = Some(outline.clone());
            self.status = TitleStatus::Ready;
            return LoadRequest::Cached;
        }

        tracing::debug!(title = %title, generation = self.generation, "loading title");
        self.status = TitleStatus::Loading(title.clone());
        LoadRequest::Fetch(LoadTicket {
            generation: self.generation,
            title,
        })
    }

    /// Accepts the result of a load, unless a newer selection has superseded it.
    ///
    /// Returns whether the result was applied.
    pub fn finish_load(&mut self, ticket: &LoadTicket, result: Result<Outline, Error>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                title = %ticket.title,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale load"
            );
            return false;
        }

        match result {
            Ok(outline) => {
                if let Some(cache) = self.cache.as_mut() {
                    cache.insert(ticket.title.clone(), outline.clone());
                }
                self.outline = Some(outline);
                self.status = TitleStatus::Ready;
            }
            Err(err) => {
                tracing::warn!(title = %ticket.title, error = %err, "title failed to load");
                self.outline = None;
                self.status = TitleStatus::Failed(err);
            }
        }
        true
    }

    #[must_use]
    /// Searches the selected title.
    pub fn search(&self, query: &str) -> SearchOutcome<'_> {
        match (&self.status, self.outline.as_ref()) {
            (TitleStatus::Failed(err), _) => SearchOutcome::LoadFailed(err),
            (TitleStatus::Ready, Some(outline)) => {
                SearchOutcome::Results(search::search(outline, query).collect())
            }
            _ => SearchOutcome::NotReady,
        }
    }
}

#[cfg(test)]
#[path = "tests/session.rs"]
mod tests;
