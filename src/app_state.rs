//! The state machine bridging the browsing session and the terminal interface.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user
//! navigates. The loaded outline itself lives in the [`Session`]; this state adds the cursor
//! positions, the active search and status feedback. Section positions are indices into the
//! flattened outline, so they stay valid for as long as the same title is shown.

use crate::error::Error;
use crate::outline::Outline;
use crate::search::SearchResult;
use crate::session::{LoadRequest, LoadTicket, SearchOutcome, Session, TitleStatus};
use crate::title::Title;
use std::ops::Range;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// Lists the titles available in the corpus.
    TitleList,
    /// Shows the chapter and section tree of the selected title.
    Outline,
    /// Shows the full text of one section.
    Detail,
    /// Captures a search query typed after '/'.
    Search,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A matching section remembered by position, with its match spans.
pub struct SearchHit {
    /// Position of the section in the flattened outline.
    pub index: usize,
    /// Match ranges within the section's searchable text.
    pub spans: Vec<Range<usize>>,
}

/// Bridges the browsing session and the interface, maintaining cursor and search state.
pub struct AppState {
    /// Titles available in the corpus.
    pub titles: Vec<Title>,
    /// Selected title in the title list.
    pub current_title_index: usize,
    /// Loaded outline and load bookkeeping.
    pub session: Session,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// Screen to return to when a search prompt closes.
    pub previous_view: View,
    /// Selected section, as a position in the flattened outline.
    pub current_section_index: usize,
    /// Query being typed in the search prompt.
    pub search_buffer: String,
    /// Query whose results are active.
    pub query: String,
    /// Sections matching the active query, in outline order.
    pub hits: Vec<SearchHit>,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Maximum line width for section text.
    pub wrap_width: usize,
    /// Vertical scroll offset of the detail view.
    pub detail_scroll: u16,
}

impl AppState {
    #[must_use]
    /// Initialises application state with the corpus titles.
    pub fn new(titles: Vec<Title>, session: Session, wrap_width: usize) -> Self {
        Self {
            titles,
            current_title_index: 0,
            session,
            current_view: View::TitleList,
            previous_view: View::TitleList,
            current_section_index: 0,
            search_buffer: String::new(),
            query: String::new(),
            hits: Vec::new(),
            message: None,
            wrap_width,
            detail_scroll: 0,
        }
    }

    #[must_use]
    /// Outline of the selected title, once loaded.
    pub fn outline(&self) -> Option<&Outline> {
        self.session.outline()
    }

    #[must_use]
    /// Error from the last load, if the selected title failed to load.
    pub fn load_error(&self) -> Option<&Error> {
        match self.session.status() {
            TitleStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    /// Whether a load for the selected title is still in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.session.status(), TitleStatus::Loading(_))
    }

    /// Opens the title under the cursor, returning the load the caller must run, if any.
    ///
    /// Any earlier load still in flight is superseded.
    pub fn select_title(&mut self) -> Option<LoadTicket> {
        let title = self.titles.get(self.current_title_index)?.id.clone();

        self.current_section_index = 0;
        self.detail_scroll = 0;
        self.clear_search();
        self.message = None;
        self.current_view = View::Outline;

        match self.session.begin_load(title) {
            LoadRequest::Cached => {
                self.refresh_title_name();
                None
            }
            LoadRequest::Fetch(ticket) => Some(ticket),
        }
    }

    /// Applies a finished load, ignoring it if a newer title has been selected since.
    pub fn apply_load(&mut self, ticket: &LoadTicket, result: Result<Outline, Error>) {
        if !self.session.finish_load(ticket, result) {
            return;
        }
        match self.session.status() {
            TitleStatus::Failed(err) => {
                self.message = Some(format!("Failed to load {}: {err}", ticket.title));
            }
            _ => {
                self.refresh_title_name();
                if self.outline().is_some_and(Outline::is_empty) {
                    self.message = Some(format!("{} has no sections", ticket.title));
                }
            }
        }
    }

    /// Copies the loaded title's display name into the title list.
    fn refresh_title_name(&mut self) {
        let Some(name) = self.outline().map(|outline| outline.title.name.clone()) else {
            return;
        };
        if let Some(title) = self.titles.get_mut(self.current_title_index) {
            title.name = name;
        }
    }

    /// Returns to the title list.
    pub fn close_title(&mut self) {
        self.current_view = View::TitleList;
        self.message = None;
    }

    // --- Title list navigation ---

    /// Moves the title cursor up.
    pub fn prev_title(&mut self) {
        self.current_title_index = self.current_title_index.saturating_sub(1);
    }

    /// Moves the title cursor down.
    pub fn next_title(&mut self) {
        if self.current_title_index + 1 < self.titles.len() {
            self.current_title_index += 1;
        }
    }

    // --- Outline navigation ---

    fn section_count(&self) -> usize {
        self.outline().map_or(0, Outline::section_count)
    }

    #[must_use]
    /// Returns the following section index for sequential navigation.
    pub fn find_next_section(&self) -> Option<usize> {
        let next = self.current_section_index + 1;
        (next < self.section_count()).then_some(next)
    }

    #[must_use]
    /// Returns the preceding section index for reverse navigation.
    pub fn find_prev_section(&self) -> Option<usize> {
        self.current_section_index.checked_sub(1)
    }

    #[must_use]
    /// Finds the first section of the next chapter.
    pub fn navigate_to_next_chapter(&self) -> Option<usize> {
        let outline = self.outline()?;
        let chapter = outline.entry(self.current_section_index)?.chapter_index;
        outline.chapter_start(chapter + 1)
    }

    #[must_use]
    /// Finds the first section of the current chapter, or of the previous chapter when
    /// already there.
    pub fn navigate_to_prev_chapter(&self) -> Option<usize> {
        let outline = self.outline()?;
        let chapter = outline.entry(self.current_section_index)?.chapter_index;
        let start = outline.chapter_start(chapter)?;
        if start < self.current_section_index {
            Some(start)
        } else {
            outline.chapter_start(chapter.checked_sub(1)?)
        }
    }

    #[must_use]
    /// Jumps to the first section in the title.
    pub fn navigate_to_first(&self) -> Option<usize> {
        (self.section_count() > 0).then_some(0)
    }

    #[must_use]
    /// Jumps to the last section in the title.
    pub fn navigate_to_last(&self) -> Option<usize> {
        self.section_count().checked_sub(1)
    }

    /// Moves the section cursor, resetting the detail scroll.
    pub fn go_to_section(&mut self, index: Option<usize>) {
        if let Some(index) = index {
            self.current_section_index = index;
            self.detail_scroll = 0;
        }
    }

    // --- Detail view ---

    /// Shows the full text of the selected section.
    pub fn enter_detail_view(&mut self) {
        if self.section_count() == 0 {
            return;
        }
        self.detail_scroll = 0;
        self.current_view = View::Detail;
    }

    /// Returns to the outline.
    pub fn exit_detail_view(&mut self) {
        self.current_view = View::Outline;
    }

    /// Scrolls the detail view down one line.
    pub fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    /// Scrolls the detail view up one line.
    pub fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    // --- Search ---

    /// Opens the search prompt, prefilled with the active query.
    pub fn start_search(&mut self) {
        if self.current_view != View::Search {
            self.previous_view = self.current_view;
        }
        self.search_buffer.clone_from(&self.query);
        self.current_view = View::Search;
        self.message = None;
    }

    /// Closes the search prompt without changing the active query.
    pub fn cancel_search(&mut self) {
        self.search_buffer.clear();
        self.current_view = self.previous_view;
    }

    /// Runs the typed query and jumps to the first match.
    ///
    /// Load failures and queries without matches produce different messages.
    pub fn submit_search(&mut self) {
        let query = std::mem::take(&mut self.search_buffer);
        self.current_view = self.previous_view;
        self.run_search(&query);
    }

    /// Runs a query against the selected title.
    pub fn run_search(&mut self, query: &str) {
        let (hits, message) = match self.session.search(query) {
            SearchOutcome::NotReady => (Vec::new(), Some("No title loaded".to_string())),
            SearchOutcome::LoadFailed(err) => {
                (Vec::new(), Some(format!("Cannot search, title failed to load: {err}")))
            }
            SearchOutcome::Results(results) => {
                let hits: Vec<SearchHit> = results
                    .into_iter()
                    .map(|result| SearchHit {
                        index: result.index,
                        spans: result.spans,
                    })
                    .collect();
                let message = if query.trim().is_empty() {
                    None
                } else if hits.is_empty() {
                    Some(format!("No matches for \"{query}\""))
                } else {
                    let matches: usize = hits.iter().map(|hit| hit.spans.len()).sum();
                    Some(format!(
                        "{matches} matches in {} sections for \"{query}\"",
                        hits.len()
                    ))
                };
                (hits, message)
            }
        };

        self.query = if hits.is_empty() {
            String::new()
        } else {
            query.to_string()
        };
        self.hits = hits;
        self.message = message;
        if let Some(first) = self.hits.first().map(|hit| hit.index) {
            self.go_to_section(Some(first));
        }
    }

    /// Drops the active query and its highlights.
    pub fn clear_search(&mut self) {
        self.query.clear();
        self.hits.clear();
        self.search_buffer.clear();
    }

    #[must_use]
    /// Finds the next matching section after the cursor, wrapping around.
    pub fn find_next_hit(&self) -> Option<usize> {
        self.hits
            .iter()
            .map(|hit| hit.index)
            .find(|&index| index > self.current_section_index)
            .or_else(|| self.hits.first().map(|hit| hit.index))
    }

    #[must_use]
    /// Finds the previous matching section before the cursor, wrapping around.
    pub fn find_prev_hit(&self) -> Option<usize> {
        self.hits
            .iter()
            .rev()
            .map(|hit| hit.index)
            .find(|&index| index < self.current_section_index)
            .or_else(|| self.hits.last().map(|hit| hit.index))
    }

    #[must_use]
    /// The search hit for a section, if it matches the active query.
    pub fn hit_for(&self, index: usize) -> Option<&SearchHit> {
        self.hits
            .binary_search_by_key(&index, |hit| hit.index)
            .ok()
            .map(|position| &self.hits[position])
    }

    #[must_use]
    /// The selected section's matches, ready for highlighting.
    pub fn current_result(&self) -> Option<SearchResult<'_>> {
        let hit = self.hit_for(self.current_section_index)?;
        let entry = self.outline()?.entry(hit.index)?;
        Some(SearchResult {
            index: entry.index,
            chapter: entry.chapter,
            section: entry.section,
            spans: hit.spans.clone(),
        })
    }

    #[must_use]
    /// Detail text width after accounting for borders.
    pub fn get_max_line_width(&self) -> usize {
        self.wrap_width.saturating_sub(2)
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
