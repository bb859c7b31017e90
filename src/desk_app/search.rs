//! Quick search box state.
//!
//! Typing restarts a quiet period; once it elapses the trimmed query is
//! dispatched (or the results cleared when it is shorter than two
//! characters). Each dispatch carries a generation number, but results are
//! applied whenever they arrive: a slow answer to an older query can still
//! overwrite a newer one.

use std::time::{Duration, Instant};

use crate::desk_app::api::ApiError;
use crate::shared::assurelog::SearchHit;

const MIN_QUERY_CHARS: usize = 2;

/// A query ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDispatch {
    pub generation: u64,
    pub query: String,
}

/// Keys the result list reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Down,
    Up,
    Enter,
    Escape,
}

#[derive(Debug)]
pub struct QuickSearch {
    pub query: String,
    results: Vec<SearchHit>,
    loading: bool,
    show_results: bool,
    selected_index: Option<usize>,
    debounce: Duration,
    edited_at: Option<Instant>,
    generation: u64,
}

impl QuickSearch {
    pub fn new(debounce: Duration) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            loading: false,
            show_results: false,
            selected_index: None,
            debounce,
            edited_at: None,
            generation: 0,
        }
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn shows_results(&self) -> bool {
        self.show_results
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// An edit is waiting for its quiet period
    pub fn has_pending_edit(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Replace the query text and restart the quiet period
    pub fn set_query(&mut self, query: impl Into<String>, now: Instant) {
        self.query = query.into();
        self.edited_at = Some(now);
    }

    /// Mark the query as edited in place (the UI edits `query` directly)
    pub fn touch(&mut self, now: Instant) {
        self.edited_at = Some(now);
    }

    /// Fire the pending query once the quiet period has passed
    pub fn poll(&mut self, now: Instant) -> Option<SearchDispatch> {
        let edited_at = self.edited_at?;
        if now.duration_since(edited_at) < self.debounce {
            return None;
        }
        self.edited_at = None;

        let query = self.query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            self.results.clear();
            self.show_results = false;
            return None;
        }

        self.generation += 1;
        self.loading = true;
        Some(SearchDispatch {
            generation: self.generation,
            query: query.to_string(),
        })
    }

    /// Apply the answer for a dispatched query
    pub fn apply_results(&mut self, generation: u64, result: Result<Vec<SearchHit>, ApiError>) {
        if generation == self.generation {
            self.loading = false;
        } else {
            // a newer query is still in flight
            tracing::debug!(generation, latest = self.generation, "applying stale search results");
        }
        match result {
            Ok(hits) => {
                self.results = hits;
                self.show_results = true;
                self.selected_index = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "quick search failed");
                self.results.clear();
            }
        }
    }

    /// Keyboard handling; returns the hit chosen with Enter
    pub fn handle_key(&mut self, key: SearchKey) -> Option<SearchHit> {
        if !self.show_results || self.results.is_empty() {
            return None;
        }
        let len = self.results.len();
        match key {
            SearchKey::Down => {
                self.selected_index = Some(self.selected_index.map_or(0, |i| (i + 1) % len));
                None
            }
            SearchKey::Up => {
                self.selected_index = Some(match self.selected_index {
                    None | Some(0) => len - 1,
                    Some(i) => i - 1,
                });
                None
            }
            SearchKey::Enter => match self.selected_index {
                Some(i) => self.select(i),
                None => None,
            },
            SearchKey::Escape => {
                self.show_results = false;
                None
            }
        }
    }

    /// Pick a hit: the box is cleared and closed
    pub fn select(&mut self, index: usize) -> Option<SearchHit> {
        let hit = self.results.get(index).cloned()?;
        self.query.clear();
        self.edited_at = None;
        self.show_results = false;
        self.selected_index = None;
        Some(hit)
    }

    /// Reopen the list on focus if there is anything to show
    pub fn focus(&mut self) {
        if !self.results.is_empty() {
            self.show_results = true;
        }
    }

    /// Close the list (click outside)
    pub fn dismiss(&mut self) {
        self.show_results = false;
    }
}
