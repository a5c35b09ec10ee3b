// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The query/result/navigation state machine.
//!
//! The session never talks to the network. Every operation that needs the
//! backend hands out a ticket; whoever performs the request brings the outcome
//! back with the ticket attached. Each slot (search, reader) keeps a generation
//! counter and only the newest ticket of a slot may change state. Anything
//! older is reported as [`Applied::Stale`] and dropped, so a slow response can
//! never overwrite a newer one.
//!
//! ```text
//!             submit_query                complete_search(ok)
//!   Idle ───────────────────▶ Loading ───────────────────────▶ Results(set)
//!                               ▲   │ complete_search(err)          │
//!                               │   └──────────────────▶ Failed ────┤
//!                               └──────── submit_query ─────────────┘
//!
//!   Browsing ──select_result──▶ Reading(offset) ──page_*──▶ Reading(offset')
//!       ▲                              │
//!       └───── dismiss_reading ────────┘      (submit_query also exits)
//! ```

use tracing::debug;

use crate::cursor::NavigationCursor;
use crate::error::{SessionError, TransportError, ValidationError};
use crate::types::{CorpusOffset, MatchRecord, Query, ReadingWindow, ResultSet};

// =============================================================================
// STATE
// =============================================================================

/// Where the search slot stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchState {
    /// No query submitted yet. Nothing is rendered.
    #[default]
    Idle,
    /// A search request is in flight.
    Loading(Query),
    /// The latest search completed; the set may be empty.
    Results(ResultSet),
    /// The latest search failed. The query is kept for `retry`.
    Failed { query: Query, error: TransportError },
}

/// Where the reader slot stands while a window is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderState {
    Loading,
    Ready(ReadingWindow),
    Failed(TransportError),
}

/// How the UI should lay out the results and reader panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    FullWidth,
    Split,
}

// =============================================================================
// TICKETS
// =============================================================================

/// Permission to run one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: Query,
}

impl SearchTicket {
    pub fn query(&self) -> &Query {
        &self.query
    }
}

/// Permission to run one reader request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderTicket {
    generation: u64,
    offset: CorpusOffset,
}

impl ReaderTicket {
    pub fn offset(&self) -> CorpusOffset {
        self.offset
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ticket {
    Search(SearchTicket),
    Reader(ReaderTicket),
}

/// Whether a completed request changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

// =============================================================================
// SESSION
// =============================================================================

/// Owns the current query, result set, reader state and cursor.
#[derive(Debug, Clone, Default)]
pub struct QuerySession {
    search: SearchState,
    reader: Option<ReaderState>,
    cursor: NavigationCursor,
    search_generation: u64,
    reader_generation: u64,
}

impl QuerySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose forward paging stops at the last corpus offset.
    pub fn with_cursor(cursor: NavigationCursor) -> Self {
        QuerySession {
            cursor,
            ..Self::default()
        }
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    /// The result set of the last completed search, if any.
    pub fn results(&self) -> Option<&ResultSet> {
        match &self.search {
            SearchState::Results(set) => Some(set),
            _ => None,
        }
    }

    /// The query currently driving highlighting: in flight, shown or failed.
    pub fn active_query(&self) -> Option<&Query> {
        match &self.search {
            SearchState::Idle => None,
            SearchState::Loading(query) => Some(query),
            SearchState::Results(set) => Some(set.query()),
            SearchState::Failed { query, .. } => Some(query),
        }
    }

    pub fn reader_state(&self) -> Option<&ReaderState> {
        self.reader.as_ref()
    }

    pub fn cursor(&self) -> &NavigationCursor {
        &self.cursor
    }

    pub fn current_offset(&self) -> CorpusOffset {
        self.cursor.offset()
    }

    pub fn is_reading(&self) -> bool {
        self.cursor.is_reading()
    }

    pub fn layout(&self) -> Layout {
        if self.cursor.is_reading() {
            Layout::Split
        } else {
            Layout::FullWidth
        }
    }

    // -------------------------------------------------------------------------
    // Search slot
    // -------------------------------------------------------------------------

    /// Start a new search. Always leaves reading mode.
    ///
    /// Both generations move on: the old search and any reader request issued
    /// against the old results are now stale.
    pub fn submit_query(&mut self, query: Query) -> Result<SearchTicket, ValidationError> {
        query.validate()?;

        self.search_generation += 1;
        self.close_reader();
        self.search = SearchState::Loading(query.clone());

        debug!(
            generation = self.search_generation,
            query = %query.text,
            "search issued"
        );
        Ok(SearchTicket {
            generation: self.search_generation,
            query,
        })
    }

    /// Apply the outcome of a search request.
    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<MatchRecord>, TransportError>,
    ) -> Applied {
        if ticket.generation != self.search_generation {
            debug!(
                generation = ticket.generation,
                current = self.search_generation,
                "stale search response discarded"
            );
            return Applied::Stale;
        }

        self.search = match outcome {
            Ok(records) => SearchState::Results(ResultSet::new(ticket.query.clone(), records)),
            Err(error) => SearchState::Failed {
                query: ticket.query.clone(),
                error,
            },
        };
        Applied::Applied
    }

    // -------------------------------------------------------------------------
    // Reader slot
    // -------------------------------------------------------------------------

    /// Open the reader at a record of the current result set.
    pub fn select_result(&mut self, offset: CorpusOffset) -> Result<ReaderTicket, SessionError> {
        let set = self.results().ok_or(SessionError::NoResults)?;
        if !set.contains_offset(offset) {
            return Err(SessionError::UnknownOffset(offset.get()));
        }

        let target = self.cursor.select(offset);
        Ok(self.issue_reader(target))
    }

    /// Open the reader at a 1-based result number.
    pub fn select_position(&mut self, position: usize) -> Result<ReaderTicket, SessionError> {
        let set = self.results().ok_or(SessionError::NoResults)?;
        let offset = set
            .get(position)
            .map(|record| record.offset)
            .ok_or(SessionError::UnknownPosition {
                position,
                len: set.len(),
            })?;
        self.select_result(offset)
    }

    /// Close the reader. The result set is left alone.
    pub fn dismiss_reading(&mut self) {
        self.close_reader();
    }

    pub fn page_forward(&mut self) -> Option<ReaderTicket> {
        let next = self.cursor.page_forward()?;
        Some(self.issue_reader(next))
    }

    pub fn page_backward(&mut self) -> Option<ReaderTicket> {
        let next = self.cursor.page_backward()?;
        Some(self.issue_reader(next))
    }

    /// Apply the outcome of a reader request.
    pub fn complete_reading(
        &mut self,
        ticket: &ReaderTicket,
        outcome: Result<ReadingWindow, TransportError>,
    ) -> Applied {
        if ticket.generation != self.reader_generation || !self.cursor.is_reading() {
            debug!(
                generation = ticket.generation,
                current = self.reader_generation,
                offset = %ticket.offset,
                "stale reader response discarded"
            );
            return Applied::Stale;
        }

        self.reader = Some(match outcome {
            Ok(window) => ReaderState::Ready(window),
            Err(error) => ReaderState::Failed(error),
        });
        Applied::Applied
    }

    // -------------------------------------------------------------------------
    // Recovery
    // -------------------------------------------------------------------------

    /// Re-issue whichever request last failed.
    ///
    /// A failed reader page takes priority since it is what the user is
    /// looking at. Returns `None` when nothing has failed.
    pub fn retry(&mut self) -> Option<Ticket> {
        if let Some(ReaderState::Failed(_)) = self.reader {
            let offset = self.cursor.offset();
            return Some(Ticket::Reader(self.issue_reader(offset)));
        }

        if let SearchState::Failed { query, .. } = &self.search {
            let query = query.clone();
            // Already validated when first submitted.
            return self.submit_query(query).ok().map(Ticket::Search);
        }

        None
    }

    fn issue_reader(&mut self, offset: CorpusOffset) -> ReaderTicket {
        self.reader_generation += 1;
        self.reader = Some(ReaderState::Loading);
        debug!(
            generation = self.reader_generation,
            offset = %offset,
            "reader issued"
        );
        ReaderTicket {
            generation: self.reader_generation,
            offset,
        }
    }

    fn close_reader(&mut self) {
        self.reader_generation += 1;
        self.reader = None;
        self.cursor.dismiss();
    }
}
