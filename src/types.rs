// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The vocabulary shared by every other module.
//!
//! A query goes out, a ranked list of match records comes back, and picking
//! one of them pulls a reading window out of the corpus stream. These types
//! carry that data between the session, the backend client and the renderer.
//!
//! # Wire names
//!
//! | Rust type       | Backend JSON                              |
//! |-----------------|-------------------------------------------|
//! | `MatchRecord`   | `{ "Index", "Result", "LocationTitle" }`  |
//! | `ReadingWindow` | `{ "Idx", "PageText" }`                   |
//!
//! # Invariants
//!
//! - **Query**: `text` is non-empty (after trimming) before it is sent anywhere.
//!   `Query::validate` is the only gate; the session calls it on every submit.
//!
//! - **ResultSet**: records keep backend order. Nothing re-sorts them, and the
//!   1-based position shown to the user is the index into that order plus one.
//!
//! - **CorpusOffset**: an absolute position in the flattened corpus stream.
//!   Zero is a legal record offset but, held by the navigation cursor, it means
//!   "browsing, nothing open".

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

// =============================================================================
// NEWTYPES
// =============================================================================

/// Absolute position in the flattened corpus stream.
///
/// Prevents mixing up a corpus offset with a 1-based result position, which
/// are both plain integers on the command line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct CorpusOffset(pub usize);

impl CorpusOffset {
    /// The browsing sentinel.
    pub const ZERO: CorpusOffset = CorpusOffset(0);

    /// Get the underlying value.
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<usize> for CorpusOffset {
    fn from(offset: usize) -> Self {
        CorpusOffset(offset)
    }
}

impl From<CorpusOffset> for usize {
    fn from(offset: CorpusOffset) -> Self {
        offset.0
    }
}

impl fmt::Display for CorpusOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// QUERY
// =============================================================================

/// What the user asked for, plus the two match toggles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub match_case: bool,
    pub whole_word: bool,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Query {
            text: text.into(),
            match_case: false,
            whole_word: false,
        }
    }

    pub fn match_case(mut self, on: bool) -> Self {
        self.match_case = on;
        self
    }

    pub fn whole_word(mut self, on: bool) -> Self {
        self.whole_word = on;
        self
    }

    /// Reject queries that must never reach the backend.
    ///
    /// Whitespace-only text counts as empty: the backend would match every
    /// space in the corpus.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(())
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Where the match starts in the corpus stream; the key for reader requests.
    #[serde(rename = "Index")]
    pub offset: CorpusOffset,
    /// Raw excerpt around the match. Highlighting happens client-side.
    #[serde(rename = "Result")]
    pub excerpt: String,
    /// Human-readable source label (work title).
    #[serde(rename = "LocationTitle", default)]
    pub location_title: String,
}

/// The ranked records returned for a single query.
///
/// Built once per completed search and replaced wholesale by the next one.
/// An empty set is a real answer ("no results found"), distinct from the
/// session having no result set at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    query: Query,
    records: Vec<MatchRecord>,
}

impl ResultSet {
    pub fn new(query: Query, records: Vec<MatchRecord>) -> Self {
        ResultSet { query, records }
    }

    /// The query that produced these records (used for highlighting).
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    /// Record at a 1-based position, as numbered on screen.
    pub fn get(&self, position: usize) -> Option<&MatchRecord> {
        position
            .checked_sub(1)
            .and_then(|index| self.records.get(index))
    }

    pub fn find_by_offset(&self, offset: CorpusOffset) -> Option<&MatchRecord> {
        self.records.iter().find(|record| record.offset == offset)
    }

    pub fn contains_offset(&self, offset: CorpusOffset) -> bool {
        self.find_by_offset(offset).is_some()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a MatchRecord;
    type IntoIter = std::slice::Iter<'a, MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// =============================================================================
// READING WINDOW
// =============================================================================

/// A page of corpus text around `center`. Fetched fresh on every move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingWindow {
    pub center: CorpusOffset,
    pub page_text: String,
}

impl ReadingWindow {
    pub fn new(center: CorpusOffset, page_text: impl Into<String>) -> Self {
        ReadingWindow {
            center,
            page_text: page_text.into(),
        }
    }

    /// Past the end of the corpus the backend hands back an empty page.
    pub fn is_empty(&self) -> bool {
        self.page_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(offset: usize, excerpt: &str) -> MatchRecord {
        MatchRecord {
            offset: CorpusOffset(offset),
            excerpt: excerpt.to_string(),
            location_title: "THE TEMPEST".to_string(),
        }
    }

    #[test]
    fn empty_and_blank_queries_fail_validation() {
        assert_eq!(Query::new("").validate(), Err(ValidationError::EmptyQuery));
        assert_eq!(
            Query::new("  \t").validate(),
            Err(ValidationError::EmptyQuery)
        );
        assert!(Query::new("love").validate().is_ok());
    }

    #[test]
    fn result_positions_are_one_based() {
        let set = ResultSet::new(
            Query::new("love"),
            vec![record(120, "a"), record(980, "b")],
        );
        assert!(set.get(0).is_none());
        assert_eq!(set.get(1).map(|r| r.offset), Some(CorpusOffset(120)));
        assert_eq!(set.get(2).map(|r| r.offset), Some(CorpusOffset(980)));
        assert!(set.get(3).is_none());
    }

    #[test]
    fn match_record_reads_backend_field_names() {
        let json = r#"{"Index": 980, "Result": "Love thy neighbor", "LocationTitle": "KING LEAR"}"#;
        let parsed: MatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.offset, CorpusOffset(980));
        assert_eq!(parsed.excerpt, "Love thy neighbor");
        assert_eq!(parsed.location_title, "KING LEAR");
    }

    #[test]
    fn missing_location_title_defaults_to_empty() {
        let json = r#"{"Index": 5, "Result": "x"}"#;
        let parsed: MatchRecord = serde_json::from_str(json).unwrap();
        assert!(parsed.location_title.is_empty());
    }
}
