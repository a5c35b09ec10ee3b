// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turning session state into terminal text.
//!
//! Pure functions from state to `String`; nothing here touches the session or
//! the network. What gets drawn depends only on the search slot and on whether
//! the cursor is past zero:
//!
//! | Search state | Drawn                                   |
//! |--------------|-----------------------------------------|
//! | `Idle`       | nothing                                 |
//! | `Loading`    | "Searching for …"                       |
//! | `Results`    | "Results: N" + numbered records, or "No results found" |
//! | `Failed`     | the error and a retry hint              |
//!
//! In the split layout the reader pane follows the result list.

use crate::cli::display::{
    error_line, hint, indent, section_bot, section_mid, section_top, themed, BLUE, BOLD, GREEN,
    ITALIC,
};
use crate::highlight::{Highlighter, Marks};
use crate::session::{Layout, QuerySession, ReaderState, SearchState};
use crate::types::{CorpusOffset, ResultSet};

/// Numbered, highlighted result list. `limit == 0` shows everything.
pub fn results(set: &ResultSet, marks: &Marks, limit: usize) -> String {
    let mut out = Vec::new();

    if set.is_empty() {
        out.push(section_top("No results found"));
        out.push(hint(&format!("  nothing matched '{}'", set.query().text)));
        out.push(section_bot());
        return out.join("\n");
    }

    let highlighter = Highlighter::for_query(set.query());
    let shown = if limit == 0 {
        set.len()
    } else {
        limit.min(set.len())
    };

    out.push(section_top(&format!("Results: {}", set.len())));
    for (index, record) in set.iter().take(shown).enumerate() {
        if index > 0 {
            out.push(hint("  ─ ─ ─"));
        }
        out.push(format!(
            "  {}",
            themed(GREEN, &[BOLD], &format!("Result # {}", index + 1))
        ));
        out.push(indent(
            &highlighter.highlight(record.excerpt.trim(), marks),
            "    ",
        ));
        if !record.location_title.is_empty() {
            out.push(format!(
                "    {}",
                themed(BLUE, &[ITALIC], &record.location_title)
            ));
        }
    }
    if shown < set.len() {
        out.push(hint(&format!("  … {} more", set.len() - shown)));
    }
    out.push(section_bot());
    out.join("\n")
}

/// The search slot, or `None` before the first query.
pub fn search_view(session: &QuerySession, marks: &Marks, limit: usize) -> Option<String> {
    match session.search_state() {
        SearchState::Idle => None,
        SearchState::Loading(query) => Some(hint(&format!("Searching for '{}'…", query.text))),
        SearchState::Results(set) => Some(results(set, marks, limit)),
        SearchState::Failed { query, error } => Some(format!(
            "{}\n{}",
            error_line(&format!("search for '{}' failed: {}", query.text, error)),
            hint("  type 'retry' to try again")
        )),
    }
}

/// Reader pane around `offset`.
pub fn reader(
    offset: CorpusOffset,
    state: &ReaderState,
    highlighter: &Highlighter,
    marks: &Marks,
) -> String {
    let mut out = vec![section_top(&format!("Reader @ {}", offset))];
    match state {
        ReaderState::Loading => out.push(hint("  Loading page…")),
        ReaderState::Ready(window) if window.is_empty() => {
            out.push(hint("  (end of text)"));
        }
        ReaderState::Ready(window) => {
            out.push(indent(&highlighter.highlight(&window.page_text, marks), "  "));
        }
        ReaderState::Failed(error) => {
            out.push(error_line(&format!("could not load page: {}", error)));
            out.push(hint("  type 'retry' to try again"));
        }
    }
    out.push(section_mid("prev · next · close"));
    out.push(section_bot());
    out.join("\n")
}

/// The reader pane, or `None` while browsing.
pub fn reader_view(session: &QuerySession, marks: &Marks) -> Option<String> {
    if !session.is_reading() {
        return None;
    }
    let state = session.reader_state()?;
    let highlighter = session
        .active_query()
        .map(Highlighter::for_query)
        .unwrap_or_else(|| Highlighter::new("", false, false));
    Some(reader(session.current_offset(), state, &highlighter, marks))
}

/// Everything the current layout shows.
pub fn view(session: &QuerySession, marks: &Marks, limit: usize) -> String {
    let mut parts = Vec::new();
    if let Some(search) = search_view(session, marks, limit) {
        parts.push(search);
    }
    if session.layout() == Layout::Split {
        if let Some(pane) = reader_view(session, marks) {
            parts.push(pane);
        }
    }
    parts.join("\n")
}
