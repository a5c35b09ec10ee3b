// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Match highlighting for excerpts and reader pages.
//!
//! The backend returns raw text; marking up the matches is our job. The user's
//! query is taken literally: every character is escaped before it becomes a
//! pattern, so `to be?` or `(exit)` highlight exactly those characters instead
//! of blowing up the regex compiler or matching something else.
//!
//! Two toggles shape the pattern:
//!
//! | Toggle       | Effect                                        |
//! |--------------|-----------------------------------------------|
//! | `match_case` | off → case-insensitive comparison             |
//! | `whole_word` | on  → ASCII `\b` anchors on both sides        |
//!
//! The anchors are ASCII word boundaries (`(?-u:\b)`), the same ones the
//! search backend uses: accented letters count as non-word characters, so a
//! whole-word hit for `caf` inside `café` is highlighted where it was found.

use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// Opening and closing markers wrapped around each match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marks {
    pub open: String,
    pub close: String,
}

impl Marks {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Marks {
            open: open.into(),
            close: close.into(),
        }
    }

    /// `<mark>…</mark>`, the markup the web client used.
    pub fn html() -> Self {
        Marks::new("<mark>", "</mark>")
    }

    /// `[…]`, for plain-text output where colour is unavailable.
    pub fn brackets() -> Self {
        Marks::new("[", "]")
    }
}

impl Default for Marks {
    fn default() -> Self {
        Marks::html()
    }
}

/// A compiled highlight pattern for one query.
///
/// Build once per result set and reuse it for every excerpt and every reader
/// page; compiling a regex per excerpt is measurable on large result sets.
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    /// Compile the pattern for `query`.
    ///
    /// An empty query yields a highlighter that never matches. With the query
    /// escaped the pattern always compiles; the `None` fallback only covers the
    /// regex size limit on absurdly long input.
    pub fn new(query: &str, match_case: bool, whole_word: bool) -> Self {
        if query.is_empty() {
            return Highlighter { pattern: None };
        }

        let escaped = regex::escape(query);
        let source = if whole_word {
            format!(r"(?-u:\b){}(?-u:\b)", escaped)
        } else {
            escaped
        };

        let pattern = RegexBuilder::new(&source)
            .case_insensitive(!match_case)
            .build()
            .map_err(|err| tracing::warn!("highlight pattern rejected: {}", err))
            .ok();

        Highlighter { pattern }
    }

    /// Highlighter for the toggles carried by a query.
    pub fn for_query(query: &crate::Query) -> Self {
        Highlighter::new(&query.text, query.match_case, query.whole_word)
    }

    /// Byte ranges of every non-overlapping match, left to right.
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        match &self.pattern {
            Some(pattern) => pattern.find_iter(text).map(|m| m.range()).collect(),
            None => Vec::new(),
        }
    }

    /// Wrap every match in `marks`. Unmatched text passes through untouched.
    pub fn highlight(&self, text: &str, marks: &Marks) -> String {
        let spans = self.spans(text);
        if spans.is_empty() {
            return text.to_string();
        }

        let extra = spans.len() * (marks.open.len() + marks.close.len());
        let mut out = String::with_capacity(text.len() + extra);
        let mut last = 0;
        for span in spans {
            out.push_str(&text[last..span.start]);
            out.push_str(&marks.open);
            out.push_str(&text[span.clone()]);
            out.push_str(&marks.close);
            last = span.end;
        }
        out.push_str(&text[last..]);
        out
    }
}

/// One-shot highlight with `<mark>` markers and no whole-word anchoring.
pub fn highlight(text: &str, query: &str, match_case: bool) -> String {
    Highlighter::new(query, match_case, false).highlight(text, &Marks::html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_marks_every_casing() {
        let out = highlight("Love thy neighbor, love thy LOVE", "love", false);
        assert_eq!(
            out,
            "<mark>Love</mark> thy neighbor, <mark>love</mark> thy <mark>LOVE</mark>"
        );
    }

    #[test]
    fn match_case_only_marks_exact_casing() {
        let out = highlight("Love thy neighbor, love", "love", true);
        assert_eq!(out, "Love thy neighbor, <mark>love</mark>");
    }

    #[test]
    fn special_characters_match_literally() {
        assert_eq!(
            highlight("what (exit) means", "(exit)", false),
            "what <mark>(exit)</mark> means"
        );
        assert_eq!(highlight("a.b axb", "a.b", false), "<mark>a.b</mark> axb");
        assert_eq!(highlight("to be? or", "be?", false), "to <mark>be?</mark> or");
        assert_eq!(highlight("no stars here", "*", false), "no stars here");
    }

    #[test]
    fn whole_word_skips_embedded_matches() {
        let h = Highlighter::new("love", false, true);
        let out = h.highlight("lovely love, beloved Love", &Marks::brackets());
        assert_eq!(out, "lovely [love], beloved [Love]");
    }

    #[test]
    fn whole_word_boundaries_are_ascii() {
        let h = Highlighter::new("caf", false, true);
        assert_eq!(h.highlight("café au lait", &Marks::brackets()), "[caf]é au lait");
        assert_eq!(h.highlight("cafe", &Marks::brackets()), "cafe");
    }

    #[test]
    fn empty_query_is_a_no_op() {
        assert_eq!(highlight("anything", "", false), "anything");
        assert!(Highlighter::new("", true, true).spans("abc").is_empty());
    }

    #[test]
    fn spans_are_non_overlapping() {
        let h = Highlighter::new("aa", true, false);
        assert_eq!(h.spans("aaaaa"), vec![0..2, 2..4]);
    }

    #[test]
    fn multibyte_text_keeps_char_boundaries() {
        let out = highlight("ALL’S WELL THAT ENDS WELL", "well", false);
        assert_eq!(out, "ALL’S <mark>WELL</mark> THAT ENDS <mark>WELL</mark>");
    }
}
