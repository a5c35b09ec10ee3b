// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Reading position arithmetic.
//!
//! The cursor is one offset into the corpus stream. Zero means "browsing";
//! anything above zero means a reader window is open around that offset. The
//! paging functions never produce zero, so the only way back to browsing is an
//! explicit dismiss.
//!
//! ```text
//!   backward(c)                       forward(c)
//!   c <= 4000  → 2000                 c + 4000, clamped to the last offset
//!   c >  4000  → c - 4000             when the corpus length is known
//! ```
//!
//! # Boundary at exactly one page
//!
//! `backward(4000)` is `2000`, not `0`. Subtracting a full page would land on
//! the sentinel and silently close the reader, so the near-start branch is
//! inclusive.

use crate::types::CorpusOffset;

/// One page step in the corpus stream.
pub const PAGE_SIZE: usize = 4000;

/// Where backward paging stops near the start of the corpus. The reader window
/// for this offset already begins at offset 0.
pub const NEAR_START: usize = 2000;

/// Offset one page forward. Strictly increasing, saturating at `usize::MAX`.
#[inline]
pub fn forward(current: usize) -> usize {
    current.saturating_add(PAGE_SIZE)
}

/// Offset one page back, never reaching the browsing sentinel.
#[inline]
pub fn backward(current: usize) -> usize {
    if current <= PAGE_SIZE {
        NEAR_START
    } else {
        current - PAGE_SIZE
    }
}

/// The session's reading position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationCursor {
    current: CorpusOffset,
    corpus_len: Option<usize>,
}

impl NavigationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor that clamps forward paging to `corpus_len - 1`.
    pub fn with_corpus_len(corpus_len: Option<usize>) -> Self {
        NavigationCursor {
            current: CorpusOffset::ZERO,
            corpus_len: corpus_len.filter(|len| *len > 0),
        }
    }

    pub fn offset(&self) -> CorpusOffset {
        self.current
    }

    pub fn is_reading(&self) -> bool {
        !self.current.is_zero()
    }

    pub fn corpus_len(&self) -> Option<usize> {
        self.corpus_len
    }

    /// Open the reader at a match offset.
    ///
    /// A match at offset 0 opens at `NEAR_START` since 0 is the sentinel.
    pub fn select(&mut self, offset: CorpusOffset) -> CorpusOffset {
        let target = if offset.is_zero() {
            NEAR_START
        } else {
            offset.get()
        };
        self.current = CorpusOffset(self.clamp(target));
        self.current
    }

    /// Back to browsing.
    pub fn dismiss(&mut self) {
        self.current = CorpusOffset::ZERO;
    }

    /// Step forward. `None` when browsing or already on the last page.
    pub fn page_forward(&mut self) -> Option<CorpusOffset> {
        if !self.is_reading() {
            return None;
        }
        let next = self.clamp(forward(self.current.get()));
        self.move_to(next)
    }

    /// Step backward. `None` when browsing or already parked at `NEAR_START`.
    pub fn page_backward(&mut self) -> Option<CorpusOffset> {
        if !self.is_reading() {
            return None;
        }
        let next = self.clamp(backward(self.current.get()));
        self.move_to(next)
    }

    fn move_to(&mut self, next: usize) -> Option<CorpusOffset> {
        if next == self.current.get() {
            return None;
        }
        self.current = CorpusOffset(next);
        Some(self.current)
    }

    fn clamp(&self, offset: usize) -> usize {
        match self.corpus_len {
            Some(len) => offset.min(len - 1).max(1),
            None => offset,
        }
    }
}
