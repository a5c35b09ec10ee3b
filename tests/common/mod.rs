//! Shared test utilities and fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use lectern::{CorpusBackend, CorpusOffset, MatchRecord, Query, ReadingWindow, TransportError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Half a reader window, as served by the corpus backend.
pub const HALF_PAGE: usize = 2000;

pub fn record(offset: usize, excerpt: &str, title: &str) -> MatchRecord {
    MatchRecord {
        offset: CorpusOffset(offset),
        excerpt: excerpt.to_string(),
        location_title: title.to_string(),
    }
}

/// The two "love" hits used by the scenario tests.
pub fn love_records() -> Vec<MatchRecord> {
    vec![
        record(120, "Love thy neighbor", "THE SONNETS"),
        record(980, "and love, and love", "THE TRAGEDY OF KING LEAR"),
    ]
}

/// In-memory backend with canned answers, optional delays and a call log.
///
/// Reader pages are cut from a synthetic corpus the way the real server does
/// it: `[offset - 2000, offset + 2000)`, clamped, empty past the end.
pub struct ScriptedBackend {
    answers: HashMap<String, Vec<MatchRecord>>,
    delays: HashMap<String, Duration>,
    corpus: String,
    fail_search: Mutex<Option<TransportError>>,
    fail_reader: Mutex<Option<TransportError>>,
    search_calls: Mutex<Vec<Query>>,
    reader_calls: Mutex<Vec<usize>>,
}

impl ScriptedBackend {
    pub fn new(corpus_len: usize) -> Self {
        let corpus = "love and war. "
            .chars()
            .cycle()
            .take(corpus_len)
            .collect();
        ScriptedBackend {
            answers: HashMap::new(),
            delays: HashMap::new(),
            corpus,
            fail_search: Mutex::new(None),
            fail_reader: Mutex::new(None),
            search_calls: Mutex::new(Vec::new()),
            reader_calls: Mutex::new(Vec::new()),
        }
    }

    /// Backend answering "love" with [`love_records`].
    pub fn shakespeare() -> Self {
        ScriptedBackend::new(50_000).answer("love", love_records())
    }

    pub fn answer(mut self, text: &str, records: Vec<MatchRecord>) -> Self {
        self.answers.insert(text.to_string(), records);
        self
    }

    pub fn delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }

    /// Fail the next search with `error`.
    pub fn fail_next_search(&self, error: TransportError) {
        *self.fail_search.lock().unwrap() = Some(error);
    }

    /// Fail the next reader request with `error`.
    pub fn fail_next_reader(&self, error: TransportError) {
        *self.fail_reader.lock().unwrap() = Some(error);
    }

    pub fn search_calls(&self) -> Vec<Query> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn reader_calls(&self) -> Vec<usize> {
        self.reader_calls.lock().unwrap().clone()
    }

    fn page(&self, offset: usize) -> String {
        let start = offset.saturating_sub(HALF_PAGE);
        let end = (offset + HALF_PAGE).min(self.corpus.len());
        if start >= end {
            return String::new();
        }
        self.corpus[start..end].to_string()
    }
}

#[async_trait]
impl CorpusBackend for ScriptedBackend {
    async fn search(&self, query: &Query) -> Result<Vec<MatchRecord>, TransportError> {
        self.search_calls.lock().unwrap().push(query.clone());
        if let Some(delay) = self.delays.get(&query.text) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(error) = self.fail_search.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.answers.get(&query.text).cloned().unwrap_or_default())
    }

    async fn reader(&self, offset: CorpusOffset) -> Result<ReadingWindow, TransportError> {
        self.reader_calls.lock().unwrap().push(offset.get());
        if let Some(error) = self.fail_reader.lock().unwrap().take() {
            return Err(error);
        }
        Ok(ReadingWindow::new(offset, self.page(offset.get())))
    }
}
