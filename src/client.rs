// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search backend, as seen from the client.
//!
//! Two read-only endpoints, both JSON over HTTP GET:
//!
//! | Endpoint                                      | Response                                  |
//! |-----------------------------------------------|-------------------------------------------|
//! | `/search?q=…&match-case=…&whole-word=…`       | `[{ Index, Result, LocationTitle }, …]`   |
//! | `/reader?idx=…`                               | `{ Idx, PageText }`                       |
//!
//! [`CorpusBackend`] is the seam: the event loop only knows the trait, the
//! binary plugs in [`HttpBackend`], tests plug in scripted backends.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use crate::types::{CorpusOffset, MatchRecord, Query, ReadingWindow};

/// Anything that can answer search and reader requests.
#[async_trait]
pub trait CorpusBackend: Send + Sync {
    async fn search(&self, query: &Query) -> Result<Vec<MatchRecord>, TransportError>;

    async fn reader(&self, offset: CorpusOffset) -> Result<ReadingWindow, TransportError>;
}

/// reqwest-backed client for the HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    /// Client rooted at `base` with a per-request timeout.
    ///
    /// A base without a trailing slash gets one, so `http://host/api` resolves
    /// `search` to `http://host/api/search` rather than `http://host/search`.
    pub fn new(mut base: Url, timeout: Duration) -> Result<Self, TransportError> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::from)?;

        Ok(HttpBackend { client, base })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base = config.base_url()?;
        HttpBackend::new(base, config.timeout()).map_err(|err| ConfigError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: err.to_string(),
        })
    }

    /// `/search` URL with the query text and both toggles encoded.
    pub fn search_url(&self, query: &Query) -> Result<Url, TransportError> {
        let mut url = self.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("q", &query.text)
            .append_pair("match-case", bool_param(query.match_case))
            .append_pair("whole-word", bool_param(query.whole_word));
        Ok(url)
    }

    /// `/reader` URL for one offset.
    pub fn reader_url(&self, offset: CorpusOffset) -> Result<Url, TransportError> {
        let mut url = self.endpoint("reader")?;
        url.query_pairs_mut()
            .append_pair("idx", &offset.get().to_string());
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path)
            .map_err(|err| TransportError::InvalidUrl(err.to_string()))
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, TransportError> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await.map_err(|err| {
            warn!("GET {} failed: {}", url, err);
            TransportError::from(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GET {} returned {}", url, status);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(TransportError::from)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl CorpusBackend for HttpBackend {
    async fn search(&self, query: &Query) -> Result<Vec<MatchRecord>, TransportError> {
        let url = self.search_url(query)?;
        let bytes = self.get_bytes(url).await?;
        parse_results(&bytes)
    }

    async fn reader(&self, offset: CorpusOffset) -> Result<ReadingWindow, TransportError> {
        let url = self.reader_url(offset)?;
        let bytes = self.get_bytes(url).await?;
        parse_page(&bytes, offset)
    }
}

fn bool_param(on: bool) -> &'static str {
    if on {
        "true"
    } else {
        "false"
    }
}

// =============================================================================
// RESPONSE DECODING
// =============================================================================

#[derive(Deserialize)]
struct PagePayload {
    #[serde(rename = "Idx", default)]
    idx: Option<usize>,
    #[serde(rename = "PageText", default)]
    page_text: String,
}

/// Decode a `/search` body. `null` (a nil slice on the server) means no hits.
pub fn parse_results(bytes: &[u8]) -> Result<Vec<MatchRecord>, TransportError> {
    let records: Option<Vec<MatchRecord>> = serde_json::from_slice(bytes)?;
    Ok(records.unwrap_or_default())
}

/// Decode a `/reader` body for the requested offset.
///
/// The window is always centered on `requested`; the echoed `Idx` is only
/// checked. A missing or empty `PageText` past the corpus end is an empty
/// window, not an error.
pub fn parse_page(bytes: &[u8], requested: CorpusOffset) -> Result<ReadingWindow, TransportError> {
    let payload: PagePayload = serde_json::from_slice(bytes)?;
    if let Some(idx) = payload.idx {
        if idx != requested.get() {
            debug!("reader echoed idx {} for request {}", idx, requested);
        }
    }
    Ok(ReadingWindow::new(requested, payload.page_text))
}
