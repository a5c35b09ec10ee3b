// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types, one enum per concern.
//!
//! | Error             | Raised by            | Recovery                          |
//! |-------------------|----------------------|-----------------------------------|
//! | `ValidationError` | `Query::validate`    | fix the input; nothing was sent   |
//! | `TransportError`  | `client`             | slot goes to `Failed`, `retry`    |
//! | `SessionError`    | `QuerySession`       | command rejected, state untouched |
//! | `ConfigError`     | `config`             | fatal at startup                  |
//!
//! Stale responses are not errors. They come back as `Applied::Stale` from the
//! session and are dropped.

use thiserror::Error;

/// Input rejected before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a search query")]
    EmptyQuery,
}

/// A backend call that did not produce a usable answer.
///
/// Carries strings rather than the underlying `reqwest::Error` so the session
/// can keep the failure in its state and compare it in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Decode(err.to_string())
    }
}

/// A session operation that was refused. The session state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no results to select from")]
    NoResults,

    #[error("offset {0} is not one of the current results")]
    UnknownOffset(usize),

    #[error("result #{position} does not exist (have {len})")]
    UnknownPosition { position: usize, len: usize },
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid value for {key}: '{value}'")]
    InvalidOverride { key: String, value: String },
}
