// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search client for a corpus addressed as one flattened character stream.
//!
//! Submit a query, get ranked excerpts with the matches highlighted, open a
//! reader around any match and page through the surrounding text. Ranking,
//! indexing and storage live in the backend; this crate is the client-side
//! state machine and the terminal front end around it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │  types.rs   │──▶│  cursor.rs  │──▶│  session.rs  │  pure state, no I/O
//! │ (Query,     │   │ (forward,   │   │ (tickets,    │
//! │  ResultSet) │   │  backward)  │   │  generations)│
//! └─────────────┘   └─────────────┘   └──────┬───────┘
//!        │                                   │
//!        ▼                                   ▼
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │highlight.rs │──▶│  render.rs  │◀──│    app.rs    │  tokio event loop
//! └─────────────┘   └─────────────┘   └──────┬───────┘
//!                                            ▼
//!                                     ┌──────────────┐
//!                                     │  client.rs   │  reqwest, HTTP JSON
//!                                     └──────────────┘
//! ```
//!
//! # Modules
//!
//! | Module      | Responsibility                                        |
//! |-------------|-------------------------------------------------------|
//! | `types`     | Query, match records, result sets, reading windows    |
//! | `highlight` | Escaped, case/whole-word aware match marking          |
//! | `cursor`    | Page arithmetic and the browsing sentinel             |
//! | `session`   | Search/reader state machine, last-request-wins        |
//! | `client`    | `CorpusBackend` trait and the HTTP implementation     |
//! | `app`       | Interactive loop: commands in, outcomes applied       |
//! | `render`    | Session state to terminal text                        |
//! | `config`    | JSON file + environment configuration                 |
//! | `error`     | Error enums                                           |
//!
//! # Usage
//!
//! ```ignore
//! use lectern::{CorpusOffset, MatchRecord, Query, QuerySession};
//!
//! let mut session = QuerySession::new();
//! let ticket = session.submit_query(Query::new("love"))?;
//! let records = backend.search(ticket.query()).await;
//! session.complete_search(&ticket, records);
//!
//! let reader = session.select_result(CorpusOffset(980))?;
//! let page = backend.reader(reader.offset()).await;
//! session.complete_reading(&reader, page);
//! ```

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod cursor;
pub mod error;
pub mod highlight;
pub mod render;
pub mod session;
mod types;

pub use client::{CorpusBackend, HttpBackend};
pub use config::{load_config, ClientConfig};
pub use cursor::{backward, forward, NavigationCursor, NEAR_START, PAGE_SIZE};
pub use error::{ConfigError, SessionError, TransportError, ValidationError};
pub use highlight::{highlight, Highlighter, Marks};
pub use session::{
    Applied, Layout, QuerySession, ReaderState, ReaderTicket, SearchState, SearchTicket, Ticket,
};
pub use types::{CorpusOffset, MatchRecord, Query, ReadingWindow, ResultSet};
