// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the lectern command-line interface.
//!
//! Three subcommands: `search` for a one-shot query, `read` to print the page
//! around an offset, and `interactive` (the default) for the full
//! search/open/page loop. Connection flags are global so they work with all of
//! them.

pub mod display;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lectern",
    about = "Search a corpus and read matches in context",
    version
)]
pub struct Cli {
    /// Base URL of the search backend (overrides config and LECTERN_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to a JSON config file (default: ./lectern.json if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one search and print the highlighted results
    Search {
        /// Search query
        query: String,

        /// Only match the exact casing of the query
        #[arg(long)]
        match_case: bool,

        /// Only match the query as a whole word
        #[arg(long)]
        whole_word: bool,

        /// Maximum number of results to print (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Print the page of text around a corpus offset
    Read {
        /// Absolute offset into the corpus stream
        offset: usize,

        /// Highlight this text in the page
        #[arg(long)]
        highlight: Option<String>,
    },

    /// Interactive session: search, open results, page through the text
    Interactive {
        /// Maximum number of results to draw per search (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },
}
