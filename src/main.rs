// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectern::app::App;
use lectern::cli::display::{error_line, highlight_marks};
use lectern::cli::{Cli, Commands};
use lectern::{
    load_config, render, CorpusBackend, CorpusOffset, Highlighter, HttpBackend,
    NavigationCursor, Query, QuerySession, ReaderState, SearchState,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logs go to stderr so they never interleave with rendered output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{}", error_line(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    tracing::info!("Using backend {}", config.base_url);

    let backend = HttpBackend::from_config(&config)?;
    let cursor = NavigationCursor::with_corpus_len(config.corpus_len);

    match cli.command.unwrap_or(Commands::Interactive { limit: 0 }) {
        Commands::Search {
            query,
            match_case,
            whole_word,
            limit,
        } => {
            let query = Query::new(query)
                .match_case(match_case)
                .whole_word(whole_word);
            run_search(&backend, cursor, query, limit).await
        }
        Commands::Read { offset, highlight } => {
            run_read(&backend, CorpusOffset(offset), highlight.as_deref()).await
        }
        Commands::Interactive { limit } => {
            let session = QuerySession::with_cursor(cursor);
            let app = App::new(
                Arc::new(backend),
                session,
                std::io::stdout(),
                highlight_marks(),
            )
            .with_limit(limit);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            app.run(stdin).await?;
            Ok(())
        }
    }
}

/// One-shot search: same session path as the interactive loop, printed once.
async fn run_search(
    backend: &HttpBackend,
    cursor: NavigationCursor,
    query: Query,
    limit: usize,
) -> Result<()> {
    let mut session = QuerySession::with_cursor(cursor);
    let ticket = session.submit_query(query)?;
    let outcome = backend.search(ticket.query()).await;
    session.complete_search(&ticket, outcome);

    if let SearchState::Failed { error, .. } = session.search_state() {
        anyhow::bail!("search failed: {}", error);
    }
    if let Some(view) = render::search_view(&session, &highlight_marks(), limit) {
        println!("{}", view);
    }
    Ok(())
}

/// One-shot page print around an offset.
async fn run_read(
    backend: &HttpBackend,
    offset: CorpusOffset,
    highlight: Option<&str>,
) -> Result<()> {
    let window = backend
        .reader(offset)
        .await
        .with_context(|| format!("could not load page at {}", offset))?;
    let highlighter = Highlighter::new(highlight.unwrap_or(""), false, false);
    let pane = render::reader(
        offset,
        &ReaderState::Ready(window),
        &highlighter,
        &highlight_marks(),
    );
    println!("{}", pane);
    Ok(())
}
