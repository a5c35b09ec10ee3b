// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The interactive event loop.
//!
//! One task reads commands from stdin while backend calls run as spawned
//! tasks. Their outcomes come back over a channel and go through the session,
//! which drops anything superseded. When a slot is superseded we also abort
//! the task that was serving it, so a slow request stops costing bandwidth;
//! the session check still catches a result that was already in the channel.
//!
//! ```text
//!   stdin ──parse_command──▶ execute ──ticket──▶ spawn(backend call)
//!                                                      │
//!   render ◀── apply ◀──────── mpsc::Receiver ◀────────┘
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cli::display::{error_line, hint};
use crate::client::CorpusBackend;
use crate::error::TransportError;
use crate::highlight::Marks;
use crate::render;
use crate::session::{Applied, QuerySession, ReaderTicket, SearchTicket, Ticket};
use crate::types::{MatchRecord, Query, ReadingWindow};

const HELP: &str = "\
commands:
  search <text>   run a query (also: /<text>)
  case            toggle match case
  word            toggle whole word
  open <n>        read around result n (also: just <n>)
  next, prev      page the reader forward / backward
  close           close the reader
  retry           re-run the last failed request
  results         show the current view again
  help            this text
  quit            leave";

// =============================================================================
// COMMANDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    ToggleCase,
    ToggleWord,
    Open(usize),
    Next,
    Prev,
    Close,
    Retry,
    Results,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("'{0}' is not a result number")]
    BadNumber(String),
}

/// Parse one input line. Blank lines are `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(text) = line.strip_prefix('/') {
        return Ok(Some(Command::Search(text.to_string())));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "search" | "s" => Command::Search(rest.to_string()),
        "case" => Command::ToggleCase,
        "word" => Command::ToggleWord,
        "open" | "o" => Command::Open(parse_number(rest)?),
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "close" | "x" => Command::Close,
        "retry" | "r" => Command::Retry,
        "results" => Command::Results,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ if rest.is_empty() && word.chars().all(|c| c.is_ascii_digit()) => {
            Command::Open(parse_number(word)?)
        }
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(command))
}

fn parse_number(text: &str) -> Result<usize, CommandError> {
    text.parse()
        .map_err(|_| CommandError::BadNumber(text.to_string()))
}

// =============================================================================
// APP
// =============================================================================

/// A finished backend call, tagged with the ticket that authorised it.
#[derive(Debug)]
pub enum Outcome {
    Search {
        ticket: SearchTicket,
        result: Result<Vec<MatchRecord>, TransportError>,
    },
    Reader {
        ticket: ReaderTicket,
        result: Result<ReadingWindow, TransportError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<B, W> {
    session: QuerySession,
    backend: Arc<B>,
    out: W,
    marks: Marks,
    limit: usize,
    match_case: bool,
    whole_word: bool,
    tx: mpsc::UnboundedSender<Outcome>,
    rx: mpsc::UnboundedReceiver<Outcome>,
    search_task: Option<JoinHandle<()>>,
    reader_task: Option<JoinHandle<()>>,
}

impl<B, W> App<B, W>
where
    B: CorpusBackend + 'static,
    W: Write,
{
    pub fn new(backend: Arc<B>, session: QuerySession, out: W, marks: Marks) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        App {
            session,
            backend,
            out,
            marks,
            limit: 0,
            match_case: false,
            whole_word: false,
            tx,
            rx,
            search_task: None,
            reader_task: None,
        }
    }

    /// Cap the number of results drawn (0 = all).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn session(&self) -> &QuerySession {
        &self.session
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run one command. Backend work is started, not awaited.
    pub fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Search(text) => {
                let query = Query::new(text)
                    .match_case(self.match_case)
                    .whole_word(self.whole_word);
                match self.session.submit_query(query) {
                    Ok(ticket) => {
                        self.say(&hint(&format!("Searching for '{}'…", ticket.query().text)))?;
                        self.dispatch(Ticket::Search(ticket));
                    }
                    Err(err) => self.say(&error_line(&err.to_string()))?,
                }
            }
            Command::ToggleCase => {
                self.match_case = !self.match_case;
                let line = format!("match case: {}", on_off(self.match_case));
                self.say(&hint(&line))?;
            }
            Command::ToggleWord => {
                self.whole_word = !self.whole_word;
                let line = format!("whole word: {}", on_off(self.whole_word));
                self.say(&hint(&line))?;
            }
            Command::Open(position) => match self.session.select_position(position) {
                Ok(ticket) => self.dispatch(Ticket::Reader(ticket)),
                Err(err) => self.say(&error_line(&err.to_string()))?,
            },
            Command::Next => {
                let ticket = self.session.page_forward();
                self.page(ticket, "already at the last page")?;
            }
            Command::Prev => {
                let ticket = self.session.page_backward();
                self.page(ticket, "already at the start")?;
            }
            Command::Close => {
                self.session.dismiss_reading();
                abort(&mut self.reader_task);
                self.say(&hint("reader closed"))?;
            }
            Command::Retry => match self.session.retry() {
                Some(ticket) => self.dispatch(ticket),
                None => self.say(&hint("nothing to retry"))?,
            },
            Command::Results => {
                let view = render::view(&self.session, &self.marks, self.limit);
                if view.is_empty() {
                    self.say(&hint("no search yet"))?;
                } else {
                    self.say(&view)?;
                }
            }
            Command::Help => self.say(HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Wait for the next backend outcome.
    pub async fn next_outcome(&mut self) -> Option<Outcome> {
        self.rx.recv().await
    }

    /// Feed an outcome through the session and draw whatever changed.
    pub fn apply(&mut self, outcome: Outcome) -> io::Result<Applied> {
        match outcome {
            Outcome::Search { ticket, result } => {
                let applied = self.session.complete_search(&ticket, result);
                if applied == Applied::Applied {
                    self.search_task = None;
                    if let Some(view) = render::search_view(&self.session, &self.marks, self.limit)
                    {
                        self.say(&view)?;
                    }
                }
                Ok(applied)
            }
            Outcome::Reader { ticket, result } => {
                let applied = self.session.complete_reading(&ticket, result);
                if applied == Applied::Applied {
                    self.reader_task = None;
                    if let Some(pane) = render::reader_view(&self.session, &self.marks) {
                        self.say(&pane)?;
                    }
                }
                Ok(applied)
            }
        }
    }

    /// Drive the loop until `quit` or end of input.
    pub async fn run<R>(mut self, input: R) -> io::Result<W>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.say(&hint("type 'help' for commands"))?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match parse_command(&line) {
                        Ok(Some(command)) => {
                            if self.execute(command)? == Flow::Quit {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(err) => self.say(&error_line(&err.to_string()))?,
                    }
                }
                Some(outcome) = self.rx.recv() => {
                    self.apply(outcome)?;
                }
            }
        }

        abort(&mut self.search_task);
        abort(&mut self.reader_task);
        Ok(self.out)
    }

    fn dispatch(&mut self, ticket: Ticket) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        match ticket {
            Ticket::Search(ticket) => {
                // A new search voids the reader slot as well.
                abort(&mut self.search_task);
                abort(&mut self.reader_task);
                self.search_task = Some(tokio::spawn(async move {
                    let result = backend.search(ticket.query()).await;
                    let _ = tx.send(Outcome::Search { ticket, result });
                }));
            }
            Ticket::Reader(ticket) => {
                abort(&mut self.reader_task);
                self.reader_task = Some(tokio::spawn(async move {
                    let result = backend.reader(ticket.offset()).await;
                    let _ = tx.send(Outcome::Reader { ticket, result });
                }));
            }
        }
    }

    fn page(&mut self, ticket: Option<ReaderTicket>, at_edge: &str) -> io::Result<()> {
        match ticket {
            Some(ticket) => {
                self.dispatch(Ticket::Reader(ticket));
                Ok(())
            }
            None if !self.session.is_reading() => {
                self.say(&hint("no page open; use 'open <n>' first"))
            }
            None => self.say(&hint(at_edge)),
        }
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }
}

fn abort(task: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = task.take() {
        handle.abort();
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
