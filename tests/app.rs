//! The interactive loop driven command by command.

mod common;

use common::ScriptedBackend;
use lectern::app::{App, Command, Flow};
use lectern::{Applied, CorpusOffset, Marks, QuerySession, ReaderState, TransportError};
use std::sync::Arc;
use std::time::Duration;

type TestApp = App<ScriptedBackend, Vec<u8>>;

fn app_with(backend: Arc<ScriptedBackend>) -> TestApp {
    App::new(backend, QuerySession::new(), Vec::new(), Marks::brackets())
}

fn output(app: &TestApp) -> String {
    String::from_utf8_lossy(app.output()).into_owned()
}

async fn settle(app: &mut TestApp) -> Applied {
    let outcome = app.next_outcome().await.expect("outcome");
    app.apply(outcome).unwrap()
}

#[tokio::test]
async fn search_open_and_page() {
    let backend = Arc::new(ScriptedBackend::shakespeare());
    let mut app = app_with(Arc::clone(&backend));

    app.execute(Command::Search("love".to_string())).unwrap();
    assert_eq!(settle(&mut app).await, Applied::Applied);
    let out = output(&app);
    assert!(out.contains("Results: 2"));
    assert!(out.contains("[Love] thy neighbor"));
    assert!(out.contains("Result # 2"));

    app.execute(Command::Open(2)).unwrap();
    assert_eq!(app.session().current_offset(), CorpusOffset(980));
    settle(&mut app).await;
    assert_eq!(backend.reader_calls(), vec![980]);
    assert!(output(&app).contains("Reader @ 980"));

    app.execute(Command::Next).unwrap();
    settle(&mut app).await;
    assert_eq!(app.session().current_offset(), CorpusOffset(4980));
    assert_eq!(backend.reader_calls(), vec![980, 4980]);

    app.execute(Command::Close).unwrap();
    assert!(!app.session().is_reading());
    assert_eq!(app.session().results().map(|s| s.len()), Some(2));
}

#[tokio::test]
async fn empty_search_is_reported_locally() {
    let backend = Arc::new(ScriptedBackend::shakespeare());
    let mut app = app_with(Arc::clone(&backend));

    app.execute(Command::Search("   ".to_string())).unwrap();
    assert!(output(&app).contains("Please enter a search query"));
    assert!(backend.search_calls().is_empty());
}

#[tokio::test]
async fn toggles_flow_into_the_query() {
    let backend = Arc::new(ScriptedBackend::shakespeare());
    let mut app = app_with(Arc::clone(&backend));

    app.execute(Command::ToggleCase).unwrap();
    app.execute(Command::ToggleWord).unwrap();
    app.execute(Command::Search("love".to_string())).unwrap();
    settle(&mut app).await;

    let calls = backend.search_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].match_case);
    assert!(calls[0].whole_word);
    // Case-sensitive now, so the capitalised excerpt stays unmarked.
    assert!(output(&app).contains("Love thy neighbor"));
    assert!(!output(&app).contains("[Love]"));
}

#[tokio::test]
async fn slow_search_is_superseded() {
    let backend = Arc::new(
        ScriptedBackend::shakespeare()
            .answer("hate", vec![common::record(7, "hate me", "OTHELLO")])
            .delay("love", Duration::from_millis(100)),
    );
    let mut app = app_with(Arc::clone(&backend));

    app.execute(Command::Search("love".to_string())).unwrap();
    app.execute(Command::Search("hate".to_string())).unwrap();
    assert_eq!(settle(&mut app).await, Applied::Applied);
    assert_eq!(app.session().results().unwrap().query().text, "hate");

    // The aborted "love" task never reports back.
    let straggler = tokio::time::timeout(Duration::from_millis(250), app.next_outcome()).await;
    assert!(straggler.is_err());
    assert_eq!(app.session().results().unwrap().query().text, "hate");
}

#[tokio::test]
async fn failed_page_then_retry() {
    let backend = Arc::new(ScriptedBackend::shakespeare());
    let mut app = app_with(Arc::clone(&backend));

    app.execute(Command::Search("love".to_string())).unwrap();
    settle(&mut app).await;

    backend.fail_next_reader(TransportError::Status {
        status: 502,
        body: "bad gateway".to_string(),
    });
    app.execute(Command::Open(1)).unwrap();
    settle(&mut app).await;
    assert!(matches!(
        app.session().reader_state(),
        Some(ReaderState::Failed(_))
    ));
    assert!(output(&app).contains("could not load page"));

    app.execute(Command::Retry).unwrap();
    settle(&mut app).await;
    assert!(matches!(
        app.session().reader_state(),
        Some(ReaderState::Ready(_))
    ));
    assert_eq!(backend.reader_calls(), vec![120, 120]);
}

#[tokio::test]
async fn paging_without_a_page_is_a_hint() {
    let backend = Arc::new(ScriptedBackend::shakespeare());
    let mut app = app_with(Arc::clone(&backend));

    app.execute(Command::Next).unwrap();
    assert!(output(&app).contains("no page open"));
    assert!(backend.reader_calls().is_empty());
}

#[tokio::test]
async fn result_limit_truncates_the_list() {
    let backend = Arc::new(ScriptedBackend::shakespeare());
    let mut app = app_with(Arc::clone(&backend)).with_limit(1);

    app.execute(Command::Search("love".to_string())).unwrap();
    settle(&mut app).await;
    let out = output(&app);
    assert!(out.contains("Results: 2"));
    assert!(out.contains("Result # 1"));
    assert!(!out.contains("Result # 2"));
    assert!(out.contains("1 more"));
}

#[tokio::test]
async fn run_reads_commands_until_quit() {
    let backend = Arc::new(ScriptedBackend::shakespeare());
    let app = app_with(Arc::clone(&backend));
    let input = tokio::io::BufReader::new(&b"help\ndance\nquit\nsearch love\n"[..]);

    let out = app.run(input).await.unwrap();
    let out = String::from_utf8_lossy(&out);
    assert!(out.contains("open <n>"));
    assert!(out.contains("unknown command 'dance'"));
    assert!(backend.search_calls().is_empty());
}

#[tokio::test]
async fn quit_returns_flow() {
    let backend = Arc::new(ScriptedBackend::shakespeare());
    let mut app = app_with(backend);
    assert_eq!(app.execute(Command::Quit).unwrap(), Flow::Quit);
    assert_eq!(app.execute(Command::Help).unwrap(), Flow::Continue);
}
