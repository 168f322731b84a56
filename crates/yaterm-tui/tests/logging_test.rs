//! File logging end to end. Lives in its own test binary because the
//! subscriber is process-global.

use std::fs;

use yaterm_tui::logging;

#[test]
fn events_are_written_to_the_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("yaterm.log");

    logging::init(&path, "debug").unwrap();
    tracing::info!(target: "yaterm_tui", "hello from the test");
    tracing::debug!(target: "other_crate", "filtered out");

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("hello from the test"));
    assert!(!contents.contains("filtered out"));

    assert!(matches!(logging::init(&path, "debug"), Err(logging::LoggingError::Init(_))));
}
