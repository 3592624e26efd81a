// Runs as its own process so the global subscriber is still free here.
use semio_terminal::logging::init_logging;

#[test]
fn test_init_logging_installs_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("semio.log");

    init_logging(&path, "info").unwrap();
    assert!(path.exists());

    let err = init_logging(&dir.path().join("second.log"), "debug").unwrap_err();
    assert!(err.contains("failed to install logger"), "unexpected error: {err}");
}
