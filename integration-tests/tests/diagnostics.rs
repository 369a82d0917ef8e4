use inflight_core::cli::AnalyseArgs;
use integration_tests::harness::{init_test_tracing, read_output, run_cli};
use pretty_assertions::assert_eq;
use tracing::Level;

const FIXTURE: &str = include_str!("../fixtures/mixed.log");

#[test]
fn bad_request_lines_warn_and_other_lines_stay_quiet() {
    // Arrange
    let events = init_test_tracing();

    // Act
    let output = run_cli(&AnalyseArgs::default(), FIXTURE).unwrap();

    // Assert
    assert_eq!(read_output(&output, b',').len(), 4);

    let events = events.lock().unwrap();
    let warnings: Vec<_> = events.iter().filter(|e| e.level == Level::WARN).collect();
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert_eq!(warnings[0].field("line"), Some("6"));
    assert!(warnings[0].field("error").unwrap().contains("nope"));

    assert!(
        events
            .iter()
            .any(|e| e.level == Level::INFO && e.field("message") == Some("pipeline finished"))
    );
}
