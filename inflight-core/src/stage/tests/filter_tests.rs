use super::helpers::{column, event, event_header, run_stage};
use crate::event::{ACTIVE, EVENT_TYPE, EventKind, ORDINAL, UNIX};
use crate::record::REQUEST_ID;
use crate::stage::EndEventFilter;
use pretty_assertions::assert_eq;

#[test]
fn keeps_start_events_without_event_fields() {
    // Arrange
    let header = event_header().extend(&[ACTIVE]);
    let mut start = event("a", 1, 0, EventKind::Start);
    start.put(ACTIVE, "2");
    let rows = vec![start, event("a", 1, 10, EventKind::End), event("b", 2, 5, EventKind::Start)];

    // Act
    let (header, out) = run_stage(&mut EndEventFilter, header, rows).unwrap();

    // Assert
    assert_eq!(header.fields(), [REQUEST_ID, ACTIVE]);
    assert_eq!(column(&out, REQUEST_ID), vec!["a", "b"]);
    assert_eq!(column(&out, ACTIVE), vec!["2", ""]);
    for row in &out {
        assert!(!row.contains(ORDINAL));
        assert!(!row.contains(UNIX));
        assert!(!row.contains(EVENT_TYPE));
    }
}
