use super::helpers::{column, event, event_header, run_stage};
use crate::event::{EventKey, EventKind, ORDINAL, UNIX};
use crate::record::{STARTED_AT, request_header};
use crate::row::Row;
use crate::stage::{ReorderKey, ReorderStage, WindowedReorderer};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::convert::Infallible;

/// Keys whose arrival order lags their timestamp order by at most
/// `max_delay_ms`. Ordinals follow arrival order.
fn delayed_stream(rng: &mut StdRng, len: usize, span_ms: i64, max_delay_ms: i64) -> Vec<EventKey> {
    let mut arrivals: Vec<(i64, i64)> = (0..len)
        .map(|_| {
            let ts = rng.random_range(0..span_ms);
            (ts + rng.random_range(0..=max_delay_ms), ts)
        })
        .collect();
    arrivals.sort_by_key(|&(arrival, _)| arrival);

    arrivals
        .into_iter()
        .enumerate()
        .map(|(ordinal, (_, ts))| EventKey::new(ts, ordinal as u64))
        .collect()
}

fn reorder_all(window_ms: i64, keys: &[EventKey]) -> (Vec<EventKey>, usize, u64) {
    let mut window = WindowedReorderer::new(window_ms);
    let mut out = Vec::new();
    let mut peak = 0;
    let mut emit = |key: EventKey| {
        out.push(key);
        Ok::<(), Infallible>(())
    };
    for &key in keys {
        window.push(key, key, &mut emit).unwrap();
        peak = peak.max(window.pending());
    }
    window.finish(&mut emit).unwrap();
    (out, peak, window.late())
}

#[test]
fn bounded_disorder_is_fully_sorted() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for window_ms in [1, 10, 250, 1_000] {
        // Arrange
        let keys = delayed_stream(&mut rng, 3_000, 20_000, window_ms);
        let mut expected = keys.clone();
        expected.sort();

        // Act
        let (out, _, late) = reorder_all(window_ms, &keys);

        // Assert
        assert_eq!(late, 0, "window {window_ms}");
        assert_eq!(out, expected, "window {window_ms}");
    }
}

#[test]
fn pending_stays_near_two_windows() {
    let mut rng = StdRng::seed_from_u64(42);
    let keys = delayed_stream(&mut rng, 5_000, 10_000, 100);

    let (out, peak, _) = reorder_all(100, &keys);

    assert_eq!(out.len(), keys.len());
    assert!(peak < keys.len() / 10, "peak pending {peak}");
}

#[test]
fn single_event_is_emitted_on_finish() {
    let (out, _, _) = reorder_all(1_000, &[EventKey::new(5, 1)]);

    assert_eq!(out, vec![EventKey::new(5, 1)]);
}

#[test]
fn equal_timestamps_keep_ordinal_order() {
    let keys = [
        EventKey::new(100, 1),
        EventKey::new(100, 2),
        EventKey::new(50, 3),
        EventKey::new(100, 4),
        EventKey::new(5_000, 5),
    ];

    let (out, _, _) = reorder_all(1_000, &keys);

    assert_eq!(
        out,
        vec![
            EventKey::new(50, 3),
            EventKey::new(100, 1),
            EventKey::new(100, 2),
            EventKey::new(100, 4),
            EventKey::new(5_000, 5),
        ]
    );
}

#[test]
fn disorder_beyond_the_window_is_reported_as_late() {
    let keys = [
        EventKey::new(0, 1),
        EventKey::new(10_000, 2),
        EventKey::new(20_000, 3),
        EventKey::new(1, 4),
    ];

    let (out, _, late) = reorder_all(1_000, &keys);

    assert_eq!(late, 1);
    assert_eq!(out.len(), 4);
}

#[test]
fn stage_orders_events_by_unix_then_ordinal() {
    // Arrange
    let rows = vec![
        event("a", 1, 5_000, EventKind::End),
        event("a", 1, 0, EventKind::Start),
        event("b", 2, 4_000, EventKind::End),
        event("b", 2, 2_000, EventKind::Start),
    ];
    let mut stage = ReorderStage::new(ReorderKey::Event, 60_000);

    // Act
    let (_, out) = run_stage(&mut stage, event_header(), rows).unwrap();

    // Assert
    assert_eq!(column(&out, UNIX), vec!["0", "2000", "4000", "5000"]);
    assert_eq!(column(&out, ORDINAL), vec!["1", "2", "2", "1"]);
}

#[test]
fn stage_drops_rows_without_a_key() {
    let mut broken = event("x", 3, 0, EventKind::Start);
    broken.put(UNIX, "soon");
    let rows = vec![event("a", 1, 10, EventKind::Start), broken];
    let mut stage = ReorderStage::new(ReorderKey::Event, 1_000);

    let (_, out) = run_stage(&mut stage, event_header(), rows).unwrap();

    assert_eq!(out.len(), 1);
}

#[test]
fn started_at_key_sorts_requests_with_arrival_tiebreak() {
    let request = |id: &str, at: &str| Row::from_iter([("requestId", id), (STARTED_AT, at)]);
    let rows = vec![
        request("late", "2016-01-03 23:39:23.000"),
        request("first", "2016-01-03 23:39:22.000"),
        request("tie", "2016-01-03 23:39:23.000"),
    ];
    let mut stage = ReorderStage::new(ReorderKey::StartedAt, 60_000);

    let (_, out) = run_stage(&mut stage, request_header(), rows).unwrap();

    assert_eq!(column(&out, "requestId"), vec!["first", "late", "tie"]);
}
