use inflight_core::cli::AnalyseArgs;
use integration_tests::harness::{LoggedRequest, log_line, read_output, run_cli};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// `(timestamp, ordinal)` keys of a request's start and end events, with
/// ordinals in input order starting at one.
fn keys(requests: &[LoggedRequest]) -> Vec<((i64, usize), (i64, usize))> {
    requests
        .iter()
        .enumerate()
        .map(|(i, s)| ((s.start_ms(), i + 1), (s.end_ms(), i + 1)))
        .collect()
}

/// Requests open at each request's start event, oldest first.
fn expected(requests: &[LoggedRequest]) -> HashMap<String, (usize, String)> {
    let keys = keys(requests);
    requests
        .iter()
        .zip(&keys)
        .map(|(request, &(start, _))| {
            let mut open: Vec<(&(i64, usize), &str)> = requests
                .iter()
                .zip(&keys)
                .filter(|(_, (other_start, other_end))| *other_start < start && *other_end > start)
                .map(|(other, (other_start, _))| (other_start, other.id.as_str()))
                .collect();
            open.sort();
            let oldest = open.first().map(|(_, id)| id.to_string()).unwrap_or_default();
            (request.id.clone(), (open.len(), oldest))
        })
        .collect()
}

#[test]
fn every_request_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(0x1f11);

    for round in 0..10 {
        // Arrange: heavy overlap, many shared start seconds.
        let mut requests: Vec<LoggedRequest> = (0..150)
            .map(|i| {
                LoggedRequest::new(
                    &format!("req-{round}-{i}"),
                    rng.random_range(0..120),
                    rng.random_range(1_000..20_000),
                )
            })
            .collect();
        requests.shuffle(&mut rng);
        let input = requests.iter().map(log_line).collect::<Vec<_>>().join("\n");
        let args = AnalyseArgs {
            input_order: rng.random_bool(0.5),
            ..AnalyseArgs::default()
        };

        // Act
        let output = run_cli(&args, &input).unwrap();

        // Assert
        let rows = read_output(&output, b',');
        assert_eq!(rows.len(), requests.len());
        let want = expected(&requests);
        for row in &rows {
            let (active, oldest) = &want[&row["requestId"]];
            assert_eq!(row["active"], active.to_string(), "{}", row["requestId"]);
            assert_eq!(&row["oldest"], oldest, "{}", row["requestId"]);
        }
    }
}
