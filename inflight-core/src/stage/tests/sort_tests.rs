use super::helpers::{column, run_stage};
use crate::row::{Header, Row};
use crate::stage::{SortKey, SortStage};
use pretty_assertions::assert_eq;

fn rows(values: &[(&str, &str)]) -> Vec<Row> {
    values
        .iter()
        .map(|&(n, tag)| Row::from_iter([("n", n), ("tag", tag)]))
        .collect()
}

#[test]
fn numeric_sort_is_stable_and_puts_garbage_first() {
    let input = rows(&[("10", "a"), ("9", "b"), ("x", "c"), ("10", "d"), ("-1", "e")]);
    let mut stage = SortStage::new(vec![SortKey::numeric("n")]);

    let (_, out) = run_stage(&mut stage, Header::new(["n", "tag"]), input).unwrap();

    assert_eq!(column(&out, "tag"), vec!["c", "e", "b", "a", "d"]);
}

#[test]
fn later_keys_break_ties() {
    let input = rows(&[("1", "z"), ("0", "y"), ("1", "a")]);
    let mut stage = SortStage::new(vec![SortKey::numeric("n"), SortKey::text("tag")]);

    let (_, out) = run_stage(&mut stage, Header::new(["n", "tag"]), input).unwrap();

    assert_eq!(column(&out, "tag"), vec!["y", "a", "z"]);
}
