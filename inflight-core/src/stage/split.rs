use crate::error::Result;
use crate::event::{EVENT_FIELDS, EVENT_TYPE, EventKind, ORDINAL, UNIX, parse_started_at};
use crate::record::{DURATION, REQUEST_ID, STARTED_AT};
use crate::row::Row;
use crate::stage::Stage;
use crate::stream::{RowReader, RowWriter};

/// Turns each request row into an `end` event followed by a `start` event.
///
/// Every input row consumes one ordinal, whether or not it can be split.
#[derive(Debug, Default)]
pub struct EventSplitter {
    ordinal: u64,
}

impl EventSplitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for EventSplitter {
    fn name(&self) -> &str {
        "split"
    }

    fn run(&mut self, input: &mut RowReader, output: &mut RowWriter) -> Result<()> {
        let header = input.header()?.extend(&EVENT_FIELDS);
        output.open(header)?;

        let mut skipped = 0u64;
        while let Some(row) = input.next_row()? {
            self.ordinal += 1;
            match split_row(self.ordinal, row) {
                Some((end, start)) => {
                    output.write(end)?;
                    output.write(start)?;
                }
                None => skipped += 1,
            }
        }

        tracing::debug!(
            stage = self.name(),
            requests = self.ordinal,
            skipped,
            "split finished"
        );
        Ok(())
    }
}

/// Builds the `(end, start)` events of one request row.
///
/// `None` when the start time or duration does not parse. The start event
/// carries the whole row; the end event carries only what pairing needs.
/// Zero durations count as one millisecond so an end never precedes or
/// coincides with its start.
pub fn split_row(ordinal: u64, row: Row) -> Option<(Row, Row)> {
    let started_ms = parse_started_at(row.get(STARTED_AT))?;
    let duration_ms = row.get(DURATION).trim().parse::<u64>().ok()?;
    let ended_ms = started_ms.checked_add(i64::try_from(duration_ms.max(1)).ok()?)?;
    let ordinal = ordinal.to_string();

    let mut end = Row::new();
    end.put(ORDINAL, ordinal.as_str());
    end.put(UNIX, ended_ms.to_string());
    end.put(EVENT_TYPE, EventKind::End.as_str());
    end.put(REQUEST_ID, row.get(REQUEST_ID));

    let mut start = row;
    start.put(ORDINAL, ordinal);
    start.put(UNIX, started_ms.to_string());
    start.put(EVENT_TYPE, EventKind::Start.as_str());

    Some((end, start))
}
