mod window;

pub use window::WindowedReorderer;

use crate::error::Result;
use crate::event::{EventKey, ORDINAL, UNIX, parse_started_at};
use crate::record::STARTED_AT;
use crate::row::Row;
use crate::stage::Stage;
use crate::stream::{RowReader, RowWriter};

/// How the reorderer derives a sort key from a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderKey {
    /// `unix` and `ordinal` written by the event splitter.
    Event,
    /// `startedAt` of a request row, arrival order breaking ties.
    StartedAt,
}

impl ReorderKey {
    fn extract(self, row: &Row, arrival: u64) -> Option<EventKey> {
        match self {
            ReorderKey::Event => Some(EventKey::new(
                row.get(UNIX).parse().ok()?,
                row.get(ORDINAL).parse().ok()?,
            )),
            ReorderKey::StartedAt => Some(EventKey::new(
                parse_started_at(row.get(STARTED_AT))?,
                arrival,
            )),
        }
    }
}

/// Restores timestamp order of a stream that is out of order by at most one
/// window. Rows without a usable key are dropped.
pub struct ReorderStage {
    key: ReorderKey,
    window_ms: i64,
}

impl ReorderStage {
    pub fn new(key: ReorderKey, window_ms: i64) -> Self {
        Self { key, window_ms }
    }
}

impl Stage for ReorderStage {
    fn name(&self) -> &str {
        "reorder"
    }

    fn run(&mut self, input: &mut RowReader, output: &mut RowWriter) -> Result<()> {
        output.open(input.header()?)?;

        let mut window = WindowedReorderer::new(self.window_ms);
        let mut emit = |row: Row| output.write(row);
        let mut arrival = 0u64;
        let mut unkeyed = 0u64;
        let mut peak = 0usize;

        while let Some(row) = input.next_row()? {
            arrival += 1;
            let Some(key) = self.key.extract(&row, arrival) else {
                unkeyed += 1;
                continue;
            };
            window.push(key, row, &mut emit)?;
            peak = peak.max(window.pending());
        }
        window.finish(&mut emit)?;

        if window.late() > 0 {
            tracing::debug!(
                stage = "reorder",
                late = window.late(),
                window_ms = self.window_ms,
                "rows arrived more than one window out of order"
            );
        }
        tracing::debug!(
            stage = "reorder",
            rows = arrival,
            unkeyed,
            peak_pending = peak,
            "reorder finished"
        );
        Ok(())
    }
}
