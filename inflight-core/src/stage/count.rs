use crate::error::Result;
use crate::event::{ACTIVE, COUNTER_FIELDS, EVENT_TYPE, EventKind, OLDEST, UNIX};
use crate::interval::ActiveSet;
use crate::record::REQUEST_ID;
use crate::stage::Stage;
use crate::stream::{RowReader, RowWriter};

/// Annotates a timestamp-ordered event stream with concurrency.
///
/// For each event, in order:
/// 1. `oldest` is read from the active set as it stands;
/// 2. `active` counts the other requests in flight: everything open before a
///    `start`, everything still open after an `end` has closed its request;
/// 3. the annotated row is written;
/// 4. the active set is updated (open on `start`, close on `end`).
///
/// An `end` whose request is not open changes nothing.
#[derive(Debug, Default)]
pub struct ActiveIntervalCounter {
    active: ActiveSet,
}

impl ActiveIntervalCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for ActiveIntervalCounter {
    fn name(&self) -> &str {
        "count"
    }

    fn run(&mut self, input: &mut RowReader, output: &mut RowWriter) -> Result<()> {
        let header = input.header()?.extend(&COUNTER_FIELDS);
        output.open(header)?;

        let mut unpaired = 0u64;
        let mut duplicates = 0u64;
        let mut peak = 0usize;

        while let Some(mut row) = input.next_row()? {
            let kind = EventKind::parse(row.get(EVENT_TYPE));
            let request_id = row.get(REQUEST_ID).to_string();
            let started_ms = row.get(UNIX).parse::<i64>().ok();

            let oldest = self.active.oldest().unwrap_or("").to_string();
            let active = match kind {
                Some(EventKind::End) if self.active.contains(&request_id) => self.active.len() - 1,
                _ => self.active.len(),
            };

            row.put(ACTIVE, active.to_string());
            row.put(OLDEST, oldest);
            output.write(row)?;

            match (kind, started_ms) {
                (Some(EventKind::Start), Some(started_ms)) => {
                    if !self.active.open(&request_id, started_ms) {
                        duplicates += 1;
                        tracing::debug!(request_id = %request_id, "request id already in flight");
                    }
                    peak = peak.max(self.active.len());
                }
                (Some(EventKind::End), _) => {
                    if !self.active.close(&request_id) {
                        unpaired += 1;
                    }
                }
                _ => {}
            }
        }

        tracing::debug!(
            stage = self.name(),
            unpaired,
            duplicates,
            peak_active = peak,
            "count finished"
        );
        if !self.active.is_empty() {
            tracing::debug!(
                stage = self.name(),
                still_open = self.active.len(),
                "requests without an end event"
            );
        }
        Ok(())
    }
}
