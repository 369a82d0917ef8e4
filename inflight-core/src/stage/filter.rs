use crate::error::Result;
use crate::event::{EVENT_FIELDS, EVENT_TYPE, EventKind};
use crate::stage::Stage;
use crate::stream::{RowReader, RowWriter};

/// Drops `end` events and the splitter's bookkeeping columns, leaving one
/// row per request.
#[derive(Debug, Default)]
pub struct EndEventFilter;

impl Stage for EndEventFilter {
    fn name(&self) -> &str {
        "filter"
    }

    fn run(&mut self, input: &mut RowReader, output: &mut RowWriter) -> Result<()> {
        output.open(input.header()?.without(&EVENT_FIELDS))?;

        while let Some(mut row) = input.next_row()? {
            if row.get(EVENT_TYPE) == EventKind::End.as_str() {
                continue;
            }
            for field in EVENT_FIELDS {
                row.remove(field);
            }
            output.write(row)?;
        }
        Ok(())
    }
}
