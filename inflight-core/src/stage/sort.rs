use crate::error::Result;
use crate::row::Row;
use crate::stage::Stage;
use crate::stream::{RowReader, RowWriter};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    /// Compare as integers. Values that do not parse sort first.
    pub numeric: bool,
}

impl SortKey {
    pub fn numeric(field: &str) -> Self {
        Self {
            field: field.to_string(),
            numeric: true,
        }
    }

    pub fn text(field: &str) -> Self {
        Self {
            field: field.to_string(),
            numeric: false,
        }
    }

    fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let (a, b) = (a.get(&self.field), b.get(&self.field));
        if self.numeric {
            a.parse::<i64>().ok().cmp(&b.parse::<i64>().ok())
        } else {
            a.cmp(b)
        }
    }
}

/// Stable in-memory sort of the whole stream by one or more keys.
pub struct SortStage {
    keys: Vec<SortKey>,
}

impl SortStage {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }
}

impl Stage for SortStage {
    fn name(&self) -> &str {
        "sort"
    }

    fn run(&mut self, input: &mut RowReader, output: &mut RowWriter) -> Result<()> {
        output.open(input.header()?)?;

        let mut rows = Vec::new();
        while let Some(row) = input.next_row()? {
            rows.push(row);
        }

        rows.sort_by(|a, b| {
            self.keys
                .iter()
                .map(|key| key.compare(a, b))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        for row in rows {
            output.write(row)?;
        }
        Ok(())
    }
}
