use crate::conf::Delimiter;
use crate::error::{PipelineError, Result};
use crate::stage::Sink;
use crate::stream::RowReader;
use std::io::Write;

/// Writes the header and every row of the final stream as CSV.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write + Send + 'static> CsvSink<W> {
    pub fn new(writer: W, delimiter: Delimiter) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(delimiter.as_byte())
            .from_writer(writer);
        Self { writer }
    }
}

impl<W: Write + Send + 'static> Sink for CsvSink<W> {
    fn name(&self) -> &str {
        "csv-write"
    }

    fn run(&mut self, input: &mut RowReader) -> Result<u64> {
        let header = input.header()?;
        self.writer
            .write_record(header.fields())
            .map_err(|e| PipelineError::csv("csv-write", e))?;

        let mut rows = 0u64;
        while let Some(row) = input.next_row()? {
            self.writer
                .write_record(row.values_for(&header))
                .map_err(|e| PipelineError::csv("csv-write", e))?;
            rows += 1;
        }

        self.writer
            .flush()
            .map_err(|e| PipelineError::io("csv-write", e))?;
        Ok(rows)
    }
}
