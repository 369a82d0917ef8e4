use crate::conf::Delimiter;
use crate::error::{PipelineError, Result};
use crate::row::{Header, Row};
use crate::stage::Source;
use crate::stream::RowWriter;
use std::io::Read;

/// Reads rows from CSV whose first record is the header.
///
/// Records may be shorter or longer than the header; missing values read as
/// empty and extra values are dropped.
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
}

impl<R: Read + Send + 'static> CsvSource<R> {
    pub fn new(reader: R, delimiter: Delimiter) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Self { reader }
    }
}

impl<R: Read + Send + 'static> Source for CsvSource<R> {
    fn name(&self) -> &str {
        "csv-read"
    }

    fn run(&mut self, output: &mut RowWriter) -> Result<()> {
        let header = Header::new(
            self.reader
                .headers()
                .map_err(|e| PipelineError::csv("csv-read", e))?
                .iter(),
        );
        output.open(header.clone())?;

        let mut record = csv::StringRecord::new();
        while self
            .reader
            .read_record(&mut record)
            .map_err(|e| PipelineError::csv("csv-read", e))?
        {
            output.write(Row::from_values(&header, record.iter()))?;
        }
        Ok(())
    }
}
