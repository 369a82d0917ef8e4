use crate::error::{PipelineError, Result};
use crate::record::{parse_log_line, request_header};
use crate::stage::Source;
use crate::stream::RowWriter;
use std::io::BufRead;

/// Decodes proxy log lines into request rows.
///
/// Lines that are not request lines are skipped quietly. Request lines with
/// a field that does not parse are skipped with a warning.
pub struct LogLineSource<R> {
    reader: R,
}

impl<R: BufRead + Send + 'static> LogLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead + Send + 'static> Source for LogLineSource<R> {
    fn name(&self) -> &str {
        "decode"
    }

    fn run(&mut self, output: &mut RowWriter) -> Result<()> {
        output.open(request_header())?;

        let mut buf = Vec::new();
        let mut line_no = 0u64;
        let mut ignored = 0u64;
        let mut rejected = 0u64;

        loop {
            buf.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| PipelineError::io("decode", e))?;
            if read == 0 {
                break;
            }
            line_no += 1;

            let line = String::from_utf8_lossy(&buf);
            match parse_log_line(line.trim()) {
                Ok(record) => output.write(record.to_row())?,
                Err(err) if err.is_silent() => ignored += 1,
                Err(err) => {
                    rejected += 1;
                    tracing::warn!(line = line_no, error = %err, "skipping request line");
                }
            }
        }

        tracing::debug!(
            stage = "decode",
            lines = line_no,
            ignored,
            rejected,
            "decode finished"
        );
        Ok(())
    }
}
