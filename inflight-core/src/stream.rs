//! Row streams connecting pipeline stages.
//!
//! A stream carries exactly one header frame, then any number of rows. A
//! producer that fails marks the stream with a `Failed` frame before hanging
//! up, so the consumer can tell a truncated stream from a finished one.
//! Hanging up without that frame is a clean end of stream.

use crate::error::{PipelineError, Result};
use crate::row::{Header, Row};
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

#[derive(Debug)]
enum Frame {
    Header(Header),
    Row(Row),
    Failed { stage: String },
}

/// Creates a bounded link between `producer` and `consumer`.
///
/// Writes block while `capacity` rows are waiting to be read.
pub fn link(capacity: usize, producer: &str, consumer: &str) -> (RowWriter, RowReader) {
    let (tx, rx) = bounded(capacity.max(1));
    (RowWriter::new(producer, tx), RowReader::new(consumer, rx))
}

/// Creates a link that never blocks the producer.
pub fn unbounded_link(producer: &str, consumer: &str) -> (RowWriter, RowReader) {
    let (tx, rx) = unbounded();
    (RowWriter::new(producer, tx), RowReader::new(consumer, rx))
}

pub struct RowReader {
    stage: String,
    rx: Receiver<Frame>,
    header: Option<Header>,
    rows_read: u64,
}

impl RowReader {
    fn new(stage: &str, rx: Receiver<Frame>) -> Self {
        Self {
            stage: stage.to_string(),
            rx,
            header: None,
            rows_read: 0,
        }
    }

    /// Returns the stream's header, waiting for the producer to declare it.
    pub fn header(&mut self) -> Result<Header> {
        if let Some(header) = &self.header {
            return Ok(header.clone());
        }

        let header = match self.rx.recv() {
            Ok(Frame::Header(header)) => header,
            Ok(Frame::Failed { stage }) => return Err(PipelineError::Upstream { stage }),
            Ok(Frame::Row(_)) => return Err(self.protocol("row received before header")),
            Err(_) => return Err(self.protocol("stream ended before header")),
        };

        self.header = Some(header.clone());
        Ok(header)
    }

    /// Next row, `None` once the producer finished cleanly.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if self.header.is_none() {
            self.header()?;
        }

        match self.rx.recv() {
            Ok(Frame::Row(row)) => {
                self.rows_read += 1;
                Ok(Some(row))
            }
            Ok(Frame::Failed { stage }) => Err(PipelineError::Upstream { stage }),
            Ok(Frame::Header(_)) => Err(self.protocol("header received twice")),
            Err(_) => Ok(None),
        }
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    fn protocol(&self, reason: &'static str) -> PipelineError {
        PipelineError::Protocol {
            stage: self.stage.clone(),
            reason,
        }
    }
}

pub struct RowWriter {
    stage: String,
    tx: Sender<Frame>,
    header: Option<Header>,
    rows_written: u64,
}

impl RowWriter {
    fn new(stage: &str, tx: Sender<Frame>) -> Self {
        Self {
            stage: stage.to_string(),
            tx,
            header: None,
            rows_written: 0,
        }
    }

    /// Declares the header. Must precede every row.
    pub fn open(&mut self, header: Header) -> Result<()> {
        if self.header.is_some() {
            return Err(self.protocol("header sent twice"));
        }
        self.send(Frame::Header(header.clone()))?;
        self.header = Some(header);
        Ok(())
    }

    pub fn write(&mut self, row: Row) -> Result<()> {
        if self.header.is_none() {
            return Err(self.protocol("row written before header"));
        }
        self.send(Frame::Row(row))?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Marks the stream as failed on behalf of `stage` and hangs up.
    pub fn fail(self, stage: &str) {
        // The consumer may already be gone; nothing left to tell it then.
        let _ = self.tx.send(Frame::Failed {
            stage: stage.to_string(),
        });
    }

    fn send(&self, frame: Frame) -> Result<()> {
        self.tx
            .send(frame)
            .map_err(|_| PipelineError::Disconnected {
                stage: self.stage.clone(),
            })
    }

    fn protocol(&self, reason: &'static str) -> PipelineError {
        PipelineError::Protocol {
            stage: self.stage.clone(),
            reason,
        }
    }
}
