use crate::error::{PipelineError, Result};
use crate::row::{Header, Row};
use crate::stage::{Sink, Source, Stage};
use crate::stream::{RowReader, RowWriter};
use std::io;
use std::sync::{Arc, Mutex};

pub fn numbered(n: u64) -> Vec<Row> {
    (1..=n).map(|i| Row::from_iter([("n", i.to_string())])).collect()
}

pub fn boom(stage: &str) -> PipelineError {
    PipelineError::io(stage, io::Error::other("boom"))
}

pub struct VecSource {
    pub rows: Vec<Row>,
    /// Fail after writing this many rows.
    pub fail_after: Option<usize>,
}

impl VecSource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows, fail_after: None }
    }
}

impl Source for VecSource {
    fn name(&self) -> &str {
        "vec"
    }

    fn run(&mut self, output: &mut RowWriter) -> Result<()> {
        output.open(Header::new(["n"]))?;
        for (i, row) in self.rows.drain(..).enumerate() {
            if self.fail_after == Some(i) {
                return Err(boom("vec"));
            }
            output.write(row)?;
        }
        Ok(())
    }
}

/// Copies rows, failing or panicking at a given row if asked to.
pub struct Relay {
    pub name: &'static str,
    pub fail_at: Option<u64>,
    pub panic_at: Option<u64>,
}

impl Relay {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fail_at: None,
            panic_at: None,
        }
    }
}

impl Stage for Relay {
    fn name(&self) -> &str {
        self.name
    }

    fn run(&mut self, input: &mut RowReader, output: &mut RowWriter) -> Result<()> {
        output.open(input.header()?)?;
        while let Some(row) = input.next_row()? {
            let seen = input.rows_read();
            if self.fail_at == Some(seen) {
                return Err(boom(self.name));
            }
            if self.panic_at == Some(seen) {
                panic!("relay {} gave up", self.name);
            }
            output.write(row)?;
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct CollectSink {
    pub rows: Arc<Mutex<Vec<Row>>>,
    pub fail_at: Option<u64>,
}

impl Sink for CollectSink {
    fn name(&self) -> &str {
        "collect"
    }

    fn run(&mut self, input: &mut RowReader) -> Result<u64> {
        input.header()?;
        while let Some(row) = input.next_row()? {
            if self.fail_at == Some(input.rows_read()) {
                return Err(boom("collect"));
            }
            self.rows.lock().unwrap().push(row);
        }
        Ok(input.rows_read())
    }
}
