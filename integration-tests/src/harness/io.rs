use inflight_core::cli::{AnalyseArgs, execute};
use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

/// Cloneable in-memory writer; clones share one buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Accepts `budget` bytes, then fails every write.
pub struct FailingWriter {
    pub budget: usize,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"));
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs the analyser over `input` with the given flags, returning stdout.
pub fn run_cli(args: &AnalyseArgs, input: &str) -> anyhow::Result<String> {
    let out = SharedBuffer::default();
    execute(args, Cursor::new(input.as_bytes().to_vec()), out.clone())?;
    Ok(out.contents())
}

/// Parses CSV output into one map per row, keyed by column name.
pub fn read_output(text: &str, delimiter: u8) -> Vec<std::collections::HashMap<String, String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    let header = reader.headers().unwrap().clone();
    reader
        .records()
        .map(|record| {
            header
                .iter()
                .map(String::from)
                .zip(record.unwrap().iter().map(String::from))
                .collect()
        })
        .collect()
}

/// Column names of CSV output.
pub fn output_header(text: &str) -> Vec<String> {
    text.lines()
        .next()
        .unwrap_or("")
        .split([',', '\t'])
        .map(String::from)
        .collect()
}
