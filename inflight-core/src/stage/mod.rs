//! Pipeline stages.
//!
//! Each stage owns its state and talks to its neighbours only through the
//! row streams it is handed. A stage returning an error fails the whole run.

mod count;
mod filter;
mod reorder;
mod sort;
mod split;
#[cfg(test)]
mod tests;

pub use count::ActiveIntervalCounter;
pub use filter::EndEventFilter;
pub use reorder::{ReorderKey, ReorderStage, WindowedReorderer};
pub use sort::{SortKey, SortStage};
pub use split::{EventSplitter, split_row};

use crate::error::Result;
use crate::stream::{RowReader, RowWriter};

/// A transformation between two row streams.
pub trait Stage: Send + 'static {
    fn name(&self) -> &str;

    /// Reads `input` to exhaustion, writing to `output`. The output header
    /// must be opened before the first row is written.
    fn run(&mut self, input: &mut RowReader, output: &mut RowWriter) -> Result<()>;
}

/// Produces the first row stream of a pipeline.
pub trait Source: Send + 'static {
    fn name(&self) -> &str;

    fn run(&mut self, output: &mut RowWriter) -> Result<()>;
}

/// Consumes the last row stream of a pipeline.
pub trait Sink: Send + 'static {
    fn name(&self) -> &str;

    /// Returns the number of rows delivered.
    fn run(&mut self, input: &mut RowReader) -> Result<u64>;
}
