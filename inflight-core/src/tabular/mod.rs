//! Sources and sinks that move rows in and out of a pipeline.

mod csv_sink;
mod csv_source;
mod log_source;
#[cfg(test)]
mod tests;

pub use csv_sink::CsvSink;
pub use csv_source::CsvSource;
pub use log_source::LogLineSource;
