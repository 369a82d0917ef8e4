use chrono::TimeDelta;
use serde::Deserialize;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Field separator of CSV output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Settings of one analysis run, after file and command line are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyserConfig {
    /// Largest disorder, in time, the reorderer absorbs.
    pub window: TimeDelta,
    /// Rows buffered between two stages.
    pub channel_capacity: usize,
    pub delimiter: Delimiter,
    /// Re-sort by ordinal before the filter so output follows input order.
    pub restore_input_order: bool,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            window: TimeDelta::hours(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            delimiter: Delimiter::Comma,
            restore_input_order: false,
        }
    }
}

impl AnalyserConfig {
    pub fn window_millis(&self) -> i64 {
        self.window.num_milliseconds()
    }
}

//-----------------------------------------------------------------------------
// File representation
//-----------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    pub analysis: Option<AnalysisSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AnalysisSection {
    pub window: Option<String>,
    pub restore_input_order: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct OutputSection {
    pub delimiter: Option<Delimiter>,
    pub channel_capacity: Option<usize>,
}
