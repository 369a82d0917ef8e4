//! Command line surface of the analyser.


use crate::analysis::{self, Action, InputFormat, RunPlan};
use crate::conf::{AnalyserConfig, Delimiter, load_config, validate};
use crate::duration::parse_duration;
use anyhow::{Context, Result};
use chrono::TimeDelta;
use clap::Args;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyseArgs {
    /// Use tabs as the output delimiter
    #[arg(long)]
    pub tabs: bool,

    /// Convert the log into CSV without analysis
    #[arg(long, conflicts_with = "no_parse")]
    pub parse_only: bool,

    /// Assume stdin holds the output of an earlier --parse-only run
    #[arg(long)]
    pub no_parse: bool,

    /// Only sort requests by startedAt
    #[arg(long)]
    pub sort_only: bool,

    /// How far out of order requests may arrive (e.g. 90s, 30m, 1h)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub window: Option<TimeDelta>,

    /// Write requests in input order instead of start order
    #[arg(long)]
    pub input_order: bool,

    /// Rows buffered between two pipeline stages
    #[arg(long, value_name = "N")]
    pub channel_capacity: Option<usize>,

    /// HCL configuration file; flags given here override it
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl AnalyseArgs {
    pub fn plan(&self) -> RunPlan {
        let input = if self.no_parse {
            InputFormat::Csv
        } else {
            InputFormat::Log
        };
        let action = if self.parse_only {
            Action::ParseOnly
        } else if self.sort_only {
            Action::SortOnly
        } else {
            Action::Analyse
        };
        RunPlan::new(input, action)
    }

    /// Configuration file settings, overridden by any flags given.
    pub fn resolve_config(&self) -> Result<AnalyserConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path).context("failed to load configuration")?,
            None => AnalyserConfig::default(),
        };

        if self.tabs {
            config.delimiter = Delimiter::Tab;
        }
        if let Some(window) = self.window {
            config.window = window;
        }
        if self.input_order {
            config.restore_input_order = true;
        }
        if let Some(capacity) = self.channel_capacity {
            config.channel_capacity = capacity;
        }

        validate(&config)?;
        Ok(config)
    }
}

/// Runs the analyser over `reader`, writing CSV to `writer`.
pub fn execute<R, W>(args: &AnalyseArgs, reader: R, writer: W) -> Result<u64>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    let config = args.resolve_config()?;
    let rows = analysis::run(args.plan(), &config, reader, writer)?;
    Ok(rows)
}

/// Runs the analyser from stdin to stdout.
pub fn run(args: AnalyseArgs) -> Result<()> {
    let reader = BufReader::new(io::stdin());
    let writer = BufWriter::new(io::stdout());
    let rows = execute(&args, reader, writer)?;
    tracing::debug!(rows, "output complete");
    Ok(())
}
