//! Wires sources, stages and sinks into the pipeline for one run mode.

use crate::conf::{AnalyserConfig, Delimiter};
use crate::error::Result;
use crate::event::ORDINAL;
use crate::pipeline::{Pipeline, PipelineBuilder};
use crate::stage::{
    ActiveIntervalCounter, EndEventFilter, EventSplitter, ReorderKey, ReorderStage, SortKey,
    SortStage,
};
use crate::tabular::{CsvSink, CsvSource, LogLineSource};
use std::io::{BufRead, Write};

/// What the input holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Raw proxy log lines.
    Log,
    /// Comma separated request rows, as written by a parse-only run.
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Write the decoded request rows unchanged.
    ParseOnly,
    /// Order request rows by `startedAt`.
    SortOnly,
    /// Annotate every request with `active` and `oldest`.
    Analyse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub input: InputFormat,
    pub action: Action,
}

impl RunPlan {
    pub fn new(input: InputFormat, action: Action) -> Self {
        Self { input, action }
    }
}

/// Builds the pipeline reading `reader` and writing CSV to `writer`.
pub fn build<R, W>(plan: RunPlan, config: &AnalyserConfig, reader: R, writer: W) -> Result<Pipeline>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    let builder = Pipeline::builder().channel_capacity(config.channel_capacity);
    let builder = match plan.input {
        InputFormat::Log => builder.source(LogLineSource::new(reader)),
        InputFormat::Csv => builder.source(CsvSource::new(reader, Delimiter::Comma)),
    };

    let builder = match plan.action {
        Action::ParseOnly => builder,
        Action::SortOnly => builder.stage(ReorderStage::new(
            ReorderKey::StartedAt,
            config.window_millis(),
        )),
        Action::Analyse => analysis_stages(builder, config),
    };

    builder
        .sink(CsvSink::new(writer, config.delimiter))
        .build()
}

fn analysis_stages(builder: PipelineBuilder, config: &AnalyserConfig) -> PipelineBuilder {
    let builder = builder
        .stage(EventSplitter::new())
        .stage(ReorderStage::new(ReorderKey::Event, config.window_millis()))
        .stage(ActiveIntervalCounter::new());

    let builder = if config.restore_input_order {
        builder.stage(SortStage::new(vec![SortKey::numeric(ORDINAL)]))
    } else {
        builder
    };

    builder.stage(EndEventFilter)
}

/// Builds and runs the pipeline, returning the number of rows written.
pub fn run<R, W>(plan: RunPlan, config: &AnalyserConfig, reader: R, writer: W) -> Result<u64>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    tracing::debug!(?plan, window_ms = config.window_millis(), "building pipeline");
    let report = build(plan, config, reader, writer)?.run()?;
    Ok(report.rows_written)
}
