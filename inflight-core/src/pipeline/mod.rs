//! Runs a source, a chain of stages and a sink on their own threads.
//!
//! Neighbouring tasks share a bounded link, so a slow consumer holds back
//! everything upstream of it. The first task to fail records its error in
//! a single slot and marks its output stream failed before it lets go of
//! its input. Tasks downstream of it stop with `Upstream`, tasks upstream
//! stop with `Disconnected` on their next write, and `run` reports the
//! recorded error.

mod builder;
#[cfg(test)]
mod tests;

pub use builder::PipelineBuilder;

use crate::error::{PipelineError, Result};
use crate::stage::{Sink, Source, Stage};
use crate::stream::{RowReader, RowWriter, link};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Instant;

/// Row counts of one task after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageStats {
    pub name: String,
    pub rows_in: u64,
    pub rows_out: u64,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Rows delivered by the sink.
    pub rows_written: u64,
    /// Source first, sink last.
    pub stages: Vec<StageStats>,
}

pub struct Pipeline {
    source: Box<dyn Source>,
    stages: Vec<Box<dyn Stage>>,
    sink: Box<dyn Sink>,
    channel_capacity: usize,
}

type Task = Box<dyn FnOnce() -> StageStats + Send>;

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Task names, source first and sink last.
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.stages.len() + 2);
        names.push(self.source.name().to_string());
        names.extend(self.stages.iter().map(|s| s.name().to_string()));
        names.push(self.sink.name().to_string());
        names
    }

    /// Runs every task to completion.
    pub fn run(self) -> Result<PipelineReport> {
        let started = Instant::now();
        let names = self.names();
        let failure = Arc::new(OnceLock::new());

        let mut writers = Vec::with_capacity(names.len() - 1);
        let mut readers = Vec::with_capacity(names.len() - 1);
        for pair in names.windows(2) {
            let (writer, reader) = link(self.channel_capacity, &pair[0], &pair[1]);
            writers.push(writer);
            readers.push(reader);
        }

        let mut writers = writers.into_iter();
        let mut readers = readers.into_iter();
        let mut tasks: Vec<(String, Task)> = Vec::with_capacity(names.len());

        // Links always number one fewer than tasks, so these never run dry.
        let (Some(first), Some(last)) = (writers.next(), readers.next_back()) else {
            return Err(PipelineError::Incomplete("stream links"));
        };
        tasks.push((
            names[0].clone(),
            source_task(self.source, first, Arc::clone(&failure)),
        ));
        for (stage, (input, output)) in self.stages.into_iter().zip(readers.zip(writers)) {
            tasks.push((
                stage.name().to_string(),
                stage_task(stage, input, output, Arc::clone(&failure)),
            ));
        }
        tasks.push((
            names[names.len() - 1].clone(),
            sink_task(self.sink, last, Arc::clone(&failure)),
        ));

        let mut handles = Vec::with_capacity(tasks.len());
        let mut tasks = tasks.into_iter();
        for (name, task) in tasks.by_ref() {
            match thread::Builder::new()
                .name(format!("inflight-{name}"))
                .spawn(task)
            {
                Ok(handle) => handles.push((name, handle)),
                Err(source) => {
                    record(&failure, PipelineError::Spawn { stage: name, source });
                    break;
                }
            }
        }
        // Unspawned tasks own stream ends; dropping them unblocks the rest.
        drop(tasks);

        let mut stages = Vec::with_capacity(handles.len());
        let mut panicked = None;
        for (name, handle) in handles {
            match handle.join() {
                Ok(stats) => stages.push(stats),
                Err(_) => {
                    panicked.get_or_insert(name);
                }
            }
        }

        let recorded = Arc::into_inner(failure).and_then(OnceLock::into_inner);
        match (recorded, panicked) {
            (Some(err), Some(stage)) if err.is_derived() => {
                Err(PipelineError::StagePanicked { stage })
            }
            (Some(err), _) => Err(err),
            (None, Some(stage)) => Err(PipelineError::StagePanicked { stage }),
            (None, None) => {
                let rows_written = stages.last().map_or(0, |s| s.rows_out);
                for s in &stages {
                    tracing::debug!(
                        stage = %s.name,
                        rows_in = s.rows_in,
                        rows_out = s.rows_out,
                        "stage stats"
                    );
                }
                tracing::info!(
                    rows = rows_written,
                    stages = stages.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "pipeline finished"
                );
                Ok(PipelineReport {
                    rows_written,
                    stages,
                })
            }
        }
    }
}

/// Keeps the first error. Later ones are consequences of it.
fn record(slot: &OnceLock<PipelineError>, err: PipelineError) {
    if err.is_derived() {
        tracing::debug!(error = %err, "stage stopped after failure elsewhere");
    } else {
        tracing::error!(error = %err, "stage failed");
    }
    // Already set means an earlier failure caused this one.
    let _ = slot.set(err);
}

/// Runs `f`, turning a panic into a `StagePanicked` error for `stage`.
fn guarded<T>(stage: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        Err(PipelineError::StagePanicked {
            stage: stage.to_string(),
        })
    })
}

fn source_task(
    mut source: Box<dyn Source>,
    mut output: RowWriter,
    failure: Arc<OnceLock<PipelineError>>,
) -> Task {
    Box::new(move || {
        let name = source.name().to_string();
        tracing::debug!(stage = %name, "source started");
        let result = guarded(&name, || source.run(&mut output));
        let stats = StageStats {
            rows_in: 0,
            rows_out: output.rows_written(),
            name,
        };
        if let Err(err) = result {
            let origin = err.origin(&stats.name).to_string();
            record(&failure, err);
            output.fail(&origin);
        }
        stats
    })
}

fn stage_task(
    mut stage: Box<dyn Stage>,
    mut input: RowReader,
    mut output: RowWriter,
    failure: Arc<OnceLock<PipelineError>>,
) -> Task {
    Box::new(move || {
        let name = stage.name().to_string();
        tracing::debug!(stage = %name, "stage started");
        let result = guarded(&name, || stage.run(&mut input, &mut output));
        let stats = StageStats {
            rows_in: input.rows_read(),
            rows_out: output.rows_written(),
            name,
        };
        if let Err(err) = result {
            let origin = err.origin(&stats.name).to_string();
            record(&failure, err);
            output.fail(&origin);
        }
        drop(input);
        stats
    })
}

fn sink_task(
    mut sink: Box<dyn Sink>,
    mut input: RowReader,
    failure: Arc<OnceLock<PipelineError>>,
) -> Task {
    Box::new(move || {
        let name = sink.name().to_string();
        tracing::debug!(stage = %name, "sink started");
        let result = guarded(&name, || sink.run(&mut input));
        let rows_out = match result {
            Ok(rows) => rows,
            Err(err) => {
                record(&failure, err);
                0
            }
        };
        StageStats {
            name,
            rows_in: input.rows_read(),
            rows_out,
        }
    })
}
