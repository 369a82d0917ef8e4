use crate::conf::types::DEFAULT_CHANNEL_CAPACITY;
use crate::error::{PipelineError, Result};
use crate::pipeline::Pipeline;
use crate::stage::{Sink, Source, Stage};

pub struct PipelineBuilder {
    source: Option<Box<dyn Source>>,
    stages: Vec<Box<dyn Stage>>,
    sink: Option<Box<dyn Sink>>,
    channel_capacity: usize,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            source: None,
            stages: Vec::new(),
            sink: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl PipelineBuilder {
    pub fn source(mut self, source: impl Source) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Appends a stage after those already added.
    pub fn stage(mut self, stage: impl Stage) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn sink(mut self, sink: impl Sink) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Rows buffered on each link. Zero is treated as one.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        Ok(Pipeline {
            source: self.source.ok_or(PipelineError::Incomplete("source"))?,
            stages: self.stages,
            sink: self.sink.ok_or(PipelineError::Incomplete("sink"))?,
            channel_capacity: self.channel_capacity,
        })
    }
}
