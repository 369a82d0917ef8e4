use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Fatal conditions that stop a pipeline run.
///
/// Non-fatal conditions (rows that cannot be split, end events without a
/// matching start) never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("stage '{stage}' failed on I/O: {source}")]
    Io {
        stage: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stage '{stage}' failed on CSV: {source}")]
    Csv {
        stage: String,
        #[source]
        source: csv::Error,
    },

    /// The downstream side of this stage's output hung up.
    #[error("output of stage '{stage}' was closed by its consumer")]
    Disconnected { stage: String },

    /// The upstream stage closed its output in a failed state.
    #[error("upstream stage '{stage}' failed")]
    Upstream { stage: String },

    #[error("stage '{stage}' violated the row stream protocol: {reason}")]
    Protocol { stage: String, reason: &'static str },

    #[error("stage '{stage}' panicked")]
    StagePanicked { stage: String },

    #[error("failed to spawn stage '{stage}': {source}")]
    Spawn {
        stage: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pipeline has no {0}")]
    Incomplete(&'static str),
}

impl PipelineError {
    pub fn io(stage: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            stage: stage.into(),
            source,
        }
    }

    pub fn csv(stage: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            stage: stage.into(),
            source,
        }
    }

    /// True when this error is only a consequence of a failure elsewhere.
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::Disconnected { .. } | Self::Protocol { .. }
        )
    }

    /// Name of the stage a downstream consumer should blame for this error.
    pub(crate) fn origin<'a>(&'a self, own: &'a str) -> &'a str {
        match self {
            Self::Upstream { stage } => stage,
            _ => own,
        }
    }
}
