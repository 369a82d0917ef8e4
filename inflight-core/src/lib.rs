pub mod analysis;
pub mod cli;
pub mod conf;
pub mod duration;
pub mod error;
pub mod event;
pub mod interval;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod row;
pub mod stage;
pub mod stream;
pub mod tabular;

pub use error::{PipelineError, Result};
pub use row::{Header, Row};
