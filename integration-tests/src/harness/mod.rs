pub mod io;
pub mod logs;
pub mod tracing;

pub use io::{FailingWriter, SharedBuffer, output_header, read_output, run_cli};
pub use logs::{LoggedRequest, log_line};
pub use tracing::{CapturedEvent, init_test_tracing};
