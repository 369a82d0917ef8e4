use clap::Parser;
use inflight_core::cli::{self, AnalyseArgs};
use inflight_core::logging::{LogFormat, default_log_format, init_logging};

#[derive(Parser, Debug)]
#[command(
    name = "inflight",
    version,
    about = "Annotates proxy request logs with the requests in flight alongside each one"
)]
struct Cli {
    #[command(flatten)]
    args: AnalyseArgs,

    /// Diagnostics format on stderr (defaults to pretty on a terminal, JSON otherwise)
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            // Printing help or version can only fail on a closed stream.
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("fatal: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.log_format.unwrap_or_else(default_log_format));
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "inflight starting");

    cli::run(cli.args)
}
