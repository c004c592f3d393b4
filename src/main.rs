//! cmdmenu - drive a dynamic menu list from a shell command.
//!
//! This is the reference host around the engine: it parses arguments, wires
//! up logging, and runs a line-oriented loop suitable for piping and for
//! trying out command templates before wiring them into a real menu.

mod cli;

use anyhow::Result;
use cli::Cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cmdmenu::config::Config;
use cmdmenu::engine::Engine;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = cli.apply(config);

    let engine = Engine::new(&config);
    let code = cli::host::run(engine).await?;
    std::process::exit(code);
}

/// Initialize logging based on verbosity level.
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // stdout belongs to the entries; keep diagnostics on stderr
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= 3),
        )
        .with(env_filter)
        .init();
}
