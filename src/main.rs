//! Entry point for the vn-sentiment binary.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vn_sentiment::experiment::{run_cli, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    run_cli(cli).context("vn-sentiment failed")
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the `--log-level` flag.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
