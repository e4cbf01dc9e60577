//! Entry point for the ezcar-ops command line.

use std::process::ExitCode;

use clap::Parser;
use ezcar_ops::cli::{
    self,
    Cli,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ezcar_ops=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::run(Cli::parse()).await
}
