use anyhow::{Context, Result};
use arrowmark_io::load_config;
use clap::Parser;

mod cli;
mod commands;

fn main() -> Result<()> {
    init_tracing();
    let args = cli::CliArgs::parse();
    let config = load_config(&args.config)
        .with_context(|| format!("load config {}", args.config.display()))?;
    commands::run(args.command, config)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
