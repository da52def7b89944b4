//! katachi CLI entry point

use anyhow::Result;
use clap::Parser;
use katachi_cli::commands::{execute, Cli};

fn main() -> Result<()> {
    // Logging goes to stderr; stdout carries only the validation report
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = execute(&cli)?;

    print!("{}", result.report.to_text());
    std::process::exit(result.exit_code());
}
