//! Entry point for the Pension Engine binary.
//!
//! Running this binary reads a JSON input document (a file argument or
//! stdin), computes the pension and prints the result as JSON.  The
//! directory holding formula revisions may be given with
//! `--formula-dir` or the `PENSION_FORMULA_DIR` environment variable;
//! without one the built-in 2024 revision is used.

use anyhow::Result;
use clap::Parser;
use pension_engine::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let output = run(&cli)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
