//! yantra entry point.
//!
//! Check program files:
//! ```bash
//! yantra check lesson1.yb lesson2.yb --json
//! ```
//!
//! Or launch the interactive checker:
//! ```bash
//! cargo run -p yantra-repl
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use yantra_repl::check::{check_files, write_reports, OutputFormat};

#[derive(Parser)]
#[command(name = "yantra", version, about = "Static validator for Yantrabhashi programs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Accept any ELAITHE condition (overrides YANTRA_STRICTNESS and --config).
    #[arg(long, global = true)]
    relaxed: bool,

    /// Load validator settings from a JSON file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Validate program files. Exits 1 if any file has diagnostics.
    Check {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Print reports as a JSON array.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var); stdout carries results
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("yantra: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn execute(cli: Cli) -> Result<ExitCode> {
    let config = yantra_repl::resolve_config(cli.config.as_deref(), cli.relaxed)?;
    tracing::debug!(strictness = %config.strictness, "configuration resolved");

    match cli.command {
        None => {
            yantra_repl::run(config)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Check { files, json }) => {
            let reports = check_files(&files, config)?;
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            };
            let status = write_reports(&reports, format, &mut std::io::stdout().lock())?;
            Ok(ExitCode::from(status.exit_code()))
        }
    }
}
