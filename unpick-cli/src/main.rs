//! Command-line interface for unpick definition files
//!
//! Usage:
//!   unpick check `<files>...`                         - Parse files and report the first error of each
//!   unpick format `<file>` [--in-place]                - Rewrite a file in canonical form
//!   unpick remap `<file>` --mappings `<json>`          - Apply a mapping document
//!
//! Every command accepts `--config <toml>` to layer a configuration file over the defaults.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "unpick")]
#[command(version, about = "A tool for checking, formatting and remapping unpick definitions")]
struct Args {
    /// Configuration file layered over the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse definition files and report errors with source context
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print a definition file in canonical form
    Format {
        file: PathBuf,
        /// Overwrite the file instead of printing
        #[arg(long)]
        in_place: bool,
    },
    /// Rename classes and members of a definition file
    Remap {
        file: PathBuf,
        /// JSON mapping document
        #[arg(long)]
        mappings: PathBuf,
    },
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    let config = match commands::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let result = match &args.command {
        Command::Check { files } => commands::check(files),
        Command::Format { file, in_place } => commands::format(file, *in_place, &config),
        Command::Remap { file, mappings } => commands::remap(file, mappings, &config),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` overrides the default filter. Logs go to stderr so stdout stays canonical text.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,unpick=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
