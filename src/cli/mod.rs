//! Command-line interface.

mod build;
mod init;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Successful exit.
pub const EXIT_SUCCESS: u8 = 0;
/// Build or runtime failure.
pub const EXIT_ERROR: u8 = 1;
/// Invalid arguments or configuration.
pub const EXIT_INVALID_ARGS: u8 = 2;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Pattern-routed file build pipelines", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured pipelines over the source tree
    Build {
        /// Path to sift.toml (default: search upward from the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Working directory override
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Output directory name override
        #[arg(short, long)]
        output: Option<String>,

        /// Keep watching and rebuild incrementally on changes
        #[arg(short, long)]
        watch: bool,

        /// Print per-pipeline progress
        #[arg(short, long)]
        verbose: bool,
    },
    /// Write a starter sift.toml in the current directory
    Init {
        /// Overwrite an existing sift.toml
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse arguments and dispatch. Returns the process exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Build { config, cwd, output, watch, verbose } => {
            build::run_build(build::BuildArgs { config, cwd, output, watch, verbose })
        }
        Commands::Init { force } => init::run_init(force),
    };

    ExitCode::from(code)
}
