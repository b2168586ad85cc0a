//! chroma-lint CLI tool.
//!
//! Usage:
//! ```bash
//! chroma-lint check [OPTIONS] [PATH]
//! chroma-lint palette [--scan TEXT]
//! chroma-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Color-contract linter: flags raw Tailwind palette utilities in TS/JS sources
#[derive(Parser)]
#[command(name = "chroma-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CHROMA_LINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check {
        /// Path to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Additional exempt file path substrings (can be specified multiple times)
        #[arg(long = "allow-file")]
        allow_files: Vec<String>,

        /// Additional exempt property names (can be specified multiple times)
        #[arg(long = "allow-property")]
        allow_properties: Vec<String>,

        /// Fail when a file cannot be parsed instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Show the color vocabulary, or scan a string for raw color utilities
    Palette {
        /// Text to scan (e.g. a className value)
        #[arg(long)]
        scan: Option<String>,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Source snippets rendered with miette.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            exclude,
            allow_files,
            allow_properties,
            strict,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let failed = commands::check::run(
                &path,
                format,
                &commands::check::Overrides {
                    exclude,
                    allow_files,
                    allow_properties,
                    strict,
                },
                &source,
            )?;
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Palette { scan } => {
            commands::palette::run(scan.as_deref());
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
