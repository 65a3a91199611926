//! slotjsx CLI - render and check slotted markup.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

use commands::config::load_config;
use commands::render::OutputFormat;

#[derive(Parser)]
#[command(name = "slotjsx")]
#[command(about = "Render and check Slot/Slottable markup")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to slotjsx.toml config file
    #[arg(short, long, default_value = "slotjsx.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and a demo markup file
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Render a markup file through the slot runtime
    Render {
        /// Markup file to render
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "html")]
        format: OutputFormat,

        /// Use the development runtime (records source locations)
        #[arg(long)]
        dev: bool,
    },

    /// Check markup files for slotting errors
    Check {
        /// File or directory to check
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Render { file, format, dev } => {
            let config = load_config(&cli.config)?;
            commands::render::run(&config, &file, format, dev)?;
        }
        Commands::Check { path } => {
            let config = load_config(&cli.config)?;
            commands::check::run(&config, &path)?;
        }
    }

    Ok(())
}
