//! CLI module for GPU Portal
//!
//! Provides command-line interface parsing and handling for the gpu-portal binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GPU Portal - research GPU resource portal
///
/// Mock backend and UI host for requesting and tracking GPU allocations.
#[derive(Parser, Debug)]
#[command(
    name = "gpu-portal",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "GPU Portal - request and track research GPU resources",
    long_about = "Mock backend for the GPU resource portal. Serves canned data after a\n\
                  configurable simulated latency, and hosts the Leptos UI.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a configuration.",
    after_help = "EXAMPLES:\n    \
                  gpu-portal init                   # Write gpu-portal.toml and .env.example\n    \
                  gpu-portal                        # Start the server (requires gpu-portal.toml)\n    \
                  gpu-portal config --validate      # Check the configuration\n    \
                  gpu-portal --config my.toml       # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "gpu-portal.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default gpu-portal.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "3000")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Show the full configuration, including mock latencies
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
