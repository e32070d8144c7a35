//! CLI commands for runners-api.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "runners-api")]
#[command(version, about = "Runners API: race results and best-time tracking", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database path (overrides config)
        #[arg(short, long, value_name = "FILE")]
        database: Option<PathBuf>,
    },
}
