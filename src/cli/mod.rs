//! Command-line interface for tspack
//!
//! Provides the main CLI structure using clap with subcommands for:
//! - `build`: bundle the project for a selected environment
//! - `demo`: run the example domain scenario

mod build;
mod demo;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

pub use build::BuildCommand;
pub use demo::DemoCommand;

/// tspack - a toy TypeScript bundler with code splitting
#[derive(Parser, Debug)]
#[command(name = "tspack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to tspack.toml config file
    #[arg(short, long, global = true, default_value = "tspack.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bundle the project (requires --env development|production)
    Build(BuildCommand),

    /// Run the example store and zoo scenario
    Demo(DemoCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> Result<()> {
        print_banner();

        match &self.command {
            Commands::Build(cmd) => cmd.execute(&self.config),
            Commands::Demo(cmd) => cmd.execute(),
        }
    }
}

/// Print the tspack banner
fn print_banner() {
    eprintln!(
        "\n{} {} {}\n",
        "⚡".cyan(),
        "tspack".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
