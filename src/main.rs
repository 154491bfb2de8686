//! tspack - a toy TypeScript bundler
//!
//! Demonstrates multi-entry bundling with regex-based code splitting:
//! compile, bundle, split, minify and source-map a small client-side app.
//!
//! # Features
//! - TypeScript type stripping
//! - Ordered chunk-partition rules, first match wins
//! - Development (source maps) and production (minified) profiles
//! - Content-hashed output names and an asset manifest

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tspack::Cli;

/// Initialize the logging/tracing system
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tspack=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tspack=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    cli.execute()
}
