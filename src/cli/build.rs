//! Build command implementation

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::bundler::{BuildOptions, Bundler};
use crate::config::{Config, Mode};
use crate::utils;

/// Bundle the project for the selected environment
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Target environment: development or production (required)
    #[arg(long)]
    pub env: Option<String>,

    /// Output directory override
    #[arg(short, long)]
    pub outdir: Option<PathBuf>,
}

impl BuildCommand {
    pub fn execute(&self, config_path: &str) -> Result<()> {
        let start = Instant::now();

        // The environment selector is validated before any build work; a
        // missing or unknown value aborts right here
        let mode = Mode::from_env_arg(self.env.as_deref())?;

        info!("Loading configuration from {}", config_path);
        let config = Config::load(config_path)?;

        eprintln!(
            "{} Building project ({})...",
            "→".blue(),
            mode.as_str().bold()
        );

        let mut bundler = Bundler::new(config, mode, self.into())?;
        let result = bundler.build()?;

        let duration = start.elapsed();

        eprintln!(
            "\n{} Bundled {} module(s) into {} chunk(s) in {}\n",
            "✓".green().bold(),
            result.module_count,
            result.bundles.len(),
            utils::format_duration(duration)
        );

        for bundle in &result.bundles {
            let map_marker = if bundle.sourcemap_path.is_some() {
                " +map"
            } else {
                ""
            };
            eprintln!(
                "  {} {} {}{}",
                "•".dimmed(),
                bundle.output_path.display().to_string().cyan(),
                utils::format_size(bundle.size).dimmed(),
                map_marker.dimmed()
            );
        }

        eprintln!();

        Ok(())
    }
}

impl From<&BuildCommand> for BuildOptions {
    fn from(cmd: &BuildCommand) -> Self {
        Self {
            outdir: cmd.outdir.clone(),
        }
    }
}
