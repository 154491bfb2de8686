//! Configuration handling for tspack
//!
//! Parses and manages tspack.toml configuration files and the build mode
//! selector. Every misconfiguration is fatal and reported before any build
//! work begins.

mod schema;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use schema::*;

/// Build profile selected by the required `--env` flag.
///
/// Development keeps full source maps and skips minification; production
/// minifies and emits no maps. There is no third state: anything else is a
/// configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    /// Parse the environment selector argument.
    ///
    /// A missing or unrecognized value is fatal, by design: the original
    /// behavior aborts before any build work starts rather than guessing a
    /// default profile.
    pub fn from_env_arg(arg: Option<&str>) -> Result<Self> {
        match arg {
            None => anyhow::bail!(
                "missing required --env flag: pass --env development or --env production"
            ),
            Some("development") | Some("dev") => Ok(Mode::Development),
            Some("production") | Some("prod") => Ok(Mode::Production),
            Some(other) => anyhow::bail!(
                "unrecognized environment '{}': expected 'development' or 'production'",
                other
            ),
        }
    }

    /// Whether this profile minifies emitted chunks
    pub fn minify(self) -> bool {
        matches!(self, Mode::Production)
    }

    /// Whether this profile emits source maps
    pub fn source_maps(self) -> bool {
        matches!(self, Mode::Development)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project metadata
    pub project: ProjectConfig,

    /// Entry points, in configuration order
    #[serde(default, rename = "entry")]
    pub entries: Vec<EntryConfig>,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Chunk-partition rules, in configuration order
    #[serde(default, rename = "chunk")]
    pub chunks: Vec<ChunkRuleConfig>,

    /// Root directory (computed from config file location)
    #[serde(skip)]
    pub root: PathBuf,
}

impl Config {
    /// Load configuration from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let canonical_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let content = fs::read_to_string(&canonical_path)
            .with_context(|| format!("Failed to read config file: {}", canonical_path.display()))?;

        let mut config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse tspack.toml")?;

        // Set root directory to the directory containing the config file
        config.root = canonical_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        config.validate()?;

        Ok(config)
    }

    /// Create a default configuration (used by tests)
    pub fn default_config() -> Self {
        Self {
            project: ProjectConfig {
                name: "my-app".to_string(),
                version: "0.1.0".to_string(),
            },
            entries: vec![EntryConfig {
                name: "main".to_string(),
                path: "src/index.ts".to_string(),
            }],
            output: OutputConfig::default(),
            chunks: Vec::new(),
            root: PathBuf::from("."),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            anyhow::bail!("At least one [[entry]] must be specified in tspack.toml");
        }

        let mut entry_names = HashSet::new();
        for entry in &self.entries {
            if !entry_names.insert(entry.name.as_str()) {
                anyhow::bail!("Duplicate entry name: '{}'", entry.name);
            }

            let full_path = self.root.join(&entry.path);
            if !full_path.exists() {
                anyhow::bail!(
                    "Entry '{}' points to non-existent file: {}",
                    entry.name,
                    full_path.display()
                );
            }
        }

        let mut chunk_names = HashSet::new();
        for rule in &self.chunks {
            if !chunk_names.insert(rule.name.as_str()) {
                anyhow::bail!("Duplicate chunk name: '{}'", rule.name);
            }

            Regex::new(&rule.pattern).with_context(|| {
                format!("Invalid pattern for chunk '{}': {}", rule.name, rule.pattern)
            })?;
        }

        Ok(())
    }

    /// Get the absolute output directory path
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output.dir)
    }

    /// Get all entry points as (chunk name, absolute path) pairs,
    /// in configuration order
    pub fn all_entries(&self) -> Vec<(String, PathBuf)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), self.root.join(&e.path)))
            .collect()
    }
}
