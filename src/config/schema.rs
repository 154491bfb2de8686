//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Project metadata configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// A single program entry point.
///
/// Entries are declared as an array of tables so their order in the config
/// file is preserved; that order decides which entry claims a shared module
/// when no chunk rule matches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Chunk name for this entry (used in output filenames)
    pub name: String,

    /// Path to the entry source file, relative to the project root
    pub path: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory, wiped and regenerated on every build
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Include a content-derived hash in output filenames.
    ///
    /// Unchanged chunk content keeps a stable filename across builds,
    /// which is what makes long-lived client-side caching safe.
    #[serde(default = "default_true")]
    pub hash: bool,

    /// Generate manifest.json mapping chunk names to emitted filenames
    #[serde(default = "default_true")]
    pub manifest: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            hash: true,
            manifest: true,
        }
    }
}

fn default_output_dir() -> String {
    "dist".to_string()
}

fn default_true() -> bool {
    true
}

/// A chunk-partition rule.
///
/// Rules form an ordered decision table: each module path (relative to the
/// project root, forward slashes) is tested against every rule in config
/// order, and the first match wins. A module matched by no rule falls into
/// the chunk of the entry that first reached it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRuleConfig {
    /// Name of the chunk this rule assigns modules to
    pub name: String,

    /// Regex tested against the root-relative module path
    pub pattern: String,
}
