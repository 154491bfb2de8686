//! Chunk assignment for code splitting
//!
//! Partitions the module graph into named output chunks using an ordered
//! list of path-matching rules. The tie-break is the one behavior worth
//! preserving exactly: the first matching rule in configuration order wins.

use anyhow::{Context, Result};
use regex::Regex;

use super::ModuleId;
use crate::config::ChunkRuleConfig;

/// Type of chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkType {
    /// Anchored by an entry point; ends by executing its entry module
    Entry,
    /// Produced by a partition rule; only registers its modules
    Split,
}

/// A chunk is a group of modules emitted as one output file
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Chunk name (used for the output filename)
    pub name: String,

    /// Type of chunk
    pub chunk_type: ChunkType,

    /// Module IDs included in this chunk, in traversal order
    pub module_ids: Vec<ModuleId>,

    /// Entry module to execute after registration (entry chunks only)
    pub entry_module: Option<ModuleId>,
}

impl Chunk {
    pub fn entry(name: String, entry_module: ModuleId) -> Self {
        Self {
            name,
            chunk_type: ChunkType::Entry,
            module_ids: Vec::new(),
            entry_module: Some(entry_module),
        }
    }

    pub fn split(name: String) -> Self {
        Self {
            name,
            chunk_type: ChunkType::Split,
            module_ids: Vec::new(),
            entry_module: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.module_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.module_ids.len()
    }
}

/// The compiled partition decision table.
///
/// Evaluation is purely positional: patterns are tried top to bottom and the
/// first hit decides the chunk, so "everything under src/store/ except its
/// named subdirectories" is expressed by listing the subdirectory rules
/// first and the broad rule after them.
#[derive(Debug)]
pub struct ChunkRules {
    rules: Vec<(String, Regex)>,
}

impl ChunkRules {
    /// Compile the configured rules, preserving their order
    pub fn compile(configs: &[ChunkRuleConfig]) -> Result<Self> {
        let mut rules = Vec::with_capacity(configs.len());
        for rule in configs {
            let regex = Regex::new(&rule.pattern).with_context(|| {
                format!("Invalid pattern for chunk '{}': {}", rule.name, rule.pattern)
            })?;
            rules.push((rule.name.clone(), regex));
        }
        Ok(Self { rules })
    }

    /// Assign a root-relative module path to a chunk name.
    ///
    /// Returns `None` when no rule matches; the caller falls back to the
    /// owning entry's chunk so that every module lands in exactly one chunk.
    pub fn assign(&self, module_path: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(_, regex)| regex.is_match(module_path))
            .map(|(name, _)| name.as_str())
    }

    /// Chunk names in rule order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
