//! Core bundler implementation
//!
//! Builds the module graph from the configured entry points, partitions it
//! into chunks with the ordered rule table, and emits one output file per
//! chunk into a freshly wiped output directory.

mod chunk;
mod graph;
mod minify;
mod sourcemap;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::{Config, Mode};
use crate::resolver::Resolver;
use crate::transform::Transformer;
use crate::utils;

pub use chunk::{Chunk, ChunkRules, ChunkType};
pub use graph::{Module, ModuleGraph, ModuleId, ModuleType};
pub use minify::minify;
pub use sourcemap::SourceMapBuilder;

/// Result of a build operation
#[derive(Debug)]
pub struct BuildResult {
    /// Generated bundles
    pub bundles: Vec<BundleInfo>,

    /// Chunk name -> emitted filename
    pub manifest: BTreeMap<String, String>,

    /// Number of modules in the graph
    pub module_count: usize,
}

/// Information about a generated bundle
#[derive(Debug)]
pub struct BundleInfo {
    /// Chunk name
    pub name: String,

    /// Output file path
    pub output_path: PathBuf,

    /// Bundle size in bytes
    pub size: usize,

    /// Source map path (development profile only)
    pub sourcemap_path: Option<PathBuf>,
}

/// Build options derived from command arguments
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Output directory override
    pub outdir: Option<PathBuf>,
}

/// The main bundler
pub struct Bundler {
    /// Project configuration
    config: Arc<Config>,

    /// Selected build profile
    mode: Mode,

    /// Build options
    options: BuildOptions,

    /// Module resolver
    resolver: Resolver,

    /// Code transformer
    transformer: Transformer,

    /// Module graph
    graph: ModuleGraph,
}

impl Bundler {
    /// Create a new bundler instance
    pub fn new(config: Config, mode: Mode, options: BuildOptions) -> Result<Self> {
        let config = Arc::new(config);
        let resolver = Resolver::new(config.clone())?;
        let transformer = Transformer::new(config.clone())?;

        Ok(Self {
            config,
            mode,
            options,
            resolver,
            transformer,
            graph: ModuleGraph::new(),
        })
    }

    /// Build the project
    pub fn build(&mut self) -> Result<BuildResult> {
        let start = Instant::now();

        // 1. Build the module graph from entry points
        info!("Building module graph...");
        self.build_module_graph()?;

        // 2. Transform all modules
        info!("Transforming modules...");
        self.transform_modules()?;

        // 3. Partition the graph into chunks
        info!("Assigning chunks...");
        let chunks = self.assign_chunks()?;

        // 4. Write output bundles
        info!("Writing bundles...");
        let bundles = self.write_bundles(&chunks)?;

        // 5. Generate manifest
        let manifest = self.generate_manifest(&bundles)?;

        debug!("Build completed in {:?}", start.elapsed());

        Ok(BuildResult {
            bundles,
            manifest,
            module_count: self.graph.len(),
        })
    }

    /// Build the module graph by traversing from entry points,
    /// in configuration order
    fn build_module_graph(&mut self) -> Result<()> {
        for (name, path) in self.config.all_entries() {
            debug!("Processing entry: {} -> {}", name, path.display());
            self.process_module(&path, true, &name)?;
        }

        Ok(())
    }

    /// Process a single module and its dependencies
    fn process_module(&mut self, path: &PathBuf, is_entry: bool, owner: &str) -> Result<ModuleId> {
        let canonical_path = fs::canonicalize(path)
            .with_context(|| format!("Failed to resolve module path: {}", path.display()))?;

        // Check if already processed
        if let Some(id) = self.graph.get_module_id(&canonical_path) {
            return Ok(id);
        }

        let source = fs::read_to_string(&canonical_path)
            .with_context(|| format!("Failed to read module: {}", canonical_path.display()))?;

        let module_type = Module::detect_type(&canonical_path);

        let dependencies =
            self.resolver
                .extract_dependencies(&source, &canonical_path, &module_type)?;

        let module = Module {
            path: canonical_path.clone(),
            source,
            module_type,
            is_entry,
            owner: owner.to_string(),
            dependencies: dependencies.clone(),
            transformed: None,
        };

        let module_id = self.graph.add_module(module);

        // Recurse into dependencies; a module first reached from this entry
        // inherits its owner chunk
        for dep in dependencies {
            let resolved = self.resolver.resolve(&dep, &canonical_path)?;
            if let Some(resolved_path) = resolved {
                let dep_id = self.process_module(&resolved_path, false, owner)?;
                self.graph.add_dependency(module_id, dep_id);
            }
        }

        Ok(module_id)
    }

    /// Transform all modules in the graph
    fn transform_modules(&mut self) -> Result<()> {
        for id in self.graph.all_module_ids() {
            let (source, path, module_type) = {
                let module = self.graph.get_module(id).context("module id out of range")?;
                (
                    module.source.clone(),
                    module.path.clone(),
                    module.module_type.clone(),
                )
            };

            let transformed = self.transformer.transform(&source, &path, &module_type)?;

            if let Some(module) = self.graph.get_module_mut(id) {
                module.transformed = Some(transformed);
            }
        }

        Ok(())
    }

    /// Partition the module graph into chunks.
    ///
    /// Every module lands in exactly one chunk: the first matching rule in
    /// configuration order wins, and modules no rule claims fall back to the
    /// chunk of the entry that first reached them.
    fn assign_chunks(&self) -> Result<Vec<Chunk>> {
        let rules = ChunkRules::compile(&self.config.chunks)?;

        let mut chunks: Vec<Chunk> = Vec::new();
        let mut index: BTreeMap<String, usize> = BTreeMap::new();

        // Entry chunks first, in entry configuration order
        for (name, path) in self.config.all_entries() {
            let canonical = fs::canonicalize(&path)?;
            let entry_id = self
                .graph
                .get_module_id(&canonical)
                .with_context(|| format!("Entry '{}' missing from module graph", name))?;
            index.insert(name.clone(), chunks.len());
            chunks.push(Chunk::entry(name, entry_id));
        }

        // Then one chunk per rule, in rule order
        for name in rules.names() {
            if !index.contains_key(name) {
                index.insert(name.to_string(), chunks.len());
                chunks.push(Chunk::split(name.to_string()));
            }
        }

        let root = fs::canonicalize(&self.config.root)?;
        for id in self.graph.all_module_ids() {
            let module = self.graph.get_module(id).context("module id out of range")?;
            let rel = utils::module_id(&module.path, &root);

            let chunk_name = rules.assign(&rel).unwrap_or(&module.owner);
            let chunk_idx = *index
                .get(chunk_name)
                .with_context(|| format!("Unknown chunk '{}'", chunk_name))?;

            debug!("{} -> chunk '{}'", rel, chunk_name);
            chunks[chunk_idx].module_ids.push(id);
        }

        // Rule chunks that matched nothing produce no output file
        chunks.retain(|c| !c.is_empty() || c.chunk_type == ChunkType::Entry);

        Ok(chunks)
    }

    /// Write bundles to disk, wiping the output directory first
    fn write_bundles(&self, chunks: &[Chunk]) -> Result<Vec<BundleInfo>> {
        let output_dir = self
            .options
            .outdir
            .clone()
            .unwrap_or_else(|| self.config.output_dir());

        self.reset_output_dir(&output_dir)?;

        let root = fs::canonicalize(&self.config.root)?;
        let mut bundles = Vec::new();

        for chunk in chunks {
            let (code, map) = self.emit_chunk(chunk, &root)?;

            let final_code = if self.mode.minify() {
                minify(&code)
            } else {
                code
            };

            // Content-derived hash keeps filenames stable while content is
            // unchanged, so clients can cache aggressively
            let filename = if self.config.output.hash {
                format!("{}.{}.js", chunk.name, utils::hash_content(final_code.as_bytes()))
            } else {
                format!("{}.js", chunk.name)
            };
            let output_path = output_dir.join(&filename);

            let mut sourcemap_path = None;
            let mut final_code = final_code;
            if let Some(map) = map {
                let map_filename = format!("{}.map", filename);
                let map_path = output_dir.join(&map_filename);
                fs::write(&map_path, map.render(&filename))
                    .with_context(|| format!("Failed to write source map: {}", map_path.display()))?;
                final_code.push_str(&format!("//# sourceMappingURL={}\n", map_filename));
                sourcemap_path = Some(map_path);
            }

            fs::write(&output_path, &final_code)
                .with_context(|| format!("Failed to write bundle: {}", output_path.display()))?;

            bundles.push(BundleInfo {
                name: chunk.name.clone(),
                output_path,
                size: final_code.len(),
                sourcemap_path,
            });
        }

        Ok(bundles)
    }

    /// Wipe and recreate the output directory.
    ///
    /// The directory is regenerated wholesale on every build; stale files
    /// from earlier builds never survive.
    fn reset_output_dir(&self, output_dir: &PathBuf) -> Result<()> {
        if output_dir.exists() {
            let canonical = fs::canonicalize(output_dir)?;
            let root = fs::canonicalize(&self.config.root)?;
            if canonical == root {
                anyhow::bail!(
                    "Output directory resolves to the project root: {}",
                    canonical.display()
                );
            }
            fs::remove_dir_all(&canonical).with_context(|| {
                format!("Failed to clear output directory: {}", canonical.display())
            })?;
        }

        fs::create_dir_all(output_dir).context("Failed to create output directory")?;
        Ok(())
    }

    /// Concatenate a chunk's modules into runtime-wrapped code, tracking a
    /// source map in the development profile
    fn emit_chunk(&self, chunk: &Chunk, root: &PathBuf) -> Result<(String, Option<SourceMapBuilder>)> {
        let mut emitter = Emitter::new(self.mode.source_maps());

        emitter.push_raw(RUNTIME_HEADER);

        for &module_id in &chunk.module_ids {
            let module = self
                .graph
                .get_module(module_id)
                .context("module id out of range")?;
            let rel = utils::module_id(&module.path, root);
            let code = module.transformed.as_deref().unwrap_or(&module.source);

            emitter.push_raw(&format!(
                "__tspack_modules__[\"{}\"] = function(module, exports, require) {{\n",
                rel
            ));
            emitter.push_module(code, &rel, &module.source);
            emitter.push_raw("};\n");
        }

        // Entry chunks end by executing their entry module. The entry module
        // itself may have been claimed by a rule into another chunk; a page
        // that forgets that chunk's script tag gets empty exports, silently.
        if let Some(entry_id) = chunk.entry_module {
            let module = self
                .graph
                .get_module(entry_id)
                .context("entry module id out of range")?;
            let rel = utils::module_id(&module.path, root);
            emitter.push_raw(&format!("__tspack_require__(\"{}\");\n", rel));
        }

        Ok(emitter.finish())
    }

    /// Generate asset manifest
    fn generate_manifest(&self, bundles: &[BundleInfo]) -> Result<BTreeMap<String, String>> {
        let mut manifest = BTreeMap::new();

        for bundle in bundles {
            if let Some(filename) = bundle.output_path.file_name() {
                manifest.insert(bundle.name.clone(), filename.to_string_lossy().to_string());
            }
        }

        if self.config.output.manifest {
            let output_dir = self
                .options
                .outdir
                .clone()
                .unwrap_or_else(|| self.config.output_dir());
            let manifest_path = output_dir.join("manifest.json");

            let manifest_json = serde_json::to_string_pretty(&manifest)?;
            fs::write(&manifest_path, manifest_json).context("Failed to write manifest.json")?;
        }

        Ok(manifest)
    }
}

/// Module runtime shared by every chunk.
///
/// The registry lives on `globalThis`, so chunks can be loaded as separate
/// script tags in any order as long as they all arrive before an entry chunk
/// requires a module registered by another chunk.
const RUNTIME_HEADER: &str = "\
var __tspack_modules__ = globalThis.__tspack_modules__ = globalThis.__tspack_modules__ || {};
var __tspack_cache__ = globalThis.__tspack_cache__ = globalThis.__tspack_cache__ || {};
function __tspack_require__(id) {
  if (__tspack_cache__[id]) { return __tspack_cache__[id].exports; }
  var module = { exports: {} };
  __tspack_cache__[id] = module;
  var fn = __tspack_modules__[id];
  if (fn) { fn(module, module.exports, __tspack_require__); }
  return module.exports;
}
";

/// Line-accounting writer that keeps generated code and source map in step
struct Emitter {
    code: String,
    map: Option<SourceMapBuilder>,
}

impl Emitter {
    fn new(with_map: bool) -> Self {
        Self {
            code: String::new(),
            map: with_map.then(SourceMapBuilder::new),
        }
    }

    /// Append runtime/wrapper text; its lines stay unmapped
    fn push_raw(&mut self, text: &str) {
        if let Some(map) = &mut self.map {
            for _ in text.lines() {
                map.skip_line();
            }
        }
        self.code.push_str(text);
        if !text.ends_with('\n') {
            self.code.push('\n');
        }
    }

    /// Append a module body, mapping each generated line to the same line of
    /// the original source when the transform preserved the line count
    fn push_module(&mut self, transformed: &str, rel_path: &str, original: &str) {
        if let Some(map) = &mut self.map {
            let transformed_lines = transformed.lines().count();
            if transformed_lines == original.lines().count() {
                let src = map.add_source(rel_path.to_string(), original.to_string());
                for line in 0..transformed_lines as u32 {
                    map.map_line(src, line);
                }
            } else {
                for _ in 0..transformed_lines {
                    map.skip_line();
                }
            }
        }
        self.code.push_str(transformed);
        if !transformed.ends_with('\n') {
            self.code.push('\n');
        }
    }

    fn finish(self) -> (String, Option<SourceMapBuilder>) {
        (self.code, self.map)
    }
}
