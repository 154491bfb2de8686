//! Module graph data structures

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

/// Unique identifier for a module
pub type ModuleId = usize;

/// Types of modules the bundler can handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleType {
    Script,
    TypeScript,
    Json,
    Unknown,
}

impl ModuleType {
    /// Determine module type from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => ModuleType::Script,
            "ts" | "mts" | "cts" => ModuleType::TypeScript,
            "json" => ModuleType::Json,
            _ => ModuleType::Unknown,
        }
    }

    /// Check if this module kind can carry import statements
    pub fn has_imports(&self) -> bool {
        matches!(self, ModuleType::Script | ModuleType::TypeScript)
    }
}

/// A module in the dependency graph
#[derive(Debug, Clone)]
pub struct Module {
    /// Absolute path to the module
    pub path: PathBuf,

    /// Original source code
    pub source: String,

    /// Module type
    pub module_type: ModuleType,

    /// Whether this is an entry point
    pub is_entry: bool,

    /// Name of the entry chunk that first reached this module. Modules no
    /// partition rule claims fall back into this chunk.
    pub owner: String,

    /// Import specifiers found in this module
    pub dependencies: Vec<String>,

    /// Transformed code (after type stripping / JSON wrapping)
    pub transformed: Option<String>,
}

impl Module {
    /// Detect module type from path
    pub fn detect_type(path: &PathBuf) -> ModuleType {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(ModuleType::from_extension)
            .unwrap_or(ModuleType::Unknown)
    }
}

/// The module dependency graph
#[derive(Debug, Default)]
pub struct ModuleGraph {
    /// All modules indexed by their ID
    modules: HashMap<ModuleId, Module>,

    /// Map from path to module ID
    path_to_id: HashMap<PathBuf, ModuleId>,

    /// Dependency edges: module ID -> set of dependency IDs
    edges: HashMap<ModuleId, HashSet<ModuleId>>,

    /// Module IDs in insertion (traversal) order, for deterministic output
    order: Vec<ModuleId>,

    /// Next available module ID
    next_id: ModuleId,
}

impl ModuleGraph {
    /// Create a new empty module graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module to the graph
    pub fn add_module(&mut self, module: Module) -> ModuleId {
        let path = module.path.clone();

        if let Some(&id) = self.path_to_id.get(&path) {
            return id;
        }

        let id = self.next_id;
        self.next_id += 1;

        self.path_to_id.insert(path, id);
        self.modules.insert(id, module);
        self.edges.insert(id, HashSet::new());
        self.order.push(id);

        id
    }

    /// Add a dependency edge between modules
    pub fn add_dependency(&mut self, from: ModuleId, to: ModuleId) {
        if let Some(deps) = self.edges.get_mut(&from) {
            deps.insert(to);
        }
    }

    /// Get module ID from path
    pub fn get_module_id(&self, path: &PathBuf) -> Option<ModuleId> {
        self.path_to_id.get(path).copied()
    }

    /// Get a module by ID
    pub fn get_module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    /// Get a mutable reference to a module
    pub fn get_module_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(&id)
    }

    /// All module IDs in traversal order
    pub fn all_module_ids(&self) -> Vec<ModuleId> {
        self.order.clone()
    }

    /// Get all modules reachable from a given module (BFS)
    pub fn get_reachable_modules(&self, start: ModuleId) -> Vec<ModuleId> {
        let mut visited = HashSet::new();
        let mut result = Vec::new();
        let mut queue = VecDeque::new();

        queue.push_back(start);
        visited.insert(start);

        while let Some(id) = queue.pop_front() {
            result.push(id);

            if let Some(deps) = self.edges.get(&id) {
                // Deterministic visit order
                let mut deps: Vec<ModuleId> = deps.iter().copied().collect();
                deps.sort_unstable();
                for dep_id in deps {
                    if visited.insert(dep_id) {
                        queue.push_back(dep_id);
                    }
                }
            }
        }

        result
    }

    /// Get entry point modules
    pub fn get_entry_modules(&self) -> Vec<ModuleId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.modules.get(id).map(|m| m.is_entry).unwrap_or(false))
            .collect()
    }

    /// Total number of modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if graph is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(path: &str, is_entry: bool) -> Module {
        Module {
            path: PathBuf::from(path),
            source: String::new(),
            module_type: ModuleType::TypeScript,
            is_entry,
            owner: "main".to_string(),
            dependencies: vec![],
            transformed: None,
        }
    }

    #[test]
    fn test_module_type_detection() {
        assert_eq!(ModuleType::from_extension("js"), ModuleType::Script);
        assert_eq!(ModuleType::from_extension("mjs"), ModuleType::Script);
        assert_eq!(ModuleType::from_extension("ts"), ModuleType::TypeScript);
        assert_eq!(ModuleType::from_extension("json"), ModuleType::Json);
        assert_eq!(ModuleType::from_extension("css"), ModuleType::Unknown);
    }

    #[test]
    fn test_add_module_is_idempotent_per_path() {
        let mut graph = ModuleGraph::new();
        let a = graph.add_module(module("/p/a.ts", true));
        let again = graph.add_module(module("/p/a.ts", true));
        assert_eq!(a, again);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_reachability() {
        let mut graph = ModuleGraph::new();
        let a = graph.add_module(module("/p/a.ts", true));
        let b = graph.add_module(module("/p/b.ts", false));
        let c = graph.add_module(module("/p/c.ts", false));
        let d = graph.add_module(module("/p/d.ts", false));
        graph.add_dependency(a, b);
        graph.add_dependency(b, c);

        let reachable = graph.get_reachable_modules(a);
        assert_eq!(reachable, vec![a, b, c]);
        assert!(!reachable.contains(&d));
    }

    #[test]
    fn test_entry_modules() {
        let mut graph = ModuleGraph::new();
        let a = graph.add_module(module("/p/a.ts", true));
        graph.add_module(module("/p/b.ts", false));
        let c = graph.add_module(module("/p/c.ts", true));
        assert_eq!(graph.get_entry_modules(), vec![a, c]);
    }

    #[test]
    fn test_traversal_order_is_stable() {
        let mut graph = ModuleGraph::new();
        let a = graph.add_module(module("/p/a.ts", true));
        let b = graph.add_module(module("/p/b.ts", false));
        let c = graph.add_module(module("/p/c.ts", false));
        assert_eq!(graph.all_module_ids(), vec![a, b, c]);
    }
}
