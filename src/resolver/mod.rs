//! Module resolution
//!
//! Handles resolving import specifiers to actual file paths. Bare specifiers
//! (packages) are treated as externals and skipped; the toy projects this
//! tool bundles only use relative imports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::bundler::ModuleType;
use crate::config::Config;

/// Regex patterns for extracting imports
static IMPORT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:import|export)\s+(?:(?:\{[^}]*\}|\*\s+as\s+\w+|\w+)\s+from\s+)?["']([^"']+)["']|require\s*\(\s*["']([^"']+)["']\s*\)"#).unwrap()
});

static DYNAMIC_IMPORT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s*\(\s*["']([^"']+)["']\s*\)"#).unwrap());

/// Extensions probed when a specifier omits one; TypeScript first
const EXTENSIONS: [&str; 5] = ["ts", "tsx", "js", "mjs", "json"];

/// Module resolver
pub struct Resolver {
    /// Project configuration
    #[allow(dead_code)]
    config: Arc<Config>,
}

impl Resolver {
    /// Create a new resolver
    pub fn new(config: Arc<Config>) -> Result<Self> {
        Ok(Self { config })
    }

    /// Extract import/require dependencies from source code
    pub fn extract_dependencies(
        &self,
        source: &str,
        _file_path: &Path,
        module_type: &ModuleType,
    ) -> Result<Vec<String>> {
        if !module_type.has_imports() {
            return Ok(Vec::new());
        }

        let mut dependencies = Vec::new();

        // Static imports/exports and require calls
        for cap in IMPORT_REGEX.captures_iter(source) {
            if let Some(specifier) = cap.get(1).or_else(|| cap.get(2)) {
                let spec = specifier.as_str().to_string();
                if !dependencies.contains(&spec) {
                    dependencies.push(spec);
                }
            }
        }

        // Dynamic imports
        for cap in DYNAMIC_IMPORT_REGEX.captures_iter(source) {
            if let Some(specifier) = cap.get(1) {
                let spec = specifier.as_str().to_string();
                if !dependencies.contains(&spec) {
                    dependencies.push(spec);
                }
            }
        }

        debug!("Found {} dependencies", dependencies.len());

        Ok(dependencies)
    }

    /// Resolve an import specifier to an absolute file path
    pub fn resolve(&self, specifier: &str, from: &Path) -> Result<Option<PathBuf>> {
        debug!("Resolving '{}' from '{}'", specifier, from.display());

        // Bare specifiers are externals
        if !specifier.starts_with('.') && !specifier.starts_with('/') {
            debug!("Skipping bare specifier: {}", specifier);
            return Ok(None);
        }

        let base_dir = from.parent().unwrap_or(Path::new("."));
        let resolved = self.resolve_relative(specifier, base_dir);

        debug!("Resolved to: {:?}", resolved);

        Ok(resolved)
    }

    /// Resolve a relative import with extension probing
    fn resolve_relative(&self, specifier: &str, base_dir: &Path) -> Option<PathBuf> {
        let target = base_dir.join(specifier);

        // Exact path first
        if target.is_file() {
            return Some(target);
        }

        // Then extension probing
        for ext in &EXTENSIONS {
            let with_ext = target.with_extension(ext);
            if with_ext.is_file() {
                return Some(with_ext);
            }
        }

        // Then as a directory with an index file
        if target.is_dir() {
            for ext in &EXTENSIONS {
                let index = target.join(format!("index.{}", ext));
                if index.is_file() {
                    return Some(index);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_imports() {
        let source = r#"
            import foo from './foo';
            import { bar } from './bar.ts';
            import * as baz from '../baz';
            export { qux } from './qux';
            const x = require('./x');
        "#;

        let config = Config::default_config();
        let resolver = Resolver::new(Arc::new(config)).unwrap();
        let deps = resolver
            .extract_dependencies(source, Path::new("/test.ts"), &ModuleType::TypeScript)
            .unwrap();

        assert!(deps.contains(&"./foo".to_string()));
        assert!(deps.contains(&"./bar.ts".to_string()));
        assert!(deps.contains(&"../baz".to_string()));
        assert!(deps.contains(&"./qux".to_string()));
        assert!(deps.contains(&"./x".to_string()));
    }

    #[test]
    fn test_extract_dynamic_imports() {
        let source = r#"
            const module = import('./dynamic');
            const other = import("./other");
        "#;

        let config = Config::default_config();
        let resolver = Resolver::new(Arc::new(config)).unwrap();
        let deps = resolver
            .extract_dependencies(source, Path::new("/test.ts"), &ModuleType::TypeScript)
            .unwrap();

        assert!(deps.contains(&"./dynamic".to_string()));
        assert!(deps.contains(&"./other".to_string()));
    }

    #[test]
    fn test_non_script_modules_have_no_imports() {
        let config = Config::default_config();
        let resolver = Resolver::new(Arc::new(config)).unwrap();
        let deps = resolver
            .extract_dependencies(
                r#"{"import": "./fake"}"#,
                Path::new("/data.json"),
                &ModuleType::Json,
            )
            .unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn test_resolve_extension_probing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("foo.ts"), "export const foo = 1;").unwrap();
        std::fs::create_dir(root.join("lib")).unwrap();
        std::fs::write(root.join("lib/index.ts"), "export const lib = 1;").unwrap();
        let from = root.join("main.ts");
        std::fs::write(&from, "").unwrap();

        let config = Config::default_config();
        let resolver = Resolver::new(Arc::new(config)).unwrap();

        // Omitted extension resolves TypeScript-first
        assert_eq!(
            resolver.resolve("./foo", &from).unwrap(),
            Some(root.join("foo.ts"))
        );
        // Directory resolves to its index file
        assert_eq!(
            resolver.resolve("./lib", &from).unwrap(),
            Some(root.join("lib/index.ts"))
        );
        // Bare specifiers are externals
        assert_eq!(resolver.resolve("react", &from).unwrap(), None);
        // Missing files resolve to nothing
        assert_eq!(resolver.resolve("./missing", &from).unwrap(), None);
    }
}
