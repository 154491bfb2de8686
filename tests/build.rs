//! End-to-end build tests against a scratch project
//!
//! Lays out a small multi-directory TypeScript project in a temp dir and
//! drives the bundler through both profiles via the library API.

use std::fs;
use std::path::{Path, PathBuf};

use tspack::bundler::{BuildOptions, BuildResult, Bundler};
use tspack::config::{Config, Mode};

const CONFIG: &str = r#"
[project]
name = "demo-shop"

[[entry]]
name = "main"
path = "src/index.ts"

[[chunk]]
name = "store-checkout"
pattern = "^src/store/checkout/"

[[chunk]]
name = "store"
pattern = "^src/store/"

[output]
dir = "dist"
hash = true
manifest = true
"#;

/// Write the scratch project and return its root
fn scaffold() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join("tspack.toml"), CONFIG).unwrap();
    fs::create_dir_all(root.join("src/store/checkout")).unwrap();

    fs::write(
        root.join("src/index.ts"),
        "import { catalog } from './store/catalog';\n\
         import { order } from './store/checkout/order';\n\
         import { log } from './util';\n\
         log(catalog, order);\n",
    )
    .unwrap();
    fs::write(
        root.join("src/store/catalog.ts"),
        "// the catalog module\nexport const catalog: string = 'catalog';\n",
    )
    .unwrap();
    fs::write(
        root.join("src/store/checkout/order.ts"),
        "import { catalog } from '../catalog';\nexport const order: string = 'order for ' + catalog;\n",
    )
    .unwrap();
    fs::write(
        root.join("src/util.ts"),
        "export function log(...args: any) { console.log(args); }\n",
    )
    .unwrap();

    dir
}

fn build(root: &Path, mode: Mode) -> BuildResult {
    let config = Config::load(root.join("tspack.toml")).unwrap();
    let mut bundler = Bundler::new(config, mode, BuildOptions::default()).unwrap();
    bundler.build().unwrap()
}

fn chunk_file(root: &Path, result: &BuildResult, chunk: &str) -> PathBuf {
    root.join("dist").join(&result.manifest[chunk])
}

#[test]
fn test_partition_follows_rule_order() {
    let dir = scaffold();
    let root = dir.path();
    let result = build(root, Mode::Development);

    assert_eq!(result.module_count, 4);
    assert_eq!(result.bundles.len(), 3);

    // The narrow checkout rule is listed first, so it claims the order
    // module; the broad store rule gets the catalog; util falls back into
    // the entry chunk
    let main = fs::read_to_string(chunk_file(root, &result, "main")).unwrap();
    let store = fs::read_to_string(chunk_file(root, &result, "store")).unwrap();
    let checkout = fs::read_to_string(chunk_file(root, &result, "store-checkout")).unwrap();

    assert!(main.contains("__tspack_modules__[\"src/index.ts\"]"));
    assert!(main.contains("__tspack_modules__[\"src/util.ts\"]"));
    assert!(store.contains("__tspack_modules__[\"src/store/catalog.ts\"]"));
    assert!(!store.contains("checkout/order.ts"));
    assert!(checkout.contains("__tspack_modules__[\"src/store/checkout/order.ts\"]"));

    // Only the entry chunk executes its entry
    assert!(main.contains("__tspack_require__(\"src/index.ts\");"));
    assert!(!store.contains("__tspack_require__(\"src"));
}

#[test]
fn test_types_are_stripped_from_output() {
    let dir = scaffold();
    let root = dir.path();
    let result = build(root, Mode::Development);

    let store = fs::read_to_string(chunk_file(root, &result, "store")).unwrap();
    assert!(store.contains("export const catalog = 'catalog';"));
    assert!(!store.contains(": string"));
}

#[test]
fn test_development_profile_emits_source_maps() {
    let dir = scaffold();
    let root = dir.path();
    let result = build(root, Mode::Development);

    for bundle in &result.bundles {
        let map_path = bundle.sourcemap_path.as_ref().expect("dev emits maps");
        assert!(map_path.exists());

        let code = fs::read_to_string(&bundle.output_path).unwrap();
        let map_name = map_path.file_name().unwrap().to_string_lossy();
        assert!(code.contains(&format!("//# sourceMappingURL={}", map_name)));
    }

    let store_map = fs::read_to_string(
        result.bundles.iter().find(|b| b.name == "store").unwrap()
            .sourcemap_path.as_ref().unwrap(),
    )
    .unwrap();
    let map: serde_json::Value = serde_json::from_str(&store_map).unwrap();
    assert_eq!(map["version"], 3);
    assert_eq!(map["sources"][0], "src/store/catalog.ts");
    // Original, pre-strip source is embedded for the debugger
    assert!(map["sourcesContent"][0]
        .as_str()
        .unwrap()
        .contains("catalog: string"));
}

#[test]
fn test_production_profile_minifies_and_skips_maps() {
    let dir = scaffold();
    let root = dir.path();
    let result = build(root, Mode::Production);

    for bundle in &result.bundles {
        assert!(bundle.sourcemap_path.is_none());
    }

    let store = fs::read_to_string(chunk_file(root, &result, "store")).unwrap();
    assert!(!store.contains("the catalog module"));
    assert!(!store.contains(".map"));
}

#[test]
fn test_hashed_names_are_stable_for_unchanged_content() {
    let dir = scaffold();
    let root = dir.path();

    let first = build(root, Mode::Production);
    let second = build(root, Mode::Production);
    assert_eq!(first.manifest, second.manifest);

    // Touching one module only renames the chunks whose content changed
    fs::write(
        root.join("src/util.ts"),
        "export function log(...args: any) { console.warn(args); }\n",
    )
    .unwrap();
    let third = build(root, Mode::Production);

    assert_ne!(first.manifest["main"], third.manifest["main"]);
    assert_eq!(first.manifest["store"], third.manifest["store"]);
    assert_eq!(
        first.manifest["store-checkout"],
        third.manifest["store-checkout"]
    );
}

#[test]
fn test_output_dir_is_wiped_each_build() {
    let dir = scaffold();
    let root = dir.path();

    build(root, Mode::Production);
    let stale = root.join("dist/stale-from-last-build.js");
    fs::write(&stale, "leftover").unwrap();

    build(root, Mode::Production);
    assert!(!stale.exists());
    assert!(root.join("dist/manifest.json").exists());
}

#[test]
fn test_manifest_lists_every_chunk() {
    let dir = scaffold();
    let root = dir.path();
    let result = build(root, Mode::Production);

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("dist/manifest.json")).unwrap()).unwrap();
    for name in ["main", "store", "store-checkout"] {
        assert_eq!(manifest[name], result.manifest[name]);
        assert!(root.join("dist").join(manifest[name].as_str().unwrap()).exists());
    }
}

#[test]
fn test_missing_entry_is_a_config_error() {
    let dir = scaffold();
    let root = dir.path();
    fs::remove_file(root.join("src/index.ts")).unwrap();

    let err = Config::load(root.join("tspack.toml")).unwrap_err();
    assert!(err.to_string().contains("non-existent file"));
}
