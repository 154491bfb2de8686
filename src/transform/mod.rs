//! Code transformation
//!
//! Strips static type syntax from TypeScript-like sources and wraps JSON
//! modules. The stripper is line-preserving: the transformed module keeps
//! the original line count so the development source maps can point each
//! generated line back at the same line of the original file.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::bundler::ModuleType;
use crate::config::Config;

/// Code transformer
pub struct Transformer {
    /// Project configuration
    #[allow(dead_code)]
    config: Arc<Config>,
}

impl Transformer {
    /// Create a new transformer
    pub fn new(config: Arc<Config>) -> Result<Self> {
        Ok(Self { config })
    }

    /// Transform source code based on module type
    pub fn transform(&self, source: &str, path: &Path, module_type: &ModuleType) -> Result<String> {
        match module_type {
            ModuleType::TypeScript => {
                debug!("Stripping types: {}", path.display());
                Ok(TypeStripper::new(source).run())
            }
            ModuleType::Json => self.transform_json(source, path),
            _ => Ok(source.to_string()),
        }
    }

    /// Wrap a JSON module as a CommonJS export after validating it
    fn transform_json(&self, source: &str, path: &Path) -> Result<String> {
        serde_json::from_str::<serde_json::Value>(source)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;

        Ok(format!("module.exports = {};", source.trim_end()))
    }
}

/// Heuristic, line-preserving TypeScript type stripper.
///
/// Removes `: Type` annotations, `interface`/`type` declarations, access
/// modifiers and `as` casts. It is not a parser: strings, templates and
/// comments are copied through verbatim, and anything it cannot recognize is
/// left alone. Enum downleveling is not attempted.
struct TypeStripper {
    src: Vec<char>,
    pos: usize,
    out: String,
}

/// Annotation heads treated as types even when lowercase
const BUILTIN_TYPES: [&str; 9] = [
    "string", "number", "boolean", "any", "void", "never", "unknown", "null", "undefined",
];

/// Modifier keywords dropped from class members
const MODIFIERS: [&str; 4] = ["public", "private", "protected", "readonly"];

impl TypeStripper {
    fn new(source: &str) -> Self {
        Self {
            src: source.chars().collect(),
            pos: 0,
            out: String::with_capacity(source.len()),
        }
    }

    fn run(mut self) -> String {
        while let Some(c) = self.peek() {
            match c {
                '"' | '\'' | '`' => self.copy_string(c),
                '/' => self.copy_slash(),
                ':' => self.handle_colon(),
                c if c.is_alphabetic() || c == '_' => self.handle_word(),
                _ => self.copy_char(),
            }
        }
        self.out
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn copy_char(&mut self) {
        if let Some(c) = self.bump() {
            self.out.push(c);
        }
    }

    /// Copy a string/template literal through verbatim
    fn copy_string(&mut self, quote: char) {
        self.copy_char(); // opening quote
        let mut escaped = false;
        while let Some(c) = self.bump() {
            self.out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                break;
            }
        }
    }

    /// Copy a comment through verbatim, or a lone slash
    fn copy_slash(&mut self) {
        self.copy_char();
        match self.peek() {
            Some('/') => {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.copy_char();
                }
            }
            Some('*') => {
                self.copy_char();
                while let Some(c) = self.bump() {
                    self.out.push(c);
                    if c == '/' && self.out.ends_with("*/") {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    /// Decide whether a `:` starts a type annotation and strip it if so
    fn handle_colon(&mut self) {
        let mut probe = self.pos + 1;
        while matches!(self.src.get(probe), Some(' ') | Some('\t')) {
            probe += 1;
        }
        let mut head = String::new();
        while let Some(&c) = self.src.get(probe) {
            if c.is_alphanumeric() || c == '_' {
                head.push(c);
                probe += 1;
            } else {
                break;
            }
        }

        let looks_like_type = head
            .chars()
            .next()
            .map(|c| c.is_uppercase())
            .unwrap_or(false)
            || BUILTIN_TYPES.contains(&head.as_str());

        if !looks_like_type {
            self.copy_char();
            return;
        }

        // Drop the colon and the annotation up to the next delimiter at
        // bracket depth zero; the delimiter itself is kept
        self.pos += 1;
        let mut depth: i32 = 0;
        while let Some(c) = self.peek() {
            match c {
                '<' | '(' | '[' => depth += 1,
                '>' | ']' => depth -= 1,
                ')' if depth == 0 => break,
                ')' => depth -= 1,
                '=' | ',' | '{' | ';' | '\n' if depth == 0 => break,
                ' ' | '\t' if depth == 0 && self.delimiter_follows() => break,
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Whether only whitespace separates the cursor from a `=` or `{`
    /// delimiter; lets the annotation strip leave that whitespace in place
    fn delimiter_follows(&self) -> bool {
        let mut probe = self.pos;
        while matches!(self.src.get(probe), Some(' ') | Some('\t')) {
            probe += 1;
        }
        matches!(self.src.get(probe), Some('=') | Some('{'))
    }

    /// Handle an identifier: drop type-only keywords, keep everything else
    fn handle_word(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let word: String = self.src[start..self.pos].iter().collect();

        match word.as_str() {
            "interface" if self.at_statement_start() => self.skip_interface(),
            "type" if self.at_statement_start() && self.next_is_alias() => self.skip_type_alias(),
            w if MODIFIERS.contains(&w) && self.peek() == Some(' ') => {
                self.pos += 1; // the space after the modifier
            }
            // `import * as ns` must survive; only cast positions are dropped
            "as" if !self.last_code_char_is('*') && self.peek() == Some(' ') => {
                self.skip_cast();
            }
            _ => self.out.push_str(&word),
        }
    }

    /// Whether the emitter sits at a statement position: start of a line or
    /// right after a statement terminator
    fn at_statement_start(&self) -> bool {
        let tail = self.out.rsplit('\n').next().unwrap_or("");
        if tail.trim().is_empty() {
            return true;
        }
        matches!(tail.trim_end().chars().last(), Some(';' | '{' | '}'))
    }

    fn last_code_char_is(&self, target: char) -> bool {
        self.out.trim_end().chars().last() == Some(target)
    }

    /// Whether `type` is followed by an identifier (an alias declaration)
    fn next_is_alias(&self) -> bool {
        let mut probe = self.pos;
        while matches!(self.src.get(probe), Some(' ') | Some('\t')) {
            probe += 1;
        }
        self.src
            .get(probe)
            .map(|c| c.is_alphabetic() || *c == '_')
            .unwrap_or(false)
    }

    /// Skip an `interface X { ... }` block, preserving its newlines
    fn skip_interface(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                self.out.push('\n');
            }
            if c == '{' {
                let mut depth = 1;
                while depth > 0 {
                    match self.bump() {
                        Some('{') => depth += 1,
                        Some('}') => depth -= 1,
                        Some('\n') => self.out.push('\n'),
                        Some(_) => {}
                        None => return,
                    }
                }
                return;
            }
        }
    }

    /// Skip a `type X = ...;` declaration up to its terminator
    fn skip_type_alias(&mut self) {
        while let Some(c) = self.bump() {
            if c == ';' {
                return;
            }
            if c == '\n' {
                self.out.push('\n');
                return;
            }
        }
    }

    /// Skip an `as Type` cast; the space before `as` has already been emitted
    fn skip_cast(&mut self) {
        self.pos += 1; // space after `as`
        let mut depth: i32 = 0;
        while let Some(c) = self.peek() {
            match c {
                '<' | '(' => depth += 1,
                '>' => depth -= 1,
                ')' if depth == 0 => break,
                ')' => depth -= 1,
                ',' | ';' | '}' | '\n' if depth == 0 => break,
                c if c.is_whitespace() && depth == 0 => break,
                _ => {}
            }
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strip(source: &str) -> String {
        TypeStripper::new(source).run()
    }

    #[test]
    fn test_strips_parameter_and_return_annotations() {
        let out = strip("function add(a: number, b: number): number {\n  return a + b;\n}\n");
        assert_eq!(out, "function add(a, b) {\n  return a + b;\n}\n");
    }

    #[test]
    fn test_keeps_object_literals() {
        let out = strip("const point = { x: 1, y: 2 };\n");
        assert_eq!(out, "const point = { x: 1, y: 2 };\n");
    }

    #[test]
    fn test_default_parameters_survive() {
        let out = strip("function greet(name: string = \"world\") {}\n");
        assert_eq!(out, "function greet(name = \"world\") {}\n");
    }

    #[test]
    fn test_interface_block_blanked_but_lines_kept() {
        let source = "interface Person {\n  id: number;\n  name: string;\n}\nlet x = 1;\n";
        let out = strip(source);
        assert_eq!(out.lines().count(), source.lines().count());
        assert!(!out.contains("Person"));
        assert!(out.contains("let x = 1;"));
    }

    #[test]
    fn test_type_alias_removed() {
        let out = strip("type Id = number;\nlet a = 1;\n");
        assert!(!out.contains("Id"));
        assert!(out.contains("let a = 1;"));
    }

    #[test]
    fn test_access_modifiers_dropped() {
        let out = strip("class C {\n  private count = 0;\n  readonly name = \"c\";\n}\n");
        assert!(!out.contains("private"));
        assert!(!out.contains("readonly"));
        assert!(out.contains("count = 0;"));
    }

    #[test]
    fn test_as_cast_removed_but_namespace_import_kept() {
        let out = strip("import * as util from './util';\nconst n = x as Number;\n");
        assert!(out.contains("import * as util from './util';"));
        assert!(out.contains("const n = x ;") || out.contains("const n = x;"));
    }

    #[test]
    fn test_strings_and_comments_untouched() {
        let source = "// keep: string\nlet s = \"a: Number\";\n";
        assert_eq!(strip(source), source);
    }

    #[test]
    fn test_line_count_preserved() {
        let source = "interface A {\n  x: number;\n}\ntype B = string;\nfunction f(a: number): void {\n}\n";
        assert_eq!(strip(source).lines().count(), source.lines().count());
    }

    #[test]
    fn test_transform_json() {
        let config = Config::default_config();
        let transformer = Transformer::new(Arc::new(config)).unwrap();

        let json = r#"{"key": "value", "num": 42}"#;
        let result = transformer
            .transform_json(json, Path::new("test.json"))
            .unwrap();

        assert!(result.starts_with("module.exports = "));
        assert!(result.contains("\"num\": 42"));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let config = Config::default_config();
        let transformer = Transformer::new(Arc::new(config)).unwrap();
        assert!(transformer
            .transform_json("{not json", Path::new("bad.json"))
            .is_err());
    }
}
