//! Source map generation
//!
//! Emits version-3 source maps for the development profile. Mapping is
//! line-based: every generated line that came from a source file gets one
//! segment pointing back at the original file and line, column 0. Runtime
//! wrapper lines are left unmapped.

use serde_json::json;

const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u32 = 0b11111;
const VLQ_CONTINUATION_BIT: u32 = 0b100000;

/// Encode a signed value as base64 VLQ, appending to `out`
fn encode_vlq(value: i64, out: &mut String) {
    // Sign bit goes into the lowest bit of the first group
    let mut vlq: u64 = if value < 0 {
        (((-value) as u64) << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = (vlq as u32) & VLQ_BASE_MASK;
        vlq >>= VLQ_BASE_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION_BIT;
        }
        out.push(BASE64_CHARS[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// One generated line: either unmapped or pointing at (source, line)
#[derive(Debug, Clone, Copy)]
enum LineMapping {
    Skipped,
    Mapped { source: u32, line: u32 },
}

/// Incremental builder used while the emitter concatenates module code
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    sources: Vec<String>,
    contents: Vec<String>,
    lines: Vec<LineMapping>,
}

impl SourceMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source file; returns its index for `map_line`
    pub fn add_source(&mut self, path: String, content: String) -> u32 {
        self.sources.push(path);
        self.contents.push(content);
        (self.sources.len() - 1) as u32
    }

    /// Record that the next generated line maps to `line` (0-based) of `source`
    pub fn map_line(&mut self, source: u32, line: u32) {
        self.lines.push(LineMapping::Mapped { source, line });
    }

    /// Record a generated line with no original (runtime wrapper lines)
    pub fn skip_line(&mut self) {
        self.lines.push(LineMapping::Skipped);
    }

    /// Render the version-3 source map JSON for the given output file
    pub fn render(&self, file: &str) -> String {
        let map = json!({
            "version": 3,
            "file": file,
            "sources": self.sources,
            "sourcesContent": self.contents,
            "names": [],
            "mappings": self.encode_mappings(),
        });
        map.to_string()
    }

    fn encode_mappings(&self) -> String {
        let mut out = String::new();
        // Source index and original line are delta-encoded across the whole
        // mappings string; the generated column resets per line.
        let mut prev_source: i64 = 0;
        let mut prev_line: i64 = 0;

        for (i, mapping) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            if let LineMapping::Mapped { source, line } = mapping {
                encode_vlq(0, &mut out); // generated column
                encode_vlq(*source as i64 - prev_source, &mut out);
                encode_vlq(*line as i64 - prev_line, &mut out);
                encode_vlq(0, &mut out); // original column
                prev_source = *source as i64;
                prev_line = *line as i64;
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlq(value: i64) -> String {
        let mut s = String::new();
        encode_vlq(value, &mut s);
        s
    }

    #[test]
    fn test_vlq_known_values() {
        assert_eq!(vlq(0), "A");
        assert_eq!(vlq(1), "C");
        assert_eq!(vlq(-1), "D");
        assert_eq!(vlq(16), "gB");
        assert_eq!(vlq(-16), "hB");
    }

    #[test]
    fn test_mappings_consecutive_lines() {
        let mut builder = SourceMapBuilder::new();
        let src = builder.add_source("src/a.ts".to_string(), "let x\nlet y\n".to_string());
        builder.map_line(src, 0);
        builder.map_line(src, 1);
        assert_eq!(builder.encode_mappings(), "AAAA;AACA");
    }

    #[test]
    fn test_mappings_skip_wrapper_lines() {
        let mut builder = SourceMapBuilder::new();
        let src = builder.add_source("src/a.ts".to_string(), "let x\n".to_string());
        builder.skip_line();
        builder.map_line(src, 0);
        builder.skip_line();
        assert_eq!(builder.encode_mappings(), ";AAAA;");
    }

    #[test]
    fn test_render_shape() {
        let mut builder = SourceMapBuilder::new();
        let src = builder.add_source("src/a.ts".to_string(), "let x = 1\n".to_string());
        builder.map_line(src, 0);

        let rendered = builder.render("main.js");
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["version"], 3);
        assert_eq!(parsed["file"], "main.js");
        assert_eq!(parsed["sources"][0], "src/a.ts");
        assert_eq!(parsed["sourcesContent"][0], "let x = 1\n");
    }
}
