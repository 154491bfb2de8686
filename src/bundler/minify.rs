//! Minification for the production profile
//!
//! Comment stripping and whitespace collapsing only. Identifier renaming and
//! dead-code elimination are out of scope for a toy bundler; this is enough
//! to demonstrate that runtime errors survive minification.

/// Lexical state while scanning the chunk text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    /// Inside a string literal delimited by the given quote
    Str(char),
    LineComment,
    BlockComment,
}

/// Strip comments and collapse runs of whitespace, leaving string and
/// template literals untouched.
pub fn minify(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut state = State::Code;
    let mut escaped = false;
    let mut chars = code.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Str(quote) => {
                out.push(c);
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == quote {
                    state = State::Code;
                }
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                    push_whitespace(&mut out, '\n');
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                }
            }
            State::Code => match c {
                '"' | '\'' | '`' => {
                    out.push(c);
                    state = State::Str(c);
                }
                '/' => match chars.peek() {
                    Some('/') => {
                        chars.next();
                        state = State::LineComment;
                    }
                    Some('*') => {
                        chars.next();
                        state = State::BlockComment;
                    }
                    _ => out.push(c),
                },
                c if c.is_whitespace() => push_whitespace(&mut out, c),
                _ => out.push(c),
            },
        }
    }

    out
}

/// Collapse whitespace runs; newlines take priority so statement boundaries
/// that relied on automatic semicolon insertion stay intact.
fn push_whitespace(out: &mut String, c: char) {
    if c == '\n' {
        if out.ends_with(' ') {
            out.pop();
        }
        if !out.ends_with('\n') && !out.is_empty() {
            out.push('\n');
        }
    } else if !out.ends_with(' ') && !out.ends_with('\n') && !out.is_empty() {
        out.push(' ');
    }
}
