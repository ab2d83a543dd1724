//! Structural extraction of exported type shapes from TypeScript source.
//!
//! This is a lightweight textual scan, not a compiler: one bounded pass per
//! file, no cross-file resolution, no generics, no inheritance expansion. The
//! trade-off buys zero-configuration startup at the cost of completeness, and
//! the `ShapeExtract` trait keeps the boundary explicit so a parser-backed
//! implementation can be substituted without touching the catalog or resolver.

use crate::domain::{FieldDescriptor, FieldKind, TypeShape};
use regex::Regex;

pub trait ShapeExtract: Send + Sync {
    /// Produces zero or more shapes for exported top-level type declarations.
    fn extract(&self, content: &str) -> Vec<TypeShape>;
}

/// Regex-backed extractor for `export interface X { … }` and
/// `export type X = { … }` declarations.
pub struct InterfaceExtractor {
    decl_re: Regex,
    field_re: Regex,
}

impl Default for InterfaceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InterfaceExtractor {
    pub fn new() -> Self {
        Self {
            // An `extends` clause is allowed but its members are not pulled in;
            // only the literal body is scanned.
            decl_re: Regex::new(
                r"(?m)^\s*export\s+(?:interface\s+([A-Za-z_$][\w$]*)[^={]*\{|type\s+([A-Za-z_$][\w$]*)\s*=\s*\{)",
            )
            .expect("declaration regex is valid"),
            // (?s) lets inline object literals span lines.
            field_re: Regex::new(
                r"(?s)^\s*(?:readonly\s+)?([A-Za-z_$][\w$]*)\s*(\?)?\s*:\s*(.+?)\s*,?\s*$",
            )
            .expect("field regex is valid"),
        }
    }

    /// Splits an interface body into top-level member declarations, keeping
    /// inline object literals intact.
    fn split_members(body: &str) -> Vec<String> {
        let mut members = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;
        for ch in body.chars() {
            match ch {
                '{' | '(' | '<' | '[' => {
                    depth += 1;
                    current.push(ch);
                }
                '}' | ')' | '>' | ']' => {
                    depth = depth.saturating_sub(1);
                    current.push(ch);
                }
                ';' | '\n' if depth == 0 => {
                    if !current.trim().is_empty() {
                        members.push(current.trim().to_string());
                    }
                    current.clear();
                }
                _ => current.push(ch),
            }
        }
        if !current.trim().is_empty() {
            members.push(current.trim().to_string());
        }
        members
    }

    fn parse_fields(&self, body: &str) -> Vec<FieldDescriptor> {
        Self::split_members(body)
            .iter()
            .filter_map(|member| {
                let caps = self.field_re.captures(member)?;
                let name = caps.get(1)?.as_str().to_string();
                let optional_marker = caps.get(2).is_some();
                let type_text = caps.get(3)?.as_str();
                let classified = classify(type_text);
                Some(FieldDescriptor {
                    name,
                    kind: classified.kind,
                    optional: optional_marker || classified.nullable,
                    is_array: classified.is_array,
                })
            })
            .collect()
    }
}

impl ShapeExtract for InterfaceExtractor {
    fn extract(&self, content: &str) -> Vec<TypeShape> {
        let content = strip_comments(content);
        let mut shapes = Vec::new();
        for caps in self.decl_re.captures_iter(&content) {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string());
            let Some(name) = name else { continue };
            // The match ends at the opening brace of the body.
            let open = caps.get(0).expect("whole match").end() - 1;
            let Some(body) = braced_body(&content, open) else {
                continue;
            };
            shapes.push(TypeShape {
                fields: self.parse_fields(body),
                name,
            });
        }
        shapes
    }
}

/// Returns the text between the brace at `open` and its matching close brace.
fn braced_body(content: &str, open: usize) -> Option<&str> {
    let bytes = content.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'{'));
    let mut depth = 0usize;
    for (offset, byte) in bytes[open..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&content[open + 1..open + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Removes `//` line comments and `/* */` block comments so neither the
/// declaration regex nor the brace matcher trips over commented-out code.
fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '/' {
            match chars.peek() {
                Some('/') => {
                    for skipped in chars.by_ref() {
                        if skipped == '\n' {
                            out.push('\n');
                            break;
                        }
                    }
                    continue;
                }
                Some('*') => {
                    chars.next();
                    let mut prev = ' ';
                    for skipped in chars.by_ref() {
                        if prev == '*' && skipped == '/' {
                            break;
                        }
                        if skipped == '\n' {
                            out.push('\n');
                        }
                        prev = skipped;
                    }
                    continue;
                }
                _ => {}
            }
        }
        out.push(ch);
    }
    out
}

struct Classified {
    kind: FieldKind,
    is_array: bool,
    nullable: bool,
}

/// Classifies a field's declared type text into a representable kind.
fn classify(type_text: &str) -> Classified {
    let trimmed = type_text.trim().trim_end_matches(';').trim();

    // Union types: drop absent-like alternatives, keep the first concrete
    // branch. `string | null` is an optional string, not a union kind.
    let branches: Vec<&str> = split_top_level(trimmed, '|');
    if branches.len() > 1 {
        let concrete: Vec<&str> = branches
            .iter()
            .map(|b| b.trim())
            .filter(|b| *b != "null" && *b != "undefined")
            .collect();
        let nullable = concrete.len() < branches.len();
        let inner = classify(concrete.first().copied().unwrap_or("string"));
        return Classified {
            kind: inner.kind,
            is_array: inner.is_array,
            nullable: nullable || inner.nullable,
        };
    }

    if let Some(element) = trimmed.strip_suffix("[]") {
        let inner = classify(element);
        return Classified {
            kind: inner.kind,
            is_array: true,
            nullable: inner.nullable,
        };
    }
    if let Some(rest) = trimmed.strip_prefix("Array<") {
        if let Some(element) = rest.strip_suffix('>') {
            let inner = classify(element);
            return Classified {
                kind: inner.kind,
                is_array: true,
                nullable: inner.nullable,
            };
        }
    }

    let kind = match trimmed {
        "string" => FieldKind::String,
        "number" | "bigint" => FieldKind::Number,
        "boolean" => FieldKind::Boolean,
        "Date" => FieldKind::Date,
        _ if trimmed.starts_with('{') => FieldKind::Object,
        // String-literal types are still strings.
        _ if trimmed.starts_with('\'') || trimmed.starts_with('"') || trimmed.starts_with('`') => {
            FieldKind::String
        }
        // A capitalized bare identifier reads as a reference to another named
        // type; without cross-file resolution the best shape is an object.
        _ if trimmed
            .chars()
            .next()
            .map(|c| c.is_ascii_uppercase())
            .unwrap_or(false)
            && trimmed.chars().all(|c| c.is_alphanumeric() || c == '_') =>
        {
            FieldKind::Object
        }
        _ => FieldKind::String,
    };
    Classified {
        kind,
        is_array: false,
        nullable: false,
    }
}

/// Splits on `sep` while ignoring separators nested inside brackets.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' | '(' | '<' | '[' => depth += 1,
            '}' | ')' | '>' | ']' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
