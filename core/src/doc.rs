//! Structured document tree and its text renderings.
//!
//! A `Doc` is the only thing the output layer knows how to render:
//!   - compact JSON, one value per line (event datasets)
//!   - pretty JSON with 2-space indentation (contracts)
//!   - a minimal block-style YAML subset (contracts)
//!
//! RULE: the JSON and YAML renderings of the same tree must parse back
//! to the same keys, values and nesting. The YAML quoting rules below
//! exist to keep that true for strings a YAML reader would otherwise
//! resolve as numbers, booleans or null.

use crate::error::GenResult;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub enum Doc {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Doc>),
    /// Ordered mapping; keys render in insertion order.
    Map(Vec<(String, Doc)>),
}

/// Records that can be rendered through the document layer.
pub trait IntoDoc {
    fn to_doc(&self) -> Doc;
}

impl Doc {
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Doc)>,
    {
        Doc::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Doc>,
    {
        Doc::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Look up a key in a mapping. `None` for non-maps and missing keys.
    pub fn get(&self, key: &str) -> Option<&Doc> {
        match self {
            Doc::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    fn is_nonempty_container(&self) -> bool {
        match self {
            Doc::Seq(items) => !items.is_empty(),
            Doc::Map(entries) => !entries.is_empty(),
            _ => false,
        }
    }

    // ── JSON ──────────────────────────────────────────────────

    /// Single-line compact JSON, no trailing newline.
    pub fn to_json_line(&self) -> GenResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Each element of a top-level sequence as its own line, every line
    /// newline-terminated. A non-sequence renders as a single line.
    pub fn to_json_lines(&self) -> GenResult<String> {
        let mut out = String::new();
        match self {
            Doc::Seq(items) => {
                for item in items {
                    out.push_str(&item.to_json_line()?);
                    out.push('\n');
                }
            }
            other => {
                out.push_str(&other.to_json_line()?);
                out.push('\n');
            }
        }
        Ok(out)
    }

    /// Indented JSON (2 spaces), newline-terminated.
    pub fn to_json_pretty(&self) -> GenResult<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    // ── YAML ──────────────────────────────────────────────────

    /// Block-style YAML, 2 spaces per nesting level, newline-terminated.
    pub fn to_yaml(&self) -> String {
        let mut lines = Vec::new();
        render_yaml(self, 0, &mut lines);
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

fn render_yaml(doc: &Doc, indent: usize, lines: &mut Vec<String>) {
    let sp = "  ".repeat(indent);
    match doc {
        Doc::Map(entries) if !entries.is_empty() => {
            for (k, v) in entries {
                let key = yaml_str(k);
                if v.is_nonempty_container() {
                    lines.push(format!("{sp}{key}:"));
                    render_yaml(v, indent + 1, lines);
                } else {
                    lines.push(format!("{sp}{key}: {}", yaml_scalar(v)));
                }
            }
        }
        Doc::Seq(items) if !items.is_empty() => {
            for v in items {
                if v.is_nonempty_container() {
                    lines.push(format!("{sp}-"));
                    render_yaml(v, indent + 1, lines);
                } else {
                    lines.push(format!("{sp}- {}", yaml_scalar(v)));
                }
            }
        }
        other => lines.push(format!("{sp}{}", yaml_scalar(other))),
    }
}

/// Render a leaf (or empty container) on a single line.
pub fn yaml_scalar(doc: &Doc) -> String {
    match doc {
        Doc::Null => "null".into(),
        Doc::Bool(true) => "true".into(),
        Doc::Bool(false) => "false".into(),
        Doc::Int(i) => i.to_string(),
        Doc::Float(f) => canonical_float(*f),
        Doc::Str(s) => yaml_str(s),
        Doc::Seq(_) => "[]".into(),
        Doc::Map(_) => "{}".into(),
    }
}

/// Same shortest round-trip form the JSON writer uses (`3.0`, `0.25`).
fn canonical_float(f: f64) -> String {
    serde_json::Number::from_f64(f)
        .map(|n| n.to_string())
        .unwrap_or_else(|| "null".into())
}

const QUOTE_TRIGGERS: &[char] = &[
    ':', '{', '}', '[', ']', ',', '#', '&', '*', '!', '|', '>', '%', '@', '`', '"', '\'',
    '\u{2028}', '\u{2029}', '\u{feff}',
];

const YAML_KEYWORDS: &[&str] = &[
    "null", "~", "true", "false", "yes", "no", "on", "off", "y", "n", ".inf", ".nan", "<<",
];

pub fn yaml_str(s: &str) -> String {
    if needs_quotes(s) {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if must_escape(c) => push_escaped(&mut out, c),
                c => out.push(c),
            }
        }
        out.push('"');
        out
    } else {
        s.to_string()
    }
}

/// Characters a YAML reader rejects or folds inside a double-quoted scalar.
fn must_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}')
}

fn push_escaped(out: &mut String, c: char) {
    let code = u32::from(c);
    if code <= 0xff {
        out.push_str(&format!("\\x{code:02X}"));
    } else {
        out.push_str(&format!("\\u{code:04X}"));
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.contains(QUOTE_TRIGGERS)
        || s.trim() != s
        || s.chars().any(must_escape)
        || s.starts_with(['-', '?'])
        || resolves_to_non_string(s)
}

/// Plain scalars a YAML reader would turn into null, bool or a number.
fn resolves_to_non_string(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    YAML_KEYWORDS.contains(&lower.as_str())
        || s.parse::<f64>().is_ok()
        || lower.starts_with("0x")
        || lower.starts_with("0o")
        || lower.starts_with("0b")
}

impl Serialize for Doc {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Doc::Null => s.serialize_unit(),
            Doc::Bool(b) => s.serialize_bool(*b),
            Doc::Int(i) => s.serialize_i64(*i),
            Doc::Float(f) => s.serialize_f64(*f),
            Doc::Str(v) => s.serialize_str(v),
            Doc::Seq(items) => {
                let mut seq = s.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Doc::Map(entries) => {
                let mut map = s.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

// ── Conversions ───────────────────────────────────────────────

impl From<bool> for Doc {
    fn from(v: bool) -> Self {
        Doc::Bool(v)
    }
}

impl From<i64> for Doc {
    fn from(v: i64) -> Self {
        Doc::Int(v)
    }
}

impl From<i32> for Doc {
    fn from(v: i32) -> Self {
        Doc::Int(i64::from(v))
    }
}

impl From<u32> for Doc {
    fn from(v: u32) -> Self {
        Doc::Int(i64::from(v))
    }
}

impl From<f64> for Doc {
    fn from(v: f64) -> Self {
        Doc::Float(v)
    }
}

impl From<&str> for Doc {
    fn from(v: &str) -> Self {
        Doc::Str(v.to_string())
    }
}

impl From<String> for Doc {
    fn from(v: String) -> Self {
        Doc::Str(v)
    }
}

impl From<&String> for Doc {
    fn from(v: &String) -> Self {
        Doc::Str(v.clone())
    }
}

impl<T: Into<Doc>> From<Option<T>> for Doc {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Doc::Null)
    }
}

impl From<Vec<Doc>> for Doc {
    fn from(v: Vec<Doc>) -> Self {
        Doc::Seq(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_strings_stay_bare() {
        assert_eq!(yaml_str("customer_id"), "customer_id");
        assert_eq!(yaml_str("Premier Bakery LLC"), "Premier Bakery LLC");
        assert_eq!(yaml_str("$schema"), "$schema");
    }

    #[test]
    fn special_characters_force_quotes() {
        assert_eq!(yaml_str(""), "\"\"");
        assert_eq!(yaml_str("a: b"), "\"a: b\"");
        assert_eq!(yaml_str(" padded"), "\" padded\"");
        assert_eq!(yaml_str("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(yaml_str("back\\slash'"), "\"back\\\\slash'\"");
        assert_eq!(yaml_str("two\nlines"), "\"two\\nlines\"");
        assert_eq!(yaml_str("^[0-9]{4}$"), "\"^[0-9]{4}$\"");
    }

    #[test]
    fn control_and_separator_characters_are_escaped() {
        assert_eq!(yaml_str("a\u{1}b"), "\"a\\x01b\"");
        assert_eq!(yaml_str("a\u{7f}b"), "\"a\\x7Fb\"");
        assert_eq!(yaml_str("a\u{85}b"), "\"a\\x85b\"");
        assert_eq!(yaml_str("a\u{2028}b"), "\"a\\u2028b\"");
        assert_eq!(yaml_str("a\u{2029}b"), "\"a\\u2029b\"");
    }

    #[test]
    fn merge_key_lookalike_is_quoted() {
        let doc = Doc::map([("<<", Doc::from("<<"))]);
        assert_eq!(doc.to_yaml(), "\"<<\": \"<<\"\n");
    }

    #[test]
    fn scalar_lookalikes_are_quoted() {
        assert_eq!(yaml_str("5411"), "\"5411\"");
        assert_eq!(yaml_str("1.0"), "\"1.0\"");
        assert_eq!(yaml_str("true"), "\"true\"");
        assert_eq!(yaml_str("No"), "\"No\"");
        assert_eq!(yaml_str("null"), "\"null\"");
        assert_eq!(yaml_str("-dash"), "\"-dash\"");
    }

    #[test]
    fn scalars_render_canonically() {
        assert_eq!(yaml_scalar(&Doc::Null), "null");
        assert_eq!(yaml_scalar(&Doc::Bool(false)), "false");
        assert_eq!(yaml_scalar(&Doc::Int(-7)), "-7");
        assert_eq!(yaml_scalar(&Doc::Float(3.0)), "3.0");
        assert_eq!(yaml_scalar(&Doc::Float(0.25)), "0.25");
        assert_eq!(yaml_scalar(&Doc::Float(f64::NAN)), "null");
    }

    #[test]
    fn nested_yaml_layout() {
        let doc = Doc::map([
            ("title", Doc::from("raw_disputes")),
            ("required", Doc::seq(["dispute_id", "amount"])),
            (
                "columns",
                Doc::Seq(vec![Doc::map([
                    ("name", Doc::from("mcc")),
                    ("required", Doc::Bool(true)),
                ])]),
            ),
            ("empty", Doc::Map(Vec::new())),
            ("none", Doc::Seq(Vec::new())),
        ]);
        let expected = "\
title: raw_disputes
required:
  - dispute_id
  - amount
columns:
  -
    name: mcc
    required: true
empty: {}
none: []
";
        assert_eq!(doc.to_yaml(), expected);
    }

    #[test]
    fn json_lines_one_record_per_line() {
        let doc = Doc::Seq(vec![
            Doc::map([("a", Doc::Int(1)), ("b", Doc::Null)]),
            Doc::map([("a", Doc::Int(2)), ("b", Doc::from("ü"))]),
        ]);
        assert_eq!(
            doc.to_json_lines().unwrap(),
            "{\"a\":1,\"b\":null}\n{\"a\":2,\"b\":\"ü\"}\n"
        );
    }

    #[test]
    fn pretty_json_keeps_key_order() {
        let doc = Doc::map([("z", Doc::Int(1)), ("a", Doc::Int(2))]);
        assert_eq!(doc.to_json_pretty().unwrap(), "{\n  \"z\": 1,\n  \"a\": 2\n}\n");
    }

    #[test]
    fn option_maps_to_null() {
        assert_eq!(Doc::from(None::<String>), Doc::Null);
        assert_eq!(Doc::from(Some("x")), Doc::Str("x".into()));
    }
}
