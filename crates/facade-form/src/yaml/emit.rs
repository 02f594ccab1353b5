//! Indented YAML writer for form documents
//!
//! Only a fixed subset of YAML is produced. The backend loads the output with
//! a full YAML library, so the quoting thresholds below are part of the wire
//! contract and must not drift.

use crate::document::{Mapping, Value};

const INDENT: &str = "  ";

/// Strings longer than this are always single-quoted.
pub const QUOTE_LENGTH_THRESHOLD: usize = 50;

/// Block bodies always sit one `INDENT` below their key or dash.
const BLOCK_INDENT_INDICATOR: &str = "2";

/// Render a document starting at indent level 0.
pub fn to_yaml_string(doc: &Mapping) -> String {
    to_yaml_string_at(doc, 0)
}

/// Render a mapping with every key at `indent` levels.
pub fn to_yaml_string_at(doc: &Mapping, indent: usize) -> String {
    let mut out = String::new();
    write_mapping(&mut out, doc, indent);
    out
}

fn write_mapping(out: &mut String, map: &Mapping, indent: usize) {
    let spaces = INDENT.repeat(indent);

    for (key, value) in map {
        match value {
            Value::Sequence(items) if items.is_empty() => {
                out.push_str(&format!("{}{}: []\n", spaces, key));
            }
            Value::Sequence(items) => {
                out.push_str(&format!("{}{}:\n", spaces, key));
                for item in items {
                    write_sequence_item(out, item, indent);
                }
            }
            Value::Mapping(inner) if inner.is_empty() => {
                out.push_str(&format!("{}{}: {{}}\n", spaces, key));
            }
            Value::Mapping(inner) => {
                out.push_str(&format!("{}{}:\n", spaces, key));
                write_mapping(out, inner, indent + 1);
            }
            scalar => {
                out.push_str(&format!(
                    "{}{}: {}\n",
                    spaces,
                    key,
                    format_scalar(scalar, indent)
                ));
            }
        }
    }
}

/// Sequence entries sit at the parent key's indentation, so the dash lines
/// up with the first key of the item.
fn write_sequence_item(out: &mut String, item: &Value, indent: usize) {
    let spaces = INDENT.repeat(indent);

    match item {
        Value::Mapping(inner) if !inner.is_empty() => {
            let body = to_yaml_string_at(inner, indent + 1);
            out.push_str(&spaces);
            out.push_str("- ");
            out.push_str(body.trim_start());
        }
        Value::Mapping(_) => {
            out.push_str(&format!("{}- {{}}\n", spaces));
        }
        Value::Sequence(inner) if inner.is_empty() => {
            out.push_str(&format!("{}- []\n", spaces));
        }
        Value::Sequence(inner) => {
            out.push_str(&format!("{}-\n", spaces));
            for nested in inner {
                write_sequence_item(out, nested, indent + 1);
            }
        }
        // A bare `-` reads back as null
        Value::String(s) if s.is_empty() => {
            out.push_str(&format!("{}- ''\n", spaces));
        }
        scalar => {
            out.push_str(&format!("{}- {}\n", spaces, format_scalar(scalar, indent)));
        }
    }
}

/// Format a scalar for the right-hand side of `key: ` at `indent`.
pub fn format_scalar(value: &Value, indent: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.clone(),
        Value::String(s) => format_string(s, indent),
        // Containers never reach here from the writers above
        Value::Mapping(_) | Value::Sequence(_) => "{}".to_string(),
    }
}

fn format_string(s: &str, indent: usize) -> String {
    if needs_block_literal(s) {
        format_block_literal(s, indent)
    } else if needs_quotes(s) {
        format!("'{}'", s.replace('\'', "''"))
    } else {
        s.to_string()
    }
}

/// `|` block whose body sits one level below `indent`.
///
/// Chomping follows the trailing newlines: none is `|-`, one is `|`, more
/// than one is `|+`. A body whose first line opens with whitespace carries
/// an explicit indentation indicator.
fn format_block_literal(s: &str, indent: usize) -> String {
    let text = s.replace("<br>", "\n");
    let (body, chomp) = match text.strip_suffix('\n') {
        None => (text.as_str(), "-"),
        Some(rest) if rest.is_empty() || rest.ends_with('\n') => (rest, "+"),
        Some(rest) => (rest, ""),
    };

    let lines: Vec<&str> = body.split('\n').collect();
    let indicator = match lines.iter().find(|line| !line.is_empty()) {
        Some(first) if first.starts_with([' ', '\t']) => BLOCK_INDENT_INDICATOR,
        _ => "",
    };

    let pad = INDENT.repeat(indent + 1);
    let rendered = lines
        .iter()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("|{}{}\n{}", indicator, chomp, rendered)
}

pub(crate) fn needs_block_literal(s: &str) -> bool {
    s.contains('\n') || s.contains(": ") || s.contains("<br>")
}

pub(crate) fn needs_quotes(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    // A bare null word would come back as a null, not as text
    matches!(s, "null" | "Null" | "NULL")
        || chars.len() > QUOTE_LENGTH_THRESHOLD
        || chars
            .iter()
            .enumerate()
            .any(|(i, &c)| !(is_plain_char(c) || is_word_hyphen(&chars, i)))
}

fn is_plain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c.is_whitespace()
}

/// A hyphen joining two letters (`Pre-defined`) never changes how YAML
/// resolves the scalar. Dates and signed numbers keep their quotes.
fn is_word_hyphen(chars: &[char], i: usize) -> bool {
    chars[i] == '-'
        && i > 0
        && chars[i - 1].is_ascii_alphabetic()
        && chars.get(i + 1).is_some_and(|c| c.is_ascii_alphabetic())
}
