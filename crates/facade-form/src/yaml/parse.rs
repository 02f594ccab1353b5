//! Reader for the YAML subset produced by [`super::emit`]
//!
//! Every plain scalar is kept as its source text, so `3.0`, `007` or
//! `2025-12-10` come back exactly as they were typed into the form. Anything
//! outside the subset (flow collections, anchors, tags, folded scalars)
//! returns an error and the caller falls back to a full YAML parser.

use crate::document::{Mapping, Value};
use crate::error::ParseError;

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    indent: usize,
    /// Content after the indentation, trailing whitespace intact
    text: &'a str,
}

impl<'a> Line<'a> {
    fn content(&self) -> &'a str {
        self.text.trim_end()
    }

    fn is_insignificant(&self) -> bool {
        let content = self.content();
        content.is_empty() || content.starts_with('#')
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomp {
    /// `|-`
    Strip,
    /// `|`
    Clip,
    /// `|+`
    Keep,
}

/// Parsed `|` header: chomping plus an optional indentation indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockHeader {
    chomp: Chomp,
    indent: Option<usize>,
}

/// `|`, `|-`, `|+`, `|2`, `|2-`, `|-2` and so on. Anything else is not a
/// literal block header.
fn block_header(rest: &str) -> Option<BlockHeader> {
    let indicators = rest.strip_prefix('|')?;
    let mut chomp = None;
    let mut indent = None;
    for c in indicators.chars() {
        match c {
            '-' if chomp.is_none() => chomp = Some(Chomp::Strip),
            '+' if chomp.is_none() => chomp = Some(Chomp::Keep),
            '1'..='9' if indent.is_none() => indent = c.to_digit(10).map(|d| d as usize),
            _ => return None,
        }
    }
    Some(BlockHeader {
        chomp: chomp.unwrap_or(Chomp::Clip),
        indent,
    })
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

/// Parse `text` as a subset document. An empty document yields `Value::Null`.
pub fn parse_subset(text: &str) -> Result<Value, ParseError> {
    let mut lines = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let text = raw.trim_start_matches(' ');
        lines.push(Line {
            number: i + 1,
            indent: raw.len() - text.len(),
            text,
        });
    }

    Parser { lines, pos: 0 }.parse_document()
}

fn error(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Subset {
        line,
        message: message.into(),
    }
}

fn is_sequence_entry(content: &str) -> bool {
    content == "-" || content.starts_with("- ")
}

/// `key: value` or `key:` with a plain, unquoted key.
fn looks_like_entry(content: &str) -> bool {
    !content.starts_with(['\'', '"'])
        && (content.contains(": ") || content.ends_with(':'))
}

impl<'a> Parser<'a> {
    /// Next line that carries structure, skipping blanks and comments.
    ///
    /// Tabs are rejected here only: a tab after the indentation of a block
    /// literal body is content and never reaches this point.
    fn peek(&mut self) -> Result<Option<Line<'a>>, ParseError> {
        while let Some(line) = self.lines.get(self.pos) {
            if !line.is_insignificant() {
                if line.text.starts_with('\t') {
                    return Err(error(
                        line.number,
                        "tab characters are not allowed in indentation",
                    ));
                }
                return Ok(Some(*line));
            }
            self.pos += 1;
        }
        Ok(None)
    }

    fn parse_document(mut self) -> Result<Value, ParseError> {
        if let Some(line) = self.peek()? {
            if line.content() == "---" {
                self.pos += 1;
            }
        }

        let Some(first) = self.peek()? else {
            return Ok(Value::Null);
        };

        let value = self.parse_node(first.indent)?;

        if let Some(extra) = self.peek()? {
            if extra.content() == "..." {
                return Ok(value);
            }
            return Err(error(extra.number, "unexpected content after document"));
        }
        Ok(value)
    }

    fn parse_node(&mut self, indent: usize) -> Result<Value, ParseError> {
        match self.peek()? {
            Some(line) if is_sequence_entry(line.content()) => self.parse_sequence(indent),
            Some(_) => self.parse_mapping(indent),
            None => Ok(Value::Null),
        }
    }

    fn parse_mapping(&mut self, indent: usize) -> Result<Value, ParseError> {
        let mut map = Mapping::new();

        while let Some(line) = self.peek()? {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(error(line.number, "unexpected indentation"));
            }

            let content = line.content();
            if is_sequence_entry(content) {
                return Err(error(line.number, "sequence entry where a key was expected"));
            }

            let (key, rest) = split_entry(content, line.number)?;
            self.pos += 1;
            let value = self.parse_entry_value(indent, rest, line.number)?;
            map.insert(key.to_string(), value);
        }

        Ok(Value::Mapping(map))
    }

    /// Value to the right of `key:` whose key sits at `indent`.
    fn parse_entry_value(
        &mut self,
        indent: usize,
        rest: &str,
        number: usize,
    ) -> Result<Value, ParseError> {
        if let Some(header) = block_header(rest) {
            return Ok(Value::String(self.parse_block_literal(indent, header)));
        }
        match rest {
            "" => match self.peek()? {
                Some(next) if next.indent > indent => self.parse_node(next.indent),
                Some(next) if next.indent == indent && is_sequence_entry(next.content()) => {
                    self.parse_sequence(indent)
                }
                _ => Ok(Value::String(String::new())),
            },
            _ => parse_inline_scalar(rest, number),
        }
    }

    fn parse_sequence(&mut self, indent: usize) -> Result<Value, ParseError> {
        let mut items = Vec::new();

        while let Some(line) = self.peek()? {
            let content = line.content();
            if line.indent != indent || !is_sequence_entry(content) {
                if line.indent > indent {
                    return Err(error(line.number, "unexpected indentation in sequence"));
                }
                break;
            }

            let after_dash = &line.text[1..];
            let rest = after_dash.trim_start_matches(' ');
            let offset = 1 + after_dash.len() - rest.len();
            let rest_content = rest.trim_end();

            if let Some(header) = block_header(rest_content) {
                self.pos += 1;
                items.push(Value::String(self.parse_block_literal(indent, header)));
                continue;
            }

            let item = match rest_content {
                "" => {
                    self.pos += 1;
                    match self.peek()? {
                        Some(next) if next.indent > indent => self.parse_node(next.indent)?,
                        _ => Value::Null,
                    }
                }
                _ if is_sequence_entry(rest_content) || looks_like_entry(rest_content) => {
                    // Re-read the same line as a node starting after the dash
                    self.lines[self.pos] = Line {
                        number: line.number,
                        indent: indent + offset,
                        text: rest,
                    };
                    self.parse_node(indent + offset)?
                }
                _ => {
                    self.pos += 1;
                    parse_inline_scalar(rest_content, line.number)?
                }
            };
            items.push(item);
        }

        Ok(Value::Sequence(items))
    }

    /// Collect a block body owned by a key or dash at `owner_indent`.
    ///
    /// The body indentation comes from the header's indicator, or else from
    /// the first non-blank line. Lines at or past it are content, including
    /// whitespace beyond it; shallower blank lines are empty lines.
    fn parse_block_literal(&mut self, owner_indent: usize, header: BlockHeader) -> String {
        let mut body: Vec<String> = Vec::new();
        let mut block_indent = header.indent.map(|m| owner_indent + m);

        while let Some(line) = self.lines.get(self.pos).copied() {
            let base = match block_indent {
                Some(base) => base,
                None if line.is_blank() => {
                    body.push(String::new());
                    self.pos += 1;
                    continue;
                }
                None if line.indent <= owner_indent => break,
                None => *block_indent.insert(line.indent),
            };

            if line.indent >= base {
                body.push(format!("{}{}", " ".repeat(line.indent - base), line.text));
            } else if line.is_blank() {
                body.push(String::new());
            } else {
                break;
            }
            self.pos += 1;
        }

        let trailing = body.iter().rev().take_while(|l| l.is_empty()).count();
        let content = body.len() - trailing;
        let mut text = body[..content].join("\n");
        if header.chomp != Chomp::Strip && content > 0 {
            text.push('\n');
        }
        if header.chomp == Chomp::Keep {
            text.push_str(&"\n".repeat(trailing));
        }
        text
    }
}

fn split_entry(content: &str, number: usize) -> Result<(&str, &str), ParseError> {
    if content.starts_with(['\'', '"', '?', '[', '{', '&', '*', '!', '%', '@', '`']) {
        return Err(error(number, "unsupported key syntax"));
    }
    if let Some(i) = content.find(": ") {
        Ok((content[..i].trim_end(), content[i + 2..].trim()))
    } else if let Some(key) = content.strip_suffix(':') {
        Ok((key.trim_end(), ""))
    } else {
        Err(error(number, "expected `key: value`"))
    }
}

fn parse_inline_scalar(rest: &str, number: usize) -> Result<Value, ParseError> {
    match rest {
        "{}" => return Ok(Value::Mapping(Mapping::new())),
        "[]" => return Ok(Value::Sequence(Vec::new())),
        _ => {}
    }

    if let Some(quoted) = rest.strip_prefix('\'') {
        return parse_single_quoted(quoted, number).map(Value::String);
    }
    if let Some(quoted) = rest.strip_prefix('"') {
        return parse_double_quoted(quoted, number).map(Value::String);
    }
    if rest.starts_with('#') {
        return Ok(Value::String(String::new()));
    }
    if rest.starts_with(['[', '{', '&', '*', '!', '|', '>', '%', '@', '`']) {
        return Err(error(number, "unsupported scalar syntax"));
    }

    let plain = match rest.find(" #") {
        Some(i) => rest[..i].trim_end(),
        None => rest,
    };
    match plain {
        "~" | "null" | "Null" | "NULL" => Ok(Value::Null),
        _ => Ok(Value::String(plain.to_string())),
    }
}

/// Body after the opening `'`; `''` is an escaped quote.
fn parse_single_quoted(body: &str, number: usize) -> Result<String, ParseError> {
    let mut out = String::new();
    let mut chars = body.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '\'' {
            out.push(c);
            continue;
        }
        if matches!(chars.peek(), Some((_, '\''))) {
            chars.next();
            out.push('\'');
            continue;
        }
        return check_trailing(&body[i + 1..], number).map(|_| out);
    }

    Err(error(number, "unterminated single-quoted string"))
}

fn parse_double_quoted(body: &str, number: usize) -> Result<String, ParseError> {
    let mut out = String::new();
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return check_trailing(&body[i + 1..], number).map(|_| out),
            '\\' => match chars.next() {
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, '/')) => out.push('/'),
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                _ => return Err(error(number, "unsupported escape sequence")),
            },
            _ => out.push(c),
        }
    }

    Err(error(number, "unterminated double-quoted string"))
}

fn check_trailing(after: &str, number: usize) -> Result<(), ParseError> {
    let after = after.trim_start();
    if after.is_empty() || after.starts_with('#') {
        Ok(())
    } else {
        Err(error(number, "unexpected characters after quoted string"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(value: &Value) -> &Mapping {
        value.as_mapping().expect("mapping")
    }

    #[test]
    fn test_plain_scalars_stay_text() {
        let v = parse_subset("a: 3.0\nb: 007\nc: yes\nd: 2025-12-10\n").unwrap();
        let m = mapping(&v);
        assert_eq!(m["a"], Value::from("3.0"));
        assert_eq!(m["b"], Value::from("007"));
        assert_eq!(m["c"], Value::from("yes"));
        assert_eq!(m["d"], Value::from("2025-12-10"));
    }

    #[test]
    fn test_nested_mapping_and_sequence() {
        let text = "project_info:\n  project_name: Tower A\nalum_profiles:\n- profile_type: Pre-defined\n  profile_name: M 125x60x2.5\n- {}\ncategories: []\n";
        let v = parse_subset(text).unwrap();
        let m = mapping(&v);
        assert_eq!(mapping(&m["project_info"])["project_name"], Value::from("Tower A"));

        let profiles = m["alum_profiles"].as_sequence().unwrap();
        assert_eq!(profiles.len(), 2);
        let first = mapping(&profiles[0]);
        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["profile_type", "profile_name"]);
        assert_eq!(first["profile_name"], Value::from("M 125x60x2.5"));
        assert!(mapping(&profiles[1]).is_empty());

        assert_eq!(m["categories"], Value::Sequence(vec![]));
    }

    #[test]
    fn test_indented_sequence_under_key() {
        let text = "list:\n  - a: 1\n    b: 2\n  - c: 3\n";
        let v = parse_subset(text).unwrap();
        let items = mapping(&v)["list"].as_sequence().unwrap().to_vec();
        assert_eq!(items.len(), 2);
        assert_eq!(mapping(&items[0])["b"], Value::from("2"));
    }

    #[test]
    fn test_block_literal() {
        let text = "wind:\n  note: |-\n    Note: see Fig. 1\n\n    second line\n  speed: 65.7\n";
        let v = parse_subset(text).unwrap();
        let wind = mapping(&mapping(&v)["wind"]).clone();
        assert_eq!(wind["note"], Value::from("Note: see Fig. 1\n\nsecond line"));
        assert_eq!(wind["speed"], Value::from("65.7"));
    }

    #[test]
    fn test_block_literal_in_sequence_item() {
        let text = "items:\n- note: |-\n    a\n    b\n  other: x\n";
        let v = parse_subset(text).unwrap();
        let items = mapping(&v)["items"].as_sequence().unwrap().to_vec();
        let item = mapping(&items[0]);
        assert_eq!(item["note"], Value::from("a\nb"));
        assert_eq!(item["other"], Value::from("x"));
    }

    #[test]
    fn test_block_indentation_indicator() {
        let text = "note: |2-\n    indented: first\n  second\nnext: 1\n";
        let v = parse_subset(text).unwrap();
        assert_eq!(mapping(&v)["note"], Value::from("  indented: first\nsecond"));
        assert_eq!(mapping(&v)["next"], Value::from("1"));
    }

    #[test]
    fn test_block_indicator_in_sequence_item() {
        let text = "notes:\n- |2-\n  \tsee table\n  row 2\n- x\n";
        let v = parse_subset(text).unwrap();
        let items = mapping(&v)["notes"].as_sequence().unwrap().to_vec();
        assert_eq!(items, vec![Value::from("\tsee table\nrow 2"), Value::from("x")]);
    }

    #[test]
    fn test_block_chomping() {
        let text = "a: |\n  x\n\nb: |+\n  y\n\n\nc: |+\n\nd: |-\n  z\n\n";
        let v = parse_subset(text).unwrap();
        let m = mapping(&v);
        assert_eq!(m["a"], Value::from("x\n"));
        assert_eq!(m["b"], Value::from("y\n\n\n"));
        assert_eq!(m["c"], Value::from("\n"));
        assert_eq!(m["d"], Value::from("z"));
    }

    #[test]
    fn test_tab_inside_block_body() {
        let text = "wind:\n  note: |-\n    Loads:\n    \tsee table\n  wind_speed: 65.70\n";
        let v = parse_subset(text).unwrap();
        let wind = mapping(&mapping(&v)["wind"]).clone();
        assert_eq!(wind["note"], Value::from("Loads:\n\tsee table"));
        assert_eq!(wind["wind_speed"], Value::from("65.70"));
    }

    #[test]
    fn test_tab_in_structure_rejected() {
        let err = parse_subset("wind:\n\tspeed: 1\n").unwrap_err();
        assert!(matches!(err, ParseError::Subset { line: 2, .. }));
    }

    #[test]
    fn test_quoted_scalars() {
        let v = parse_subset("a: 'it''s'\nb: \"x\\ny\"\nc: 'M 1' # trailing\n").unwrap();
        let m = mapping(&v);
        assert_eq!(m["a"], Value::from("it's"));
        assert_eq!(m["b"], Value::from("x\ny"));
        assert_eq!(m["c"], Value::from("M 1"));
    }

    #[test]
    fn test_empty_value_and_null() {
        let v = parse_subset("a: \nb: ~\nc: value # comment\n").unwrap();
        let m = mapping(&v);
        assert_eq!(m["a"], Value::from(""));
        assert!(m["b"].is_null());
        assert_eq!(m["c"], Value::from("value"));
    }

    #[test]
    fn test_comments_and_document_marker() {
        let v = parse_subset("---\n# heading\na: 1\n\n# between\nb: 2\n").unwrap();
        assert_eq!(mapping(&v).len(), 2);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse_subset("").unwrap(), Value::Null);
        assert_eq!(parse_subset("\n# only a comment\n").unwrap(), Value::Null);
    }

    #[test]
    fn test_rejects_flow_and_json() {
        assert!(parse_subset("{\"a\": 1}").is_err());
        assert!(parse_subset("a: [1, 2]").is_err());
        assert!(parse_subset("a: &anchor x").is_err());
    }

    #[test]
    fn test_rejects_bad_indentation() {
        let err = parse_subset("a: 1\n   b: 2\n").unwrap_err();
        assert!(matches!(err, ParseError::Subset { line: 2, .. }));
    }
}
