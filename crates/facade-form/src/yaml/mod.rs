//! YAML import and export for form documents

pub mod emit;
pub mod full;
pub mod parse;

pub use emit::{to_yaml_string, to_yaml_string_at};
pub use parse::parse_subset;

use crate::document::{Mapping, Value};
use crate::error::ParseError;
use tracing::debug;

/// Parse imported text into a document.
///
/// The subset reader runs first. Files written by other tools fall back to
/// a full YAML parser, then to strict JSON. Both YAML paths keep scalars as
/// written, so the same text reads the same whichever path takes it. An
/// empty document is an empty mapping; any other non-mapping root is
/// rejected.
pub fn parse_document(text: &str) -> Result<Mapping, ParseError> {
    let value = match parse_subset(text) {
        Ok(value) => value,
        Err(subset_err) => {
            debug!(error = %subset_err, "subset reader declined, trying full YAML");
            parse_full(text)?
        }
    };

    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(ParseError::NotAMapping(other.kind_name())),
    }
}

fn parse_full(text: &str) -> Result<Value, ParseError> {
    let yaml_err = match full::parse_full_yaml(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    debug!(error = %yaml_err, "full YAML parse failed, trying JSON");

    serde_json::from_str::<Value>(text).map_err(|json_err| ParseError::Syntax {
        yaml: yaml_err.to_string(),
        json: json_err.to_string(),
    })
}
