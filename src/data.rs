//! Resume data loading.
//!
//! The document is consumed wholesale and handed to the template as `data`.
//! YAML is the native format; files ending in `.json` go through
//! `serde_json` instead.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{BuildError, Result};

/// A loaded resume document. Always a mapping at the top level.
pub type ResumeData = Value;

/// Read and parse the data file at `path`.
pub fn load_data(path: &Path) -> Result<ResumeData> {
    let text = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    log::debug!("loading resume data from {}", path.display());
    if is_json {
        parse_json(&text)
    } else {
        parse_yaml(&text)
    }
}

/// Parse a YAML document. An empty document yields an empty mapping.
pub fn parse_yaml(text: &str) -> Result<ResumeData> {
    if text.trim().is_empty() {
        return Ok(Value::Mapping(Mapping::new()));
    }
    let value: Value = serde_yaml::from_str(text)?;
    ensure_mapping(value)
}

/// Parse a JSON document.
pub fn parse_json(text: &str) -> Result<ResumeData> {
    let value: Value = serde_json::from_str(text)?;
    ensure_mapping(value)
}

fn ensure_mapping(value: Value) -> Result<ResumeData> {
    match value {
        Value::Mapping(_) => Ok(value),
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        Value::Bool(_) => Err(BuildError::DataShape("a boolean")),
        Value::Number(_) => Err(BuildError::DataShape("a number")),
        Value::String(_) => Err(BuildError::DataShape("a string")),
        Value::Sequence(_) => Err(BuildError::DataShape("a sequence")),
        Value::Tagged(_) => Err(BuildError::DataShape("a tagged value")),
    }
}
