//! JSON sheets: an array of row objects, as a sheet API returns them.

use super::{Record, RecordSource, trim_trailing_blank};
use crate::error::SourceError;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonSheet {
    name: String,
    path: PathBuf,
}

impl JsonSheet {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        other => other.to_string(),
    }
}

/// Parse a JSON array of objects into records.
///
/// Keys that are blank are dropped and trailing blank rows are trimmed, as
/// for grid sheets. A key missing from an object is an absent column.
pub fn parse_json(path: &Path, json: &str) -> Result<Vec<Record>, SourceError> {
    let malformed = |message: String| SourceError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = serde_json::from_str(json).map_err(|e| malformed(e.to_string()))?;
    let rows = value
        .as_array()
        .ok_or_else(|| malformed("expected a JSON array of row objects".to_string()))?;

    let mut records = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let object = row
                .as_object()
                .ok_or_else(|| malformed(format!("row {} is not an object", idx + 1)))?;
            Ok(Record::from_pairs(
                object
                    .iter()
                    .filter(|(k, _)| !k.trim().is_empty())
                    .map(|(k, v)| (k.clone(), value_to_cell(v))),
            ))
        })
        .collect::<Result<Vec<_>, SourceError>>()?;

    trim_trailing_blank(&mut records);
    Ok(records)
}

impl RecordSource for JsonSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_all_records(&self) -> Result<Vec<Record>, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_json(&self.path, &content)
    }
}
