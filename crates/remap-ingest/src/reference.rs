//! JSON snapshots of existing target tables.

use std::fs;
use std::path::Path;

use remap_model::{Record, Value};

use crate::error::{IngestError, Result};

/// Read a JSON array of objects into records.
///
/// `null` becomes missing, numbers stay numeric, strings stay text and any
/// other value is kept as its JSON text.
pub fn read_reference_table(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::io(path, source))?;
    let json: serde_json::Value =
        serde_json::from_str(&text).map_err(|source| IngestError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    let serde_json::Value::Array(rows) = json else {
        return Err(IngestError::InvalidReference {
            path: path.to_path_buf(),
            message: "expected an array of objects".to_string(),
        });
    };
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| match row {
            serde_json::Value::Object(fields) => Ok(fields
                .into_iter()
                .map(|(column, value)| (column, json_value(value)))
                .collect()),
            _ => Err(IngestError::InvalidReference {
                path: path.to_path_buf(),
                message: format!("element {idx} is not an object"),
            }),
        })
        .collect()
}

fn json_value(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Missing,
        serde_json::Value::Number(number) => number.as_f64().map_or(Value::Missing, Value::Number),
        serde_json::Value::String(text) => Value::Text(text),
        serde_json::Value::Bool(flag) => Value::Text(flag.to_string()),
        other => Value::Text(other.to_string()),
    }
}
