use std::path::Path;

use toml::{Table, Value};

use super::{Format, has_extension};
use crate::document::{Document, Map};
use crate::error::DocumentError;

/// Key under which array fragments are wrapped, since TOML has no bare
/// top-level values.
const ARRAY_KEY: &str = "array";

/// TOML documents. Only files ending in `.toml` are considered.
///
/// Datetimes are read as strings and written back as strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlFormat;

impl Format for TomlFormat {
    fn name(&self) -> &'static str {
        "TOML"
    }

    fn accepts_path(&self, path: &Path) -> bool {
        has_extension(path, "toml")
    }

    fn parse_fragment(&self, raw: &str) -> Result<Document, DocumentError> {
        let table = raw.parse::<Table>().map_err(|e| DocumentError::Parse {
            format: self.name(),
            reason: e.to_string(),
        })?;
        Ok(Document::Object(table_to_map(table)))
    }

    fn parse_array(&self, raw: &str) -> Option<Vec<Document>> {
        let mut table = format!("{ARRAY_KEY} = {raw}").parse::<Table>().ok()?;
        match table.remove(ARRAY_KEY) {
            Some(Value::Array(items)) => Some(items.into_iter().map(toml_to_document).collect()),
            _ => None,
        }
    }

    fn serialize(&self, doc: &Document) -> Result<String, DocumentError> {
        toml::to_string(doc).map_err(|e| DocumentError::Serialize {
            format: self.name(),
            reason: e.to_string(),
        })
    }
}

fn table_to_map(table: Table) -> Map {
    table
        .into_iter()
        .map(|(k, v)| (k, toml_to_document(v)))
        .collect()
}

fn toml_to_document(value: Value) -> Document {
    match value {
        Value::String(s) => Document::String(s),
        Value::Integer(i) => Document::Integer(i),
        Value::Float(f) => Document::Float(f),
        Value::Boolean(b) => Document::Bool(b),
        Value::Datetime(dt) => Document::String(dt.to_string()),
        Value::Array(items) => Document::Array(items.into_iter().map(toml_to_document).collect()),
        Value::Table(table) => Document::Object(table_to_map(table)),
    }
}
