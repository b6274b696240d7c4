//! Format-neutral document tree shared by every adapter.
//!
//! Adapters convert their library's native value type into [`Document`] when
//! parsing, and serialize back through the single [`Serialize`] impl below.

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

/// A mapping node. Keeps insertion order so rewritten files stay recognizable.
pub type Map = IndexMap<String, Document>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Document {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Document>),
    Object(Map),
}

/// The shape of an existing value, as far as coercion cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Boolean,
    Object,
    Array,
    /// Strings, nulls, and locations that hold no value yet.
    String,
}

impl ValueKind {
    pub fn of(value: Option<&Document>) -> Self {
        match value {
            Some(Document::Integer(_) | Document::Float(_)) => ValueKind::Number,
            Some(Document::Bool(_)) => ValueKind::Boolean,
            Some(Document::Object(_)) => ValueKind::Object,
            Some(Document::Array(_)) => ValueKind::Array,
            Some(Document::String(_) | Document::Null) | None => ValueKind::String,
        }
    }
}

impl Document {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Document::Integer(i) => Some(*i as f64),
            Document::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Document]> {
        match self {
            Document::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Document::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key on an object node.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "boolean",
            Document::Integer(_) | Document::Float(_) => "number",
            Document::String(_) => "string",
            Document::Array(_) => "array",
            Document::Object(_) => "object",
        }
    }

    /// Render a scalar the way a flat text format (INI) stores it.
    /// Returns `None` for arrays and objects.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Document::Null => Some(String::new()),
            Document::Bool(b) => Some(b.to_string()),
            Document::Integer(i) => Some(i.to_string()),
            Document::Float(f) => Some(f.to_string()),
            Document::String(s) => Some(s.clone()),
            Document::Array(_) | Document::Object(_) => None,
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Document::Null => serializer.serialize_unit(),
            Document::Bool(b) => serializer.serialize_bool(*b),
            Document::Integer(i) => serializer.serialize_i64(*i),
            Document::Float(f) => serializer.serialize_f64(*f),
            Document::String(s) => serializer.serialize_str(s),
            Document::Array(items) => serializer.collect_seq(items),
            Document::Object(map) => serializer.collect_map(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_null_classify_as_string() {
        assert_eq!(ValueKind::of(None), ValueKind::String);
        assert_eq!(ValueKind::of(Some(&Document::Null)), ValueKind::String);
    }

    #[test]
    fn integers_and_floats_are_numbers() {
        assert_eq!(ValueKind::of(Some(&Document::Integer(3))), ValueKind::Number);
        assert_eq!(ValueKind::of(Some(&Document::Float(0.5))), ValueKind::Number);
    }

    #[test]
    fn containers_classify_by_shape() {
        assert_eq!(
            ValueKind::of(Some(&Document::Array(vec![]))),
            ValueKind::Array
        );
        assert_eq!(
            ValueKind::of(Some(&Document::Object(Map::new()))),
            ValueKind::Object
        );
    }

    #[test]
    fn serializes_to_json_in_insertion_order() {
        let mut map = Map::new();
        map.insert("zeta".into(), Document::Integer(1));
        map.insert("alpha".into(), Document::Bool(true));
        map.insert(
            "list".into(),
            Document::Array(vec![Document::String("x".into()), Document::Null]),
        );
        let json = serde_json::to_string(&Document::Object(map)).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":true,"list":["x",null]}"#);
    }

    #[test]
    fn scalar_text_rejects_containers() {
        assert_eq!(Document::Integer(5).scalar_text().as_deref(), Some("5"));
        assert_eq!(Document::Array(vec![]).scalar_text(), None);
    }
}
