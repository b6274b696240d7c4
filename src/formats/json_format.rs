use serde_json::Value;

use super::Format;
use crate::document::Document;
use crate::error::DocumentError;

/// JSON documents. Accepted under any file name; the top level must be an
/// object. Output is compact.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn parse_fragment(&self, raw: &str) -> Result<Document, DocumentError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| DocumentError::Parse {
            format: self.name(),
            reason: e.to_string(),
        })?;
        Ok(json_to_document(value))
    }

    fn serialize(&self, doc: &Document) -> Result<String, DocumentError> {
        serde_json::to_string(doc).map_err(|e| DocumentError::Serialize {
            format: self.name(),
            reason: e.to_string(),
        })
    }
}

fn json_to_document(value: Value) -> Document {
    match value {
        Value::Null => Document::Null,
        Value::Bool(b) => Document::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Document::Integer(i),
            None => n
                .as_f64()
                .map(Document::Float)
                .unwrap_or_else(|| Document::String(n.to_string())),
        },
        Value::String(s) => Document::String(s),
        Value::Array(items) => Document::Array(items.into_iter().map(json_to_document).collect()),
        Value::Object(map) => Document::Object(
            map.into_iter()
                .map(|(k, v)| (k, json_to_document(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_object() {
        let doc = JsonFormat
            .parse(r#"{"server":{"port":8080,"tls":false},"tags":["a","b"]}"#)
            .unwrap();
        let server = doc.get("server").unwrap();
        assert_eq!(server.get("port"), Some(&Document::Integer(8080)));
        assert_eq!(server.get("tls"), Some(&Document::Bool(false)));
        assert_eq!(doc.get("tags").and_then(Document::as_array).map(<[_]>::len), Some(2));
    }

    #[test]
    fn top_level_array_is_rejected() {
        let err = JsonFormat.parse("[1,2,3]").unwrap_err();
        assert!(matches!(err, DocumentError::Parse { format: "JSON", .. }));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(
            JsonFormat.parse("{not json"),
            Err(DocumentError::Parse { .. })
        ));
    }

    #[test]
    fn round_trip_keeps_key_order() {
        let content = r#"{"zeta":1,"alpha":"x","mid":[true,null,1.5]}"#;
        let doc = JsonFormat.parse(content).unwrap();
        assert_eq!(JsonFormat.serialize(&doc).unwrap(), content);
    }

    #[test]
    fn fragments_can_be_any_value() {
        assert_eq!(
            JsonFormat.parse_array("[1, 2]"),
            Some(vec![Document::Integer(1), Document::Integer(2)])
        );
        assert_eq!(JsonFormat.parse_map("[1, 2]"), None);
        assert!(JsonFormat.parse_map(r#"{"a":1}"#).is_some());
    }
}
