use serde_yaml::Value;

use super::Format;
use crate::document::{Document, Map};
use crate::error::DocumentError;

/// YAML documents. Accepted under any file name; the top level must be a
/// mapping, and an empty file counts as an empty mapping.
///
/// Files with tagged values (`!custom 5`) or with null, sequence or
/// mapping keys are refused at parse time, so they are never rewritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

impl Format for YamlFormat {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn parse_fragment(&self, raw: &str) -> Result<Document, DocumentError> {
        let value: Value = serde_yaml::from_str(raw).map_err(|e| DocumentError::Parse {
            format: self.name(),
            reason: e.to_string(),
        })?;
        yaml_to_document(value)
    }

    fn parse(&self, content: &str) -> Result<Document, DocumentError> {
        match self.parse_fragment(content)? {
            Document::Null => Ok(Document::Object(Map::new())),
            doc @ Document::Object(_) => Ok(doc),
            other => Err(DocumentError::Parse {
                format: self.name(),
                reason: format!(
                    "expected a mapping at the top level, found a {}",
                    other.type_name()
                ),
            }),
        }
    }

    fn serialize(&self, doc: &Document) -> Result<String, DocumentError> {
        serde_yaml::to_string(doc).map_err(|e| DocumentError::Serialize {
            format: self.name(),
            reason: e.to_string(),
        })
    }
}

/// Convert a parsed YAML value, refusing anything that could not be written
/// back unchanged: mapping keys that are not scalars, and tagged values.
fn yaml_to_document(value: Value) -> Result<Document, DocumentError> {
    let doc = match value {
        Value::Null => Document::Null,
        Value::Bool(b) => Document::Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Document::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Document::Float(f)
            } else {
                Document::String(n.to_string())
            }
        }
        Value::String(s) => Document::String(s),
        Value::Sequence(items) => Document::Array(
            items
                .into_iter()
                .map(yaml_to_document)
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                let key = match k {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => return Err(rejected("a null mapping key")),
                    Value::Sequence(_) => return Err(rejected("a sequence mapping key")),
                    Value::Mapping(_) => return Err(rejected("a mapping key that is a mapping")),
                    Value::Tagged(_) => return Err(rejected("a tagged mapping key")),
                };
                map.insert(key, yaml_to_document(v)?);
            }
            Document::Object(map)
        }
        Value::Tagged(tagged) => {
            return Err(rejected(&format!("the tagged value {}", tagged.tag)));
        }
    };
    Ok(doc)
}

fn rejected(what: &str) -> DocumentError {
    DocumentError::Parse {
        format: "YAML",
        reason: format!("{what} cannot be rewritten without losing it"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mapping() {
        let doc = YamlFormat
            .parse("server:\n  port: 8080\n  host: localhost\nratio: 0.5\n")
            .unwrap();
        let server = doc.get("server").unwrap();
        assert_eq!(server.get("port"), Some(&Document::Integer(8080)));
        assert_eq!(server.get("host").and_then(Document::as_str), Some("localhost"));
        assert_eq!(doc.get("ratio"), Some(&Document::Float(0.5)));
    }

    #[test]
    fn empty_file_is_empty_mapping() {
        assert_eq!(YamlFormat.parse("").unwrap(), Document::Object(Map::new()));
    }

    #[test]
    fn scalar_file_is_rejected() {
        assert!(matches!(
            YamlFormat.parse("whatever = value"),
            Err(DocumentError::Parse { format: "YAML", .. })
        ));
    }

    #[test]
    fn numeric_keys_become_strings() {
        let doc = YamlFormat.parse("8080: http\ntrue: yes\n").unwrap();
        assert_eq!(doc.get("8080").and_then(Document::as_str), Some("http"));
        assert!(doc.get("true").is_some());
    }

    #[test]
    fn tagged_values_are_rejected() {
        for content in ["blob: !bytes aGVsbG8=\n", "value: !custom 5\n"] {
            assert!(
                matches!(
                    YamlFormat.parse(content),
                    Err(DocumentError::Parse { format: "YAML", .. })
                ),
                "{content:?} should be rejected"
            );
        }
    }

    #[test]
    fn non_scalar_keys_are_rejected() {
        for content in [
            "~: nullkey\na: 1\n",
            "[1, 2]: seqkey\na: 1\n",
            "? {x: 1}\n: mapkey\na: 1\n",
            "outer:\n  ~: nested\n",
        ] {
            assert!(
                matches!(
                    YamlFormat.parse(content),
                    Err(DocumentError::Parse { format: "YAML", .. })
                ),
                "{content:?} should be rejected"
            );
        }
    }

    #[test]
    fn string_that_looks_numeric_survives_round_trip() {
        let mut map = Map::new();
        map.insert("whatever".into(), Document::String("5".into()));
        let out = YamlFormat.serialize(&Document::Object(map)).unwrap();
        let reparsed = YamlFormat.parse(&out).unwrap();
        assert_eq!(reparsed.get("whatever").and_then(Document::as_str), Some("5"));
    }
}
