//! The path-addressed, type-preserving replacement at the heart of `SETVALUE`.
//!
//! [`set_value`] walks a [`Document`] along an [`AccessorPath`] and overwrites the
//! addressed location with a replacement string. The existing value decides how
//! the string is interpreted:
//!
//! | existing value        | replacement is stored as                          |
//! |-----------------------|---------------------------------------------------|
//! | number                | number, if it parses as a finite float            |
//! | boolean               | boolean, if it parses as one                      |
//! | object                | object, if it parses as a mapping in the format   |
//! | array                 | array, if it parses as a sequence in the format   |
//! | string, null, absent  | the raw string                                    |
//!
//! Any replacement that does not parse as the expected type is stored as the raw
//! string instead of failing. Nested fragments are parsed with the grammar of the
//! file being edited, so a YAML file accepts YAML flow syntax and a TOML file
//! accepts TOML inline tables.

use crate::document::{Document, ValueKind};
use crate::error::DocumentError;
use crate::formats::Format;
use crate::path::{AccessorPath, Segment};

/// Navigate to `path` inside `root` and replace the value there with `raw`,
/// coerced to the type of the value it replaces.
///
/// Every segment but the last must name an existing mapping entry. A key leaf
/// may be new; an index leaf must address an existing element of a sequence.
pub fn set_value(
    root: &mut Document,
    path: &AccessorPath,
    raw: &str,
    grammar: &dyn Format,
) -> Result<(), DocumentError> {
    let mut current = root;

    for key in &path.parents {
        current = match current {
            Document::Object(map) => map
                .get_mut(key.as_str())
                .ok_or_else(|| navigation(path, format!("key '{key}' does not exist")))?,
            other => {
                return Err(navigation(
                    path,
                    format!("cannot look up '{key}' in a {}", other.type_name()),
                ));
            }
        };
    }

    match (&path.leaf, current) {
        (Segment::Index(index), Document::Array(items)) => {
            let len = items.len();
            let slot = items
                .get_mut(*index)
                .ok_or_else(|| DocumentError::OutOfBounds {
                    accessor: path.as_str().to_string(),
                    index: *index,
                    len,
                })?;
            let replacement = coerce(Some(&*slot), raw, grammar);
            *slot = replacement;
        }
        (Segment::Index(_), other) => {
            return Err(navigation(
                path,
                format!(
                    "integer indexes must be used against an existing array (value was a {})",
                    other.type_name()
                ),
            ));
        }
        (Segment::Key(key), Document::Object(map)) => {
            let replacement = coerce(map.get(key.as_str()), raw, grammar);
            map.insert(key.clone(), replacement);
        }
        (Segment::Key(key), other) => {
            return Err(navigation(
                path,
                format!("cannot set '{key}' on a {}", other.type_name()),
            ));
        }
    }

    Ok(())
}

/// Interpret `raw` as the same kind of value as `existing`, falling back to a
/// plain string when it does not parse.
pub fn coerce(existing: Option<&Document>, raw: &str, grammar: &dyn Format) -> Document {
    let coerced = match ValueKind::of(existing) {
        ValueKind::Number => parse_number(raw),
        ValueKind::Boolean => parse_bool(raw).map(Document::Bool),
        ValueKind::Object => grammar.parse_map(raw).map(Document::Object),
        ValueKind::Array => grammar.parse_array(raw).map(Document::Array),
        ValueKind::String => None,
    };
    coerced.unwrap_or_else(|| Document::String(raw.to_string()))
}

/// Parse a replacement for a numeric destination.
///
/// Any finite float is accepted. Text that is also an exact integer stays an
/// integer so integer-typed keys keep their type.
pub fn parse_number(raw: &str) -> Option<Document> {
    let float = raw.parse::<f64>().ok().filter(|f| f.is_finite())?;
    match raw.parse::<i64>() {
        Ok(i) => Some(Document::Integer(i)),
        Err(_) => Some(Document::Float(float)),
    }
}

/// The boolean spellings accepted for a boolean destination.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn navigation(path: &AccessorPath, reason: String) -> DocumentError {
    DocumentError::Navigation {
        accessor: path.as_str().to_string(),
        reason,
    }
}
