//! Document adapters: one per supported configuration format.
//!
//! Each adapter converts between its library's value tree and [`Document`].
//! The mutation itself is format-neutral and lives in [`crate::mutate`]; an
//! adapter only decides what text it accepts, how fragments are parsed, and
//! (through [`Format::prepare`]) any shape restrictions of its own.
//!
//! Several formats overlap: every JSON object is also a YAML mapping, and a
//! one-line `key = value` file is both INI and TOML. Adapters are therefore
//! tried in an explicit order, see [`default_formats`].

mod ini_format;
mod json_format;
mod toml_format;
mod yaml_format;

use std::path::Path;

pub use ini_format::IniFormat;
pub use json_format::JsonFormat;
pub use toml_format::TomlFormat;
pub use yaml_format::YamlFormat;

use crate::document::{Document, Map};
use crate::error::DocumentError;
use crate::path::AccessorPath;

pub trait Format {
    /// Human-readable format name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Whether a file name is acceptable for this format. Formats whose grammar
    /// would swallow unrelated files require their conventional extension.
    fn accepts_path(&self, _path: &Path) -> bool {
        true
    }

    /// Parse any value in this format's grammar.
    fn parse_fragment(&self, raw: &str) -> Result<Document, DocumentError>;

    /// Serialize a whole document.
    fn serialize(&self, doc: &Document) -> Result<String, DocumentError>;

    /// Parse a whole file. The top level must be a mapping.
    fn parse(&self, content: &str) -> Result<Document, DocumentError> {
        match self.parse_fragment(content)? {
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

    /// Parse a replacement destined for an object, if it is one.
    fn parse_map(&self, raw: &str) -> Option<Map> {
        match self.parse_fragment(raw) {
            Ok(Document::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Parse a replacement destined for an array, if it is one.
    fn parse_array(&self, raw: &str) -> Option<Vec<Document>> {
        match self.parse_fragment(raw) {
            Ok(Document::Array(items)) => Some(items),
            _ => None,
        }
    }

    /// Validate or adjust a document and accessor before the mutation runs.
    fn prepare(
        &self,
        _doc: &mut Document,
        path: AccessorPath,
    ) -> Result<AccessorPath, DocumentError> {
        Ok(path)
    }
}

/// The adapters used when none are configured, in precedence order.
///
/// INI and TOML come with an extension check, JSON is strict enough to reject
/// most other formats, and YAML (which accepts JSON) is tried after JSON.
pub fn default_formats() -> Vec<Box<dyn Format>> {
    vec![
        Box::new(IniFormat),
        Box::new(JsonFormat),
        Box::new(YamlFormat),
        Box::new(TomlFormat),
    ]
}

pub(crate) fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(expected))
}
