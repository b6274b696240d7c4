use std::path::Path;

use ini::Ini;

use super::{Format, has_extension};
use crate::document::{Document, Map};
use crate::error::DocumentError;
use crate::path::{AccessorPath, Segment};

/// INI documents. Only files ending in `.ini` are considered.
///
/// Keys outside any section become top-level strings and each section becomes
/// an object of strings, so the only addressable locations are `key` and
/// `section:key`. Every value is a string; INI has no other types.
///
/// A rewrite is rebuilt from those strings, so it is lossy: `;` and `#`
/// comments are dropped, quoted values come back unquoted, and spacing around
/// `=` is normalized. A file where a general key and a section share a name
/// is refused at parse time.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniFormat;

impl Format for IniFormat {
    fn name(&self) -> &'static str {
        "INI"
    }

    fn accepts_path(&self, path: &Path) -> bool {
        has_extension(path, "ini")
    }

    fn parse_fragment(&self, raw: &str) -> Result<Document, DocumentError> {
        let ini = Ini::load_from_str(raw).map_err(|e| DocumentError::Parse {
            format: self.name(),
            reason: e.to_string(),
        })?;

        let mut root = Map::new();
        for (section, props) in ini.iter() {
            let target = match section {
                None => &mut root,
                Some(name) => match root
                    .entry(name.to_string())
                    .or_insert_with(|| Document::Object(Map::new()))
                {
                    Document::Object(map) => map,
                    _ => return Err(self.collision(name)),
                },
            };
            for (key, value) in props.iter() {
                if section.is_none() && matches!(target.get(key), Some(Document::Object(_))) {
                    return Err(self.collision(key));
                }
                target.insert(key.to_string(), Document::String(value.to_string()));
            }
        }
        Ok(Document::Object(root))
    }

    // Fragments are never structured in INI.
    fn parse_map(&self, _raw: &str) -> Option<Map> {
        None
    }

    fn parse_array(&self, _raw: &str) -> Option<Vec<Document>> {
        None
    }

    fn serialize(&self, doc: &Document) -> Result<String, DocumentError> {
        let root = doc.as_object().ok_or_else(|| self.unsupported(doc))?;

        // General keys must come before the first section header.
        let mut ini = Ini::new();
        for (key, value) in root {
            if !matches!(value, Document::Object(_)) {
                let text = value.scalar_text().ok_or_else(|| self.unsupported(value))?;
                ini.with_general_section().set(key.as_str(), text);
            }
        }
        for (key, value) in root {
            if let Document::Object(section) = value {
                write_section(&mut ini, key, section).map_err(|v| self.unsupported(v))?;
            }
        }

        let mut out = Vec::new();
        ini.write_to(&mut out).map_err(|e| DocumentError::Serialize {
            format: self.name(),
            reason: e.to_string(),
        })?;
        String::from_utf8(out).map_err(|e| DocumentError::Serialize {
            format: self.name(),
            reason: e.to_string(),
        })
    }

    fn prepare(
        &self,
        doc: &mut Document,
        path: AccessorPath,
    ) -> Result<AccessorPath, DocumentError> {
        if path.parents.len() > 1 {
            return Err(DocumentError::Navigation {
                accessor: path.as_str().to_string(),
                reason: "INI files only support 'key' or 'section:key' accessors".into(),
            });
        }

        if let (Some(section), Document::Object(root)) = (path.parents.first(), &mut *doc) {
            root.entry(section.clone())
                .or_insert_with(|| Document::Object(Map::new()));
        }

        let mut path = path;
        if let Segment::Index(index) = path.leaf {
            path.leaf = Segment::Key(index.to_string());
        }
        Ok(path)
    }
}

impl IniFormat {
    fn collision(&self, name: &str) -> DocumentError {
        DocumentError::Parse {
            format: self.name(),
            reason: format!("'{name}' is both a key and a section"),
        }
    }

    fn unsupported(&self, value: &Document) -> DocumentError {
        DocumentError::Serialize {
            format: self.name(),
            reason: format!("a {} cannot be written to an INI file", value.type_name()),
        }
    }
}

/// Copy one object into a named section. Returns the offending value if the
/// object holds anything but scalars.
fn write_section<'a>(ini: &mut Ini, name: &str, section: &'a Map) -> Result<(), &'a Document> {
    for (key, value) in section {
        let text = value.scalar_text().ok_or(value)?;
        ini.with_section(Some(name)).set(key.as_str(), text);
    }
    if section.is_empty() {
        ini.entry(Some(name.to_string())).or_insert(Default::default());
    }
    Ok(())
}
