//! File access for directives: the read and write halves of read-modify-write.
//!
//! Everything that touches the file system goes through [`FileStore`] so the
//! scheduler and adapters can be exercised against an in-memory store in tests.
//! [`DiskStore`] is the real implementation and creates parent directories as
//! needed, so a directive can target a path that does not exist yet.
//!
//! [`set_in_document`] is the pure text-in, text-out mutation; [`persist_value`]
//! wraps it with a read and a write through a store.

use std::path::Path;

use tracing::debug;

use crate::error::{DocumentError, UdlError};
use crate::formats::Format;
use crate::mutate::set_value;
use crate::path::AccessorPath;

pub trait FileStore {
    /// Read a whole file as UTF-8 text.
    fn read(&self, path: &Path) -> Result<String, UdlError>;

    /// Replace a file's contents, creating it (and its parent directories) if needed.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), UdlError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl FileStore for DiskStore {
    fn read(&self, path: &Path) -> Result<String, UdlError> {
        std::fs::read_to_string(path).map_err(|e| UdlError::Read {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), UdlError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| UdlError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path, contents).map_err(|e| UdlError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Whether `format` can edit `file`: its name passes the format's extension
/// check, the file can be read, and its content parses as a document.
pub fn can_handle(format: &dyn Format, file: &Path, store: &dyn FileStore) -> bool {
    if !format.accepts_path(file) {
        return false;
    }
    match store.read(file) {
        Ok(content) => format.parse(&content).is_ok(),
        Err(e) => {
            debug!(format = format.name(), error = %e, "Cannot read candidate file");
            false
        }
    }
}

/// Apply a single mutation to document text and return the re-serialized text.
pub fn set_in_document(
    format: &dyn Format,
    content: &str,
    accessor: &str,
    value: &str,
) -> Result<String, DocumentError> {
    let mut doc = format.parse(content)?;
    let path = format.prepare(&mut doc, AccessorPath::parse(accessor)?)?;
    set_value(&mut doc, &path, value, format)?;
    format.serialize(&doc)
}

/// Read `file`, set `accessor` to `value`, and write the result back.
///
/// Nothing is written when the mutation fails, so a bad accessor leaves the
/// file untouched.
pub fn persist_value(
    format: &dyn Format,
    file: &Path,
    accessor: &str,
    value: &str,
    store: &dyn FileStore,
) -> Result<(), UdlError> {
    let content = store.read(file)?;
    let updated =
        set_in_document(format, &content, accessor, value).map_err(|e| UdlError::Document {
            path: file.to_path_buf(),
            source: e,
        })?;
    store.write(file, updated.as_bytes())
}
