#[cfg(test)]
pub mod test {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use crate::error::UdlError;
    use crate::persist::FileStore;

    /// An in-memory [`FileStore`]. Clones share the same files, so a test can
    /// hand one clone to a launcher and inspect the other afterwards.
    #[derive(Debug, Clone, Default)]
    pub struct MemoryStore {
        files: Rc<RefCell<HashMap<PathBuf, Vec<u8>>>>,
    }

    impl MemoryStore {
        pub fn with_file(self, path: &str, contents: &str) -> Self {
            self.files
                .borrow_mut()
                .insert(PathBuf::from(path), contents.as_bytes().to_vec());
            self
        }

        pub fn contents(&self, path: &str) -> Option<String> {
            self.files
                .borrow()
                .get(Path::new(path))
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        }
    }

    impl FileStore for MemoryStore {
        fn read(&self, path: &Path) -> Result<String, UdlError> {
            match self.files.borrow().get(path) {
                Some(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
                None => Err(UdlError::Read {
                    path: path.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            }
        }

        fn write(&self, path: &Path, contents: &[u8]) -> Result<(), UdlError> {
            self.files
                .borrow_mut()
                .insert(path.to_path_buf(), contents.to_vec());
            Ok(())
        }
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::default().with_file("/app/a.json", "{}");
        let other = store.clone();
        other.write(Path::new("/app/b.json"), b"[]").unwrap();

        assert_eq!(store.read(Path::new("/app/a.json")).unwrap(), "{}");
        assert_eq!(store.contents("/app/b.json").as_deref(), Some("[]"));
        assert!(matches!(
            store.read(Path::new("/app/missing")),
            Err(UdlError::Read { .. })
        ));
    }
}
