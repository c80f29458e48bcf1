//! Durable key-value store writing one JSON document per key inside a directory.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::dao::{
    kv_store::KeyValueStore,
    storage::{StorageError, StorageResult},
};

const FILE_EXTENSION: &str = "json";

/// Directory-backed store. Writes go through a temporary file and a rename so a crash
/// never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| {
            StorageError::unavailable(
                format!("failed to create storage directory `{}`", dir.display()),
                source,
            )
        })?;
        debug!(dir = %dir.display(), "file store opened");
        Ok(Self { dir })
    }

    /// Directory holding the documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{FILE_EXTENSION}", file_stem(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::unavailable(
                format!("failed to read `{}`", path.display()),
                err,
            )),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).map_err(|source| {
            StorageError::unavailable(format!("failed to write `{}`", tmp.display()), source)
        })?;
        fs::rename(&tmp, &path).map_err(|source| {
            StorageError::unavailable(format!("failed to replace `{}`", path.display()), source)
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::unavailable(
                format!("failed to remove `{}`", path.display()),
                err,
            )),
        }
    }

    fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.dir).map_err(|source| {
            StorageError::unavailable(
                format!("storage directory `{}` is not reachable", self.dir.display()),
                source,
            )
        })?;

        if metadata.permissions().readonly() {
            return Err(StorageError::unavailable(
                format!("storage directory `{}` is read-only", self.dir.display()),
                std::io::Error::new(ErrorKind::PermissionDenied, "read-only directory"),
            ));
        }

        Ok(())
    }
}

/// Map a namespaced key (`color-memory:leaderboard`) onto a safe file name.
///
/// Bytes outside `[A-Za-z0-9_-]` are percent-escaped, so distinct keys never share a file.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => stem.push(char::from(byte)),
            _ => stem.push_str(&format!("%{byte:02X}")),
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn keys_map_to_safe_file_names() {
        assert_eq!(file_stem("color-memory:best-score"), "color-memory%3Abest-score");
        assert_eq!(file_stem("../escape"), "%2E%2E%2Fescape");
        assert_eq!(file_stem("é"), "%C3%A9");
    }

    #[test]
    fn similar_keys_keep_separate_documents() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();
        store.set("a:b", "1").unwrap();
        store.set("a_b", "2").unwrap();
        store.set("a%3Ab", "3").unwrap();

        assert_eq!(store.get("a:b").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("a_b").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("a%3Ab").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn documents_survive_reopening() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path().join("data")).unwrap();
        store.set("color-memory:best-score", "42").unwrap();

        let reopened = FileStore::open(temp.path().join("data")).unwrap();
        assert_eq!(
            reopened.get("color-memory:best-score").unwrap().as_deref(),
            Some("42")
        );
        assert!(reopened.health_check().is_ok());
    }

    #[test]
    fn missing_documents_read_as_none_and_remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();
        assert_eq!(store.get("nothing").unwrap(), None);
        store.remove("nothing").unwrap();

        store.set("key", "[]").unwrap();
        store.remove("key").unwrap();
        assert_eq!(store.get("key").unwrap(), None);
    }
}
