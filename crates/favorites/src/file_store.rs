//! File-backed key-value store.
//!
//! Each key maps to one file inside the store directory. Writes land in a
//! temp file next to the target and are renamed over it, so a reader sees
//! either the old value or the new one, never a torn file.
//!
//! Write locks are keyed by the target path in a process-wide table, so two
//! `FileStore`s opened on the same directory still serialize mutations.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::error::{Result, StorageError};
use crate::store::{KeyLocks, KeyValueStore};

static FILE_LOCKS: LazyLock<KeyLocks> = LazyLock::new(KeyLocks::new);

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(file_name_for(key))
    }
}

/// Map a key to a file name, escaping anything outside `[A-Za-z0-9_-]` as
/// `%XX` so distinct keys never share a file.
fn file_name_for(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 5);
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            name.push(byte as char);
        } else {
            name.push_str(&format!("%{byte:02X}"));
        }
    }
    name.push_str(".json");
    name
}

fn read_value(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StorageError::Io(err)),
    }
}

fn write_atomic(dir: &Path, target: &Path, value: &str) -> Result<()> {
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(value.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|e| StorageError::Io(e.error))?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        debug!("Reading {:?}", path);
        tokio::task::spawn_blocking(move || read_value(&path))
            .await
            .map_err(|e| StorageError::Backend(format!("read task failed: {e}")))?
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let dir = self.dir.clone();
        let path = self.path_for(key);
        debug!("Writing {} bytes to {:?}", value.len(), path);
        tokio::task::spawn_blocking(move || write_atomic(&dir, &path, &value))
            .await
            .map_err(|e| StorageError::Backend(format!("write task failed: {e}")))?
    }

    fn write_lock(&self, key: &str) -> Arc<AsyncMutex<()>> {
        FILE_LOCKS.lock_for(&self.path_for(key).to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_escapes_special_characters() {
        assert_eq!(file_name_for("@FavoriteList"), "%40FavoriteList.json");
        assert_eq!(file_name_for("a/b"), "a%2Fb.json");
        assert_ne!(file_name_for("@a"), file_name_for("_a"));
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("@FavoriteList").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("store"));

        store.set("@FavoriteList", "[]".to_string()).await.unwrap();
        store.set("@FavoriteList", "[1]".to_string()).await.unwrap();

        assert_eq!(store.get("@FavoriteList").await.unwrap().as_deref(), Some("[1]"));
        let on_disk = fs::read_to_string(store.path_for("@FavoriteList")).unwrap();
        assert_eq!(on_disk, "[1]");
    }

    #[tokio::test]
    async fn test_write_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("k", "v".to_string()).await.unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        // A directory where the value file should be
        fs::create_dir(store.path_for("k")).unwrap();
        assert!(store.get("k").await.is_err());
    }

    #[test]
    fn test_stores_on_one_directory_share_write_locks() {
        let dir = tempfile::tempdir().unwrap();
        let a = FileStore::new(dir.path());
        let b = FileStore::new(dir.path());
        let elsewhere = tempfile::tempdir().unwrap();
        let c = FileStore::new(elsewhere.path());

        assert!(Arc::ptr_eq(&a.write_lock("k"), &b.write_lock("k")));
        assert!(!Arc::ptr_eq(&a.write_lock("k"), &a.write_lock("other")));
        assert!(!Arc::ptr_eq(&a.write_lock("k"), &c.write_lock("k")));
    }
}
