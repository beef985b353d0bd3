use super::{KeyValueStore, StorageError};
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

/// Bytes kept as-is in file names. Everything else, `%` included, is escaped,
/// so distinct keys always map to distinct files inside the root.
const KEY_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

/// Stores each key as `<root>/<key>.json`, with the key percent-encoded.
///
/// Values are written to a temporary sibling first and renamed into place, so a
/// reader never sees a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name = utf8_percent_encode(key, KEY_ESCAPES);
        self.root.join(format!("{name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.root).await?;

        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).await?;
        fs::rename(&staging, &path).await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    #[tokio::test]
    async fn writes_one_file_per_key() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        // Act
        store.set_item("students_data", "[]").await.unwrap();

        // Assert
        dir.child("students_data.json").assert("[]");
        assert_eq!(
            store.get_item("students_data").await.unwrap(),
            Some("[]".to_string())
        );
    }

    #[tokio::test]
    async fn overwrite_replaces_whole_value() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.set_item("TODOS", "[1,2,3]").await.unwrap();
        store.set_item("TODOS", "[]").await.unwrap();

        dir.child("TODOS.json").assert("[]");
        dir.child("TODOS.json.tmp").assert(predicates::path::missing());
    }

    #[tokio::test]
    async fn missing_key_reads_as_none_and_removes_cleanly() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("not-yet-created"));

        assert_eq!(store.get_item("userData").await.unwrap(), None);
        store.remove_item("userData").await.unwrap();
    }

    #[tokio::test]
    async fn remove_deletes_the_file() {
        let dir = TempDir::new().unwrap();
        dir.child("userData.json").write_str("{}").unwrap();
        let store = FileStore::new(dir.path());

        store.remove_item("userData").await.unwrap();

        dir.child("userData.json").assert(predicates::path::missing());
    }

    #[tokio::test]
    async fn any_key_maps_to_its_own_file_inside_the_root() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let keys = ["@roster:todos", "../secrets", "a/b", "with space", "", "%40roster"];

        // Act
        for key in keys {
            store.set_item(key, key).await.unwrap();
        }

        // Assert
        for key in keys {
            assert_eq!(store.get_item(key).await.unwrap(), Some(key.to_string()));
        }
        dir.child("%40roster%3Atodos.json").assert("@roster:todos");
        dir.child("..%2Fsecrets.json").assert(predicates::path::missing());
        dir.child("%2E%2E%2Fsecrets.json").assert("../secrets");
        assert!(!dir.path().parent().unwrap().join("secrets.json").exists());
    }

    #[tokio::test]
    async fn default_keys_keep_plain_file_names() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        for key in ["students_data", "TODOS", "userData"] {
            store.set_item(key, "[]").await.unwrap();
            dir.child(format!("{key}.json")).assert("[]");
        }
    }
}
