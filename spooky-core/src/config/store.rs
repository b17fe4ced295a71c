//! Where config documents live.
//!
//! [`ConfigStore`] is the host's load/store contract reduced to named JSON
//! documents. [`FileConfigStore`] keeps them as pretty-printed files in one
//! directory; [`MemoryConfigStore`] keeps them as strings for tests and
//! embedded hosts.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum ConfigStoreError {
    #[error("I/O error on `{name}`: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{name}` is not valid JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not serialize `{name}`: {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Named JSON document storage.
pub trait ConfigStore {
    /// `Ok(None)` when no document with that name exists.
    fn load(&self, name: &str) -> Result<Option<Value>, ConfigStoreError>;

    fn store(&self, name: &str, doc: &Value) -> Result<(), ConfigStoreError>;

    /// Removing a missing document is not an error.
    fn remove(&self, name: &str) -> Result<(), ConfigStoreError>;
}

/// Serialize a typed config and store it under `name`.
pub fn store_typed<T: Serialize>(
    store: &dyn ConfigStore,
    name: &str,
    value: &T,
) -> Result<(), ConfigStoreError> {
    let doc = serde_json::to_value(value).map_err(|source| ConfigStoreError::Serialize {
        name: name.to_string(),
        source,
    })?;
    store.store(name, &doc)
}

fn render(name: &str, doc: &Value) -> Result<String, ConfigStoreError> {
    serde_json::to_string_pretty(doc).map_err(|source| ConfigStoreError::Serialize {
        name: name.to_string(),
        source,
    })
}

fn parse(name: &str, text: &str) -> Result<Value, ConfigStoreError> {
    serde_json::from_str(text).map_err(|source| ConfigStoreError::Parse {
        name: name.to_string(),
        source,
    })
}

/// Documents as `<dir>/<name>` files.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    dir: PathBuf,
}

impl FileConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn io_error(name: &str, source: std::io::Error) -> ConfigStoreError {
        ConfigStoreError::Io {
            name: name.to_string(),
            source,
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self, name: &str) -> Result<Option<Value>, ConfigStoreError> {
        let path = self.path_of(name);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|e| Self::io_error(name, e))?;
        parse(name, &text).map(Some)
    }

    fn store(&self, name: &str, doc: &Value) -> Result<(), ConfigStoreError> {
        let text = render(name, doc)?;
        fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(name, e))?;
        // The target is only ever replaced whole; an interrupted write leaves just the `.tmp`
        let tmp_path = self.dir.join(format!("{name}.tmp"));
        fs::write(&tmp_path, text).map_err(|e| Self::io_error(name, e))?;
        fs::rename(&tmp_path, self.path_of(name)).map_err(|e| Self::io_error(name, e))
    }

    fn remove(&self, name: &str) -> Result<(), ConfigStoreError> {
        let path = self.path_of(name);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| Self::io_error(name, e))?;
        }
        Ok(())
    }
}

/// In-memory documents, stored as the same text a file would hold.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    docs: Mutex<HashMap<String, String>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw document (not validated, so corrupt input can be tested).
    pub fn with_document(self, name: &str, text: &str) -> Self {
        self.docs_mut().insert(name.to_string(), text.to_string());
        self
    }

    /// Raw stored text
    pub fn raw(&self, name: &str) -> Option<String> {
        self.docs_mut().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.docs_mut().contains_key(name)
    }

    fn docs_mut(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.docs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self, name: &str) -> Result<Option<Value>, ConfigStoreError> {
        match self.raw(name) {
            Some(text) => parse(name, &text).map(Some),
            None => Ok(None),
        }
    }

    fn store(&self, name: &str, doc: &Value) -> Result<(), ConfigStoreError> {
        let text = render(name, doc)?;
        self.docs_mut().insert(name.to_string(), text);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), ConfigStoreError> {
        self.docs_mut().remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("ModConfig"));
        assert!(store.load("a.json").unwrap().is_none());

        let doc = json!({ "Version": "1.4.0", "B": 1, "A": 2 });
        store.store("a.json", &doc).unwrap();
        assert_eq!(store.load("a.json").unwrap(), Some(doc));

        let text = std::fs::read_to_string(store.path_of("a.json")).unwrap();
        assert!(text.find("\"B\"").unwrap() < text.find("\"A\"").unwrap());
    }

    #[test]
    fn test_file_store_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::new(dir.path());
        store.store("a.json", &json!({ "Version": "1.3.0" })).unwrap();

        // leftover of an interrupted write
        std::fs::write(dir.path().join("a.json.tmp"), "{ \"Vers").unwrap();
        assert_eq!(
            store.load("a.json").unwrap(),
            Some(json!({ "Version": "1.3.0" }))
        );

        store.store("a.json", &json!({ "Version": "1.4.0" })).unwrap();
        assert_eq!(
            store.load("a.json").unwrap(),
            Some(json!({ "Version": "1.4.0" }))
        );
        assert!(!dir.path().join("a.json.tmp").exists());
    }

    #[test]
    fn test_file_store_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::new(dir.path());
        store.remove("missing.json").unwrap();
        store.store("x.json", &json!({})).unwrap();
        store.remove("x.json").unwrap();
        assert!(!store.path_of("x.json").exists());
    }

    #[test]
    fn test_file_store_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let store = FileConfigStore::new(dir.path());
        let err = store.load("bad.json").unwrap_err();
        assert!(matches!(err, ConfigStoreError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryConfigStore::new().with_document("c.json", "{\"K\": true}");
        assert_eq!(store.load("c.json").unwrap(), Some(json!({ "K": true })));
        store.remove("c.json").unwrap();
        assert!(!store.contains("c.json"));

        let corrupt = MemoryConfigStore::new().with_document("c.json", "]");
        assert!(corrupt.load("c.json").is_err());
    }

    #[test]
    fn test_store_typed() {
        #[derive(Serialize)]
        struct Doc {
            #[serde(rename = "Version")]
            version: &'static str,
        }
        let store = MemoryConfigStore::new();
        store_typed(&store, "d.json", &Doc { version: "9" }).unwrap();
        assert_eq!(store.load("d.json").unwrap(), Some(json!({ "Version": "9" })));
    }
}
