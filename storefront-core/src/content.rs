//! CMS content store.
//!
//! Content lives under `content/` as JSON documents addressed by a
//! slash-separated key (`blog/my-post` → `content/blog/my-post.json`).
//! A key naming a directory yields the sorted list of its entry names instead,
//! which is how folder collections are enumerated.
//!
//! In development every lookup re-reads the file; in production a parsed
//! document is cached for the lifetime of the store and later edits are not
//! observed.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;

use crate::error::{io_err, ContentError};
use crate::paths::join_key;
use crate::types::ExecutionMode;

/// Outcome of a content lookup that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    NotFound,
}

impl Lookup {
    /// `Found(v)` → `v`, `NotFound` → `null`.
    pub fn into_value(self) -> Value {
        match self {
            Lookup::Found(value) => value,
            Lookup::NotFound => Value::Null,
        }
    }
}

#[derive(Debug)]
pub struct ContentStore {
    root: PathBuf,
    mode: ExecutionMode,
    cache: RwLock<HashMap<PathBuf, Value>>,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>, mode: ExecutionMode) -> Self {
        ContentStore {
            root: root.into(),
            mode,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Look up `key` as a folder collection, then as a JSON document.
    pub fn get(&self, key: &str) -> Result<Lookup, ContentError> {
        let Some(base) = join_key(&self.root, key) else {
            return Ok(Lookup::NotFound);
        };

        if base.is_dir() {
            return list_entries(&base).map(Lookup::Found);
        }

        let mut file = base.into_os_string();
        file.push(".json");
        let file = PathBuf::from(file);

        if self.mode.is_dev() {
            return read_document(&file);
        }

        if let Some(value) = self.cached(&file) {
            return Ok(Lookup::Found(value));
        }
        let lookup = read_document(&file)?;
        if let Lookup::Found(value) = &lookup {
            if let Ok(mut cache) = self.cache.write() {
                cache.insert(file, value.clone());
            }
        }
        Ok(lookup)
    }

    /// Dictionary document for `lang` (`dictionary/<lang>`).
    pub fn dictionary(&self, lang: &str) -> Result<Lookup, ContentError> {
        self.get(&format!("dictionary/{lang}"))
    }

    fn cached(&self, file: &Path) -> Option<Value> {
        self.cache.read().ok()?.get(file).cloned()
    }
}

fn read_document(path: &Path) -> Result<Lookup, ContentError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Lookup::NotFound),
        Err(err) => return Err(io_err(path, err)),
    };
    serde_json::from_str(&contents)
        .map(Lookup::Found)
        .map_err(|source| ContentError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Entry names of `dir` with their extension stripped, sorted.
fn list_entries(dir: &Path) -> Result<Value, ContentError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if let Some(stem) = path.file_stem() {
            names.push(stem.to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(Value::Array(names.into_iter().map(Value::String).collect()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn content_dir() -> TempDir {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("blog")).expect("mkdir");
        fs::create_dir_all(dir.path().join("dictionary")).expect("mkdir");
        fs::write(dir.path().join("blog/second.json"), r#"{"title":"Second"}"#).expect("write");
        fs::write(dir.path().join("blog/first.json"), r#"{"title":"First"}"#).expect("write");
        fs::write(dir.path().join("blog/v1.2.json"), r#"{"title":"Dotted"}"#).expect("write");
        fs::write(dir.path().join("dictionary/en_us.json"), r#"{"buy":"Buy"}"#).expect("write");
        fs::write(dir.path().join("broken.json"), "{ nope").expect("write");
        dir
    }

    #[test]
    fn directory_key_lists_entries() {
        let dir = content_dir();
        let store = ContentStore::new(dir.path(), ExecutionMode::Development);
        assert_eq!(
            store.get("blog").expect("get"),
            Lookup::Found(json!(["first", "second", "v1.2"]))
        );
    }

    #[test]
    fn document_key_parses_json() {
        let dir = content_dir();
        let store = ContentStore::new(dir.path(), ExecutionMode::Development);
        assert_eq!(
            store.get("blog/first").expect("get"),
            Lookup::Found(json!({"title": "First"}))
        );
        assert_eq!(
            store.get("blog/v1.2").expect("get"),
            Lookup::Found(json!({"title": "Dotted"}))
        );
    }

    #[test]
    fn missing_document_is_not_found() {
        let dir = content_dir();
        let store = ContentStore::new(dir.path(), ExecutionMode::Development);
        assert_eq!(store.get("blog/nope").expect("get"), Lookup::NotFound);
        assert_eq!(store.get("blog/nope").expect("get").into_value(), Value::Null);
        assert_eq!(store.get("../etc/passwd").expect("get"), Lookup::NotFound);
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let dir = content_dir();
        let store = ContentStore::new(dir.path(), ExecutionMode::Production);
        let err = store.get("broken").unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn dictionary_uses_language_key() {
        let dir = content_dir();
        let store = ContentStore::new(dir.path(), ExecutionMode::Development);
        assert_eq!(
            store.dictionary("en_us").expect("get"),
            Lookup::Found(json!({"buy": "Buy"}))
        );
        assert_eq!(store.dictionary("pt_br").expect("get"), Lookup::NotFound);
    }

    #[test]
    fn development_observes_edits() {
        let dir = content_dir();
        let store = ContentStore::new(dir.path(), ExecutionMode::Development);
        assert_eq!(store.get("blog/first").unwrap(), Lookup::Found(json!({"title": "First"})));
        fs::write(dir.path().join("blog/first.json"), r#"{"title":"Edited"}"#).unwrap();
        assert_eq!(store.get("blog/first").unwrap(), Lookup::Found(json!({"title": "Edited"})));
    }

    #[test]
    fn production_caches_documents() {
        let dir = content_dir();
        let store = ContentStore::new(dir.path(), ExecutionMode::Production);
        assert_eq!(store.get("blog/first").unwrap(), Lookup::Found(json!({"title": "First"})));
        fs::write(dir.path().join("blog/first.json"), r#"{"title":"Edited"}"#).unwrap();
        assert_eq!(store.get("blog/first").unwrap(), Lookup::Found(json!({"title": "First"})));
    }

    #[test]
    fn production_does_not_cache_misses() {
        let dir = content_dir();
        let store = ContentStore::new(dir.path(), ExecutionMode::Production);
        assert_eq!(store.get("blog/later").unwrap(), Lookup::NotFound);
        fs::write(dir.path().join("blog/later.json"), r#"{"title":"Later"}"#).unwrap();
        assert_eq!(store.get("blog/later").unwrap(), Lookup::Found(json!({"title": "Later"})));
    }
}
