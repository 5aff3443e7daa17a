//! JSON file persistence
//!
//! Features:
//! - Missing files load as `None`, not as errors
//! - Writes go to `<name>.tmp` first and are then renamed over the target
//! - Unreadable files can be moved to `<name>.corrupt` instead of lost

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Read and parse a JSON file. `Ok(None)` if the file does not exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(PersistenceError::io(path, error)),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|error| PersistenceError::json(path, error))
}

/// Serialize as pretty JSON and atomically replace `path`
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| PersistenceError::json(path, e))?;
    write_text_atomic(path, &text).map_err(|e| PersistenceError::io(path, e))
}

fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, text)?;
    replace_file(&tmp_path, path)
}

/// The old file stays in place until the rename lands
fn replace_file(tmp_path: &Path, final_path: &Path) -> io::Result<()> {
    fs::rename(tmp_path, final_path).inspect_err(|_| {
        let _ = fs::remove_file(tmp_path);
    })
}

/// Move an unreadable file to `<name>.corrupt` so a later save cannot
/// overwrite the only copy. Returns the new location.
pub fn set_aside(path: &Path) -> Result<PathBuf> {
    let aside = sibling_with_suffix(path, "corrupt");
    fs::rename(path, &aside).map_err(|e| PersistenceError::io(path, e))?;
    Ok(aside)
}

fn temp_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "tmp")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("save.json");
    path.with_file_name(format!("{file_name}.{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        value: u32,
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<Sample> = load_json(&dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.json");

        let first = Sample {
            name: "a".into(),
            value: 1,
        };
        save_json(&path, &first).unwrap();
        assert_eq!(load_json::<Sample>(&path).unwrap(), Some(first));

        let second = Sample {
            name: "b".into(),
            value: 2,
        };
        save_json(&path, &second).unwrap();
        assert_eq!(load_json::<Sample>(&path).unwrap(), Some(second));
        assert!(!dir.path().join("nested").join("sample.json.tmp").exists());
    }

    #[test]
    fn test_malformed_json_is_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_json::<Sample>(&path).unwrap_err();
        assert!(matches!(err, PersistenceError::Json { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_failed_replace_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keep.json");
        fs::write(&path, "original").unwrap();

        let missing_tmp = dir.path().join("keep.json.tmp");
        assert!(replace_file(&missing_tmp, &path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_set_aside_moves_file_next_to_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "garbage").unwrap();

        let aside = set_aside(&path).unwrap();
        assert_eq!(aside, dir.path().join("scores.json.corrupt"));
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(&aside).unwrap(), "garbage");
    }
}
