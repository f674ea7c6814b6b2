//! Draft file loading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{PersistenceError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, DraftFile};

/// Load drafts from `path`. A missing file is an empty store.
pub fn load_drafts(path: &Path) -> Result<DraftFile> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no draft file, starting empty");
            return Ok(DraftFile::default());
        }
        Err(e) => {
            return Err(PersistenceError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    if text.trim().is_empty() {
        return Ok(DraftFile::default());
    }

    let file: DraftFile =
        serde_json::from_str(&text).map_err(|source| PersistenceError::Deserialization {
            path: path.to_path_buf(),
            source,
        })?;

    if file.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: file.schema_version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), drafts = file.drafts.len(), "loaded drafts");
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::save::save_drafts;
    use crate::types::DraftEntry;
    use chrono::DateTime;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let file = load_drafts(&dir.path().join("absent.json")).unwrap();
        assert!(file.drafts.is_empty());
        assert_eq!(file.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drafts.json");

        let mut file = DraftFile::default();
        file.drafts.insert(
            "create-org".to_string(),
            DraftEntry::new(json!({"name": "Acme"}), DateTime::UNIX_EPOCH),
        );
        save_drafts(&file, &path).unwrap();

        assert_eq!(load_drafts(&path).unwrap(), file);
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(
            load_drafts(&path),
            Err(PersistenceError::Deserialization { .. })
        ));
    }

    #[test]
    fn test_load_unsupported_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        fs::write(&path, br#"{"schema_version": 999, "drafts": {}}"#).unwrap();

        assert!(matches!(
            load_drafts(&path),
            Err(PersistenceError::UnsupportedVersion { found: 999, .. })
        ));
    }
}
