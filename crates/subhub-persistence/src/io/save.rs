//! Draft file saving.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{PersistenceError, Result};
use crate::types::DraftFile;

/// Save drafts to `path`.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a
/// half-written draft file behind.
pub fn save_drafts(file: &DraftFile, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(file)
        .map_err(|source| PersistenceError::Serialization { source })?;

    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut out = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    out.write_all(&bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    out.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), drafts = file.drafts.len(), "saved drafts");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DraftEntry;
    use chrono::DateTime;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("drafts.json");

        let mut file = DraftFile::default();
        file.drafts.insert(
            "create-org".to_string(),
            DraftEntry::new(json!({"name": "Acme"}), DateTime::UNIX_EPOCH),
        );
        save_drafts(&file, &path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"create-org\""));
    }
}
