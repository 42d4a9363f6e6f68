use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, warn};

use crate::entry::VocabEntry;
use crate::error::VocabError;

pub const ENTRIES_FILE: &str = "vocab-entries.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(default_data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn save<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load the saved entry list. A missing file is an empty list. A file
    /// that cannot be read or parsed is moved aside to `*.corrupt` so the
    /// next save does not silently overwrite it, and reported as an error.
    pub fn load_entries(&self) -> Result<Vec<VocabEntry>, VocabError> {
        let path = self.file_path(ENTRIES_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let parsed = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<Vec<VocabEntry>>(&content).map_err(|e| e.to_string())
            });
        match parsed {
            Ok(entries) => {
                debug!(count = entries.len(), path = %path.display(), "entries loaded");
                Ok(entries)
            }
            Err(reason) => {
                let quarantine = path.with_extension("json.corrupt");
                if let Err(e) = fs::rename(&path, &quarantine) {
                    warn!(error = %e, "could not move unreadable entries file aside");
                }
                Err(VocabError::StorageCorruption { path, reason })
            }
        }
    }

    pub fn save_entries(&self, entries: &[VocabEntry]) -> Result<()> {
        self.save(ENTRIES_FILE, entries)?;
        debug!(count = entries.len(), "entries saved");
        Ok(())
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocabr")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryType;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn entry(id: &str, original: &str) -> VocabEntry {
        VocabEntry {
            id: id.to_string(),
            original: original.to_string(),
            phonetics: String::new(),
            part_of_speech: "noun".to_string(),
            vietnamese_meaning: "nghĩa".to_string(),
            example: String::new(),
            entry_type: EntryType::Word,
            timestamp: 1,
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_dir, store) = make_test_store();
        assert!(store.load_entries().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let (_dir, store) = make_test_store();
        let entries = vec![entry("b", "banana"), entry("a", "apple")];
        store.save_entries(&entries).unwrap();
        assert_eq!(store.load_entries().unwrap(), entries);
    }

    #[test]
    fn save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.save_entries(&[entry("a", "apple")]).unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn corrupt_file_is_reported_and_moved_aside() {
        let (dir, store) = make_test_store();
        fs::write(dir.path().join(ENTRIES_FILE), "{not json").unwrap();

        let err = store.load_entries().unwrap_err();
        assert!(matches!(err, VocabError::StorageCorruption { .. }));
        assert!(!dir.path().join(ENTRIES_FILE).exists());
        assert!(dir.path().join("vocab-entries.json.corrupt").exists());

        // After quarantine the store starts over cleanly.
        assert!(store.load_entries().unwrap().is_empty());
    }

    #[test]
    fn wrong_shape_counts_as_corrupt() {
        let (dir, store) = make_test_store();
        fs::write(dir.path().join(ENTRIES_FILE), r#"{"entries": []}"#).unwrap();
        assert!(store.load_entries().is_err());
    }
}
