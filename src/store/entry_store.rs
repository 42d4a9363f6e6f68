use tracing::{info, warn};

use crate::entry::VocabEntry;
use crate::error::VocabError;
use crate::store::json_store::JsonStore;

/// In-memory entry list, newest first, mirrored to disk after every change.
///
/// A failed write is logged and otherwise ignored: the in-memory list always
/// reflects the user's last action.
pub struct EntryStore {
    entries: Vec<VocabEntry>,
    backend: Option<JsonStore>,
}

impl EntryStore {
    /// Load from `backend`. Unreadable data yields an empty store plus the
    /// error so the caller can tell the user.
    pub fn open(backend: JsonStore) -> (Self, Option<VocabError>) {
        let (entries, problem) = match backend.load_entries() {
            Ok(entries) => (entries, None),
            Err(e) => {
                warn!(error = %e, "discarding unreadable entries");
                (Vec::new(), Some(e))
            }
        };
        info!(count = entries.len(), "entry store opened");
        (
            Self {
                entries,
                backend: Some(backend),
            },
            problem,
        )
    }

    pub fn in_memory(entries: Vec<VocabEntry>) -> Self {
        Self {
            entries,
            backend: None,
        }
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&VocabEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, entry: VocabEntry) {
        info!(id = %entry.id, original = %entry.original, "entry added");
        self.entries.insert(0, entry);
        self.persist();
    }

    /// Returns the removed entry, or None when no entry has that id.
    pub fn remove(&mut self, id: &str) -> Option<VocabEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(idx);
        info!(id, "entry removed");
        self.persist();
        Some(removed)
    }

    fn persist(&self) {
        if let Some(backend) = &self.backend
            && let Err(e) = backend.save_entries(&self.entries)
        {
            warn!(error = %e, "failed to save entries");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::entry::EntryType;
    use crate::store::json_store::ENTRIES_FILE;
    use tempfile::TempDir;

    fn entry(id: &str) -> VocabEntry {
        VocabEntry {
            id: id.to_string(),
            original: format!("word {id}"),
            phonetics: String::new(),
            part_of_speech: String::new(),
            vietnamese_meaning: "nghĩa".to_string(),
            example: String::new(),
            entry_type: EntryType::Phrase,
            timestamp: 0,
        }
    }

    #[test]
    fn add_prepends_and_persists() {
        let dir = TempDir::new().unwrap();
        let (mut store, problem) =
            EntryStore::open(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
        assert!(problem.is_none());
        store.add(entry("1"));
        store.add(entry("2"));
        let ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);

        let (reopened, _) =
            EntryStore::open(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
        assert_eq!(reopened.entries(), store.entries());
    }

    #[test]
    fn remove_by_id() {
        let mut store = EntryStore::in_memory(vec![entry("a"), entry("b")]);
        assert_eq!(store.remove("a").map(|e| e.id), Some("a".to_string()));
        assert!(store.remove("a").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn corrupt_file_opens_empty_with_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(ENTRIES_FILE), "garbage").unwrap();
        let (store, problem) =
            EntryStore::open(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
        assert!(store.is_empty());
        assert!(matches!(problem, Some(VocabError::StorageCorruption { .. })));
    }

    #[test]
    fn failed_write_keeps_in_memory_change() {
        let dir = TempDir::new().unwrap();
        let backend = JsonStore::with_base_dir(dir.path().join("data")).unwrap();
        let (mut store, _) = EntryStore::open(backend);
        fs::remove_dir_all(dir.path().join("data")).unwrap();

        store.add(entry("x"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).map(|e| e.id.as_str()), Some("x"));
    }
}
