use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use booth_types::{HistoryItem, HISTORY_STORAGE_KEY};

use crate::error::HistoryError;
use crate::storage::{FileStorage, KeyValueStorage};

/// Newest-first list of recorded exchanges kept in one persisted value.
///
/// All operations take the same async mutex for their whole
/// read-modify-write cycle, so a `load()` issued after a completed mutation
/// always observes it and two mutations never work from the same snapshot.
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_key(storage, HISTORY_STORAGE_KEY)
    }

    pub fn with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    /// File-backed store rooted at `dir`
    pub fn open(dir: &Path) -> Self {
        Self::new(Arc::new(FileStorage::new(dir)))
    }

    /// Full history, newest first.
    ///
    /// A missing, unreadable or unparsable value yields an empty list. The
    /// stored bytes are left alone until the next successful write.
    pub async fn load(&self) -> Vec<HistoryItem> {
        let _guard = self.lock.lock().await;
        self.read_list().await
    }

    /// Look up a single record by id
    pub async fn get(&self, id: &str) -> Option<HistoryItem> {
        self.load().await.into_iter().find(|item| item.id == id)
    }

    /// Insert `item` at the newest position and persist.
    ///
    /// An empty or already-taken id is replaced by a fresh one derived from
    /// the item's timestamp. Returns the record as stored.
    pub async fn add(&self, mut item: HistoryItem) -> Result<HistoryItem, HistoryError> {
        if item.question.trim().is_empty() {
            return Err(HistoryError::EmptyQuestion);
        }

        let _guard = self.lock.lock().await;
        let mut items = self.read_list().await;

        if !item.has_id() || items.iter().any(|existing| existing.id == item.id) {
            item.id = allocate_id(&items, item.timestamp);
        }

        items.insert(0, item.clone());
        self.write_list(&items).await?;

        log::debug!("history: added {} ({} records)", item.id, items.len());
        Ok(item)
    }

    /// Remove the record with `id`. Returns whether anything was removed;
    /// an unknown id is not an error and leaves storage untouched.
    pub async fn remove(&self, id: &str) -> Result<bool, HistoryError> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_list().await;

        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            log::debug!("history: remove of unknown id {}", id);
            return Ok(false);
        }

        self.write_list(&items).await?;
        log::debug!("history: removed {}", id);
        Ok(true)
    }

    /// Drop every record
    pub async fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.lock.lock().await;
        self.storage
            .remove_item(&self.key)
            .await
            .map_err(|e| HistoryError::StorageWrite(e.to_string()))?;
        log::debug!("history: cleared");
        Ok(())
    }

    async fn read_list(&self) -> Vec<HistoryItem> {
        match self.try_read_list().await {
            Ok(items) => items,
            Err(e) => {
                log::warn!("{}; treating history as empty", e);
                Vec::new()
            }
        }
    }

    async fn try_read_list(&self) -> Result<Vec<HistoryItem>, HistoryError> {
        let raw = self
            .storage
            .get_item(&self.key)
            .await
            .map_err(|e| HistoryError::StorageRead(e.to_string()))?;

        match raw {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| HistoryError::StorageRead(format!("unparsable history: {}", e))),
        }
    }

    async fn write_list(&self, items: &[HistoryItem]) -> Result<(), HistoryError> {
        let raw = serde_json::to_string(items)
            .map_err(|e| HistoryError::StorageWrite(e.to_string()))?;
        self.storage
            .set_item(&self.key, &raw)
            .await
            .map_err(|e| HistoryError::StorageWrite(e.to_string()))
    }
}

/// First id at or after `timestamp` not used by any record
fn allocate_id(items: &[HistoryItem], timestamp: i64) -> String {
    let mut candidate = timestamp.max(0);
    loop {
        let id = candidate.to_string();
        if !items.iter().any(|item| item.id == id) {
            return id;
        }
        candidate += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn memory_store() -> (HistoryStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (HistoryStore::new(Arc::new(storage.clone())), storage)
    }

    fn item(id: &str, question: &str, answer: &str, timestamp: i64) -> HistoryItem {
        HistoryItem {
            id: id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            timestamp,
        }
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let (store, _) = memory_store();
        let original = item("1700000000000", "会場はどこ？\n", "  B棟 2F です ✨", 1_700_000_000_000);

        let saved = store.add(original.clone()).await.unwrap();
        assert_eq!(saved, original);
        assert_eq!(store.load().await, vec![original]);
    }

    #[tokio::test]
    async fn test_add_inserts_newest_first() {
        let (store, _) = memory_store();
        store.add(item("1", "first", "a", 1)).await.unwrap();
        store.add(item("2", "second", "b", 2)).await.unwrap();
        store.add(item("3", "third", "c", 3)).await.unwrap();

        let ids: Vec<String> = store.load().await.into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[tokio::test]
    async fn test_drafts_get_unique_ids() {
        let (store, _) = memory_store();
        let a = store.add(item("", "Q1", "A1", 1_000)).await.unwrap();
        let b = store.add(item("", "Q2", "A2", 1_000)).await.unwrap();

        assert_eq!(a.id, "1000");
        assert_eq!(b.id, "1001");
    }

    #[tokio::test]
    async fn test_colliding_id_is_reassigned() {
        let (store, _) = memory_store();
        store.add(item("42", "Q1", "A1", 42)).await.unwrap();
        let second = store.add(item("42", "Q2", "A2", 42)).await.unwrap();

        assert_ne!(second.id, "42");
        let ids: HashSet<String> = store.load().await.into_iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let (store, storage) = memory_store();
        let err = store.add(item("", "   ", "A", 1)).await.unwrap_err();

        assert!(matches!(err, HistoryError::EmptyQuestion));
        assert_eq!(storage.raw(HISTORY_STORAGE_KEY), None);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_noop() {
        let (store, _) = memory_store();
        store.add(item("1", "Q", "A", 1)).await.unwrap();
        let before = store.load().await;

        assert!(!store.remove("missing").await.unwrap());
        assert_eq!(store.load().await, before);
    }

    #[tokio::test]
    async fn test_remove_existing() {
        let (store, _) = memory_store();
        store.add(item("1", "Q1", "A1", 1)).await.unwrap();
        store.add(item("2", "Q2", "A2", 2)).await.unwrap();

        assert!(store.remove("1").await.unwrap());
        let remaining = store.load().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "2");
        assert_eq!(store.get("1").await, None);
    }

    #[tokio::test]
    async fn test_clear_is_total() {
        let (store, _) = memory_store();
        for n in 0..5 {
            store.add(item("", &format!("Q{}", n), "A", n)).await.unwrap();
        }

        store.clear().await.unwrap();
        assert!(store.load().await.is_empty());

        // Clearing an already empty history is fine too
        store.clear().await.unwrap();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_value_loads_as_empty_and_is_kept() {
        let storage = MemoryStorage::with_value(HISTORY_STORAGE_KEY, "{not json");
        let store = HistoryStore::new(Arc::new(storage.clone()));

        assert!(store.load().await.is_empty());
        assert_eq!(storage.raw(HISTORY_STORAGE_KEY).as_deref(), Some("{not json"));
    }

    #[tokio::test]
    async fn test_add_after_corruption_replaces_value() {
        let storage = MemoryStorage::with_value(HISTORY_STORAGE_KEY, "garbage");
        let store = HistoryStore::new(Arc::new(storage.clone()));

        store.add(item("7", "Q", "A", 7)).await.unwrap();
        assert_eq!(store.load().await, vec![item("7", "Q", "A", 7)]);
    }

    #[tokio::test]
    async fn test_read_failure_loads_as_empty() {
        let storage = MemoryStorage::new();
        storage.set_fail_reads(true);
        let store = HistoryStore::new(Arc::new(storage));

        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_reported_and_not_saved() {
        let (store, storage) = memory_store();
        store.add(item("1", "kept", "A", 1)).await.unwrap();

        storage.set_fail_writes(true);
        let err = store.add(item("2", "lost", "B", 2)).await.unwrap_err();
        assert!(err.is_write_failure());
        assert!(store.remove("1").await.unwrap_err().is_write_failure());
        assert!(store.clear().await.unwrap_err().is_write_failure());

        storage.set_fail_writes(false);
        let items = store.load().await;
        assert_eq!(items, vec![item("1", "kept", "A", 1)]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_serialized() {
        let (store, _) = memory_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..20)
            .map(|n| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.add(item("", &format!("Q{}", n), "A", 5_000)).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let items = store.load().await;
        assert_eq!(items.len(), 20);
        let ids: HashSet<String> = items.into_iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn test_concurrent_remove_does_not_drop_add() {
        let (store, _) = memory_store();
        let store = Arc::new(store);
        store.add(item("old", "old", "A", 1)).await.unwrap();

        let adder = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.add(item("new", "new", "B", 2)).await })
        };
        let remover = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.remove("old").await })
        };
        adder.await.unwrap().unwrap();
        assert!(remover.await.unwrap().unwrap());

        assert_eq!(store.load().await, vec![item("new", "new", "B", 2)]);
    }

    #[tokio::test]
    async fn test_file_backed_layout() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::open(tmp.path());
        store.add(item("1", "Q1", "A1", 1)).await.unwrap();
        store.add(item("2", "Q2", "A2", 2)).await.unwrap();

        let raw = std::fs::read_to_string(tmp.path().join("question_history.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "id": "2", "question": "Q2", "answer": "A2", "timestamp": 2 },
                { "id": "1", "question": "Q1", "answer": "A1", "timestamp": 1 }
            ])
        );

        // A second instance over the same directory sees the same history
        let reopened = HistoryStore::open(tmp.path());
        assert_eq!(reopened.load().await.len(), 2);
    }
}
