// pdj-common/src/product_store.rs
use crate::error::StorageError;
use crate::storage::KeyValueStore;
use crate::{Product, STORAGE_KEY};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

/// Repository over the full product list.
///
/// Records are handed out as raw JSON so that a save writes every record this
/// page did not edit back exactly as it was read. `load` returns an owned
/// snapshot; callers change their copy and pass the whole list to `save`.
pub trait ProductStore: Send + Sync {
    /// Read every record. Never fails: unreadable data reads as an empty list.
    fn load(&self) -> Vec<Value>;

    /// Overwrite the stored list with `records`.
    fn save(&self, records: &[Value]) -> Result<(), StorageError>;
}

/// Index of the first record whose `id` is the string `id`.
///
/// Ids are compared as strings only; a record with a numeric id never matches.
pub fn record_position(records: &[Value], id: &str) -> Option<usize> {
    records
        .iter()
        .position(|record| record.get("id").and_then(Value::as_str) == Some(id))
}

/// Decode the first record with this id.
pub fn find_product(records: &[Value], id: &str) -> Option<Product> {
    let record = &records[record_position(records, id)?];
    match Product::deserialize(record) {
        Ok(product) => Some(product),
        Err(e) => {
            warn!("Product {} could not be decoded: {}", id, e);
            None
        }
    }
}

/// Product list kept as one JSON array under a single storage key.
pub struct LocalProductStore<S: KeyValueStore> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> LocalProductStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: &str) -> Self {
        LocalProductStore {
            storage,
            key: key.to_string(),
        }
    }
}

impl<S: KeyValueStore> ProductStore for LocalProductStore<S> {
    fn load(&self) -> Vec<Value> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!("Failed to read {}: {}", self.key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(records) => {
                info!("Loaded {} products from {}", records.len(), self.key);
                records
            }
            Err(e) => {
                error!("Stored value under {} is not a product list: {}", self.key, e);
                Vec::new()
            }
        }
    }

    fn save(&self, records: &[Value]) -> Result<(), StorageError> {
        let data = serde_json::to_string(records).map_err(|source| StorageError::Serialize {
            context: self.key.clone(),
            source,
        })?;
        self.storage.set_item(&self.key, &data)?;
        info!("Saved {} products to {}", records.len(), self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn missing_key_loads_empty() {
        let store = LocalProductStore::new(MemoryStorage::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, "{not json").unwrap();
        let store = LocalProductStore::new(storage);
        assert!(store.load().is_empty());
    }

    #[test]
    fn json_that_is_not_a_list_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, r#"{"id": "1"}"#).unwrap();
        assert!(LocalProductStore::new(storage).load().is_empty());
    }

    #[test]
    fn save_then_load_keeps_records_exactly() {
        let store = LocalProductStore::new(MemoryStorage::new());
        let records = vec![
            json!({"id": "b", "name": "Second", "desc": null}),
            json!({"id": "a", "name": "First", "stock": 2.5, "tags": ["x"]}),
            json!({"id": 3, "name": "Numeric id"}),
        ];
        store.save(&records).unwrap();
        assert_eq!(store.load(), records);
    }

    #[test]
    fn one_loosely_typed_record_does_not_hide_the_others() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                STORAGE_KEY,
                r#"[{"id":"a","name":"A","price":1,"stock":1},{"id":"b","name":null,"price":2,"stock":2.5}]"#,
            )
            .unwrap();
        let records = LocalProductStore::new(storage).load();

        assert_eq!(records.len(), 2);
        assert_eq!(find_product(&records, "a").map(|p| p.name), Some("A".to_string()));
        assert_eq!(find_product(&records, "b").map(|p| p.stock), Some(Some(2.5)));
    }

    #[test]
    fn find_matches_string_ids_only() {
        let records = vec![json!({"id": 1, "name": "Numeric"}), json!({"id": "1", "name": "Text"}), json!("junk")];
        assert_eq!(record_position(&records, "1"), Some(1));
        assert_eq!(find_product(&records, "1").map(|p| p.name), Some("Text".to_string()));
        assert_eq!(find_product(&records, "2"), None);
    }

    #[test]
    fn custom_key_is_isolated() {
        let storage = Arc::new(MemoryStorage::new());
        let default_store = LocalProductStore::new(Arc::clone(&storage));
        let other_store = LocalProductStore::with_key(Arc::clone(&storage), "other");

        other_store.save(&[json!({"id": "1", "name": "A"})]).unwrap();
        assert!(default_store.load().is_empty());
        assert_eq!(other_store.load().len(), 1);
    }
}
