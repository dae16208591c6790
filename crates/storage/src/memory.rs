use std::{collections::BTreeMap, sync::Mutex};

use repcount_domain as domain;
use serde::{Serialize, de::DeserializeOwned};

use crate::KeyValueStorage;

/// Volatile storage keeping raw JSON strings, e.g. for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Store a raw value without validation.
    pub fn insert_raw(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.values
            .lock()
            .map(|values| values.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, domain::StorageError> {
        let values = self
            .values
            .lock()
            .map_err(|_| domain::StorageError::Unavailable)?;
        values
            .get(key)
            .map(|value| {
                serde_json::from_str(value)
                    .map_err(|err| domain::StorageError::InvalidData(err.to_string()))
            })
            .transpose()
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), domain::StorageError> {
        let value = serde_json::to_string(value)
            .map_err(|err| domain::StorageError::InvalidData(err.to_string()))?;
        self.values
            .lock()
            .map_err(|_| domain::StorageError::Unavailable)?
            .insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_set_get_delete() {
        let storage = MemoryStorage::default();
        assert_eq!(storage.get::<Vec<u32>>("a").unwrap(), None);
        storage.set("a", &vec![1, 2, 3]).unwrap();
        assert_eq!(storage.raw("a"), Some("[1,2,3]".to_string()));
        assert_eq!(storage.get::<Vec<u32>>("a").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(storage.keys(), vec!["a".to_string()]);
        storage.delete("a");
        assert_eq!(storage.get::<Vec<u32>>("a").unwrap(), None);
    }

    #[test]
    fn test_get_invalid_json() {
        let storage = MemoryStorage::default();
        storage.insert_raw("a", "[1,");
        assert!(matches!(
            storage.get::<Vec<u32>>("a"),
            Err(domain::StorageError::InvalidData(_))
        ));
    }
}
