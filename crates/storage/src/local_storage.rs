use gloo_storage::Storage as GlooStorage;
use repcount_domain as domain;
use serde::{Serialize, de::DeserializeOwned};

use crate::{KeyValueStorage, Store};

/// Browser local storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    #[must_use]
    pub fn store() -> Store<LocalStorage> {
        Store::new(LocalStorage)
    }
}

impl KeyValueStorage for LocalStorage {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, domain::StorageError> {
        match gloo_storage::LocalStorage::get(key) {
            Ok(value) => Ok(Some(value)),
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(storage_error(err)),
        }
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), domain::StorageError> {
        gloo_storage::LocalStorage::set(key, value).map_err(storage_error)
    }

    fn delete(&self, key: &str) {
        gloo_storage::LocalStorage::delete(key);
    }
}

fn storage_error(err: gloo_storage::errors::StorageError) -> domain::StorageError {
    match err {
        gloo_storage::errors::StorageError::SerdeError(err) => {
            domain::StorageError::InvalidData(err.to_string())
        }
        err => domain::StorageError::Other(err.to_string().into()),
    }
}
