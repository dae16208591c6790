use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

use crate::{KeyValueStorage, Store};

pub const KEY_DIAGNOSTICS: &str = "diagnostics";
pub const CAPACITY: usize = 100;

pub static LOG: Mutex<Option<Arc<Mutex<dyn Repository>>>> = Mutex::new(None);

/// Persisted ring buffer of the most recent log records, newest first.
pub trait Repository: Send + Sync + 'static {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn write_entry(&self, entry: Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
pub enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl<S: KeyValueStorage + Send + Sync + 'static> Repository for Store<S> {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error> {
        self.storage()
            .get(KEY_DIAGNOSTICS)
            .map(Option::unwrap_or_default)
            .map_err(|err| Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: Entry) -> Result<(), Error> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.push_front(entry);
        entries.truncate(CAPACITY);
        self.storage()
            .set(KEY_DIAGNOSTICS, &entries)
            .map_err(|err| Error::Unknown(err.to_string()))
    }
}

static LOGGER: Logger = Logger;

/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(repository: Arc<Mutex<dyn Repository>>) -> Result<(), SetLoggerError> {
    if let Ok(mut log) = LOG.lock() {
        *log = Some(repository);
    }
    log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Debug))
}

/// Append an entry to the registered repository. Records emitted while the
/// repository is writing are not persisted.
fn persist(level: Level, message: String) {
    let Some(repository) = LOG.lock().ok().and_then(|log| log.clone()) else {
        return;
    };
    if let Ok(repository) = repository.try_lock() {
        let _ = repository.write_entry(Entry {
            time: Local::now().format("%b %d %H:%M:%S").to_string(),
            level,
            message,
        });
    }
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        match record.level() {
            Level::Error => gloo_console::error!(message.clone()),
            Level::Warn => gloo_console::warn!(message.clone()),
            Level::Info => gloo_console::info!(message.clone()),
            Level::Debug | Level::Trace => gloo_console::debug!(message.clone()),
        }

        persist(record.level(), message);
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::memory::MemoryStorage;

    use super::*;

    #[test]
    fn test_write_entry_keeps_most_recent() {
        let store = Store::new(MemoryStorage::default());
        assert_eq!(store.read_entries(), Ok(VecDeque::new()));

        for i in 0..(CAPACITY + 5) {
            store.write_entry(entry(i)).unwrap();
        }

        let entries = store.read_entries().unwrap();
        assert_eq!(entries.len(), CAPACITY);
        assert_eq!(entries.front(), Some(&entry(CAPACITY + 4)));
        assert_eq!(entries.back(), Some(&entry(5)));
    }

    #[test]
    fn test_write_entry_replaces_corrupt_buffer() {
        let storage = MemoryStorage::default();
        storage.insert_raw(KEY_DIAGNOSTICS, "{");
        let store = Store::new(storage);
        assert!(store.read_entries().is_err());
        store.write_entry(entry(0)).unwrap();
        assert_eq!(store.read_entries(), Ok(VecDeque::from([entry(0)])));
    }

    struct NestedRepository(Store<MemoryStorage>);

    impl Repository for NestedRepository {
        fn read_entries(&self) -> Result<VecDeque<Entry>, Error> {
            self.0.read_entries()
        }

        fn write_entry(&self, entry: Entry) -> Result<(), Error> {
            persist(Level::Debug, format!("writing {}", entry.message));
            self.0.write_entry(entry)
        }
    }

    #[test]
    fn test_persist_from_repository() {
        let repository = Arc::new(Mutex::new(NestedRepository(Store::new(
            MemoryStorage::default(),
        ))));
        *LOG.lock().unwrap() = Some(repository.clone() as Arc<Mutex<dyn Repository>>);
        persist(Level::Error, "failed to write log".to_string());
        *LOG.lock().unwrap() = None;

        let entries = repository.lock().unwrap().read_entries().unwrap();
        assert_eq!(
            entries
                .iter()
                .map(|e| (e.level, e.message.as_str()))
                .collect::<Vec<_>>(),
            vec![(Level::Error, "failed to write log")]
        );
    }

    #[test]
    fn test_entry_serde() {
        let entry = Entry {
            time: "Mar 06 10:00:00".to_string(),
            level: Level::Warn,
            message: "failed to read log for Squats".to_string(),
        };
        let serialized = serde_json::to_value(&entry).unwrap();
        assert_eq!(serialized["level"], "Warn");
        assert_eq!(serde_json::from_value::<Entry>(serialized).unwrap(), entry);
    }

    fn entry(i: usize) -> Entry {
        Entry {
            time: String::new(),
            level: Level::Error,
            message: format!("message {i}"),
        }
    }
}
