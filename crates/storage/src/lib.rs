#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use ::log::debug;
use repcount_domain as domain;
use serde::{Serialize, de::DeserializeOwned};

pub mod local_storage;
pub mod log;
pub mod memory;
pub mod serialized;


/// Synchronous string keyed storage of JSON values.
pub trait KeyValueStorage {
    /// Returns `None` if the key does not exist.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, domain::StorageError>;
    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), domain::StorageError>;
    fn delete(&self, key: &str);
}

/// Repository of exercise logs and programs on top of a key-value storage.
///
/// Every log and program is stored under its own key, so concurrent writers
/// of different exercises do not interfere. Writes to the same key replace
/// the previous value.
#[derive(Debug, Default, Clone)]
pub struct Store<S> {
    storage: S,
}

impl<S: KeyValueStorage> Store<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[must_use]
pub fn log_key(log_id: domain::LogID) -> String {
    format!("log-{}", log_id.key())
}

#[must_use]
pub fn program_key(exercise: domain::Exercise) -> String {
    format!("program-{}", exercise.name())
}

impl<S: KeyValueStorage> domain::ExerciseLogRepository for Store<S> {
    fn read_log(&self, log_id: domain::LogID) -> Result<domain::ExerciseLog, domain::ReadError> {
        let Some(log) = self
            .storage
            .get::<serialized::ExerciseLog>(&log_key(log_id))?
        else {
            debug!("no log stored for {log_id}");
            return Ok(domain::ExerciseLog::new());
        };
        Ok(domain::ExerciseLog::try_from(log).map_err(domain::StorageError::from)?)
    }

    fn write_log(
        &self,
        log_id: domain::LogID,
        log: &domain::ExerciseLog,
    ) -> Result<(), domain::UpdateError> {
        Ok(self
            .storage
            .set(&log_key(log_id), &serialized::ExerciseLog::from(log))?)
    }
}

impl<S: KeyValueStorage> domain::ProgramRepository for Store<S> {
    fn read_program(
        &self,
        exercise: domain::Exercise,
    ) -> Result<Option<domain::Program>, domain::ReadError> {
        match self
            .storage
            .get::<Option<serialized::Program>>(&program_key(exercise))?
            .flatten()
        {
            Some(program) => Ok(Some(
                domain::Program::try_from(program).map_err(domain::StorageError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn write_program(
        &self,
        exercise: domain::Exercise,
        program: Option<&domain::Program>,
    ) -> Result<(), domain::UpdateError> {
        let key = program_key(exercise);
        match program {
            Some(program) => Ok(self
                .storage
                .set(&key, &serialized::Program::from(program))?),
            None => {
                self.storage.delete(&key);
                Ok(())
            }
        }
    }
}
