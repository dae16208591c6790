//! JSON representation of the persisted values.
//!
//! Field names and layout are compatible with logs and programs written by
//! earlier versions of the app.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use log::debug;
use repcount_domain as domain;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DataError {
    #[error("invalid date key {0:?}")]
    InvalidDate(String),
    #[error("invalid count {0}")]
    InvalidCount(i64),
    #[error("invalid timestamp {0}")]
    InvalidTimestamp(i64),
    #[error("invalid exercise name: {0}")]
    InvalidName(#[from] domain::NameError),
    #[error("invalid weight: {0}")]
    InvalidWeight(#[from] domain::WeightError),
    #[error("invalid week {0}")]
    InvalidWeek(u32),
}

impl From<DataError> for domain::StorageError {
    fn from(value: DataError) -> Self {
        domain::StorageError::InvalidData(value.to_string())
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub id: String,
    pub count: i64,
    pub timestamp: i64,
    #[serde(default)]
    pub is_test: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

impl From<&domain::ExerciseSet> for ExerciseSet {
    fn from(value: &domain::ExerciseSet) -> Self {
        Self {
            id: value.id.to_string(),
            count: i64::from(value.count.value()),
            timestamp: value.timestamp.timestamp_millis(),
            is_test: value.is_test,
            exercise_name: value.exercise_name.as_ref().map(ToString::to_string),
            weight: value.weight.map(domain::Weight::value),
        }
    }
}

impl TryFrom<ExerciseSet> for domain::ExerciseSet {
    type Error = DataError;

    fn try_from(value: ExerciseSet) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            count: domain::Count::try_from(value.count)
                .map_err(|_| DataError::InvalidCount(value.count))?,
            timestamp: DateTime::from_timestamp_millis(value.timestamp)
                .ok_or(DataError::InvalidTimestamp(value.timestamp))?,
            is_test: value.is_test,
            exercise_name: value
                .exercise_name
                .as_deref()
                .map(domain::Name::new)
                .transpose()?,
            weight: value.weight.map(domain::Weight::new).transpose()?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct DailyLogEntry {
    pub date: String,
    pub sets: Vec<ExerciseSet>,
    pub total: u64,
}

impl From<&domain::DailyLogEntry> for DailyLogEntry {
    fn from(value: &domain::DailyLogEntry) -> Self {
        Self {
            date: date_key(value.date()),
            sets: value.sets().iter().map(ExerciseSet::from).collect(),
            total: value.total(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ExerciseLog(pub BTreeMap<String, DailyLogEntry>);

impl From<&domain::ExerciseLog> for ExerciseLog {
    fn from(value: &domain::ExerciseLog) -> Self {
        Self(
            value
                .entries()
                .map(|entry| (date_key(entry.date()), DailyLogEntry::from(entry)))
                .collect(),
        )
    }
}

impl TryFrom<ExerciseLog> for domain::ExerciseLog {
    type Error = DataError;

    fn try_from(value: ExerciseLog) -> Result<Self, Self::Error> {
        let mut entries = vec![];
        for (key, entry) in value.0 {
            let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d")
                .map_err(|_| DataError::InvalidDate(key.clone()))?;
            let sets = entry
                .sets
                .into_iter()
                .map(domain::ExerciseSet::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            let Some(daily_log_entry) = domain::DailyLogEntry::new(date, sets) else {
                debug!("dropped empty log entry for {key}");
                continue;
            };
            if daily_log_entry.total() != entry.total {
                debug!(
                    "recomputed total for {key} ({} != {})",
                    daily_log_entry.total(),
                    entry.total
                );
            }
            entries.push(daily_log_entry);
        }
        Ok(entries.into_iter().collect())
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub is_active: bool,
    pub start_date: NaiveDate,
    pub initial_max: i64,
    pub current_week: u32,
    pub weekly_goals: [u32; domain::PROGRAM_WEEKS as usize],
}

impl From<&domain::Program> for Program {
    fn from(value: &domain::Program) -> Self {
        Self {
            is_active: value.is_active,
            start_date: value.start_date,
            initial_max: i64::from(value.initial_max.value()),
            current_week: value.current_week,
            weekly_goals: value.weekly_goals,
        }
    }
}

impl TryFrom<Program> for domain::Program {
    type Error = DataError;

    fn try_from(value: Program) -> Result<Self, Self::Error> {
        if value.current_week == 0 {
            return Err(DataError::InvalidWeek(value.current_week));
        }
        Ok(Self {
            is_active: value.is_active,
            start_date: value.start_date,
            initial_max: domain::Count::try_from(value.initial_max)
                .map_err(|_| DataError::InvalidCount(value.initial_max))?,
            current_week: value.current_week,
            weekly_goals: value.weekly_goals,
        })
    }
}

#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
