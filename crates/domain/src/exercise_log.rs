use std::{collections::BTreeMap, fmt, ops::RangeBounds};

use chrono::{DateTime, NaiveDate, Utc};
use derive_more::{AsRef, Display, Into};
use uuid::Uuid;

use crate::{Name, ReadError, UpdateError};

pub trait ExerciseLogRepository {
    fn read_log(&self, log_id: LogID) -> Result<ExerciseLog, ReadError>;
    fn write_log(&self, log_id: LogID, log: &ExerciseLog) -> Result<(), UpdateError>;
}

/// Identifies one independently persisted log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogID {
    Exercise(crate::Exercise),
    Strength(crate::StrengthCategory),
}

impl LogID {
    /// Storage key component, e.g. `Push-ups` or `Strength-Push`.
    #[must_use]
    pub fn key(self) -> String {
        match self {
            LogID::Exercise(exercise) => exercise.name().to_string(),
            LogID::Strength(category) => format!("Strength-{}", category.name()),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            LogID::Exercise(exercise) => exercise.name(),
            LogID::Strength(category) => category.name(),
        }
    }
}

impl From<crate::Exercise> for LogID {
    fn from(value: crate::Exercise) -> Self {
        LogID::Exercise(value)
    }
}

impl From<crate::StrengthCategory> for LogID {
    fn from(value: crate::StrengthCategory) -> Self {
        LogID::Strength(value)
    }
}

impl fmt::Display for LogID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Number of repetitions or seconds of a set. Always positive.
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Count(u32);

impl Count {
    pub fn new(value: u32) -> Result<Self, CountError> {
        if value == 0 {
            return Err(CountError::NotPositive);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Count {
    type Error = CountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(CountError::NotPositive);
        }
        Count::new(u32::try_from(value).map_err(|_| CountError::OutOfRange)?)
    }
}

impl TryFrom<&str> for Count {
    type Error = CountError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<i64>() {
            Ok(parsed_value) => Count::try_from(parsed_value),
            Err(_) => Err(CountError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CountError {
    #[error("Count must be greater than zero")]
    NotPositive,
    #[error("Count is too large")]
    OutOfRange,
    #[error("Count must be an integer")]
    ParseError,
}

/// Load of a strength set.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !value.is_finite() || value < 0.0 {
            return Err(WeightError::Negative);
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Weight::default());
        }
        match value.replace(',', ".").parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must not be negative")]
    Negative,
    #[error("Weight must be a decimal number")]
    ParseError,
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetID(String);

impl SetID {
    #[must_use]
    pub fn generate(timestamp: DateTime<Utc>) -> Self {
        Self(format!(
            "set-{}-{}",
            timestamp.timestamp_millis(),
            Uuid::new_v4().simple()
        ))
    }
}

impl From<String> for SetID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SetID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSet {
    pub id: SetID,
    pub count: Count,
    pub timestamp: DateTime<Utc>,
    pub is_test: bool,
    pub exercise_name: Option<Name>,
    pub weight: Option<Weight>,
}

impl ExerciseSet {
    #[must_use]
    pub fn new(count: Count, is_test: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: SetID::generate(timestamp),
            count,
            timestamp,
            is_test,
            exercise_name: None,
            weight: None,
        }
    }

    #[must_use]
    pub fn strength(
        exercise_name: Name,
        weight: Weight,
        count: Count,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            exercise_name: Some(exercise_name),
            weight: Some(weight),
            ..Self::new(count, false, timestamp)
        }
    }
}

/// All sets of one log on one date.
///
/// The total is cached and recomputed from scratch after every change of the
/// sets. Entries are never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyLogEntry {
    date: NaiveDate,
    sets: Vec<ExerciseSet>,
    total: u64,
}

impl DailyLogEntry {
    /// Returns `None` if `sets` is empty.
    #[must_use]
    pub fn new(date: NaiveDate, sets: Vec<ExerciseSet>) -> Option<Self> {
        if sets.is_empty() {
            return None;
        }
        let mut entry = Self {
            date,
            sets,
            total: 0,
        };
        entry.update();
        Some(entry)
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn sets(&self) -> &[ExerciseSet] {
        &self.sets
    }

    /// Sum of all non-test sets.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn set(&self, id: &SetID) -> Option<&ExerciseSet> {
        self.sets.iter().find(|s| s.id == *id)
    }

    fn update(&mut self) {
        self.sets.sort_by_key(|s| s.timestamp);
        self.total = self
            .sets
            .iter()
            .filter(|s| !s.is_test)
            .map(|s| u64::from(s.count.value()))
            .sum();
    }
}

/// Daily entries of one exercise, keyed by date.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExerciseLog {
    entries: BTreeMap<NaiveDate, DailyLogEntry>,
}

impl ExerciseLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entry(&self, date: NaiveDate) -> Option<&DailyLogEntry> {
        self.entries.get(&date)
    }

    /// Entries in ascending date order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &DailyLogEntry> {
        self.entries.values()
    }

    pub fn entries_in(
        &self,
        range: impl RangeBounds<NaiveDate>,
    ) -> impl DoubleEndedIterator<Item = &DailyLogEntry> {
        self.entries.range(range).map(|(_, entry)| entry)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Insert a set, creating the entry for `date` if necessary.
    pub fn add_set(&mut self, date: NaiveDate, set: ExerciseSet) {
        let entry = self.entries.entry(date).or_insert_with(|| DailyLogEntry {
            date,
            sets: vec![],
            total: 0,
        });
        entry.sets.push(set);
        entry.update();
    }

    /// Replace the count of a set. Returns `false` if the set does not exist.
    pub fn edit_set(&mut self, date: NaiveDate, id: &SetID, count: Count) -> bool {
        self.modify_set(date, id, |set| set.count = count)
    }

    /// Replace name, weight and count of a strength set. Returns `false` if
    /// the set does not exist.
    pub fn edit_strength_set(
        &mut self,
        date: NaiveDate,
        id: &SetID,
        exercise_name: Name,
        weight: Weight,
        count: Count,
    ) -> bool {
        self.modify_set(date, id, |set| {
            set.exercise_name = Some(exercise_name);
            set.weight = Some(weight);
            set.count = count;
        })
    }

    /// Remove a set and drop the whole entry if it was the last one. Returns
    /// `false` if the set does not exist.
    pub fn delete_set(&mut self, date: NaiveDate, id: &SetID) -> bool {
        let Some(entry) = self.entries.get_mut(&date) else {
            return false;
        };
        let len = entry.sets.len();
        entry.sets.retain(|s| s.id != *id);
        if entry.sets.len() == len {
            return false;
        }
        if entry.sets.is_empty() {
            self.entries.remove(&date);
        } else {
            entry.update();
        }
        true
    }

    fn modify_set(
        &mut self,
        date: NaiveDate,
        id: &SetID,
        f: impl FnOnce(&mut ExerciseSet),
    ) -> bool {
        let Some(entry) = self.entries.get_mut(&date) else {
            return false;
        };
        let Some(set) = entry.sets.iter_mut().find(|s| s.id == *id) else {
            return false;
        };
        f(set);
        entry.update();
        true
    }
}

impl FromIterator<DailyLogEntry> for ExerciseLog {
    fn from_iter<T: IntoIterator<Item = DailyLogEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|e| (e.date, e)).collect(),
        }
    }
}
