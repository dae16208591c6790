use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use log::error;

use crate::{DailyLogEntry, ExerciseLog, ExerciseLogRepository, LogID, ReadError};

pub const MAX_CALENDAR_LABELS: usize = 3;

/// Result of a scan over several logs.
///
/// Logs which could not be read are treated as empty and reported in
/// `failures`.
#[derive(Debug)]
pub struct Aggregation<T> {
    pub value: T,
    pub failures: Vec<(LogID, ReadError)>,
}

impl<T> Aggregation<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Aggregation<U> {
        Aggregation {
            value: f(self.value),
            failures: self.failures,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub log_id: LogID,
    pub entry: DailyLogEntry,
}

pub fn read_logs<R: ExerciseLogRepository>(
    repository: &R,
    log_ids: impl IntoIterator<Item = LogID>,
) -> Aggregation<Vec<(LogID, ExerciseLog)>> {
    let mut logs = vec![];
    let mut failures = vec![];
    for log_id in log_ids {
        match repository.read_log(log_id) {
            Ok(log) => logs.push((log_id, log)),
            Err(err) => {
                error!("failed to read log for {log_id}: {err}");
                logs.push((log_id, ExerciseLog::new()));
                failures.push((log_id, err));
            }
        }
    }
    Aggregation {
        value: logs,
        failures,
    }
}

/// Entries of all logs on `date`. Logs without an entry are omitted.
#[must_use]
pub fn day_entries(logs: &[(LogID, ExerciseLog)], date: NaiveDate) -> Vec<LogEntry> {
    logs.iter()
        .filter_map(|(log_id, log)| {
            log.entry(date).map(|entry| LogEntry {
                log_id: *log_id,
                entry: entry.clone(),
            })
        })
        .collect()
}

/// Entries of all logs grouped by date.
#[must_use]
pub fn history(logs: &[(LogID, ExerciseLog)]) -> BTreeMap<NaiveDate, Vec<LogEntry>> {
    let mut result: BTreeMap<NaiveDate, Vec<LogEntry>> = BTreeMap::new();
    for (log_id, log) in logs {
        for entry in log.entries() {
            result.entry(entry.date()).or_default().push(LogEntry {
                log_id: *log_id,
                entry: entry.clone(),
            });
        }
    }
    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub labels: Vec<&'static str>,
    /// Number of logged exercises without a label.
    pub overflow: usize,
}

impl From<&[LogEntry]> for CalendarDay {
    fn from(value: &[LogEntry]) -> Self {
        Self {
            labels: value
                .iter()
                .take(MAX_CALENDAR_LABELS)
                .map(|e| e.log_id.name())
                .collect(),
            overflow: value.len().saturating_sub(MAX_CALENDAR_LABELS),
        }
    }
}

#[must_use]
pub fn calendar(
    history: &BTreeMap<NaiveDate, Vec<LogEntry>>,
) -> BTreeMap<NaiveDate, CalendarDay> {
    history
        .iter()
        .map(|(date, entries)| (*date, CalendarDay::from(entries.as_slice())))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSummary {
    pub week_start: NaiveDate,
    pub total: u64,
    pub days: u32,
}

/// Sunday of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// Totals and training days per calendar week, most recent week first.
#[must_use]
pub fn weekly_summary(log: &ExerciseLog) -> Vec<WeekSummary> {
    let mut weeks: BTreeMap<NaiveDate, WeekSummary> = BTreeMap::new();
    for entry in log.entries() {
        let week_start = week_start(entry.date());
        let summary = weeks.entry(week_start).or_insert(WeekSummary {
            week_start,
            total: 0,
            days: 0,
        });
        summary.total = summary.total.saturating_add(entry.total());
        summary.days += 1;
    }
    weeks.into_values().rev().collect()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{Count, Exercise, ExerciseSet, StorageError, StrengthCategory, UpdateError};

    use super::*;

    #[rstest]
    #[case::sunday((2024, 3, 3), (2024, 3, 3))]
    #[case::wednesday((2024, 3, 6), (2024, 3, 3))]
    #[case::saturday((2024, 3, 9), (2024, 3, 3))]
    #[case::across_month((2024, 3, 1), (2024, 2, 25))]
    #[case::across_year((2025, 1, 1), (2024, 12, 29))]
    fn test_week_start(#[case] date: (i32, u32, u32), #[case] expected: (i32, u32, u32)) {
        assert_eq!(
            week_start(NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap()),
            NaiveDate::from_ymd_opt(expected.0, expected.1, expected.2).unwrap()
        );
    }

    #[test]
    fn test_weekly_summary() {
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let mut log = ExerciseLog::new();
        for (day, count) in [(6, 5), (0, 10), (3, 7), (-1, 4), (7, 2)] {
            add(&mut log, sunday + Duration::days(day), count, false);
        }
        add(&mut log, sunday, 50, true);

        assert_eq!(
            weekly_summary(&log),
            vec![
                WeekSummary {
                    week_start: sunday + Duration::days(7),
                    total: 2,
                    days: 1,
                },
                WeekSummary {
                    week_start: sunday,
                    total: 22,
                    days: 3,
                },
                WeekSummary {
                    week_start: sunday - Duration::days(7),
                    total: 4,
                    days: 1,
                },
            ]
        );
        assert_eq!(weekly_summary(&ExerciseLog::new()), vec![]);
    }

    #[test]
    fn test_weekly_summary_large_totals() {
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let mut log = ExerciseLog::new();
        for day in 0..3 {
            add(&mut log, sunday + Duration::days(day), u32::MAX, false);
            add(&mut log, sunday + Duration::days(day), u32::MAX, false);
        }

        assert_eq!(
            weekly_summary(&log),
            vec![WeekSummary {
                week_start: sunday,
                total: 6 * u64::from(u32::MAX),
                days: 3,
            }]
        );
    }

    #[test]
    fn test_day_entries() {
        let mut push_ups = ExerciseLog::new();
        add(&mut push_ups, TODAY, 10, false);
        let mut squats = ExerciseLog::new();
        add(&mut squats, TODAY, 20, false);
        add(&mut squats, TODAY - Duration::days(1), 20, false);
        let mut plank = ExerciseLog::new();
        add(&mut plank, TODAY - Duration::days(1), 60, false);

        let logs = vec![
            (LogID::from(Exercise::PushUps), push_ups),
            (LogID::from(Exercise::Squats), squats),
            (LogID::from(Exercise::Plank), plank),
        ];
        let entries = day_entries(&logs, TODAY);
        assert_eq!(
            entries
                .iter()
                .map(|e| (e.log_id, e.entry.total()))
                .collect::<Vec<_>>(),
            vec![
                (LogID::from(Exercise::PushUps), 10),
                (LogID::from(Exercise::Squats), 20)
            ]
        );
        assert_eq!(day_entries(&logs, TODAY + Duration::days(1)), vec![]);
    }

    #[test]
    fn test_history_and_calendar() {
        let exercises = [
            Exercise::PushUps,
            Exercise::Squats,
            Exercise::ChinUps,
            Exercise::Plank,
            Exercise::WallSit,
        ];
        let logs = exercises
            .iter()
            .enumerate()
            .map(|(i, exercise)| {
                let mut log = ExerciseLog::new();
                add(&mut log, TODAY, 1, false);
                if i == 0 {
                    add(&mut log, TODAY - Duration::days(2), 1, false);
                }
                (LogID::from(*exercise), log)
            })
            .collect::<Vec<_>>();

        let history = history(&logs);
        assert_eq!(history.len(), 2);
        assert_eq!(history[&TODAY].len(), 5);
        assert_eq!(history[&(TODAY - Duration::days(2))].len(), 1);

        let calendar = calendar(&history);
        assert_eq!(
            calendar[&TODAY],
            CalendarDay {
                labels: vec!["Push-ups", "Squats", "Chin-ups"],
                overflow: 2,
            }
        );
        assert_eq!(
            calendar[&(TODAY - Duration::days(2))],
            CalendarDay {
                labels: vec!["Push-ups"],
                overflow: 0,
            }
        );
    }

    #[test]
    fn test_read_logs_treats_failures_as_empty() {
        let mut log = ExerciseLog::new();
        add(&mut log, TODAY, 3, false);
        let repository = FakeRepository {
            log: RefCell::new(log),
        };

        let aggregation = read_logs(
            &repository,
            [
                LogID::from(Exercise::PushUps),
                LogID::from(StrengthCategory::Push),
            ],
        );

        assert!(!aggregation.is_complete());
        assert_eq!(aggregation.failures.len(), 1);
        assert_eq!(aggregation.failures[0].0, LogID::from(StrengthCategory::Push));
        assert!(matches!(
            aggregation.failures[0].1,
            ReadError::Storage(StorageError::InvalidData(_))
        ));
        let entries = aggregation.map(|logs| day_entries(&logs, TODAY));
        assert_eq!(entries.value.len(), 1);
        assert_eq!(entries.value[0].log_id, LogID::from(Exercise::PushUps));
    }

    struct FakeRepository {
        log: RefCell<ExerciseLog>,
    }

    impl ExerciseLogRepository for FakeRepository {
        fn read_log(&self, log_id: LogID) -> Result<ExerciseLog, ReadError> {
            match log_id {
                LogID::Exercise(_) => Ok(self.log.borrow().clone()),
                LogID::Strength(_) => Err(StorageError::InvalidData("corrupt".to_string()).into()),
            }
        }

        fn write_log(&self, _: LogID, log: &ExerciseLog) -> Result<(), UpdateError> {
            *self.log.borrow_mut() = log.clone();
            Ok(())
        }
    }

    const TODAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();

    fn add(log: &mut ExerciseLog, date: NaiveDate, count: u32, is_test: bool) {
        log.add_set(
            date,
            ExerciseSet::new(
                Count::new(count).unwrap(),
                is_test,
                Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            ),
        );
    }
}
