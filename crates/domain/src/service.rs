use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, error, warn};

use crate::{
    Aggregation, CalendarDay, Clock, Count, DailyLogEntry, Exercise, ExerciseLog,
    ExerciseLogRepository, ExerciseSet, LogEntry, LogID, Name, Program, ProgramRepository,
    ProgramStatus, SetID, StrengthCategory, TestRecommendation, UpdateError,
    WeekSummary, Weight, calendar, day_entries, history, read_logs, weekly_summary,
};

pub struct Service<R, C> {
    repository: R,
    clock: C,
}

macro_rules! log_on_error {
    ($result: expr, $action: literal, $entity: expr) => {{
        let result = $result;
        if let Err(ref err) = result {
            error!("failed to {} {}: {err}", $action, $entity);
        }
        result
    }};
}

impl<R, C> Service<R, C>
where
    R: ExerciseLogRepository + ProgramRepository,
    C: Clock,
{
    pub fn new(repository: R, clock: C) -> Self {
        Self { repository, clock }
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Read a log. Unreadable data is reported and treated as an empty log.
    pub fn get_log(&self, log_id: LogID) -> Aggregation<ExerciseLog> {
        let mut aggregation = read_logs(&self.repository, [log_id]);
        Aggregation {
            value: aggregation
                .value
                .pop()
                .map(|(_, log)| log)
                .unwrap_or_default(),
            failures: aggregation.failures,
        }
    }

    /// Record a set. Non-positive counts are ignored.
    ///
    /// The date defaults to today.
    pub fn add_set(
        &self,
        log_id: LogID,
        count: i64,
        is_test: bool,
        date: Option<NaiveDate>,
    ) -> Result<Option<ExerciseSet>, UpdateError> {
        let Ok(count) = Count::try_from(count) else {
            debug!("ignored set with invalid count {count} for {log_id}");
            return Ok(None);
        };
        let set = ExerciseSet::new(count, is_test, self.clock.now());
        self.insert_set(log_id, date, set).map(Some)
    }

    /// Replace the count of a set. Invalid counts and unknown sets are
    /// ignored and reported as `false`.
    pub fn edit_set(
        &self,
        log_id: LogID,
        date: NaiveDate,
        id: &SetID,
        count: i64,
    ) -> Result<bool, UpdateError> {
        let Ok(count) = Count::try_from(count) else {
            debug!("ignored edit with invalid count {count} for {log_id}");
            return Ok(false);
        };
        self.modify_log(log_id, "edit", |log| log.edit_set(date, id, count))
    }

    /// Remove a set. The caller is responsible for confirming the deletion
    /// with the user.
    pub fn delete_set(
        &self,
        log_id: LogID,
        date: NaiveDate,
        id: &SetID,
    ) -> Result<bool, UpdateError> {
        self.modify_log(log_id, "delete", |log| log.delete_set(date, id))
    }

    pub fn add_strength_set(
        &self,
        category: StrengthCategory,
        exercise_name: &str,
        weight: &str,
        reps: &str,
        date: Option<NaiveDate>,
    ) -> Result<Option<ExerciseSet>, UpdateError> {
        let Some((exercise_name, weight, count)) = parse_strength_set(exercise_name, weight, reps)
        else {
            return Ok(None);
        };
        let set = ExerciseSet::strength(exercise_name, weight, count, self.clock.now());
        self.insert_set(category.into(), date, set).map(Some)
    }

    pub fn edit_strength_set(
        &self,
        category: StrengthCategory,
        date: NaiveDate,
        id: &SetID,
        exercise_name: &str,
        weight: &str,
        reps: &str,
    ) -> Result<bool, UpdateError> {
        let Some((exercise_name, weight, count)) = parse_strength_set(exercise_name, weight, reps)
        else {
            return Ok(false);
        };
        self.modify_log(category.into(), "edit", |log| {
            log.edit_strength_set(date, id, exercise_name, weight, count)
        })
    }

    /// Today's entry of every strength category that has one.
    pub fn get_strength_today(&self) -> Aggregation<Vec<LogEntry>> {
        self.get_day_entries(
            StrengthCategory::all().into_iter().map(LogID::from),
            self.today(),
        )
    }

    /// Record a strength test and start a new program seeded by its result.
    ///
    /// An existing program is replaced. If the test set cannot be written,
    /// the previous program is restored.
    pub fn record_test(
        &self,
        exercise: Exercise,
        count: i64,
    ) -> Result<Option<(Program, TestRecommendation)>, UpdateError> {
        let Ok(max) = Count::try_from(count) else {
            debug!("ignored test with invalid count {count} for {exercise}");
            return Ok(None);
        };
        let previous = self.repository.read_program(exercise).unwrap_or_default();
        let program = Program::start(max, self.today());
        log_on_error!(
            self.repository.write_program(exercise, Some(&program)),
            "write",
            format!("program for {exercise}")
        )?;
        if let Err(err) = self.insert_set(
            exercise.into(),
            None,
            ExerciseSet::new(max, true, self.clock.now()),
        ) {
            if let Err(err) = self.repository.write_program(exercise, previous.as_ref()) {
                error!("failed to restore program for {exercise}: {err}");
            }
            return Err(err);
        }
        Ok(Some((program, TestRecommendation::from(max))))
    }

    /// Read the program of an exercise and roll its current week forward.
    ///
    /// An unreadable program is reported and treated as absent.
    pub fn get_program(&self, exercise: Exercise) -> Aggregation<Option<Program>> {
        let mut program = match self.repository.read_program(exercise) {
            Ok(program) => program,
            Err(err) => {
                warn!("failed to read program for {exercise}: {err}");
                return Aggregation {
                    value: None,
                    failures: vec![(exercise.into(), err)],
                };
            }
        };
        if let Some(program) = program.as_mut() {
            if program.is_active && program.refresh(self.today()) {
                debug!(
                    "advanced program for {exercise} to week {}",
                    program.current_week
                );
                if let Err(err) = self.repository.write_program(exercise, Some(program)) {
                    error!("failed to write program for {exercise}: {err}");
                }
            }
        }
        Aggregation {
            value: program,
            failures: vec![],
        }
    }

    /// Progress of the current program week of an exercise.
    pub fn get_program_status(&self, exercise: Exercise) -> Aggregation<ProgramStatus> {
        let Aggregation {
            value: program,
            mut failures,
        } = self.get_program(exercise);
        let Some(program) = program else {
            return Aggregation {
                value: ProgramStatus::NoProgram,
                failures,
            };
        };
        let log = self.get_log(exercise.into());
        failures.extend(log.failures);
        Aggregation {
            value: program.status(&log.value),
            failures,
        }
    }

    pub fn get_today(&self) -> Aggregation<Vec<LogEntry>> {
        self.get_day_entries(Exercise::all().into_iter().map(LogID::from), self.today())
    }

    pub fn get_day_detail(&self, date: NaiveDate) -> Aggregation<Vec<LogEntry>> {
        self.get_day_entries(Exercise::all().into_iter().map(LogID::from), date)
    }

    pub fn get_history(&self) -> Aggregation<BTreeMap<NaiveDate, Vec<LogEntry>>> {
        read_logs(
            &self.repository,
            Exercise::all().into_iter().map(LogID::from),
        )
        .map(|logs| history(&logs))
    }

    pub fn get_calendar(&self) -> Aggregation<BTreeMap<NaiveDate, CalendarDay>> {
        self.get_history().map(|history| calendar(&history))
    }

    pub fn get_weekly_summary(&self, log_id: LogID) -> Aggregation<Vec<WeekSummary>> {
        self.get_log(log_id).map(|log| weekly_summary(&log))
    }

    pub fn get_entry(&self, log_id: LogID, date: NaiveDate) -> Option<DailyLogEntry> {
        self.get_log(log_id).value.entry(date).cloned()
    }

    fn get_day_entries(
        &self,
        log_ids: impl IntoIterator<Item = LogID>,
        date: NaiveDate,
    ) -> Aggregation<Vec<LogEntry>> {
        read_logs(&self.repository, log_ids).map(|logs| day_entries(&logs, date))
    }

    fn insert_set(
        &self,
        log_id: LogID,
        date: Option<NaiveDate>,
        set: ExerciseSet,
    ) -> Result<ExerciseSet, UpdateError> {
        let date = date.unwrap_or_else(|| self.today());
        let mut log = self.get_log(log_id).value;
        log.add_set(date, set.clone());
        log_on_error!(
            self.repository.write_log(log_id, &log),
            "add",
            format!("set to {log_id}")
        )?;
        Ok(set)
    }

    fn modify_log(
        &self,
        log_id: LogID,
        action: &str,
        f: impl FnOnce(&mut ExerciseLog) -> bool,
    ) -> Result<bool, UpdateError> {
        let mut log = self.get_log(log_id).value;
        if !f(&mut log) {
            debug!("ignored {action} of unknown set in {log_id}");
            return Ok(false);
        }
        log_on_error!(
            self.repository.write_log(log_id, &log),
            "write",
            format!("log for {log_id}")
        )?;
        Ok(true)
    }
}

fn parse_strength_set(
    exercise_name: &str,
    weight: &str,
    reps: &str,
) -> Option<(Name, Weight, Count)> {
    match (
        Name::new(exercise_name),
        Weight::try_from(weight),
        Count::try_from(reps),
    ) {
        (Ok(name), Ok(weight), Ok(count)) => Some((name, weight, count)),
        (name, weight, count) => {
            debug!(
                "ignored invalid strength set: {:?} {:?} {:?}",
                name.err(),
                weight.err(),
                count.err()
            );
            None
        }
    }
}
