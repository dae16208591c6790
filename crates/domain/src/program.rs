use chrono::{Days, NaiveDate};

use crate::{Count, Exercise, ExerciseLog, ReadError, UpdateError};

pub trait ProgramRepository {
    fn read_program(&self, exercise: Exercise) -> Result<Option<Program>, ReadError>;
    fn write_program(
        &self,
        exercise: Exercise,
        program: Option<&Program>,
    ) -> Result<(), UpdateError>;
}

pub const PROGRAM_WEEKS: u32 = 4;

/// Four week progressive schedule seeded by a strength test.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub is_active: bool,
    pub start_date: NaiveDate,
    pub initial_max: Count,
    pub current_week: u32,
    pub weekly_goals: [u32; PROGRAM_WEEKS as usize],
}

impl Program {
    #[must_use]
    pub fn start(initial_max: Count, today: NaiveDate) -> Self {
        Self {
            is_active: true,
            start_date: today,
            initial_max,
            current_week: 1,
            weekly_goals: weekly_goals(initial_max),
        }
    }

    #[must_use]
    pub fn week_number(&self, today: NaiveDate) -> u32 {
        week_number(self.start_date, today)
    }

    /// Bring `current_week` in line with `today`. Returns `true` if it
    /// changed.
    pub fn refresh(&mut self, today: NaiveDate) -> bool {
        let week = self.week_number(today);
        if week == self.current_week {
            return false;
        }
        self.current_week = week;
        true
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_week > PROGRAM_WEEKS
    }

    #[must_use]
    pub fn goal(&self, week: u32) -> Option<u32> {
        let idx = usize::try_from(week.checked_sub(1)?).ok()?;
        self.weekly_goals.get(idx).copied()
    }

    /// First and last day of a program week.
    #[must_use]
    pub fn week_window(&self, week: u32) -> Option<(NaiveDate, NaiveDate)> {
        if !(1..=PROGRAM_WEEKS).contains(&week) {
            return None;
        }
        let first = self
            .start_date
            .checked_add_days(Days::new(u64::from(week - 1) * 7))?;
        let last = first.checked_add_days(Days::new(6))?;
        Some((first, last))
    }

    /// Logged total within the window of `week` compared to its goal.
    ///
    /// Returns `None` for weeks outside the program.
    #[must_use]
    pub fn week_progress(&self, log: &ExerciseLog, week: u32) -> Option<WeekProgress> {
        let goal = self.goal(week)?;
        let (first, last) = self.week_window(week)?;
        Some(WeekProgress {
            week,
            first,
            last,
            total: log.entries_in(first..=last).map(|e| e.total()).sum(),
            goal,
        })
    }

    #[must_use]
    pub fn status(&self, log: &ExerciseLog) -> ProgramStatus {
        if !self.is_active {
            return ProgramStatus::NoProgram;
        }
        if self.is_complete() {
            return ProgramStatus::Complete {
                week: self.current_week,
            };
        }
        match self.week_progress(log, self.current_week) {
            Some(progress) => ProgramStatus::Active(progress),
            None => ProgramStatus::Complete {
                week: self.current_week,
            },
        }
    }
}

/// Goals for the four program weeks.
///
/// The first goal is 4.5 times the test result. Each following goal grows by
/// 10 %, but at least by one.
#[must_use]
pub fn weekly_goals(initial_max: Count) -> [u32; PROGRAM_WEEKS as usize] {
    let mut goals = [0; PROGRAM_WEEKS as usize];
    goals[0] = saturate(u64::from(initial_max.value()) * 9 / 2);
    for i in 1..goals.len() {
        let prev = goals[i - 1];
        goals[i] = saturate(u64::from(prev) * 11 / 10).max(prev.saturating_add(1));
    }
    goals
}

/// One-based number of the week containing `today` in a program started on
/// `start_date`. Dates before the start count as week 1.
#[must_use]
pub fn week_number(start_date: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - start_date).num_days();
    if days < 0 {
        return 1;
    }
    saturate(u64::try_from(days / 7).unwrap_or(0)).saturating_add(1)
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgramStatus {
    NoProgram,
    Active(WeekProgress),
    /// The program week is past the last goal. Only a retest is possible.
    Complete { week: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekProgress {
    pub week: u32,
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub total: u64,
    pub goal: u32,
}

impl WeekProgress {
    /// Completed fraction of the goal, capped at 1.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f32 {
        if self.goal == 0 {
            return 0.0;
        }
        (self.total as f32 / self.goal as f32).min(1.0)
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        saturate(u64::from(self.goal).saturating_sub(self.total))
    }
}

/// Ways to split the first weekly goal after a strength test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestRecommendation {
    pub weekly_goal: u32,
    pub daily_average: u32,
    pub workout_total: u32,
    /// Target per set when training in three workouts of three sets.
    pub set_target: u32,
}

impl From<Count> for TestRecommendation {
    fn from(value: Count) -> Self {
        let weekly_goal = weekly_goals(value)[0];
        let workout_total = weekly_goal / 3;
        Self {
            weekly_goal,
            daily_average: weekly_goal / 7,
            workout_total,
            set_target: workout_total / 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{DailyLogEntry, ExerciseSet};

    use super::*;

    #[rstest]
    #[case::ten(10, [45, 49, 53, 58])]
    #[case::one(1, [4, 5, 6, 7])]
    #[case::two(2, [9, 10, 11, 12])]
    #[case::twenty(20, [90, 99, 108, 118])]
    #[case::huge(u32::MAX, [u32::MAX; 4])]
    fn test_weekly_goals(#[case] initial_max: u32, #[case] expected: [u32; 4]) {
        assert_eq!(weekly_goals(Count::new(initial_max).unwrap()), expected);
    }

    #[test]
    fn test_weekly_goals_strictly_increasing() {
        for initial_max in 1..500 {
            let goals = weekly_goals(Count::new(initial_max).unwrap());
            assert_eq!(goals[0], initial_max * 9 / 2);
            assert!(goals.windows(2).all(|w| w[0] < w[1]), "{goals:?}");
        }
    }

    #[rstest]
    #[case::same_day(0, 1)]
    #[case::six_days(6, 1)]
    #[case::one_week(7, 2)]
    #[case::two_weeks(14, 3)]
    #[case::last_day(27, 4)]
    #[case::complete(28, 5)]
    #[case::before_start(-3, 1)]
    fn test_week_number(#[case] days: i64, #[case] expected: u32) {
        assert_eq!(week_number(START, START + Duration::days(days)), expected);
    }

    #[test]
    fn test_start() {
        assert_eq!(
            Program::start(Count::new(10).unwrap(), START),
            Program {
                is_active: true,
                start_date: START,
                initial_max: Count::new(10).unwrap(),
                current_week: 1,
                weekly_goals: [45, 49, 53, 58],
            }
        );
    }

    #[test]
    fn test_refresh() {
        let mut program = Program::start(Count::new(10).unwrap(), START);
        assert!(!program.refresh(START + Duration::days(6)));
        assert_eq!(program.current_week, 1);
        assert!(program.refresh(START + Duration::days(14)));
        assert_eq!(program.current_week, 3);
        assert!(!program.is_complete());
        assert!(program.refresh(START + Duration::days(28)));
        assert!(program.is_complete());
    }

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(45))]
    #[case(4, Some(58))]
    #[case(5, None)]
    fn test_goal(#[case] week: u32, #[case] expected: Option<u32>) {
        assert_eq!(
            Program::start(Count::new(10).unwrap(), START).goal(week),
            expected
        );
    }

    #[test]
    fn test_week_window() {
        let program = Program::start(Count::new(10).unwrap(), START);
        assert_eq!(
            program.week_window(2),
            Some((START + Duration::days(7), START + Duration::days(13)))
        );
        assert_eq!(program.week_window(5), None);
    }

    #[test]
    fn test_week_progress() {
        let program = Program::start(Count::new(10).unwrap(), START);
        let log = [
            entry(-1, &[(100, false)]),
            entry(0, &[(10, true), (5, false)]),
            entry(3, &[(20, false)]),
            entry(6, &[(3, false)]),
            entry(7, &[(7, false)]),
        ]
        .into_iter()
        .collect::<ExerciseLog>();

        let progress = program.week_progress(&log, 1).unwrap();
        assert_eq!(
            progress,
            WeekProgress {
                week: 1,
                first: START,
                last: START + Duration::days(6),
                total: 28,
                goal: 45,
            }
        );
        assert_approx_eq!(progress.ratio(), 28.0 / 45.0, 0.0001);
        assert_eq!(progress.remaining(), 17);

        assert_eq!(program.week_progress(&log, 2).unwrap().total, 7);
        assert_eq!(program.week_progress(&log, 5), None);
    }

    #[test]
    fn test_week_progress_large_totals() {
        let program = Program::start(Count::new(10).unwrap(), START);
        let log = [
            entry(0, &[(u32::MAX, false), (u32::MAX, false)]),
            entry(1, &[(u32::MAX, false)]),
        ]
        .into_iter()
        .collect::<ExerciseLog>();

        let progress = program.week_progress(&log, 1).unwrap();
        assert_eq!(progress.total, 3 * u64::from(u32::MAX));
        assert_approx_eq!(progress.ratio(), 1.0);
        assert_eq!(progress.remaining(), 0);
    }

    #[rstest]
    #[case(0, 45, 0.0)]
    #[case(45, 45, 1.0)]
    #[case(90, 45, 1.0)]
    #[case(10, 0, 0.0)]
    fn test_week_progress_ratio(#[case] total: u64, #[case] goal: u32, #[case] expected: f32) {
        let progress = WeekProgress {
            week: 1,
            first: START,
            last: START,
            total,
            goal,
        };
        assert_approx_eq!(progress.ratio(), expected);
    }

    #[test]
    fn test_status() {
        let log = [entry(1, &[(12, false)])]
            .into_iter()
            .collect::<ExerciseLog>();
        let mut program = Program::start(Count::new(10).unwrap(), START);
        assert!(matches!(
            program.status(&log),
            ProgramStatus::Active(WeekProgress { week: 1, total: 12, goal: 45, .. })
        ));
        program.refresh(START + Duration::days(30));
        assert_eq!(program.status(&log), ProgramStatus::Complete { week: 5 });
        program.is_active = false;
        assert_eq!(program.status(&log), ProgramStatus::NoProgram);
    }

    #[rstest]
    #[case(10, TestRecommendation { weekly_goal: 45, daily_average: 6, workout_total: 15, set_target: 5 })]
    #[case(1, TestRecommendation { weekly_goal: 4, daily_average: 0, workout_total: 1, set_target: 0 })]
    fn test_test_recommendation(#[case] max: u32, #[case] expected: TestRecommendation) {
        assert_eq!(TestRecommendation::from(Count::new(max).unwrap()), expected);
    }

    const START: NaiveDate = NaiveDate::from_ymd_opt(2020, 2, 2).unwrap();

    fn entry(day: i64, sets: &[(u32, bool)]) -> DailyLogEntry {
        let timestamp = Utc.timestamp_millis_opt(1_580_601_600_000).unwrap() + Duration::days(day);
        DailyLogEntry::new(
            START + Duration::days(day),
            sets.iter()
                .map(|(count, is_test)| {
                    ExerciseSet::new(Count::new(*count).unwrap(), *is_test, timestamp)
                })
                .collect(),
        )
        .unwrap()
    }
}
