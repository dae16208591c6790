use std::fmt;

use strum::{EnumIter, IntoEnumIterator};

/// Exercises that can be logged and trained with a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Exercise {
    PushUps,
    Squats,
    ChinUps,
    KettlebellSwings,
    Plank,
    LeftPlank,
    RightPlank,
    WallSit,
    GluteBridgeHold,
    VO2MaxInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Reps,
    Seconds,
}

impl Unit {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Unit::Reps => "reps",
            Unit::Seconds => "seconds",
        }
    }

    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Unit::Reps => "reps",
            Unit::Seconds => "sec",
        }
    }

    /// Suffix appended to goal and progress values.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Reps => "",
            Unit::Seconds => " sec",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ExerciseInfo {
    pub name: &'static str,
    pub verb: &'static str,
    pub verb_past: &'static str,
    pub unit: Unit,
}

impl Exercise {
    #[must_use]
    pub const fn info(self) -> &'static ExerciseInfo {
        match self {
            Exercise::PushUps => &ExerciseInfo {
                name: "Push-ups",
                verb: "pushup",
                verb_past: "pushups",
                unit: Unit::Reps,
            },
            Exercise::Squats => &ExerciseInfo {
                name: "Squats",
                verb: "squat",
                verb_past: "squats",
                unit: Unit::Reps,
            },
            Exercise::ChinUps => &ExerciseInfo {
                name: "Chin-ups",
                verb: "chin-up",
                verb_past: "chin-ups",
                unit: Unit::Reps,
            },
            Exercise::KettlebellSwings => &ExerciseInfo {
                name: "Kettlebell Swings",
                verb: "swing",
                verb_past: "swings",
                unit: Unit::Reps,
            },
            Exercise::Plank => &ExerciseInfo {
                name: "Plank",
                verb: "plank",
                verb_past: "seconds",
                unit: Unit::Seconds,
            },
            Exercise::LeftPlank => &ExerciseInfo {
                name: "Left Plank",
                verb: "left plank",
                verb_past: "seconds",
                unit: Unit::Seconds,
            },
            Exercise::RightPlank => &ExerciseInfo {
                name: "Right Plank",
                verb: "right plank",
                verb_past: "seconds",
                unit: Unit::Seconds,
            },
            Exercise::WallSit => &ExerciseInfo {
                name: "Wall Sit",
                verb: "wall sit",
                verb_past: "seconds",
                unit: Unit::Seconds,
            },
            Exercise::GluteBridgeHold => &ExerciseInfo {
                name: "Glute Bridge Hold",
                verb: "glute bridge hold",
                verb_past: "seconds",
                unit: Unit::Seconds,
            },
            Exercise::VO2MaxInterval => &ExerciseInfo {
                name: "VO2 Max Interval",
                verb: "interval",
                verb_past: "intervals",
                unit: Unit::Reps,
            },
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    #[must_use]
    pub fn unit(self) -> Unit {
        self.info().unit
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Exercise::iter().find(|e| e.name() == name)
    }

    /// Count based exercises shown in the primary row.
    #[must_use]
    pub fn rep_exercises() -> Vec<Exercise> {
        Exercise::iter()
            .filter(|e| e.unit() == Unit::Reps && *e != Exercise::VO2MaxInterval)
            .collect()
    }

    #[must_use]
    pub fn time_exercises() -> Vec<Exercise> {
        Exercise::iter()
            .filter(|e| e.unit() == Unit::Seconds)
            .collect()
    }

    #[must_use]
    pub fn all() -> Vec<Exercise> {
        Exercise::iter().collect()
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
