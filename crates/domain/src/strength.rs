use strum::{EnumIter, IntoEnumIterator};

/// Category of a strength workout, each persisted as its own log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum StrengthCategory {
    Push,
    Pull,
    Legs,
}

impl StrengthCategory {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StrengthCategory::Push => "Push",
            StrengthCategory::Pull => "Pull",
            StrengthCategory::Legs => "Legs",
        }
    }

    #[must_use]
    pub fn all() -> Vec<StrengthCategory> {
        StrengthCategory::iter().collect()
    }

    /// Suggested movements for this category.
    #[must_use]
    pub fn pool(self) -> &'static [&'static str] {
        match self {
            StrengthCategory::Push => &[
                "Chest Press",
                "Pushups",
                "Shoulder Press",
                "Bench Press",
                "Dumbbell Press",
                "Seated Shoulder Press",
                "Dips",
                "Tricep Extensions",
                "Incline Bench Press",
                "Cable Flys",
                "Lateral Raises",
                "Skullcrushers",
                "Overhead Press",
                "Landmine Press",
                "Pec Deck",
                "Tricep Pushdowns",
                "Arnold Press",
                "Floor Press",
                "Close Grip Bench",
                "Front Raises",
            ],
            StrengthCategory::Pull => &[
                "Chin-ups",
                "Dumbbell Rows",
                "Lat Pulldowns",
                "Widegrip Pulldowns",
                "Barbell Rows",
                "Face Pulls",
                "Bicep Curls",
                "Hammer Curls",
                "Pull-ups",
                "T-Bar Rows",
                "Seated Cable Rows",
                "Preacher Curls",
                "Shrugs",
                "Reverse Flys",
                "Concentration Curls",
                "Meadows Row",
                "Renegade Rows",
                "Upright Rows",
                "Rack Pulls",
                "Cable Curls",
            ],
            StrengthCategory::Legs => &[
                "Squats",
                "Deadlifts",
                "Single Legged Deadlift",
                "Calf Raises",
                "Leg Extensions",
                "Lunges",
                "Leg Press",
                "Hamstring Curls",
                "Romanian Deadlift",
                "Bulgarian Split Squat",
                "Goblet Squats",
                "Step Ups",
                "Hip Thrusts",
                "Hack Squat",
                "Seated Calf Raise",
                "Walking Lunges",
                "Sumo Deadlift",
                "Front Squat",
                "Glute Bridges",
                "Box Jumps",
            ],
        }
    }

    /// Pick `n` suggestions starting at a rotating offset so that repeated
    /// visits show different movements.
    #[must_use]
    pub fn suggestions(self, offset: usize, n: usize) -> Vec<&'static str> {
        let pool = self.pool();
        pool.iter()
            .cycle()
            .skip(offset % pool.len())
            .take(n.min(pool.len()))
            .copied()
            .collect()
    }
}
