use crate::Count;

pub const COUNTDOWN_DURATION: u32 = 5;
pub const WORK_DURATION: u32 = 45;
pub const REST_DURATION: u32 = 240;

/// Stopwatch for timed holds, advanced by one-second ticks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Stopwatch {
    #[default]
    Idle,
    Countdown {
        remaining: u32,
    },
    Running {
        elapsed: u32,
    },
    Stopped {
        elapsed: u32,
    },
}

impl Stopwatch {
    pub fn start(&mut self) {
        *self = Stopwatch::Countdown {
            remaining: COUNTDOWN_DURATION,
        };
    }

    pub fn tick(&mut self) {
        *self = match *self {
            Stopwatch::Countdown { remaining } if remaining <= 1 => {
                Stopwatch::Running { elapsed: 0 }
            }
            Stopwatch::Countdown { remaining } => Stopwatch::Countdown {
                remaining: remaining - 1,
            },
            Stopwatch::Running { elapsed } => Stopwatch::Running {
                elapsed: elapsed + 1,
            },
            state @ (Stopwatch::Idle | Stopwatch::Stopped { .. }) => state,
        };
    }

    pub fn stop(&mut self) {
        *self = match *self {
            Stopwatch::Running { elapsed } => Stopwatch::Stopped { elapsed },
            Stopwatch::Countdown { .. } => Stopwatch::Stopped { elapsed: 0 },
            state => state,
        };
    }

    /// Take the measured duration and return to idle. A zero duration is
    /// discarded and leaves the stopwatch stopped.
    pub fn take(&mut self) -> Option<Count> {
        let Stopwatch::Stopped { elapsed } = *self else {
            return None;
        };
        let count = Count::new(elapsed).ok()?;
        *self = Stopwatch::Idle;
        Some(count)
    }

    /// Take a duration corrected by the user instead of the measured one.
    /// Non-numeric or non-positive input leaves the stopwatch stopped.
    pub fn take_adjusted(&mut self, value: &str) -> Option<Count> {
        if !matches!(self, Stopwatch::Stopped { .. }) {
            return None;
        }
        let count = Count::try_from(value).ok()?;
        *self = Stopwatch::Idle;
        Some(count)
    }

    pub fn reset(&mut self) {
        *self = Stopwatch::Idle;
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        matches!(
            self,
            Stopwatch::Countdown { .. } | Stopwatch::Running { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalPhase {
    Idle,
    Countdown,
    Working,
    Recovering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalEvent {
    WorkStarted,
    /// A work phase is finished and should be logged as one set.
    RoundCompleted,
    RestFinished,
}

/// Work/rest interval timer advanced by one-second ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    pub phase: IntervalPhase,
    pub time_left: u32,
    pub round: u32,
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self {
            phase: IntervalPhase::Idle,
            time_left: WORK_DURATION,
            round: 1,
        }
    }
}

impl IntervalTimer {
    pub fn start(&mut self) {
        self.phase = IntervalPhase::Countdown;
        self.time_left = COUNTDOWN_DURATION;
    }

    pub fn tick(&mut self) -> Option<IntervalEvent> {
        if self.phase == IntervalPhase::Idle {
            return None;
        }
        if self.time_left > 1 {
            self.time_left -= 1;
            return None;
        }
        match self.phase {
            IntervalPhase::Idle => None,
            IntervalPhase::Countdown => {
                self.phase = IntervalPhase::Working;
                self.time_left = WORK_DURATION;
                Some(IntervalEvent::WorkStarted)
            }
            IntervalPhase::Working => Some(self.start_rest()),
            IntervalPhase::Recovering => {
                self.phase = IntervalPhase::Idle;
                self.time_left = WORK_DURATION;
                self.round += 1;
                Some(IntervalEvent::RestFinished)
            }
        }
    }

    /// End the work phase early and start resting.
    pub fn start_rest(&mut self) -> IntervalEvent {
        self.phase = IntervalPhase::Recovering;
        self.time_left = REST_DURATION;
        IntervalEvent::RoundCompleted
    }

    /// Cut the rest short and count down into the next round.
    pub fn start_work(&mut self) {
        self.round += 1;
        self.start();
    }

    /// Advance by user interaction with the timer.
    pub fn toggle(&mut self) -> Option<IntervalEvent> {
        match self.phase {
            IntervalPhase::Idle => {
                self.start();
                None
            }
            IntervalPhase::Working => Some(self.start_rest()),
            IntervalPhase::Recovering => {
                self.start_work();
                None
            }
            IntervalPhase::Countdown => {
                self.reset();
                None
            }
        }
    }

    pub fn reset(&mut self) {
        *self = IntervalTimer::default();
    }
}

/// Format seconds as `MM:SS`.
#[must_use]
pub fn format_time(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
