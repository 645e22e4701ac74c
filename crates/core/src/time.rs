use chrono::{DateTime, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// How long answer feedback stays visible before the next question is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackPause {
    Fixed(std::time::Duration),
    /// No pause at all; for headless runs and tests.
    Skip,
}

impl FeedbackPause {
    pub const DEFAULT_MILLIS: u64 = 1_000;

    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        if millis == 0 {
            Self::Skip
        } else {
            Self::Fixed(std::time::Duration::from_millis(millis))
        }
    }

    /// Duration to wait, or `None` when the pause is skipped.
    #[must_use]
    pub fn duration(&self) -> Option<std::time::Duration> {
        match self {
            Self::Fixed(d) => Some(*d),
            Self::Skip => None,
        }
    }
}

impl Default for FeedbackPause {
    fn default() -> Self {
        Self::from_millis(Self::DEFAULT_MILLIS)
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
