use chrono::{Local, NaiveDateTime};

/// Clock abstracts access to the current instant so callers stay deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local instant.
    fn now(&self) -> NaiveDateTime;
}

/// Real-time clock backed by the system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
