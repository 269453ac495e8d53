//! Test utilities for the backend crate.
//!
//! Shared by the unit tests in `src/` and the behaviour suite in `tests/`.
//! Integration tests reach it through the `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Instant used as "now" across service tests: 2024-03-01T12:00:00Z.
///
/// # Panics
/// Never in practice; the timestamp is a valid UTC instant.
#[must_use]
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("fixture timestamp is valid"))
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by `minutes`.
    ///
    /// # Panics
    /// Panics if a previous holder of the clock lock panicked.
    pub fn advance_minutes(&self, minutes: i64) {
        *self.lock_clock() += TimeDelta::minutes(minutes);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex poisoned"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
