//! Wall-clock source for the rewards engine.
//!
//! All engine components take time from a [`Clock`] instead of calling
//! `Utc::now()` directly, so dwell thresholds, streak resets and weekend
//! detection can be driven deterministically in tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Duration, Local, Utc, Weekday};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Day of week in the user's local calendar.
    fn local_weekday(&self) -> Weekday;

    /// Saturday or Sunday in the local calendar.
    fn is_weekend(&self) -> bool {
        matches!(self.local_weekday(), Weekday::Sat | Weekday::Sun)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_weekday(&self) -> Weekday {
        Local::now().weekday()
    }
}

/// A clock that only moves when told to. Clones share the same time.
///
/// The weekday is taken from the UTC date of the current instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *guard += by;
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|p| p.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn local_weekday(&self) -> Weekday {
        self.now().weekday()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn local_weekday(&self) -> Weekday {
        (**self).local_weekday()
    }
}
