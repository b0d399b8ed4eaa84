//! Local day-key tracking for the daily limit rollover.
//!
//! Day boundaries are detected by comparing local calendar date strings,
//! not elapsed intervals: a player crossing midnight gets a fresh allotment
//! immediately. The comparison is plain string equality and deliberately
//! best-effort; clock rollback or timezone shifts are not defended against.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Local calendar date key, e.g. `2026-08-30`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of "today" for the ledger. Abstracted so tests and headless
/// simulation control the calendar instead of the wall clock.
pub trait Clock {
    fn today(&self) -> DayKey;
}

/// Wall-clock implementation using the device-local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> DayKey {
        DayKey(Local::now().date_naive().to_string())
    }
}

/// Manually advanced clock for tests and headless simulation.
#[derive(Debug, Clone)]
pub struct ManualClock {
    today: Rc<RefCell<DayKey>>,
}

impl ManualClock {
    #[must_use]
    pub fn starting_at(day: DayKey) -> Self {
        Self {
            today: Rc::new(RefCell::new(day)),
        }
    }

    /// Move the simulated calendar to a new day. Clones of this clock
    /// observe the change immediately.
    pub fn set_today(&self, day: DayKey) {
        *self.today.borrow_mut() = day;
    }
}

impl Clock for ManualClock {
    fn today(&self) -> DayKey {
        self.today.borrow().clone()
    }
}
