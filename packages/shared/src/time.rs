//! Time-related utilities with clock abstraction for testability.

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local};

/// Display format for message timestamps (hour:minute, local clock)
pub const DISPLAY_TIME_FORMAT: &str = "%H:%M";

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Monotonic instant used for age comparisons
    fn now(&self) -> Instant;

    /// Wall-clock time in the local timezone, used for display only
    fn local_now(&self) -> DateTime<Local>;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Manually driven clock for testing.
///
/// Time only moves when [`ManualClock::advance`] is called, and both the
/// monotonic and the wall-clock readings move together.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    wall_origin: DateTime<Local>,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    /// Create a new manual clock whose wall-clock reading starts at `wall_origin`
    pub fn new(wall_origin: DateTime<Local>) -> Self {
        Self {
            origin: Instant::now(),
            wall_origin,
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward by `duration`
    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        *elapsed += duration;
    }

    fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn local_now(&self) -> DateTime<Local> {
        // Durations handled by tests are far below chrono's range limits
        self.wall_origin + chrono::Duration::from_std(self.elapsed()).unwrap_or(chrono::Duration::zero())
    }
}

/// Format a local time as `HH:MM`
pub fn format_display_time(time: &DateTime<Local>) -> String {
    time.format(DISPLAY_TIME_FORMAT).to_string()
}
