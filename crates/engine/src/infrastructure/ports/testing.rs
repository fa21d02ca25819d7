//! Time and dice, injected so rounds can be replayed in tests.

use chrono::{DateTime, Utc};

/// Source of "now" for lockouts, cooldowns and timestamps.
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of die faces and random picks made by content.
pub trait RandomPort: Send + Sync {
    /// Uniform in `min..=max`.
    fn gen_range(&self, min: i32, max: i32) -> i32;
}
