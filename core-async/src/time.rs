//! Time-related abstractions.
//!
//! Progress reporting runs on [`interval`] with
//! [`MissedTickBehavior::Skip`] so a stalled host thread does not cause a
//! burst of catch-up events.

pub use tokio::time::{
    interval, interval_at, sleep, sleep_until, timeout, Interval, MissedTickBehavior, Sleep,
    Timeout,
};

pub use std::time::{Duration, SystemTime, UNIX_EPOCH};
pub use tokio::time::Instant;

/// Creates an interval whose first tick fires after one full `period`
/// instead of immediately.
pub fn delayed_interval(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}
