//! Millisecond time sources for the sortable generator.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A trait that defines the clock interface for [`IdSortable`](crate::generator::IdSortable).
///
/// Any `FnMut() -> f64` closure is a time source, which makes frozen or skewed clocks easy to
/// plug in:
///
/// ```rust
/// use sortable_id::time::TimeSource;
///
/// let mut frozen = || 0.0;
/// assert_eq!(frozen.unix_ts_ms(), 0.0);
/// ```
pub trait TimeSource {
    /// Returns the current Unix timestamp in milliseconds, fractions allowed.
    fn unix_ts_ms(&mut self) -> f64;
}

impl<F: FnMut() -> f64> TimeSource for F {
    fn unix_ts_ms(&mut self) -> f64 {
        self()
    }
}

/// A clock that adds monotonic elapsed time to a wall-clock origin.
///
/// The origin is read from [`SystemTime`] once at construction; every reading afterwards adds
/// the time elapsed on an [`Instant`], so adjustments of the system clock do not make readings
/// go backward. Readings are non-decreasing but may repeat; the generator's sequence counter
/// orders identifiers within one tick.
///
/// When seeded with the timestamp of a previously issued identifier that lies at or after the
/// wall-clock origin, the clock continues from that timestamp instead, so a restarted process
/// never issues timestamps older than its predecessor's.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    origin: f64,
    start: Instant,
    seed: Option<f64>,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MonotonicClock {
    /// Creates a clock, optionally seeded with the last known timestamp in milliseconds.
    pub fn new(last_ts_ms: Option<f64>) -> Self {
        let start = Instant::now();
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0);
        match last_ts_ms {
            Some(last) if wall <= last => Self {
                origin: last,
                start,
                seed: Some(last),
            },
            _ => Self {
                origin: wall,
                start,
                seed: None,
            },
        }
    }
}

impl TimeSource for MonotonicClock {
    fn unix_ts_ms(&mut self) -> f64 {
        let now = self.origin + self.start.elapsed().as_secs_f64() * 1000.0;
        match self.seed {
            // no time has elapsed yet; one millisecond is the smallest unit the seed carries
            Some(seed) if now == seed => now + 1.0,
            _ => now,
        }
    }
}
