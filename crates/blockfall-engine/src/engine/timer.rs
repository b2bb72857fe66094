use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Repeating countdown used for gravity.
///
/// Elapsed time carries over between calls, so a large `dt` yields several
/// expiries and a sequence of small ones never loses time.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    elapsed: Duration,
}

impl IntervalTimer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts a fresh interval.
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Time left until the next expiry, or `None` for a zero interval.
    #[must_use]
    pub fn until_next(&self) -> Option<Duration> {
        (!self.interval.is_zero()).then(|| self.interval - self.elapsed)
    }

    /// Advances the timer and returns how many intervals completed.
    pub fn advance(&mut self, dt: Duration) -> u64 {
        if self.interval.is_zero() {
            return 0;
        }
        let total = self.elapsed.saturating_add(dt).as_nanos();
        let interval = self.interval.as_nanos();
        let rest = total % interval;
        // `rest` is below `interval`, so its whole seconds fit in a `u64`.
        self.elapsed = Duration::new(
            u64::try_from(rest / NANOS_PER_SEC).unwrap_or(u64::MAX),
            u32::try_from(rest % NANOS_PER_SEC).unwrap_or(0),
        );
        u64::try_from(total / interval).unwrap_or(u64::MAX)
    }
}
