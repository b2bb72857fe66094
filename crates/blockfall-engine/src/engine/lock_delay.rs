use std::time::Duration;

/// Lock state of the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum LockStatus {
    /// The piece can still fall.
    Airborne,
    /// The piece rests on something; it locks when `remaining` runs out.
    Grounded { remaining: Duration },
    /// The piece must be committed to the board now.
    Locked,
}

/// What caused the grounded status to be re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundCheck {
    /// A new piece entered play.
    Spawn,
    /// The player moved or rotated the piece.
    Transform,
    /// The gravity timer moved the piece.
    Gravity,
}

/// Lock-delay state machine.
///
/// ```text
///             grounded                  countdown elapses / hard drop
/// Airborne ─────────────▶ Grounded ─────────────────────────────▶ Locked
///    ▲                       │
///    └───── not grounded ────┘
/// ```
///
/// While grounded, a successful player transform that leaves the piece grounded
/// restarts the countdown, at most `reset_limit` times per piece.
#[derive(Debug, Clone)]
pub struct LockDelay {
    delay: Duration,
    reset_limit: u8,
    resets_used: u8,
    status: LockStatus,
}

impl LockDelay {
    #[must_use]
    pub fn new(delay: Duration, reset_limit: u8) -> Self {
        Self {
            delay,
            reset_limit,
            resets_used: 0,
            status: LockStatus::Airborne,
        }
    }

    #[must_use]
    pub fn status(&self) -> LockStatus {
        self.status
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Number of countdown restarts spent on the current piece.
    #[must_use]
    pub fn resets_used(&self) -> u8 {
        self.resets_used
    }

    /// Prepares for a new piece.
    pub fn reset(&mut self) {
        self.resets_used = 0;
        self.status = LockStatus::Airborne;
    }

    /// Applies the grounded status observed after `cause`.
    pub fn reevaluate(&mut self, grounded: bool, cause: GroundCheck) {
        self.status = match (self.status, grounded) {
            (LockStatus::Locked, _) => LockStatus::Locked,
            (_, false) => LockStatus::Airborne,
            (LockStatus::Airborne, true) => LockStatus::Grounded {
                remaining: self.delay,
            },
            (LockStatus::Grounded { remaining }, true) => {
                if cause == GroundCheck::Transform && self.resets_used < self.reset_limit {
                    self.resets_used += 1;
                    LockStatus::Grounded {
                        remaining: self.delay,
                    }
                } else {
                    LockStatus::Grounded { remaining }
                }
            }
        };
    }

    /// Runs the countdown. Returns `true` when it elapses during this call.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let LockStatus::Grounded { remaining } = self.status else {
            return false;
        };
        let remaining = remaining.saturating_sub(elapsed);
        self.status = LockStatus::Grounded { remaining };
        remaining.is_zero()
    }

    /// Countdown left while grounded.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        match self.status {
            LockStatus::Grounded { remaining } => Some(remaining),
            LockStatus::Airborne | LockStatus::Locked => None,
        }
    }

    /// Returns `true` if the piece is grounded and its countdown has run out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self.status, LockStatus::Grounded { remaining } if remaining.is_zero())
    }

    /// Forces the `Locked` state regardless of the countdown.
    pub fn force_lock(&mut self) {
        self.status = LockStatus::Locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_starts_airborne() {
        let lock = LockDelay::new(DELAY, 15);
        assert!(lock.status().is_airborne());
        assert_eq!(lock.remaining(), None);
    }

    #[test]
    fn test_grounding_starts_countdown() {
        let mut lock = LockDelay::new(DELAY, 15);
        lock.reevaluate(true, GroundCheck::Gravity);
        assert_eq!(lock.status(), LockStatus::Grounded { remaining: DELAY });
        assert!(!lock.advance(ms(200)));
        assert_eq!(lock.status(), LockStatus::Grounded { remaining: ms(300) });
        assert_eq!(lock.remaining(), Some(ms(300)));
        assert!(lock.advance(ms(300)));
        assert!(lock.is_expired());
    }

    #[test]
    fn test_leaving_ground_cancels_countdown() {
        let mut lock = LockDelay::new(DELAY, 15);
        lock.reevaluate(true, GroundCheck::Spawn);
        lock.advance(ms(400));
        lock.reevaluate(false, GroundCheck::Transform);
        assert!(lock.status().is_airborne());
        assert!(!lock.advance(ms(1000)));

        // Landing again restarts from the full delay.
        lock.reevaluate(true, GroundCheck::Gravity);
        assert_eq!(lock.status(), LockStatus::Grounded { remaining: DELAY });
    }

    #[test]
    fn test_transform_while_grounded_resets_until_limit() {
        let mut lock = LockDelay::new(DELAY, 2);
        lock.reevaluate(true, GroundCheck::Gravity);
        for _ in 0..2 {
            lock.advance(ms(100));
            lock.reevaluate(true, GroundCheck::Transform);
            assert_eq!(lock.status(), LockStatus::Grounded { remaining: DELAY });
        }
        lock.advance(ms(100));
        lock.reevaluate(true, GroundCheck::Transform);
        assert_eq!(lock.status(), LockStatus::Grounded { remaining: ms(400) });
        assert_eq!(lock.resets_used(), 2);
    }

    #[test]
    fn test_zero_reset_limit_never_restarts() {
        let mut lock = LockDelay::new(DELAY, 0);
        lock.reevaluate(true, GroundCheck::Gravity);
        lock.advance(ms(100));
        lock.reevaluate(true, GroundCheck::Transform);
        assert_eq!(lock.status(), LockStatus::Grounded { remaining: ms(400) });
    }

    #[test]
    fn test_gravity_does_not_reset() {
        let mut lock = LockDelay::new(DELAY, 15);
        lock.reevaluate(true, GroundCheck::Gravity);
        lock.advance(ms(100));
        lock.reevaluate(true, GroundCheck::Gravity);
        assert_eq!(lock.status(), LockStatus::Grounded { remaining: ms(400) });
    }

    #[test]
    fn test_locked_is_sticky_until_reset() {
        let mut lock = LockDelay::new(DELAY, 15);
        lock.force_lock();
        lock.reevaluate(false, GroundCheck::Transform);
        assert!(lock.status().is_locked());
        assert!(!lock.advance(ms(1000)));
        lock.reset();
        assert!(lock.status().is_airborne());
        assert_eq!(lock.resets_used(), 0);
    }
}
