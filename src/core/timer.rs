// Countdown timers used in place of coroutine waits

/// Remaining time below this counts as expired, so that a countdown armed with
/// `n * dt` expires on the n-th tick despite float rounding.
const EXPIRY_TOLERANCE: f32 = 1e-5;

/// A countdown decremented once per fixed tick.
///
/// Re-arming discards whatever time was left.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    /// An idle countdown (already expired)
    pub const fn idle() -> Self {
        Self { remaining: 0.0 }
    }

    /// (Re)start the countdown
    pub fn arm(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    /// Stop the countdown immediately
    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    /// Advance by `dt`. Returns true only on the tick the countdown runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.is_expired() {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= EXPIRY_TOLERANCE {
            self.remaining = 0.0;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        !self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_is_expired() {
        let c = Countdown::idle();
        assert!(c.is_expired());
        assert!(!c.is_running());
    }

    #[test]
    fn test_expires_on_exact_tick() {
        let dt = 1.0 / 60.0;
        let mut c = Countdown::idle();
        c.arm(6.0 * dt);
        for _ in 0..5 {
            assert!(!c.tick(dt));
        }
        assert!(c.tick(dt));
        assert!(c.is_expired());
        // Only fires once
        assert!(!c.tick(dt));
    }

    #[test]
    fn test_rearm_restarts() {
        let mut c = Countdown::idle();
        c.arm(0.5);
        c.tick(0.4);
        c.arm(0.5);
        assert!(!c.tick(0.4));
        assert!(c.tick(0.1));
    }

    #[test]
    fn test_negative_duration_is_idle() {
        let mut c = Countdown::idle();
        c.arm(-1.0);
        assert!(c.is_expired());
    }
}
