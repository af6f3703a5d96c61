//! Keyboard repeat throttle

use std::time::{Duration, Instant};

/// Default re-arm delay between accepted key presses
pub const DEFAULT_KEY_COOLDOWN: Duration = Duration::from_millis(100);

/// Accepts one key press, then ignores presses until the cooldown elapses.
///
/// Holding an arrow key produces a stream of repeats; only one step per
/// cooldown window gets through.
#[derive(Debug, Clone)]
pub struct KeyThrottle {
    cooldown: Duration,
    last_fired: Option<Instant>,
}

impl Default for KeyThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_COOLDOWN)
    }
}

impl KeyThrottle {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fired: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether a press at `now` is accepted. Accepting re-starts the cooldown.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_fired
            && now.saturating_duration_since(last) < self.cooldown
        {
            return false;
        }
        self.last_fired = Some(now);
        true
    }

    /// Re-arm immediately
    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}
