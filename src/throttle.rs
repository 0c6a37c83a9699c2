use std::time::Duration;

/// Requests are spaced by a fixed pause taken *before* each listing or
/// comment request. Not adaptive, no cooldowns.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// A throttle that never sleeps.
    pub fn none() -> Self {
        Self { delay: Duration::ZERO }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[inline]
    pub fn gate(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_DELAY)
    }
}
