//! Idle reminder
//!
//! Wakes periodically and, when no edge has been accepted for a long time,
//! plays a fast burst so the device looks alive. The burst resets the
//! debounce clock, which both rearms the full threshold and opens a guard
//! window like an accepted edge would.

use embedded_hal_async::delay::DelayNs;

use crate::debounce::DebounceClock;
use crate::io::{Indicator, Monotonic};
use crate::pattern::BlinkPattern;

pub struct IdleReminder<'a, C, L, D> {
    clock: &'a DebounceClock,
    time: C,
    indicator: L,
    delay: D,
    wake_ms: u32,
    threshold_ms: u32,
    burst: BlinkPattern,
}

impl<'a, C: Monotonic, L: Indicator, D: DelayNs> IdleReminder<'a, C, L, D> {
    pub fn new(
        clock: &'a DebounceClock,
        time: C,
        indicator: L,
        delay: D,
        wake_ms: u32,
        threshold_ms: u32,
        burst: BlinkPattern,
    ) -> Self {
        Self {
            clock,
            time,
            indicator,
            delay,
            wake_ms,
            threshold_ms,
            burst,
        }
    }

    /// Boot counts as the last activity until the first edge is accepted
    pub fn is_due(&self, now_ms: u32) -> bool {
        let last = self.clock.last_accepted().unwrap_or(0);
        now_ms.wrapping_sub(last) >= self.threshold_ms
    }

    /// One wake: burst and reset the clock if idle long enough
    pub async fn check(&mut self) -> bool {
        if !self.is_due(self.time.now_ms()) {
            return false;
        }

        info!("No input for {} ms, reminder burst", self.threshold_ms);
        self.burst.play(&self.indicator, &mut self.delay).await;
        self.clock.mark(self.time.now_ms());
        true
    }

    pub async fn run(mut self) {
        info!("Idle reminder started");

        loop {
            self.check().await;
            self.delay.delay_ms(self.wake_ms).await;
        }
    }
}
