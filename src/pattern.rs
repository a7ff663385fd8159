//! Fixed LED toggle patterns

use embedded_hal_async::delay::DelayNs;

use crate::io::Indicator;

/// `repetitions` off/on cycles, each half lasting `half_period_ms`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkPattern {
    pub half_period_ms: u32,
    pub repetitions: u32,
}

impl BlinkPattern {
    pub const fn new(half_period_ms: u32, repetitions: u32) -> Self {
        Self {
            half_period_ms,
            repetitions,
        }
    }

    /// One cycle: wait, off, wait, on. Leaves the output on.
    pub async fn cycle<L: Indicator, D: DelayNs>(&self, indicator: &L, delay: &mut D) {
        delay.delay_ms(self.half_period_ms).await;
        indicator.drive(false);
        delay.delay_ms(self.half_period_ms).await;
        indicator.drive(true);
    }

    /// Run every repetition; not interruptible once started
    pub async fn play<L: Indicator, D: DelayNs>(&self, indicator: &L, delay: &mut D) {
        for _ in 0..self.repetitions {
            self.cycle(indicator, delay).await;
        }
    }
}

/// A single on-then-off pulse
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pulse {
    pub on_ms: u32,
    pub off_ms: u32,
}

impl Pulse {
    pub const fn new(on_ms: u32, off_ms: u32) -> Self {
        Self { on_ms, off_ms }
    }

    pub async fn fire<L: Indicator, D: DelayNs>(&self, indicator: &L, delay: &mut D) {
        indicator.drive(true);
        delay.delay_ms(self.on_ms).await;
        indicator.drive(false);
        delay.delay_ms(self.off_ms).await;
    }
}
