//! Heartbeat LED task logic

use embedded_hal_async::delay::DelayNs;

use crate::io::{Indicator, InputLevels};

pub struct Heartbeat<I, L, D> {
    inputs: I,
    indicator: L,
    delay: D,
    half_period_ms: u32,
    yield_to_buttons: bool,
}

impl<I: InputLevels, L: Indicator, D: DelayNs> Heartbeat<I, L, D> {
    /// With `yield_to_buttons` the heartbeat stays dark while either button
    /// is held so the consumer's pulses are visible.
    pub fn new(inputs: I, indicator: L, delay: D, half_period_ms: u32, yield_to_buttons: bool) -> Self {
        Self {
            inputs,
            indicator,
            delay,
            half_period_ms,
            yield_to_buttons,
        }
    }

    /// One on/off period, or one idle poll interval when yielding.
    /// Returns whether the LED was blinked.
    pub async fn beat(&mut self) -> bool {
        if self.yield_to_buttons && self.inputs.any_asserted() {
            self.delay.delay_ms(self.half_period_ms).await;
            return false;
        }

        self.indicator.drive(true);
        self.delay.delay_ms(self.half_period_ms).await;
        self.indicator.drive(false);
        self.delay.delay_ms(self.half_period_ms).await;
        true
    }

    pub async fn run(mut self) {
        info!("Heartbeat task started");

        loop {
            self.beat().await;
        }
    }
}
