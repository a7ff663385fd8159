//! Button handler state machines
//!
//! One [`SourceHandler`] per input plus one [`CombinedHandler`]:
//!
//! ```text
//! SourceHandler:   Idle --signal--> Confirming --settle, other held--> Idle (combined signaled)
//!                                        \--settle, other released--> Active --pattern done--> Idle
//! CombinedHandler: Idle --combined signal--> Active --either released--> Idle
//! ```
//!
//! Source handlers do not exclude each other. Once past `Confirming` each
//! runs its pattern independently, so two staggered single presses can have
//! overlapping `Active` phases.

use embedded_hal_async::delay::DelayNs;

use crate::channels::BinarySignal;
use crate::io::{Indicator, InputLevels};
use crate::pattern::BlinkPattern;
use crate::types::{PressOutcome, SourceId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceState {
    /// Suspended on the source signal
    Idle,
    /// Signal taken, waiting out the settle delay before sampling the other input
    Confirming,
    /// Running the source-specific pattern
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CombinedState {
    Idle,
    Active,
}

// ===================================================================
// Single-source handler
// ===================================================================

pub struct SourceHandler<'a, I, L, D> {
    source: SourceId,
    signal: &'a BinarySignal,
    combined: &'a BinarySignal,
    inputs: I,
    indicator: L,
    delay: D,
    settle_ms: u32,
    pattern: BlinkPattern,
    state: SourceState,
}

impl<'a, I: InputLevels, L: Indicator, D: DelayNs> SourceHandler<'a, I, L, D> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: SourceId,
        signal: &'a BinarySignal,
        combined: &'a BinarySignal,
        inputs: I,
        indicator: L,
        delay: D,
        settle_ms: u32,
        pattern: BlinkPattern,
    ) -> Self {
        Self {
            source,
            signal,
            combined,
            inputs,
            indicator,
            delay,
            settle_ms,
            pattern,
            state: SourceState::Idle,
        }
    }

    pub fn state(&self) -> SourceState {
        self.state
    }

    /// Take one transition. Returns the outcome when the handler gets back to `Idle`.
    pub async fn step(&mut self) -> Option<PressOutcome> {
        match self.state {
            SourceState::Idle => {
                self.signal.wait().await;
                self.state = SourceState::Confirming;
                None
            }
            SourceState::Confirming => {
                self.delay.delay_ms(self.settle_ms).await;
                if self.inputs.is_asserted(self.source.other()) {
                    info!("{} with {} held, handing off to combined handler", self.source.name(), self.source.other().name());
                    self.combined.signal(());
                    self.state = SourceState::Idle;
                    Some(PressOutcome::Redirected)
                } else {
                    self.state = SourceState::Active;
                    None
                }
            }
            SourceState::Active => {
                self.pattern.play(&self.indicator, &mut self.delay).await;
                debug!("{} pattern complete", self.source.name());
                self.state = SourceState::Idle;
                Some(PressOutcome::Completed)
            }
        }
    }

    /// Drive the machine from `Idle` through one full press
    pub async fn handle_press(&mut self) -> PressOutcome {
        loop {
            if let Some(outcome) = self.step().await {
                return outcome;
            }
        }
    }

    pub async fn run(mut self) {
        info!("{} handler started", self.source.name());

        loop {
            self.handle_press().await;
        }
    }
}

// ===================================================================
// Combined handler
// ===================================================================

pub struct CombinedHandler<'a, I, L, D> {
    signal: &'a BinarySignal,
    inputs: I,
    indicator: L,
    delay: D,
    pattern: BlinkPattern,
    state: CombinedState,
}

impl<'a, I: InputLevels, L: Indicator, D: DelayNs> CombinedHandler<'a, I, L, D> {
    /// `pattern.half_period_ms` doubles as the release poll interval;
    /// `pattern.repetitions` is unused since the pattern runs while both are held.
    pub fn new(signal: &'a BinarySignal, inputs: I, indicator: L, delay: D, pattern: BlinkPattern) -> Self {
        Self {
            signal,
            inputs,
            indicator,
            delay,
            pattern,
            state: CombinedState::Idle,
        }
    }

    pub fn state(&self) -> CombinedState {
        self.state
    }

    /// Wait for a combined press and blink until either input is released.
    /// Returns the number of completed cycles.
    pub async fn handle_press(&mut self) -> u32 {
        self.signal.wait().await;
        self.state = CombinedState::Active;
        info!("Combined press active");

        let mut cycles = 0;
        while self.inputs.both_asserted() {
            self.pattern.cycle(&self.indicator, &mut self.delay).await;
            cycles += 1;
        }

        self.state = CombinedState::Idle;
        debug!("Combined press released after {} cycles", cycles);
        cycles
    }

    pub async fn run(mut self) {
        info!("Combined handler started");

        loop {
            self.handle_press().await;
        }
    }
}
