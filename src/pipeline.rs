//! Bounded queue pipeline: N producers -> one queue -> one consumer
//!
//! Producers post with a non-blocking send. A full queue means the system is
//! undersized, so the producer task treats it as fatal instead of dropping
//! or blocking.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender, TrySendError};
use embedded_hal_async::delay::DelayNs;
use rand::{Rng, RngCore};

use crate::config::{DispatchRule, ProducerConfig};
use crate::error::{Error, Result};
use crate::io::{Indicator, InputLevels};
use crate::pattern::Pulse;
use crate::types::Event;

pub type EventSender<'q, const N: usize> = Sender<'q, CriticalSectionRawMutex, Event, N>;
pub type EventReceiver<'q, const N: usize> = Receiver<'q, CriticalSectionRawMutex, Event, N>;

// ===================================================================
// Producer
// ===================================================================

pub struct Producer<'q, R, const N: usize> {
    config: ProducerConfig,
    sender: EventSender<'q, N>,
    rng: R,
}

impl<'q, R: RngCore, const N: usize> Producer<'q, R, N> {
    pub fn new(config: ProducerConfig, sender: EventSender<'q, N>, rng: R) -> Self {
        Self { config, sender, rng }
    }

    /// Uniform in `[0, 2 * mean)`, so the configured delay is the mean
    pub fn next_delay_ms(&mut self) -> u32 {
        match self.config.mean_delay_ms.checked_mul(2) {
            Some(0) => 0,
            Some(span) => self.rng.gen_range(0..span),
            None => self.rng.gen_range(0..=u32::MAX),
        }
    }

    /// Non-blocking send of this producer's event
    pub fn post(&self) -> Result<()> {
        self.sender
            .try_send(self.config.event)
            .map_err(|TrySendError::Full(event)| Error::QueueFull(event))
    }

    /// Wait a randomized delay, then post once
    pub async fn run_once<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        let wait = self.next_delay_ms();
        delay.delay_ms(wait).await;
        self.post()
    }

    /// Produce forever. Panics when the queue overflows.
    pub async fn run<D: DelayNs>(mut self, mut delay: D) {
        info!("Producer {} started (mean delay {} ms)", self.config.name, self.config.mean_delay_ms);

        loop {
            if let Err(e) = self.run_once(&mut delay).await {
                error!("Producer {}: {}", self.config.name, e);
                panic!("event queue overflow");
            }
        }
    }
}

// ===================================================================
// Consumer
// ===================================================================

pub struct Consumer<'q, I, L, const N: usize, const R: usize> {
    receiver: EventReceiver<'q, N>,
    rules: [DispatchRule; R],
    inputs: I,
    indicator: L,
}

impl<'q, I: InputLevels, L: Indicator, const N: usize, const R: usize> Consumer<'q, I, L, N, R> {
    pub fn new(receiver: EventReceiver<'q, N>, rules: [DispatchRule; R], inputs: I, indicator: L) -> Self {
        Self {
            receiver,
            rules,
            inputs,
            indicator,
        }
    }

    /// Rules whose gate is currently held and whose expected event is `event`
    pub fn matching_rules(&self, event: Event) -> impl Iterator<Item = &DispatchRule> + '_ {
        self.rules
            .iter()
            .filter(move |rule| rule.expected == event && self.inputs.is_asserted(rule.gate))
    }

    /// React to one event; returns how many pulses fired
    pub async fn dispatch<D: DelayNs>(&self, event: Event, delay: &mut D) -> usize {
        let mut fired = 0;
        for rule in self.matching_rules(event) {
            Pulse::new(rule.pulse_on_ms, rule.pulse_off_ms)
                .fire(&self.indicator, delay)
                .await;
            fired += 1;
        }
        if fired == 0 {
            trace!("Event {} discarded", event.id());
        }
        fired
    }

    /// Block until an event is queued, then dispatch it
    pub async fn run_once<D: DelayNs>(&self, delay: &mut D) -> (Event, usize) {
        let event = self.receiver.receive().await;
        let fired = self.dispatch(event, delay).await;
        (event, fired)
    }

    pub async fn run<D: DelayNs>(self, mut delay: D) {
        info!("Consumer started");

        loop {
            self.run_once(&mut delay).await;
        }
    }
}
