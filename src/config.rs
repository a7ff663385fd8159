//! Hardware and timing configuration for pico-coord
//! RP2040 (Raspberry Pi Pico) with two push buttons and the on-board LED

use crate::types::{Event, SourceId};

// ===================================================================
// GPIO Pin Assignments - Raspberry Pi Pico
// ===================================================================

pub const LED_STATUS_PIN: u8 = 25; // Built-in LED on Pico
pub const PROBE_PIN: u8 = 22; // Oscilloscope probe, mirrors the LED
pub const SW1_PIN: u8 = 17; // Active low, internal pull-up
pub const SW2_PIN: u8 = 16; // Active low, internal pull-up

/// GPIO number wired to a button input
pub const fn source_pin(source: SourceId) -> u8 {
    match source {
        SourceId::Sw1 => SW1_PIN,
        SourceId::Sw2 => SW2_PIN,
    }
}

// ===================================================================
// Event Queue Pipeline
// ===================================================================

pub const QUEUE_CAPACITY: usize = 20; // Event slots
pub const PRODUCER_MEAN_DELAY_MS: u32 = 100; // Delays drawn from [0, 200) ms
pub const PRODUCER_1_EVENT: Event = Event(1);
pub const PRODUCER_2_EVENT: Event = Event(2);

/// Scheduling priority of a task.
///
/// `Low` runs on the thread-mode executor, `Medium` and `High` on interrupt
/// executors that preempt it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// Producer characterization
#[derive(Clone, Copy, Debug)]
pub struct ProducerConfig {
    pub name: &'static str,
    /// Statistical mean of the randomized inter-send delay
    pub mean_delay_ms: u32,
    pub priority: TaskPriority,
    /// Fixed payload posted on every send
    pub event: Event,
}

pub const PRODUCERS: [ProducerConfig; 2] = [
    ProducerConfig {
        name: "P1",
        mean_delay_ms: PRODUCER_MEAN_DELAY_MS,
        priority: TaskPriority::Medium,
        event: PRODUCER_1_EVENT,
    },
    ProducerConfig {
        name: "P2",
        mean_delay_ms: PRODUCER_MEAN_DELAY_MS,
        priority: TaskPriority::Medium,
        event: PRODUCER_2_EVENT,
    },
];

pub const CONSUMER_PRIORITY: TaskPriority = TaskPriority::Low;

/// Consumer dispatch entry: pulse the LED when `gate` is held and an
/// `expected` event arrives.
#[derive(Clone, Copy, Debug)]
pub struct DispatchRule {
    pub gate: SourceId,
    pub expected: Event,
    pub pulse_on_ms: u32,
    pub pulse_off_ms: u32,
}

pub const DISPATCH_RULES: [DispatchRule; 2] = [
    DispatchRule {
        gate: SourceId::Sw1,
        expected: PRODUCER_1_EVENT,
        pulse_on_ms: 5,
        pulse_off_ms: 1,
    },
    DispatchRule {
        gate: SourceId::Sw2,
        expected: PRODUCER_2_EVENT,
        pulse_on_ms: 20,
        pulse_off_ms: 50,
    },
];

// ===================================================================
// Debounced Button Signaling
// ===================================================================

pub const GUARD_WINDOW_MS: u32 = 50; // Deep-stroke switches needed more than 25ms
pub const SETTLE_DELAY_MS: u32 = 50; // Chatter mask before sampling the other input

pub const SW1_BLINK_HALF_PERIOD_MS: u32 = 33; // ~15Hz
pub const SW1_BLINK_REPETITIONS: u32 = 20;
pub const SW2_BLINK_HALF_PERIOD_MS: u32 = 38; // ~13Hz
pub const SW2_BLINK_REPETITIONS: u32 = 10;
pub const COMBINED_BLINK_HALF_PERIOD_MS: u32 = 100; // 5Hz, also the release poll interval

pub const EDGE_PRIORITY: TaskPriority = TaskPriority::High;
pub const HANDLER_PRIORITY: TaskPriority = TaskPriority::Low;
pub const COMBINED_PRIORITY: TaskPriority = TaskPriority::Medium;

// ===================================================================
// Idle Reminder / Heartbeat / Supervisor
// ===================================================================

pub const REMINDER_WAKE_MS: u32 = 1_000;
pub const REMINDER_IDLE_THRESHOLD_MS: u32 = 60_000;
pub const REMINDER_BLINK_HALF_PERIOD_MS: u32 = 25; // 20Hz
pub const REMINDER_BLINK_REPETITIONS: u32 = 20;
pub const REMINDER_PRIORITY: TaskPriority = TaskPriority::Medium;

pub const HEARTBEAT_HALF_PERIOD_MS: u32 = 500;
pub const SUPERVISOR_REPORT_SECS: u32 = 10;

// ===================================================================
// Application Selection
// ===================================================================

/// Which coordination application a firmware image runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppMode {
    /// Producers -> bounded queue -> consumer
    EventQueue,
    /// Debounced edges -> per-source signals -> handler tasks
    ButtonSignals,
}

impl AppMode {
    pub const fn name(self) -> &'static str {
        match self {
            AppMode::EventQueue => "Event Queue Pipeline",
            AppMode::ButtonSignals => "Debounced Button Signals",
        }
    }

    /// Whether the heartbeat pauses while a button is held
    pub const fn heartbeat_yields_to_buttons(self) -> bool {
        matches!(self, AppMode::EventQueue)
    }

    /// Whether the oscilloscope probe mirrors the status LED
    pub const fn uses_probe(self) -> bool {
        matches!(self, AppMode::ButtonSignals)
    }

    /// Level with the consumer in the queue app, above the source handlers
    /// in the signaling app
    pub const fn heartbeat_priority(self) -> TaskPriority {
        match self {
            AppMode::EventQueue => CONSUMER_PRIORITY,
            AppMode::ButtonSignals => TaskPriority::Medium,
        }
    }
}
