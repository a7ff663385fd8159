//! Debounced interrupt signaling and handler state machine tests

mod common;

use common::{RecordingLed, ScriptedButtons, VirtualClock};
use embassy_futures::block_on;
use pico_coord::channels::{BinarySignal, SourceSignals};
use pico_coord::config;
use pico_coord::debounce::{DebounceClock, DebounceFilter};
use pico_coord::handlers::{CombinedHandler, CombinedState, SourceHandler, SourceState};
use pico_coord::heartbeat::Heartbeat;
use pico_coord::pattern::BlinkPattern;
use pico_coord::reminder::IdleReminder;
use pico_coord::types::{EdgeVerdict, PressOutcome, SourceId};

const GUARD_MS: u32 = 50;

fn sw1_pattern() -> BlinkPattern {
    BlinkPattern::new(config::SW1_BLINK_HALF_PERIOD_MS, config::SW1_BLINK_REPETITIONS)
}

fn sw2_pattern() -> BlinkPattern {
    BlinkPattern::new(config::SW2_BLINK_HALF_PERIOD_MS, config::SW2_BLINK_REPETITIONS)
}

/// Number of wakes a waiter would observe right now
fn drain(signal: &BinarySignal) -> usize {
    std::iter::from_fn(|| signal.try_take()).count()
}

// ===================================================================
// Debounce filter
// ===================================================================

#[test]
fn bounce_within_guard_window_yields_one_signal() {
    let clock = DebounceClock::new();
    let signals = SourceSignals::new();
    let filter = DebounceFilter::new(GUARD_MS, &clock, &signals);

    assert_eq!(filter.on_edge(SourceId::Sw1, 1_000), EdgeVerdict::Accepted);
    assert_eq!(filter.on_edge(SourceId::Sw1, 1_010), EdgeVerdict::Suppressed);
    assert_eq!(filter.on_edge(SourceId::Sw1, 1_049), EdgeVerdict::Suppressed);

    assert_eq!(drain(signals.source(SourceId::Sw1)), 1);
}

#[test]
fn presses_beyond_guard_window_yield_two_signals() {
    let clock = DebounceClock::new();
    let signals = SourceSignals::new();
    let filter = DebounceFilter::new(GUARD_MS, &clock, &signals);

    assert_eq!(filter.on_edge(SourceId::Sw1, 1_000), EdgeVerdict::Accepted);
    assert_eq!(drain(signals.source(SourceId::Sw1)), 1);

    assert_eq!(filter.on_edge(SourceId::Sw1, 1_080), EdgeVerdict::Accepted);
    assert_eq!(drain(signals.source(SourceId::Sw1)), 1);
}

#[test]
fn guard_window_is_shared_across_sources() {
    let clock = DebounceClock::new();
    let signals = SourceSignals::new();
    let filter = DebounceFilter::new(GUARD_MS, &clock, &signals);

    // Edge on SW1 at t=0 and SW2 at t=30: only SW1 is signaled
    assert_eq!(filter.on_edge(SourceId::Sw1, 0), EdgeVerdict::Accepted);
    assert_eq!(filter.on_edge(SourceId::Sw2, 30), EdgeVerdict::Suppressed);

    assert!(signals.source(SourceId::Sw1).signaled());
    assert!(!signals.source(SourceId::Sw2).signaled());
    assert!(!signals.combined().signaled());
    assert_eq!(clock.last_accepted(), Some(0));
}

#[test]
fn unconsumed_signal_coalesces_repeated_edges() {
    let clock = DebounceClock::new();
    let signals = SourceSignals::new();
    let filter = DebounceFilter::new(GUARD_MS, &clock, &signals);

    for press in 0..4 {
        filter.on_edge(SourceId::Sw2, press * 100);
    }
    assert_eq!(drain(signals.source(SourceId::Sw2)), 1);
}

#[test]
fn binary_signal_wakes_once_for_repeated_signals() {
    let signal = BinarySignal::new();
    signal.signal(());
    signal.signal(());
    signal.signal(());

    block_on(signal.wait());
    assert!(!signal.signaled());
    assert_eq!(signal.try_take(), None);
}

// ===================================================================
// Source handlers
// ===================================================================

#[test]
fn single_press_runs_pattern_to_completion() {
    let clock = VirtualClock::new();
    let buttons = ScriptedButtons::new(&clock).hold(SourceId::Sw1, 0..5_000);
    let led = RecordingLed::new(&clock);
    let signals = SourceSignals::new();
    let mut handler = SourceHandler::new(
        SourceId::Sw1,
        signals.source(SourceId::Sw1),
        signals.combined(),
        &buttons,
        &led,
        clock.delay(),
        config::SETTLE_DELAY_MS,
        sw1_pattern(),
    );

    signals.source(SourceId::Sw1).signal(());
    assert_eq!(block_on(handler.handle_press()), PressOutcome::Completed);

    assert_eq!(handler.state(), SourceState::Idle);
    assert_eq!(led.count(false), 20);
    assert_eq!(led.count(true), 20);
    assert_eq!(clock.now(), 50 + 20 * 66);
    assert!(!signals.combined().signaled());
}

#[test]
fn handler_walks_through_named_states() {
    let clock = VirtualClock::new();
    let buttons = ScriptedButtons::new(&clock).hold(SourceId::Sw2, 0..5_000);
    let led = RecordingLed::new(&clock);
    let signals = SourceSignals::new();
    let mut handler = SourceHandler::new(
        SourceId::Sw2,
        signals.source(SourceId::Sw2),
        signals.combined(),
        &buttons,
        &led,
        clock.delay(),
        config::SETTLE_DELAY_MS,
        sw2_pattern(),
    );
    assert_eq!(handler.state(), SourceState::Idle);

    signals.source(SourceId::Sw2).signal(());
    assert_eq!(block_on(handler.step()), None);
    assert_eq!(handler.state(), SourceState::Confirming);
    assert!(led.is_untouched());

    assert_eq!(block_on(handler.step()), None);
    assert_eq!(handler.state(), SourceState::Active);
    assert_eq!(clock.now(), 50);

    assert_eq!(block_on(handler.step()), Some(PressOutcome::Completed));
    assert_eq!(handler.state(), SourceState::Idle);
    assert_eq!(led.count(false), 10);
    assert_eq!(clock.now(), 50 + 10 * 76);
}

#[test]
fn simultaneous_press_goes_to_combined_handler_only() {
    let clock = VirtualClock::new();
    // SW1 pressed at t=0, SW2 joins at t=20 inside the settle window
    let buttons = ScriptedButtons::new(&clock)
        .hold(SourceId::Sw1, 0..1_000)
        .hold(SourceId::Sw2, 20..1_000);
    let led = RecordingLed::new(&clock);
    let edges = DebounceClock::new();
    let signals = SourceSignals::new();
    let filter = DebounceFilter::new(GUARD_MS, &edges, &signals);

    assert_eq!(filter.on_edge(SourceId::Sw1, 0), EdgeVerdict::Accepted);
    assert_eq!(filter.on_edge(SourceId::Sw2, 20), EdgeVerdict::Suppressed);

    let mut sw1 = SourceHandler::new(
        SourceId::Sw1,
        signals.source(SourceId::Sw1),
        signals.combined(),
        &buttons,
        &led,
        clock.delay(),
        config::SETTLE_DELAY_MS,
        sw1_pattern(),
    );
    assert_eq!(block_on(sw1.handle_press()), PressOutcome::Redirected);
    assert_eq!(sw1.state(), SourceState::Idle);
    assert!(led.is_untouched());
    assert!(!signals.source(SourceId::Sw2).signaled());

    let mut combined = CombinedHandler::new(
        signals.combined(),
        &buttons,
        &led,
        clock.delay(),
        BlinkPattern::new(config::COMBINED_BLINK_HALF_PERIOD_MS, 1),
    );
    // Checks at 50, 250, 450, 650, 850 see both held; 1050 sees the release
    assert_eq!(block_on(combined.handle_press()), 5);
    assert_eq!(combined.state(), CombinedState::Idle);
    assert_eq!(led.count(false), 5);
    assert_eq!(led.count(true), 5);
    assert_eq!(clock.now(), 1_050);
}

#[test]
fn both_accepted_edges_redirect_to_one_combined_wake() {
    let clock = VirtualClock::new();
    // SW2 lands exactly one guard window after SW1, so both edges are accepted
    let buttons = ScriptedButtons::new(&clock)
        .hold(SourceId::Sw1, 0..1_000)
        .hold(SourceId::Sw2, 50..1_000);
    let led = RecordingLed::new(&clock);
    let edges = DebounceClock::new();
    let signals = SourceSignals::new();
    let filter = DebounceFilter::new(GUARD_MS, &edges, &signals);

    assert_eq!(filter.on_edge(SourceId::Sw1, 0), EdgeVerdict::Accepted);
    assert_eq!(filter.on_edge(SourceId::Sw2, 50), EdgeVerdict::Accepted);

    let mut sw1 = SourceHandler::new(
        SourceId::Sw1,
        signals.source(SourceId::Sw1),
        signals.combined(),
        &buttons,
        &led,
        clock.delay(),
        config::SETTLE_DELAY_MS,
        sw1_pattern(),
    );
    let mut sw2 = SourceHandler::new(
        SourceId::Sw2,
        signals.source(SourceId::Sw2),
        signals.combined(),
        &buttons,
        &led,
        clock.delay(),
        config::SETTLE_DELAY_MS,
        sw2_pattern(),
    );

    // SW1 samples at 50, SW2 at 100; each sees the other held
    assert_eq!(block_on(sw1.handle_press()), PressOutcome::Redirected);
    assert_eq!(block_on(sw2.handle_press()), PressOutcome::Redirected);
    assert_eq!(sw1.state(), SourceState::Idle);
    assert_eq!(sw2.state(), SourceState::Idle);
    assert_eq!(clock.now(), 100);

    assert!(led.is_untouched());
    assert_eq!(drain(signals.combined()), 1);
}

#[test]
fn combined_handler_returns_at_once_if_already_released() {
    let clock = VirtualClock::new();
    let buttons = ScriptedButtons::new(&clock).hold(SourceId::Sw1, 0..1_000);
    let led = RecordingLed::new(&clock);
    let signal = BinarySignal::new();
    let mut combined = CombinedHandler::new(
        &signal,
        &buttons,
        &led,
        clock.delay(),
        BlinkPattern::new(config::COMBINED_BLINK_HALF_PERIOD_MS, 1),
    );

    signal.signal(());
    assert_eq!(block_on(combined.handle_press()), 0);
    assert!(led.is_untouched());
    assert_eq!(clock.now(), 0);
}

#[test]
fn staggered_presses_keep_independent_active_phases() {
    let clock = VirtualClock::new();
    // SW2 is pressed after SW1 has passed its settle check
    let buttons = ScriptedButtons::new(&clock)
        .hold(SourceId::Sw1, 0..40)
        .hold(SourceId::Sw2, 200..240);
    let led = RecordingLed::new(&clock);
    let signals = SourceSignals::new();
    let mut sw1 = SourceHandler::new(
        SourceId::Sw1,
        signals.source(SourceId::Sw1),
        signals.combined(),
        &buttons,
        &led,
        clock.delay(),
        config::SETTLE_DELAY_MS,
        sw1_pattern(),
    );

    signals.source(SourceId::Sw1).signal(());
    block_on(sw1.step());
    block_on(sw1.step());
    assert_eq!(sw1.state(), SourceState::Active);

    // SW2's own handler confirms while SW1 is still Active
    clock.set_ms(200);
    let mut sw2 = SourceHandler::new(
        SourceId::Sw2,
        signals.source(SourceId::Sw2),
        signals.combined(),
        &buttons,
        &led,
        clock.delay(),
        config::SETTLE_DELAY_MS,
        sw2_pattern(),
    );
    signals.source(SourceId::Sw2).signal(());
    block_on(sw2.step());
    block_on(sw2.step());
    assert_eq!(sw2.state(), SourceState::Active);
    assert_eq!(sw1.state(), SourceState::Active);
    assert!(!signals.combined().signaled());
}

// ===================================================================
// Idle reminder and heartbeat
// ===================================================================

#[test]
fn reminder_fires_after_idle_threshold_and_rearms() {
    let clock = VirtualClock::new();
    let led = RecordingLed::new(&clock);
    let edges = DebounceClock::new();
    let burst = BlinkPattern::new(config::REMINDER_BLINK_HALF_PERIOD_MS, config::REMINDER_BLINK_REPETITIONS);
    let mut reminder = IdleReminder::new(
        &edges,
        &clock,
        &led,
        clock.delay(),
        config::REMINDER_WAKE_MS,
        config::REMINDER_IDLE_THRESHOLD_MS,
        burst,
    );

    clock.set_ms(59_999);
    assert!(!block_on(reminder.check()));
    assert!(led.is_untouched());

    clock.set_ms(60_000);
    assert!(block_on(reminder.check()));
    assert_eq!(led.count(false), 20);
    assert_eq!(clock.now(), 61_000);
    assert_eq!(edges.last_accepted(), Some(61_000));

    assert!(!reminder.is_due(61_000 + 59_999));
    assert!(reminder.is_due(61_000 + 60_000));
}

#[test]
fn accepted_edges_postpone_the_reminder() {
    let clock = VirtualClock::at_ms(90_000);
    let led = RecordingLed::new(&clock);
    let edges = DebounceClock::new();
    let signals = SourceSignals::new();
    let filter = DebounceFilter::new(GUARD_MS, &edges, &signals);
    let reminder = IdleReminder::new(
        &edges,
        &clock,
        &led,
        clock.delay(),
        config::REMINDER_WAKE_MS,
        config::REMINDER_IDLE_THRESHOLD_MS,
        BlinkPattern::new(25, 20),
    );

    assert!(reminder.is_due(90_000));
    filter.on_edge(SourceId::Sw1, 80_000);
    assert!(!reminder.is_due(90_000));
    assert!(reminder.is_due(140_000));
}

#[test]
fn heartbeat_goes_dark_while_a_button_is_held() {
    let clock = VirtualClock::new();
    let buttons = ScriptedButtons::new(&clock).hold(SourceId::Sw2, 1_000..2_000);
    let led = RecordingLed::new(&clock);
    let mut heartbeat = Heartbeat::new(&buttons, &led, clock.delay(), config::HEARTBEAT_HALF_PERIOD_MS, true);

    assert!(block_on(heartbeat.beat()));
    assert_eq!(led.log(), vec![(0, true), (500, false)]);

    assert!(!block_on(heartbeat.beat()));
    assert!(!block_on(heartbeat.beat()));
    assert_eq!(clock.now(), 2_000);
    assert_eq!(led.log().len(), 2);

    assert!(block_on(heartbeat.beat()));
    assert_eq!(led.log().len(), 4);
}

#[test]
fn heartbeat_ignores_buttons_when_not_yielding() {
    let clock = VirtualClock::new();
    let buttons = ScriptedButtons::new(&clock).hold(SourceId::Sw1, 0..10_000);
    let led = RecordingLed::new(&clock);
    let mut heartbeat = Heartbeat::new(&buttons, &led, clock.delay(), config::HEARTBEAT_HALF_PERIOD_MS, false);

    assert!(block_on(heartbeat.beat()));
    assert_eq!(clock.now(), 1_000);
}
