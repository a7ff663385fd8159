//! RP2040 board glue
//!
//! Pin setup, the collaborator implementations backed by embassy-rp and
//! embassy-time, and the concrete task wrappers spawned onto the three
//! priority levels.

use embassy_executor::{SendSpawner, SpawnToken, Spawner};
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::{pac, Peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Instant};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use static_cell::StaticCell;

use crate::channels::{DEBOUNCE_CLOCK, EVENT_QUEUE, SOURCE_SIGNALS};
use crate::config::{self, AppMode, ProducerConfig, TaskPriority};
use crate::debounce::DebounceFilter;
use crate::error::{Error, Result};
use crate::handlers::{CombinedHandler, SourceHandler};
use crate::heartbeat::Heartbeat;
use crate::io::{Indicator, InputLevels, Monotonic, SharedOutputs};
use crate::pattern::BlinkPattern;
use crate::pipeline::{Consumer, Producer};
use crate::reminder::IdleReminder;
use crate::supervisor::AppSupervisor;
use crate::types::SourceId;

/// Status LED plus optional oscilloscope probe
pub type StatusOutputs = SharedOutputs<CriticalSectionRawMutex, Output<'static>, 2>;

static STATUS_OUTPUTS: StatusOutputs = SharedOutputs::new();

/// Keeps the button pads configured when no task owns the inputs
static IDLE_BUTTONS: StaticCell<[Input<'static>; 2]> = StaticCell::new();

// ===================================================================
// Collaborators
// ===================================================================

/// Raw button levels read straight from the SIO input register, so any task
/// can sample a button while the edge watcher owns the `Input` drivers.
#[derive(Clone, Copy, Debug, Default)]
pub struct PicoButtons;

impl InputLevels for PicoButtons {
    fn is_asserted(&self, source: SourceId) -> bool {
        let mask = 1u32 << config::source_pin(source);
        pac::SIO.gpio_in(0).read() & mask == 0
    }
}

/// Milliseconds from the embassy-time tick counter
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl Monotonic for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation wraps at ~49 days; consumers use wrapping arithmetic
        Instant::now().as_millis() as u32
    }
}

/// 64 bits from the ring oscillator's random bit
fn rosc_seed() -> u64 {
    let random_reg = pac::ROSC.randombit();
    let mut acc = 0u64;
    for _ in 0..u64::BITS {
        acc = (acc << 1) | random_reg.read().randombit() as u64;
    }
    acc
}

// ===================================================================
// Spawning
// ===================================================================

/// One spawner per priority level
pub struct Spawners {
    /// Thread-mode executor
    pub low: Spawner,
    /// Interrupt executor on SWI_IRQ_0
    pub medium: SendSpawner,
    /// Interrupt executor on SWI_IRQ_1
    pub high: SendSpawner,
}

impl Spawners {
    pub fn spawn<S: Send>(&self, priority: TaskPriority, name: &'static str, token: SpawnToken<S>) -> Result<()> {
        let result = match priority {
            TaskPriority::Low => self.low.spawn(token),
            TaskPriority::Medium => self.medium.spawn(token),
            TaskPriority::High => self.high.spawn(token),
        };
        result.map_err(|e| {
            error!("Failed to spawn {}: {:?}", name, e);
            Error::TaskSpawn(name)
        })
    }
}

/// Configure pins and spawn every task for `mode`
pub fn init_hardware_tasks(spawners: &Spawners, p: Peripherals, mode: AppMode) -> Result<()> {
    info!("Initializing hardware for {}", mode.name());

    STATUS_OUTPUTS.attach("led", Output::new(p.PIN_25, Level::Low))?;
    if mode.uses_probe() {
        STATUS_OUTPUTS.attach("probe", Output::new(p.PIN_22, Level::Low))?;
    }

    let sw1 = Input::new(p.PIN_17, Pull::Up);
    let sw2 = Input::new(p.PIN_16, Pull::Up);

    spawners.spawn(
        mode.heartbeat_priority(),
        "heartbeat",
        heartbeat_task(mode.heartbeat_yields_to_buttons()),
    )?;

    match mode {
        AppMode::EventQueue => {
            let _ = IDLE_BUTTONS.init([sw1, sw2]);
            init_event_queue_tasks(spawners)
        }
        AppMode::ButtonSignals => init_button_signal_tasks(spawners, sw1, sw2),
    }
}

fn init_event_queue_tasks(spawners: &Spawners) -> Result<()> {
    for producer in config::PRODUCERS {
        spawners.spawn(producer.priority, producer.name, producer_task(producer, rosc_seed()))?;
    }
    spawners.spawn(config::CONSUMER_PRIORITY, "consumer", consumer_task())
}

fn init_button_signal_tasks(spawners: &Spawners, sw1: Input<'static>, sw2: Input<'static>) -> Result<()> {
    // Handlers first so no accepted edge goes unobserved
    for source in SourceId::ALL {
        spawners.spawn(config::HANDLER_PRIORITY, source.name(), source_handler_task(source))?;
    }
    spawners.spawn(config::COMBINED_PRIORITY, "combined", combined_task())?;
    spawners.spawn(config::REMINDER_PRIORITY, "reminder", reminder_task())?;
    spawners.spawn(config::EDGE_PRIORITY, "edges", edge_task(sw1, sw2))
}

// ===================================================================
// Tasks
// ===================================================================

/// Falling-edge watcher. Runs on the highest-priority interrupt executor and
/// never blocks beyond waiting for the next edge.
#[embassy_executor::task]
async fn edge_task(mut sw1: Input<'static>, mut sw2: Input<'static>) {
    info!("Edge watcher started");
    let filter = DebounceFilter::new(config::GUARD_WINDOW_MS, &DEBOUNCE_CLOCK, &SOURCE_SIGNALS);

    loop {
        let source = match select(sw1.wait_for_falling_edge(), sw2.wait_for_falling_edge()).await {
            Either::First(()) => SourceId::Sw1,
            Either::Second(()) => SourceId::Sw2,
        };
        filter.on_edge(source, EmbassyClock.now_ms());
    }
}

#[embassy_executor::task(pool_size = 2)]
async fn source_handler_task(source: SourceId) {
    let pattern = match source {
        SourceId::Sw1 => BlinkPattern::new(config::SW1_BLINK_HALF_PERIOD_MS, config::SW1_BLINK_REPETITIONS),
        SourceId::Sw2 => BlinkPattern::new(config::SW2_BLINK_HALF_PERIOD_MS, config::SW2_BLINK_REPETITIONS),
    };
    SourceHandler::new(
        source,
        SOURCE_SIGNALS.source(source),
        SOURCE_SIGNALS.combined(),
        PicoButtons,
        &STATUS_OUTPUTS,
        Delay,
        config::SETTLE_DELAY_MS,
        pattern,
    )
    .run()
    .await
}

#[embassy_executor::task]
async fn combined_task() {
    CombinedHandler::new(
        SOURCE_SIGNALS.combined(),
        PicoButtons,
        &STATUS_OUTPUTS,
        Delay,
        BlinkPattern::new(config::COMBINED_BLINK_HALF_PERIOD_MS, 1),
    )
    .run()
    .await
}

#[embassy_executor::task]
async fn reminder_task() {
    IdleReminder::new(
        &DEBOUNCE_CLOCK,
        EmbassyClock,
        &STATUS_OUTPUTS,
        Delay,
        config::REMINDER_WAKE_MS,
        config::REMINDER_IDLE_THRESHOLD_MS,
        BlinkPattern::new(config::REMINDER_BLINK_HALF_PERIOD_MS, config::REMINDER_BLINK_REPETITIONS),
    )
    .run()
    .await
}

#[embassy_executor::task(pool_size = 2)]
async fn producer_task(producer: ProducerConfig, seed: u64) {
    Producer::new(producer, EVENT_QUEUE.sender(), SmallRng::seed_from_u64(seed))
        .run(Delay)
        .await
}

#[embassy_executor::task]
async fn consumer_task() {
    Consumer::new(EVENT_QUEUE.receiver(), config::DISPATCH_RULES, PicoButtons, &STATUS_OUTPUTS)
        .run(Delay)
        .await
}

/// Status LED heartbeat
#[embassy_executor::task]
async fn heartbeat_task(yield_to_buttons: bool) {
    STATUS_OUTPUTS.drive(false);
    Heartbeat::new(
        PicoButtons,
        &STATUS_OUTPUTS,
        Delay,
        config::HEARTBEAT_HALF_PERIOD_MS,
        yield_to_buttons,
    )
    .run()
    .await
}

/// Uptime reporting, spawned by the binaries after initialization
#[embassy_executor::task]
pub async fn supervisor_task(mut supervisor: AppSupervisor) {
    supervisor.run(Delay).await
}
