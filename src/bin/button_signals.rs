//! pico-coord - Debounced Button Signals firmware
//!
//! SW1 blinks the LED 20 times at ~15Hz, SW2 10 times at ~13Hz. Pressing
//! both together blinks at 5Hz until either is released. After a minute
//! without presses the LED plays a short 20Hz reminder burst.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use static_cell::StaticCell;
use panic_halt as _;
use defmt_rtt as _;

use pico_coord::config::AppMode;
use pico_coord::hardware::{self, supervisor_task, Spawners};
use pico_coord::supervisor::AppSupervisor;

const MODE: AppMode = AppMode::ButtonSignals;

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MEDIUM: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[interrupt]
unsafe fn SWI_IRQ_0() {
    EXECUTOR_MEDIUM.on_interrupt()
}

#[entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());

    let supervisor = AppSupervisor::new(MODE);
    supervisor.print_startup_banner();

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    interrupt::SWI_IRQ_0.set_priority(Priority::P3);
    let medium = EXECUTOR_MEDIUM.start(interrupt::SWI_IRQ_0);

    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(|spawner| {
        let spawners = Spawners {
            low: spawner,
            medium,
            high,
        };

        match hardware::init_hardware_tasks(&spawners, p, MODE) {
            Ok(()) => supervisor.print_init_success(),
            Err(e) => {
                error!("Initialization failed: {}", e);
                core::panic!("Hardware initialization failed");
            }
        }

        unwrap!(spawner.spawn(supervisor_task(supervisor)));
    })
}
