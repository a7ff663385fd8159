//! Application supervisor and monitoring
//!
//! This module provides the startup banner and a periodic uptime report.

use embedded_hal_async::delay::DelayNs;

use crate::config::{self, AppMode};
use crate::types::APP_VERSION;

/// Application supervisor responsible for monitoring and lifecycle management
pub struct AppSupervisor {
    mode: AppMode,
    uptime_seconds: u32,
    last_heartbeat: u32,
}

impl AppSupervisor {
    /// Create a new application supervisor for one application
    pub fn new(mode: AppMode) -> Self {
        Self {
            mode,
            uptime_seconds: 0,
            last_heartbeat: 0,
        }
    }

    /// Print application startup banner with configuration
    pub fn print_startup_banner(&self) {
        info!("========================================");
        info!("pico-coord v{}", APP_VERSION);
        info!("Application: {}", self.mode.name());
        info!("========================================");
        info!("Hardware: RP2040 (Raspberry Pi Pico)");
        info!("Buttons: SW1=GPIO{} SW2=GPIO{} (active low)", config::SW1_PIN, config::SW2_PIN);
        info!("LED: GPIO{}", config::LED_STATUS_PIN);
        match self.mode {
            AppMode::EventQueue => {
                info!("Queue: {} slots, {} producers", config::QUEUE_CAPACITY, config::PRODUCERS.len());
            }
            AppMode::ButtonSignals => {
                info!(
                    "Guard window: {} ms, settle delay: {} ms",
                    config::GUARD_WINDOW_MS,
                    config::SETTLE_DELAY_MS
                );
            }
        }
        info!("========================================");
    }

    /// Print successful initialization message
    pub fn print_init_success(&self) {
        info!("{} initialized successfully", self.mode.name());
    }

    /// Advance uptime; returns true when a status report is due
    pub fn tick(&mut self, elapsed_seconds: u32) -> bool {
        self.uptime_seconds += elapsed_seconds;

        // Report every 60 seconds
        if self.uptime_seconds - self.last_heartbeat >= 60 {
            self.last_heartbeat = self.uptime_seconds;
            true
        } else {
            false
        }
    }

    /// Run the main supervisor loop
    pub async fn run<D: DelayNs>(&mut self, mut delay: D) {
        info!("Application supervisor started");

        let period = config::SUPERVISOR_REPORT_SECS;
        loop {
            delay.delay_ms(period * 1000).await;
            if self.tick(period) {
                self.print_status();
            }
        }
    }

    /// Print current application status
    fn print_status(&self) {
        let minutes = self.uptime_seconds / 60;
        let hours = minutes / 60;
        let remaining_minutes = minutes % 60;

        if hours > 0 {
            info!("Status: Uptime {}h{}m", hours, remaining_minutes);
        } else {
            info!("Status: Uptime {}m", minutes);
        }
    }

    /// Get current uptime in seconds
    pub fn uptime(&self) -> u32 {
        self.uptime_seconds
    }
}
