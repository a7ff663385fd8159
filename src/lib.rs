//! pico-coord - Task coordination and button debouncing for RP2040
//!
//! This library provides the coordination layer of two small Embassy
//! applications on the Raspberry Pi Pico.
//!
//! ## Applications
//! - **Event Queue Pipeline**: randomized producers post into a bounded
//!   queue drained by one consumer that pulses the LED when the matching
//!   button is held
//! - **Debounced Button Signals**: falling edges are debounced in interrupt
//!   context into per-button signals; handler tasks blink per button, and a
//!   simultaneous press is redirected to a combined handler
//!
//! ## Architecture
//! - **Priorities**: thread-mode executor plus two interrupt executors
//! - **Channels/Signals**: `embassy-sync` primitives as the only path between tasks
//! - **Hardware-agnostic core**: everything except [`hardware`] talks to the
//!   board through the traits in [`io`]

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channels;
pub mod config;
pub mod debounce;
pub mod error;
pub mod handlers;
pub mod heartbeat;
pub mod io;
pub mod pattern;
pub mod pipeline;
pub mod reminder;
pub mod supervisor;
pub mod types;

#[cfg(feature = "rp2040")]
pub mod hardware;

pub use error::{Error, Result};
