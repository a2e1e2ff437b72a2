//! Firmware core for an ATmega328P driving the Arduino multi-function
//! shield: debounced buttons mirrored on LEDs, a multiplexed four-digit
//! display and a heartbeat LED.
#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod config;
pub mod drivers;
pub mod hal;
pub mod logger;
pub mod os;

pub use application::Application;
pub use os::{PulseCounter, Ticks, TICKS};

// Reached by the logging macros from other crates
#[doc(hidden)]
pub use ufmt;
