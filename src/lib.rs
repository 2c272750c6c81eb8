//! Interrupt-driven time-of-day clock that reads itself out on one LED.
//!
//! A periodic timer interrupt feeds a [`TickAccumulator`], which keeps a
//! millisecond counter for the current day using integer-only drift
//! correction. A pin-change interrupt raises a [`WakeFlag`]. The main loop
//! sleeps through [`sleep_until_interrupt`] and, once the flag is up, lets the
//! [`DisplayController`] snapshot the clock, write it to a text surface and
//! blink hours and minutes as digit pulses.
//!
//! The crate is `no_std`. The `std` feature adds [`hosted`], where threads and
//! a channel take the place of the hardware interrupts.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod blink;
pub mod clock;
pub mod config;
pub mod controller;
pub mod decode;
pub mod display;
pub mod error;
pub mod power;
pub mod wake;

#[cfg(feature = "std")]
pub mod hosted;

pub use blink::{digit_pulses, Blinker, NoIndicator, Pulse};
pub use clock::{ClockState, SharedClock, Snapshot, TickAccumulator, DAY_WRAP_MS};
pub use config::{BlinkTiming, ClockConfig, ConfigError, TickConfig, TimeOfDay, TimerConfig};
pub use controller::DisplayController;
pub use decode::{BcdPair, DecodedTime};
pub use display::{render_time, TextSurface};
pub use error::Error;
pub use power::{sleep_until_interrupt, PowerSave};
pub use wake::WakeFlag;
