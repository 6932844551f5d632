//! Host side of the Reflex reaction game
//!
//! Merges button presses from the serial controller with arrow keys from the
//! terminal, drives the round engine from `reflex-core` on a fixed tick and
//! renders the game state.
//!
//! Everything runs on one thread. Input sources are polled with zero
//! timeouts so a tick never waits on I/O.

pub mod app;
pub mod cli;
pub mod error;
pub mod input;
pub mod keyboard;
pub mod logging;
pub mod presenter;
pub mod serial;

pub use app::{App, Exit, GameClock};
pub use error::InputError;
pub use input::{EventSource, InputAggregator, InputEvent, Signal, Source};
