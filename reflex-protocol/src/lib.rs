//! Reflex serial line protocol
//!
//! This crate defines the link between the button controller (RP2040) and
//! the host game. The protocol is deliberately minimal: the controller sends
//! one ASCII line per button press and never expects a reply.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌──────────────────────────┬────┐
//! │ TOKEN                    │ LF │
//! │ UP | DOWN | LEFT | RIGHT │ 1B │
//! └──────────────────────────┴────┘
//! ```
//!
//! 115200 baud, 8 data bits, no parity, 1 stop bit. No checksums, no
//! acknowledgements, no flow control. Anything that is not a known token is
//! noise and gets dropped by the receiver.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod direction;
pub mod line;

pub use direction::Direction;
pub use line::{LineError, LineParser, MAX_LINE_LEN};

/// Serial link baud rate
pub const BAUD_RATE: u32 = 115_200;

/// Line terminator byte
pub const LINE_END: u8 = b'\n';
