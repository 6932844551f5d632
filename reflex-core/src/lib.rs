//! Board-agnostic core logic for the Reflex reaction game
//!
//! This crate contains all game logic that does not depend on a specific
//! environment, so the same code runs on the button controller and on the
//! host:
//!
//! - Button edge detection (controller side)
//! - Round engine: target, deadline, hit/miss/timeout, score and lives
//! - Game configuration
//!
//! Time is passed in explicitly as milliseconds since an arbitrary epoch
//! (boot on the controller, game start on the host). Nothing here reads a
//! clock or a random source.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buttons;
pub mod config;
pub mod state;

pub use reflex_protocol::Direction;
