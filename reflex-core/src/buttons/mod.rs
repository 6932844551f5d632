//! Button input handling
//!
//! Four active-low buttons with pull-ups. A press is a falling edge.

pub mod reader;

pub use reader::{ButtonReader, ButtonState, Presses, BUTTON_COUNT};
