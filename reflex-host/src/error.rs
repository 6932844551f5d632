//! Input error taxonomy
//!
//! Serial failures are never fatal: they are reported once and the game
//! continues on the keyboard. A keyboard failure means the terminal itself
//! is gone and ends the process.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to open serial port {port}: {source}")]
    SerialOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("serial read error: {0}")]
    SerialRead(#[source] io::Error),

    #[error("serial device disconnected")]
    SerialDisconnected,

    #[error("keyboard read error: {0}")]
    Keyboard(#[source] io::Error),
}

impl InputError {
    /// Check if the game can keep running without this source
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, InputError::Keyboard(_))
    }
}
