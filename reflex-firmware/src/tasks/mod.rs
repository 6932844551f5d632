//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod buttons;
pub mod serial_tx;

pub use buttons::{button_task, ButtonPins};
pub use serial_tx::serial_tx_task;
