//! Inter-task communication channels
//!
//! The button task produces presses, the serial TX task consumes them.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use reflex_protocol::Direction;

/// Channel capacity for button presses waiting to be sent
pub const PRESS_CHANNEL_SIZE: usize = 16;

/// Button presses waiting for the UART
pub static PRESS_CHANNEL: Channel<CriticalSectionRawMutex, Direction, PRESS_CHANNEL_SIZE> =
    Channel::new();
