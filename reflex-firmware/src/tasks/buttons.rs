//! Button polling task
//!
//! Samples the four direction buttons every 10 ms and queues one press per
//! falling edge. Buttons are wired to ground with the internal pull-ups
//! enabled, so idle reads HIGH and pressed reads LOW.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant, Ticker};

use reflex_core::buttons::{ButtonReader, BUTTON_COUNT};

use crate::channels::PRESS_CHANNEL;

/// Poll interval in milliseconds
pub const POLL_INTERVAL_MS: u64 = 10;

/// Repeat presses on one button inside this window are treated as bounce
pub const PRESS_LOCKOUT_MS: u32 = 30;

/// Direction button inputs, ordered UP, DOWN, LEFT, RIGHT
pub type ButtonPins = [Input<'static>; BUTTON_COUNT];

/// Button task - edge detection at a fixed poll rate
#[embassy_executor::task]
pub async fn button_task(mut pins: ButtonPins) {
    info!("Button task started");

    let mut reader = ButtonReader::with_lockout(PRESS_LOCKOUT_MS);
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    let start = Instant::now();

    loop {
        ticker.next().await;

        let now_ms = start.elapsed().as_millis() as u32;

        for direction in reader.poll(&mut pins, now_ms) {
            debug!("Press: {}", direction);
            // Fire-and-forget: drop the press if the TX side is backed up
            if PRESS_CHANNEL.try_send(direction).is_err() {
                warn!("Press channel full, dropping {}", direction);
            }
        }
    }
}
