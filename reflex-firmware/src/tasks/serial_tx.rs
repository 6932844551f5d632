//! Serial transmit task
//!
//! Writes each queued press to the UART as a `TOKEN\n` line. There is no
//! acknowledgement and no retry; if nothing is listening on the other end
//! the bytes are simply lost.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::PRESS_CHANNEL;

/// Serial TX task - drains the press channel into the UART
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    loop {
        let direction = PRESS_CHANNEL.receive().await;

        if let Err(e) = tx.write_all(direction.to_line()).await {
            warn!("Failed to send {}: {:?}", direction, e);
            continue;
        }

        trace!("Sent {}", direction);
    }
}
