//! Reflex - button controller firmware
//!
//! Reads four direction buttons on an RP2040 board and reports each press to
//! the host as a line of text on UART0 (115200 8N1). Pair it with a USB-UART
//! bridge (or a Debug Probe, which shows up as /dev/ttyACM0) and run the
//! `reflex` host program against that port.
//!
//! Pin assignment (Raspberry Pi Pico / Pico W):
//!
//! | Signal | GPIO |
//! |--------|------|
//! | UP     | GP2  |
//! | DOWN   | GP3  |
//! | LEFT   | GP4  |
//! | RIGHT  | GP5  |
//! | UART TX| GP0  |
//! | UART RX| GP1  |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use reflex_protocol::BAUD_RATE;

mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Reflex firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Setup UART for the host link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BAUD_RATE;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 16]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    // Nothing is ever received from the host
    let (tx, _rx) = uart.split();

    info!("UART initialized at {} baud", BAUD_RATE);

    // Buttons to ground, internal pull-ups: idle HIGH, pressed LOW
    let pins: tasks::ButtonPins = [
        Input::new(p.PIN_2, Pull::Up),
        Input::new(p.PIN_3, Pull::Up),
        Input::new(p.PIN_4, Pull::Up),
        Input::new(p.PIN_5, Pull::Up),
    ];

    info!("Button inputs initialized");

    // Spawn tasks
    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();
    spawner.spawn(tasks::button_task(pins)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
