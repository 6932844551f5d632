//! Input aggregation
//!
//! Two sources feed the game: button presses from the serial controller and
//! the keyboard. Each tick both are drained without blocking and merged into
//! one ordered list. Serial events always come before keyboard events from
//! the same tick.

use reflex_protocol::Direction;
use tracing::{info, warn};

use crate::error::InputError;

/// Where an input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Serial,
    Keyboard,
}

/// A direction press, consumed once by the round engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub direction: Direction,
    pub source: Source,
    /// Game clock time the event was polled
    pub at_ms: u32,
}

/// Anything a source can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Direction(Direction),
    /// Player asked to leave
    Quit,
    /// Terminal size changed
    Redraw,
}

/// A non-blocking input source
pub trait EventSource {
    /// Source tag stamped on the events this source produces
    fn source(&self) -> Source;

    /// Append everything that arrived since the last call
    ///
    /// Must return immediately when nothing is pending.
    fn poll(&mut self, out: &mut Vec<Signal>) -> Result<(), InputError>;
}

/// Result of one aggregator poll
#[derive(Debug, Default)]
pub struct Polled {
    /// Direction presses in arrival order
    pub events: Vec<InputEvent>,
    pub quit: bool,
    pub redraw: bool,
    /// Serial failure to show the player (reported once)
    pub notice: Option<InputError>,
}

/// Merges the serial and keyboard sources
pub struct InputAggregator<S, K> {
    serial: Option<S>,
    keyboard: K,
    scratch: Vec<Signal>,
}

impl<S: EventSource, K: EventSource> InputAggregator<S, K> {
    /// Create an aggregator; `serial` is `None` in keyboard-only mode
    pub fn new(serial: Option<S>, keyboard: K) -> Self {
        Self {
            serial,
            keyboard,
            scratch: Vec::new(),
        }
    }

    /// Check if the serial source is still attached
    pub fn has_serial(&self) -> bool {
        self.serial.is_some()
    }

    /// Drain both sources
    ///
    /// A serial failure drops the serial source and is returned in
    /// [`Polled::notice`]. A keyboard failure is returned as an error.
    pub fn poll(&mut self, now_ms: u32) -> Result<Polled, InputError> {
        let mut polled = Polled::default();

        if let Some(serial) = self.serial.as_mut() {
            self.scratch.clear();
            let result = serial.poll(&mut self.scratch);
            // Keep whatever arrived before the failure
            Self::merge(&self.scratch, Source::Serial, now_ms, &mut polled);

            if let Err(e) = result {
                warn!("Serial source lost, continuing on keyboard: {}", e);
                self.serial = None;
                polled.notice = Some(e);
            }
        }

        self.scratch.clear();
        self.keyboard.poll(&mut self.scratch)?;
        Self::merge(&self.scratch, self.keyboard.source(), now_ms, &mut polled);

        if polled.quit {
            info!("Quit requested");
        }

        Ok(polled)
    }

    fn merge(signals: &[Signal], source: Source, now_ms: u32, polled: &mut Polled) {
        for signal in signals {
            match *signal {
                Signal::Direction(direction) => polled.events.push(InputEvent {
                    direction,
                    source,
                    at_ms: now_ms,
                }),
                Signal::Quit => polled.quit = true,
                Signal::Redraw => polled.redraw = true,
            }
        }
    }
}
