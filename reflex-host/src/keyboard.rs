//! Keyboard source
//!
//! Reads crossterm events with a zero timeout. Arrow keys are directions,
//! `q` (or Ctrl-C, which raw mode turns into a key event) quits.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use reflex_protocol::Direction;
use tracing::trace;

use crate::error::InputError;
use crate::input::{EventSource, Signal, Source};

/// Map a key event to a signal
///
/// Only presses count; repeats and releases (on terminals that report them)
/// are ignored.
pub fn map_key(key: KeyEvent) -> Option<Signal> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Up => Some(Signal::Direction(Direction::Up)),
        KeyCode::Down => Some(Signal::Direction(Direction::Down)),
        KeyCode::Left => Some(Signal::Direction(Direction::Left)),
        KeyCode::Right => Some(Signal::Direction(Direction::Right)),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Signal::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Signal::Quit),
        _ => None,
    }
}

/// Map any terminal event to a signal
pub fn map_event(event: Event) -> Option<Signal> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Resize(..) => Some(Signal::Redraw),
        _ => None,
    }
}

/// Terminal keyboard input (requires raw mode)
#[derive(Debug, Default)]
pub struct KeyboardSource;

impl KeyboardSource {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for KeyboardSource {
    fn source(&self) -> Source {
        Source::Keyboard
    }

    fn poll(&mut self, out: &mut Vec<Signal>) -> Result<(), InputError> {
        while event::poll(Duration::ZERO).map_err(InputError::Keyboard)? {
            let event = event::read().map_err(InputError::Keyboard)?;
            if let Some(signal) = map_event(event) {
                trace!("Key signal: {:?}", signal);
                out.push(signal);
            }
        }
        Ok(())
    }
}
