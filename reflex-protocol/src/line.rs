//! Line framing for the button link
//!
//! Bytes arrive in arbitrary chunks. The parser buffers a partial line until
//! the terminator shows up, then decodes it as a direction token.

use heapless::Vec;

use crate::direction::Direction;
use crate::LINE_END;

/// Longest line the receiver will buffer (longest token is 5 bytes)
pub const MAX_LINE_LEN: usize = 32;

/// Reasons a completed line was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line decoded but is not a direction token
    UnknownToken,
    /// Line is not valid UTF-8
    InvalidText,
    /// Line exceeded [`MAX_LINE_LEN`] before its terminator
    TooLong,
}

/// Receiver state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Accumulating bytes of the current line
    Collecting,
    /// Overflowed; skipping until the next terminator
    Discarding,
}

/// Incremental line parser
#[derive(Debug, Clone)]
pub struct LineParser {
    state: ParseState,
    buffer: Vec<u8, MAX_LINE_LEN>,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self {
            state: ParseState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Drop any partially received line
    pub fn reset(&mut self) {
        self.state = ParseState::Collecting;
        self.buffer.clear();
    }

    /// Number of bytes buffered for the current partial line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(direction))` when a terminator completes a valid
    /// token, `Ok(None)` when more bytes are needed (or the line was blank),
    /// or `Err` when a completed line had to be dropped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Direction>, LineError> {
        match self.state {
            ParseState::Discarding => {
                if byte == LINE_END {
                    self.reset();
                    return Err(LineError::TooLong);
                }
                Ok(None)
            }
            ParseState::Collecting => {
                if byte != LINE_END {
                    if self.buffer.push(byte).is_err() {
                        self.buffer.clear();
                        self.state = ParseState::Discarding;
                    }
                    return Ok(None);
                }

                let result = Self::decode(&self.buffer);
                self.buffer.clear();
                result
            }
        }
    }

    /// Feed a chunk of bytes, calling `on_direction` for every token found
    ///
    /// Returns the number of lines dropped as noise.
    pub fn feed_bytes<F>(&mut self, bytes: &[u8], mut on_direction: F) -> usize
    where
        F: FnMut(Direction),
    {
        let mut dropped = 0;
        for &byte in bytes {
            match self.feed(byte) {
                Ok(Some(direction)) => on_direction(direction),
                Ok(None) => {}
                Err(_) => dropped += 1,
            }
        }
        dropped
    }

    fn decode(line: &[u8]) -> Result<Option<Direction>, LineError> {
        let text = core::str::from_utf8(line).map_err(|_| LineError::InvalidText)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        Direction::from_token(text)
            .map(Some)
            .ok_or(LineError::UnknownToken)
    }
}
