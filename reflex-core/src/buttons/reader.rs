//! Falling-edge button reader
//!
//! Sampled at a fixed interval. For every line the current level is
//! compared to the previous sample; HIGH followed by LOW is a press.
//! The previous sample is updated on every call whether or not a press was
//! reported. There is no debounce filter beyond the poll interval unless a
//! lockout window is configured.

use embedded_hal::digital::InputPin;
use heapless::Vec;

use reflex_protocol::Direction;

/// Number of buttons (one per direction)
pub const BUTTON_COUNT: usize = Direction::ALL.len();

/// Presses detected in one sample, in [`Direction::ALL`] order
pub type Presses = Vec<Direction, BUTTON_COUNT>;

/// Per-line edge detector state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState {
    /// Level seen on the previous sample (`true` = HIGH = released)
    previous_high: bool,
    /// Time of the last reported press
    last_press_ms: Option<u32>,
}

impl Default for ButtonState {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonState {
    /// Released line with no press history
    pub const fn new() -> Self {
        Self {
            previous_high: true,
            last_press_ms: None,
        }
    }

    /// Check if the line was pressed (LOW) on the last sample
    pub fn is_pressed(&self) -> bool {
        !self.previous_high
    }

    /// Feed one sample, returns true on a reportable falling edge
    fn sample(&mut self, high: bool, now_ms: u32, lockout_ms: u32) -> bool {
        let falling = self.previous_high && !high;
        self.previous_high = high;

        if !falling {
            return false;
        }

        if let Some(last) = self.last_press_ms {
            if lockout_ms > 0 && now_ms.wrapping_sub(last) < lockout_ms {
                return false;
            }
        }

        self.last_press_ms = Some(now_ms);
        true
    }
}

/// Edge detector for the four direction buttons
#[derive(Debug, Clone)]
pub struct ButtonReader {
    lines: [ButtonState; BUTTON_COUNT],
    lockout_ms: u32,
}

impl Default for ButtonReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonReader {
    /// Create a reader that reports every falling edge
    pub const fn new() -> Self {
        Self::with_lockout(0)
    }

    /// Create a reader that ignores repeat presses on the same line
    /// within `lockout_ms` of the last reported one
    ///
    /// A lockout of 0 disables suppression.
    pub const fn with_lockout(lockout_ms: u32) -> Self {
        Self {
            lines: [ButtonState::new(); BUTTON_COUNT],
            lockout_ms,
        }
    }

    /// Configured lockout window
    pub fn lockout_ms(&self) -> u32 {
        self.lockout_ms
    }

    /// State of the line for `direction`
    pub fn state(&self, direction: Direction) -> &ButtonState {
        &self.lines[direction.index()]
    }

    /// Process one sample of all four lines
    ///
    /// `levels[i]` is the level of the line for `Direction::ALL[i]`,
    /// `true` meaning HIGH (released).
    pub fn update(&mut self, levels: [bool; BUTTON_COUNT], now_ms: u32) -> Presses {
        let mut presses = Presses::new();
        let lockout_ms = self.lockout_ms;

        for ((line, high), direction) in self
            .lines
            .iter_mut()
            .zip(levels)
            .zip(Direction::ALL)
        {
            if line.sample(high, now_ms, lockout_ms) {
                // Capacity equals line count, cannot overflow
                let _ = presses.push(direction);
            }
        }

        presses
    }

    /// Sample four input pins and process them
    ///
    /// Pins are ordered like [`Direction::ALL`]. A pin that fails to read is
    /// treated as released.
    pub fn poll<P: InputPin>(&mut self, pins: &mut [P; BUTTON_COUNT], now_ms: u32) -> Presses {
        let mut levels = [true; BUTTON_COUNT];
        for (level, pin) in levels.iter_mut().zip(pins.iter_mut()) {
            *level = pin.is_high().unwrap_or(true);
        }
        self.update(levels, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    const RELEASED: [bool; 4] = [true; 4];

    fn only(direction: Direction) -> [bool; 4] {
        let mut levels = RELEASED;
        levels[direction.index()] = false;
        levels
    }

    #[test]
    fn test_press_emits_once() {
        let mut reader = ButtonReader::new();
        assert!(reader.update(RELEASED, 0).is_empty());

        let presses = reader.update(only(Direction::Left), 10);
        assert_eq!(presses.as_slice(), &[Direction::Left]);

        // Held down: LOW -> LOW is not a press
        assert!(reader.update(only(Direction::Left), 20).is_empty());
        assert!(reader.update(only(Direction::Left), 30).is_empty());
        assert!(reader.state(Direction::Left).is_pressed());

        // Release: LOW -> HIGH is not a press
        assert!(reader.update(RELEASED, 40).is_empty());
        assert!(!reader.state(Direction::Left).is_pressed());
    }

    #[test]
    fn test_held_at_startup_reported_once() {
        let mut reader = ButtonReader::new();
        // All lines start as released, so a LOW first sample is an edge
        let presses = reader.update(only(Direction::Up), 0);
        assert_eq!(presses.as_slice(), &[Direction::Up]);
        assert!(reader.update(only(Direction::Up), 10).is_empty());
    }

    #[test]
    fn test_simultaneous_presses_in_scan_order() {
        let mut reader = ButtonReader::new();
        reader.update(RELEASED, 0);
        let presses = reader.update([true, false, true, false], 10);
        assert_eq!(presses.as_slice(), &[Direction::Down, Direction::Right]);
    }

    #[test]
    fn test_bounce_reports_each_edge_without_lockout() {
        let mut reader = ButtonReader::new();
        let mut count = 0;
        for (t, low) in [false, true, false, true, false].iter().enumerate() {
            let mut levels = RELEASED;
            levels[0] = !low;
            count += reader.update(levels, t as u32 * 10).len();
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_lockout_suppresses_bounce() {
        let mut reader = ButtonReader::with_lockout(30);
        assert_eq!(reader.update(only(Direction::Up), 0).len(), 1);
        reader.update(RELEASED, 10);
        // Bounce inside the window
        assert!(reader.update(only(Direction::Up), 20).is_empty());
        reader.update(RELEASED, 25);
        // Window elapsed
        assert_eq!(reader.update(only(Direction::Up), 40).len(), 1);
    }

    #[test]
    fn test_lockout_is_per_line() {
        let mut reader = ButtonReader::with_lockout(100);
        assert_eq!(reader.update(only(Direction::Up), 0).len(), 1);
        reader.update(RELEASED, 10);
        let presses = reader.update(only(Direction::Right), 20);
        assert_eq!(presses.as_slice(), &[Direction::Right]);
    }

    #[test]
    fn test_lockout_survives_clock_wrap() {
        let mut reader = ButtonReader::with_lockout(50);
        assert_eq!(reader.update(only(Direction::Down), u32::MAX - 5).len(), 1);
        reader.update(RELEASED, u32::MAX);
        assert!(reader.update(only(Direction::Down), 10).is_empty());
        reader.update(RELEASED, 20);
        assert_eq!(reader.update(only(Direction::Down), 60).len(), 1);
    }

    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    #[test]
    fn test_poll_reads_pins() {
        let mut pins = [
            MockPin { high: true },
            MockPin { high: true },
            MockPin { high: true },
            MockPin { high: true },
        ];
        let mut reader = ButtonReader::new();
        assert!(reader.poll(&mut pins, 0).is_empty());

        pins[3].high = false;
        let presses = reader.poll(&mut pins, 10);
        assert_eq!(presses.as_slice(), &[Direction::Right]);
    }
}
