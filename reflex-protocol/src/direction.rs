//! Direction tokens sent by the button controller

/// One of the four game directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

// Wire format tokens
const TOKEN_UP: &str = "UP";
const TOKEN_DOWN: &str = "DOWN";
const TOKEN_LEFT: &str = "LEFT";
const TOKEN_RIGHT: &str = "RIGHT";

impl Direction {
    /// All directions, in button scan order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Map an index onto a direction (wraps modulo 4)
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Position of this direction in [`Direction::ALL`]
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Parse a token, ignoring surrounding whitespace and ASCII case
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_token().eq_ignore_ascii_case(token))
    }

    /// Wire token (no terminator)
    pub fn as_token(self) -> &'static str {
        match self {
            Direction::Up => TOKEN_UP,
            Direction::Down => TOKEN_DOWN,
            Direction::Left => TOKEN_LEFT,
            Direction::Right => TOKEN_RIGHT,
        }
    }

    /// Complete wire line including the terminator
    pub fn to_line(self) -> &'static [u8] {
        match self {
            Direction::Up => b"UP\n",
            Direction::Down => b"DOWN\n",
            Direction::Left => b"LEFT\n",
            Direction::Right => b"RIGHT\n",
        }
    }

    /// Unicode arrow for on-screen prompts
    pub fn arrow(self) -> char {
        match self {
            Direction::Up => '↑',
            Direction::Down => '↓',
            Direction::Left => '←',
            Direction::Right => '→',
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_token())
    }
}
