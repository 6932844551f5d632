//! Configuration type definitions

/// Lives at the start of a game
pub const DEFAULT_LIVES: u8 = 3;

/// Reaction window per round (ms)
pub const DEFAULT_REACTION_MS: u32 = 1500;

/// Pause after a verdict before the next round (ms)
pub const DEFAULT_PAUSE_MS: u32 = 750;

/// Round engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameConfig {
    /// Starting lives (at least 1)
    pub lives: u8,
    /// Time allowed to press the target direction
    pub reaction_ms: u32,
    /// How long a verdict stays on screen
    pub pause_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lives: DEFAULT_LIVES,
            reaction_ms: DEFAULT_REACTION_MS,
            pause_ms: DEFAULT_PAUSE_MS,
        }
    }
}

impl GameConfig {
    /// Set the reaction window
    pub fn with_reaction_ms(mut self, reaction_ms: u32) -> Self {
        self.reaction_ms = reaction_ms;
        self
    }

    /// Set the verdict pause
    pub fn with_pause_ms(mut self, pause_ms: u32) -> Self {
        self.pause_ms = pause_ms;
        self
    }

    /// Set the starting lives
    pub fn with_lives(mut self, lives: u8) -> Self {
        self.lives = lives;
        self
    }
}
