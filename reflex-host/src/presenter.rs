//! Terminal presenter
//!
//! Read-only view of the game. Each tick the screen is composed into a list
//! of positioned lines (pure, testable) and then drawn with crossterm.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use reflex_core::state::{Game, Outcome, RoundStatus};

const TITLE: &str = "Reflex Reaction Game";
const HELP: &str =
    "Controls: 4 buttons (UP/DOWN/LEFT/RIGHT) or arrow keys. Press 'q' to quit.";

/// Width of the countdown bar in cells
const BAR_WIDTH: u32 = 20;

/// Text attributes used by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    Bold,
    Standout,
}

/// One positioned line of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub row: u16,
    pub col: u16,
    pub text: String,
    pub emphasis: Emphasis,
}

/// Message lines shown under the prompt
#[derive(Debug, Clone, Default)]
pub struct Messages {
    /// Last round event ("Nice! UP was correct.")
    pub info: String,
    /// Last input failure
    pub error: Option<String>,
    /// Whether button presses can still arrive over serial
    pub serial_connected: bool,
}

impl Messages {
    /// Update the info line for a state machine outcome
    pub fn record(&mut self, outcome: &Outcome, game: &Game) {
        self.info = describe(outcome, game);
    }

    /// Show an input failure on the error line
    pub fn report_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
    }
}

/// Player-facing text for an outcome
pub fn describe(outcome: &Outcome, game: &Game) -> String {
    let round = game.round();
    let target = round.map(|r| r.target.to_string()).unwrap_or_default();
    let pressed = round
        .and_then(|r| r.response)
        .map(|r| r.direction.to_string())
        .unwrap_or_default();

    match outcome {
        Outcome::RoundStarted(target) => {
            format!("Round {}! Press {}!", game.rounds_played(), target)
        }
        Outcome::Resolved(RoundStatus::Hit) => format!("Nice! {} was correct.", pressed),
        Outcome::Resolved(RoundStatus::Miss) if round.is_some_and(|r| r.was_late()) => {
            format!("Too late! You pressed {}, but the timer ran out.", pressed)
        }
        Outcome::Resolved(RoundStatus::Miss) => {
            format!("Oops! You pressed {}, it was {}.", pressed, target)
        }
        Outcome::Resolved(RoundStatus::Timeout) => format!("Too slow! It was {}.", target),
        Outcome::Resolved(RoundStatus::Pending) => String::new(),
        Outcome::GameOver { score } => format!("Game over! Final score: {}.", score),
    }
}

/// Column that centres `text` in `width`
fn centred(text: &str, width: u16) -> u16 {
    let len = text.chars().count() as u16;
    width.saturating_sub(len) / 2
}

/// Truncate to at most `width` characters
fn clip(text: &str, width: u16) -> String {
    text.chars().take(width as usize).collect()
}

/// Countdown bar, e.g. `[##########----------] 0.8s`
pub fn countdown_bar(remaining_ms: u32, window_ms: u32) -> String {
    let filled = if window_ms == 0 {
        0
    } else {
        (remaining_ms.min(window_ms) * BAR_WIDTH).div_ceil(window_ms)
    };
    let mut bar = String::with_capacity(BAR_WIDTH as usize + 8);
    bar.push('[');
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '#' } else { '-' });
    }
    bar.push(']');
    bar.push_str(&format!(" {:.1}s", remaining_ms as f32 / 1000.0));
    bar
}

/// Compose the screen for a `width` x `height` terminal
pub fn compose(
    game: &Game,
    messages: &Messages,
    now_ms: u32,
    (width, height): (u16, u16),
) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut centre = |row: u16, text: String, emphasis: Emphasis| {
        let text = clip(&text, width);
        lines.push(Line {
            row,
            col: centred(&text, width),
            text,
            emphasis,
        });
    };

    let mid = height / 2;

    centre(1, TITLE.to_string(), Emphasis::Bold);

    let mode = if messages.serial_connected {
        "buttons + keys"
    } else {
        "keys only"
    };
    centre(
        3,
        format!(
            "Score: {}   Lives: {}   Reaction window: {:.1}s   Input: {}",
            game.score(),
            game.lives(),
            game.config().reaction_ms as f32 / 1000.0,
            mode
        ),
        Emphasis::Normal,
    );

    let prompt = match game.active_target() {
        Some(target) => format!("{0}  >>> {1} <<<  {0}", target.arrow(), target),
        None if game.is_over() => "GAME OVER".to_string(),
        None => "Get ready...".to_string(),
    };
    centre(mid, prompt, Emphasis::Standout);

    if let Some(remaining) = game.remaining_ms(now_ms) {
        centre(
            mid + 2,
            countdown_bar(remaining, game.config().reaction_ms),
            Emphasis::Normal,
        );
    } else if game.is_over() {
        centre(
            mid + 2,
            format!("Game over! Final score: {}", game.score()),
            Emphasis::Bold,
        );
    }

    let mut left = |row: u16, text: &str| {
        lines.push(Line {
            row,
            col: 2,
            text: clip(text, width.saturating_sub(4)),
            emphasis: Emphasis::Normal,
        });
    };

    if !messages.info.is_empty() {
        left(height.saturating_sub(4), &messages.info);
    }
    if let Some(error) = &messages.error {
        left(height.saturating_sub(3), &format!("Error: {}", error));
    }

    let help = clip(HELP, width.saturating_sub(2));
    lines.push(Line {
        row: height.saturating_sub(2),
        col: centred(&help, width),
        text: help,
        emphasis: Emphasis::Normal,
    });

    lines.retain(|line| line.row < height);
    lines
}

/// Draws composed frames, only touching rows that changed
pub struct Presenter<W: Write> {
    out: W,
    last_frame: Vec<Line>,
    full_redraw: bool,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_frame: Vec::new(),
            full_redraw: true,
        }
    }

    /// Clear the whole screen on the next draw (after a resize)
    pub fn invalidate(&mut self) {
        self.full_redraw = true;
    }

    /// Draw a composed frame
    pub fn draw(&mut self, frame: Vec<Line>) -> io::Result<()> {
        if self.full_redraw {
            queue!(self.out, Clear(ClearType::All))?;
            self.last_frame.clear();
            self.full_redraw = false;
        }

        if frame == self.last_frame {
            return Ok(());
        }

        // Blank rows that were drawn last time
        for line in &self.last_frame {
            queue!(self.out, MoveTo(0, line.row), Clear(ClearType::CurrentLine))?;
        }

        for line in &frame {
            if !self.last_frame.iter().any(|l| l.row == line.row) {
                queue!(self.out, MoveTo(0, line.row), Clear(ClearType::CurrentLine))?;
            }
            queue!(self.out, MoveTo(line.col, line.row))?;
            match line.emphasis {
                Emphasis::Normal => {}
                Emphasis::Bold => queue!(self.out, SetAttribute(Attribute::Bold))?,
                Emphasis::Standout => queue!(self.out, SetAttribute(Attribute::Reverse))?,
            }
            queue!(self.out, Print(&line.text), SetAttribute(Attribute::Reset))?;
        }

        self.out.flush()?;
        self.last_frame = frame;
        Ok(())
    }

    /// Compose and draw the current game state
    pub fn render(&mut self, game: &Game, messages: &Messages, now_ms: u32) -> io::Result<()> {
        let size = terminal::size()?;
        self.draw(compose(game, messages, now_ms, size))
    }
}

/// Raw mode + alternate screen + hidden cursor for as long as it lives
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Undo everything [`TerminalGuard::enter`] did, ignoring errors
///
/// Also called from the panic hook, since release builds abort on panic and
/// never run the guard's destructor.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    let _ = terminal::disable_raw_mode();
}
