//! Main loop
//!
//! One tick: drain inputs, feed them to the round engine in arrival order,
//! advance the engine's clock, render, then sleep for the rest of the tick.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::Rng;
use reflex_core::config::GameConfig;
use reflex_core::state::{Game, Outcome};
use reflex_core::Direction;
use tracing::{debug, info};

use crate::error::InputError;
use crate::input::{EventSource, InputAggregator};
use crate::presenter::{Messages, Presenter};

/// Monotonic milliseconds since the game started
#[derive(Debug, Clone, Copy)]
pub struct GameClock {
    start: Instant,
}

impl GameClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis().min(u32::MAX as u128) as u32
    }
}

/// Uniformly random round target
pub fn pick_target<R: Rng>(rng: &mut R) -> Direction {
    Direction::from_index(rng.gen_range(0..Direction::ALL.len()))
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Player pressed quit
    Quit { score: u32 },
    /// No lives left
    GameOver { score: u32 },
}

impl Exit {
    pub fn score(&self) -> u32 {
        match *self {
            Exit::Quit { score } | Exit::GameOver { score } => score,
        }
    }
}

/// Round engine wired to its inputs
pub struct App<S, K, R> {
    game: Game,
    inputs: InputAggregator<S, K>,
    messages: Messages,
    rng: R,
    redraw: bool,
}

impl<S: EventSource, K: EventSource, R: Rng> App<S, K, R> {
    pub fn new(config: GameConfig, inputs: InputAggregator<S, K>, rng: R, now_ms: u32) -> Self {
        let messages = Messages {
            serial_connected: inputs.has_serial(),
            ..Messages::default()
        };
        Self {
            game: Game::new(config, now_ms),
            inputs,
            messages,
            rng,
            redraw: false,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Surface an error on the presenter's error line
    pub fn report_error(&mut self, error: impl ToString) {
        self.messages.report_error(error);
    }

    /// Run one tick of game logic at `now_ms`
    ///
    /// Returns `Some` when the loop should stop. Only a keyboard failure is
    /// an error; serial failures end up on the error line.
    pub fn step(&mut self, now_ms: u32) -> Result<Option<Exit>, InputError> {
        let polled = self.inputs.poll(now_ms)?;

        if let Some(notice) = polled.notice {
            self.messages.report_error(notice);
            self.messages.serial_connected = self.inputs.has_serial();
        }
        self.redraw |= polled.redraw;

        if polled.quit {
            return Ok(Some(Exit::Quit {
                score: self.game.score(),
            }));
        }

        for event in polled.events {
            match self.game.handle_input(event.direction, event.at_ms) {
                Some(outcome) => self.record(outcome),
                None => debug!(
                    "Ignored {} from {:?} at {} ms",
                    event.direction, event.source, event.at_ms
                ),
            }
        }

        let rng = &mut self.rng;
        if let Some(outcome) = self.game.tick(now_ms, || pick_target(rng)) {
            self.record(outcome);
            if let Outcome::GameOver { score } = outcome {
                return Ok(Some(Exit::GameOver { score }));
            }
        }

        Ok(None)
    }

    fn record(&mut self, outcome: Outcome) {
        self.messages.record(&outcome, &self.game);
        info!(
            "{} (score {}, lives {})",
            self.messages.info,
            self.game.score(),
            self.game.lives()
        );
    }

    /// Tick until quit or game over
    pub fn run<W: Write>(
        &mut self,
        presenter: &mut Presenter<W>,
        clock: &GameClock,
        tick: Duration,
    ) -> Result<Exit> {
        info!("Game started, tick {:?}", tick);

        loop {
            let tick_start = Instant::now();
            let now_ms = clock.now_ms();

            let exit = self.step(now_ms).context("Input failure")?;

            if std::mem::take(&mut self.redraw) {
                presenter.invalidate();
            }
            presenter
                .render(&self.game, &self.messages, now_ms)
                .context("Failed to draw the game")?;

            if let Some(exit) = exit {
                info!("Stopping: {:?}", exit);
                return Ok(exit);
            }

            let elapsed = tick_start.elapsed();
            if elapsed < tick {
                thread::sleep(tick - elapsed);
            }
        }
    }
}
