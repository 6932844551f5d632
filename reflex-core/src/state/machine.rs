//! Game state machine
//!
//! ```text
//! AwaitingRound ──tick──▶ Pending ──input/deadline──▶ Resolved
//!       ▲                                               │
//!       └──────────── pause elapsed, lives > 0 ─────────┤
//!                                                       ▼
//!                              pause elapsed, lives == 0: GameOver
//! ```

use reflex_protocol::Direction;

use super::round::{RoundState, RoundStatus};
use crate::config::GameConfig;

/// Game phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Between rounds; the next one starts at `resume_at_ms`
    AwaitingRound { resume_at_ms: u32 },
    /// Round active, waiting for input or the deadline
    Pending,
    /// Verdict shown until `until_ms`
    Resolved { until_ms: u32 },
    /// No lives left; input is no longer processed
    GameOver,
}

/// Result of a state machine step, for logging and the presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// A new round started with this target
    RoundStarted(Direction),
    /// The active round got a verdict
    Resolved(RoundStatus),
    /// Last life lost and the verdict pause is over
    GameOver { score: u32 },
}

/// Score, lives and the current round
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    phase: Phase,
    round: Option<RoundState>,
    score: u32,
    lives: u8,
    rounds_played: u32,
}

impl Game {
    /// Create a game whose first round starts on the first tick at or
    /// after `now_ms`
    pub fn new(config: GameConfig, now_ms: u32) -> Self {
        Self {
            config,
            phase: Phase::AwaitingRound {
                resume_at_ms: now_ms,
            },
            round: None,
            score: 0,
            lives: config.lives.max(1),
            rounds_played: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Current round, or the last resolved one while its verdict is shown
    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    /// Target the player should press right now
    pub fn active_target(&self) -> Option<Direction> {
        match self.phase {
            Phase::Pending => self.round.map(|r| r.target),
            _ => None,
        }
    }

    /// Time left in the active round
    pub fn remaining_ms(&self, now_ms: u32) -> Option<u32> {
        match self.phase {
            Phase::Pending => self.round.map(|r| r.remaining_ms(now_ms)),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    /// Advance time
    ///
    /// Starts rounds, times them out and ends verdict pauses. `pick` is
    /// called once per new round to choose its target.
    pub fn tick<F>(&mut self, now_ms: u32, pick: F) -> Option<Outcome>
    where
        F: FnOnce() -> Direction,
    {
        if let Phase::Resolved { until_ms } = self.phase {
            if now_ms < until_ms {
                return None;
            }
            if self.lives == 0 {
                self.phase = Phase::GameOver;
                return Some(Outcome::GameOver { score: self.score });
            }
            self.phase = Phase::AwaitingRound {
                resume_at_ms: now_ms,
            };
        }

        match self.phase {
            Phase::AwaitingRound { resume_at_ms } if now_ms >= resume_at_ms => {
                let target = pick();
                self.rounds_played += 1;
                self.round = Some(RoundState::new(
                    self.rounds_played,
                    target,
                    now_ms,
                    self.config.reaction_ms,
                ));
                self.phase = Phase::Pending;
                Some(Outcome::RoundStarted(target))
            }
            Phase::Pending => {
                let status = self.round.as_mut()?.expire(now_ms)?;
                Some(self.resolve(status, now_ms))
            }
            _ => None,
        }
    }

    /// Apply a direction input
    ///
    /// Ignored unless a round is pending, so repeated or stray inputs after
    /// a verdict have no effect.
    pub fn handle_input(&mut self, direction: Direction, now_ms: u32) -> Option<Outcome> {
        if self.phase != Phase::Pending {
            return None;
        }
        let status = self.round.as_mut()?.respond(direction, now_ms)?;
        Some(self.resolve(status, now_ms))
    }

    fn resolve(&mut self, status: RoundStatus, now_ms: u32) -> Outcome {
        match status {
            RoundStatus::Hit => self.score = self.score.saturating_add(1),
            RoundStatus::Miss | RoundStatus::Timeout => {
                self.lives = self.lives.saturating_sub(1)
            }
            RoundStatus::Pending => {}
        }
        self.phase = Phase::Resolved {
            until_ms: now_ms.saturating_add(self.config.pause_ms),
        };
        Outcome::Resolved(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig::default()
            .with_reaction_ms(2000)
            .with_pause_ms(500)
    }

    fn started(target: Direction) -> Game {
        let mut game = Game::new(config(), 0);
        assert_eq!(game.tick(0, || target), Some(Outcome::RoundStarted(target)));
        game
    }

    #[test]
    fn test_first_round_starts_on_first_tick() {
        let mut game = Game::new(config(), 100);
        assert_eq!(game.tick(50, || Direction::Up), None);
        assert_eq!(
            game.tick(100, || Direction::Up),
            Some(Outcome::RoundStarted(Direction::Up))
        );
        assert_eq!(game.phase(), Phase::Pending);
        assert_eq!(game.round().map(|r| r.number), Some(1));
    }

    #[test]
    fn test_hit_scenario() {
        let mut game = started(Direction::Up);
        let outcome = game.handle_input(Direction::Up, 500);
        assert_eq!(outcome, Some(Outcome::Resolved(RoundStatus::Hit)));
        assert_eq!(game.score(), 1);
        assert_eq!(game.lives(), 3);
    }

    #[test]
    fn test_miss_scenario() {
        let mut game = started(Direction::Left);
        let outcome = game.handle_input(Direction::Right, 200);
        assert_eq!(outcome, Some(Outcome::Resolved(RoundStatus::Miss)));
        assert_eq!(game.score(), 0);
        assert_eq!(game.lives(), 2);
    }

    #[test]
    fn test_timeout_scenario() {
        let mut game = started(Direction::Down);
        // Deadline instant is still on time
        assert_eq!(game.tick(2000, || Direction::Up), None);
        assert_eq!(game.phase(), Phase::Pending);

        let outcome = game.tick(2020, || Direction::Up);
        assert_eq!(outcome, Some(Outcome::Resolved(RoundStatus::Timeout)));
        assert_eq!(game.lives(), 2);
        assert_eq!(game.round().map(|r| r.status), Some(RoundStatus::Timeout));
    }

    #[test]
    fn test_late_input_before_timeout_tick_misses() {
        let mut game = started(Direction::Down);
        let outcome = game.handle_input(Direction::Down, 2010);
        assert_eq!(outcome, Some(Outcome::Resolved(RoundStatus::Miss)));
        assert!(game.round().is_some_and(|r| r.was_late()));
        assert_eq!(game.lives(), 2);
    }

    #[test]
    fn test_inputs_after_verdict_are_ignored() {
        let mut game = started(Direction::Up);
        game.handle_input(Direction::Left, 100);
        let lives = game.lives();

        for t in [150, 200, 250] {
            assert_eq!(game.handle_input(Direction::Left, t), None);
            assert_eq!(game.handle_input(Direction::Up, t), None);
        }
        assert_eq!(game.lives(), lives);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_pause_then_next_round() {
        let mut game = started(Direction::Up);
        game.handle_input(Direction::Up, 300);
        assert_eq!(game.phase(), Phase::Resolved { until_ms: 800 });
        assert_eq!(game.active_target(), None);

        assert_eq!(game.tick(799, || Direction::Left), None);
        assert_eq!(
            game.tick(800, || Direction::Left),
            Some(Outcome::RoundStarted(Direction::Left))
        );
        let round = game.round().copied();
        assert_eq!(round.map(|r| r.number), Some(2));
        assert_eq!(round.map(|r| r.deadline_ms), Some(2800));
    }

    #[test]
    fn test_game_over_after_last_life() {
        let mut game = Game::new(config().with_lives(1), 0);
        game.tick(0, || Direction::Right);
        game.handle_input(Direction::Up, 100);
        assert_eq!(game.lives(), 0);
        // Verdict still shown during the pause
        assert!(!game.is_over());

        assert_eq!(game.tick(600, || Direction::Up), Some(Outcome::GameOver { score: 0 }));
        assert!(game.is_over());

        // No further rounds or input processing
        assert_eq!(game.tick(10_000, || Direction::Up), None);
        assert_eq!(game.handle_input(Direction::Up, 10_000), None);
        assert_eq!(game.rounds_played(), 1);
    }

    #[test]
    fn test_remaining_only_while_pending() {
        let mut game = started(Direction::Up);
        assert_eq!(game.remaining_ms(500), Some(1500));
        game.handle_input(Direction::Up, 600);
        assert_eq!(game.remaining_ms(700), None);
    }

    #[test]
    fn test_zero_lives_config_is_clamped() {
        let game = Game::new(config().with_lives(0), 0);
        assert_eq!(game.lives(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy)]
    enum Play {
        Hit,
        Miss,
        Timeout,
    }

    fn play() -> impl Strategy<Value = Play> {
        prop_oneof![Just(Play::Hit), Just(Play::Miss), Just(Play::Timeout)]
    }

    proptest! {
        #[test]
        fn test_game_over_after_exactly_three_failures(
            plays in proptest::collection::vec(play(), 1..60),
            target in 0usize..4,
        ) {
            let config = GameConfig::default().with_reaction_ms(1000).with_pause_ms(100);
            let target = Direction::from_index(target);
            let wrong = Direction::from_index(target.index() + 1);

            let mut game = Game::new(config, 0);
            let mut now = 0u32;
            let mut failures = 0u8;
            let mut hits = 0u32;

            prop_assert_eq!(game.tick(now, || target), Some(Outcome::RoundStarted(target)));

            for play in plays.iter().copied() {
                let lives_before = game.lives();

                let outcome = match play {
                    Play::Hit => {
                        now += 10;
                        game.handle_input(target, now)
                    }
                    Play::Miss => {
                        now += 10;
                        game.handle_input(wrong, now)
                    }
                    Play::Timeout => {
                        now += 1001;
                        game.tick(now, || target)
                    }
                };

                let status = match outcome {
                    Some(Outcome::Resolved(status)) => status,
                    _ => return Err(TestCaseError::fail("round did not resolve")),
                };
                prop_assert!(status.is_terminal());

                if status.costs_life() {
                    failures += 1;
                    prop_assert_eq!(game.lives(), lives_before - 1);
                } else {
                    hits += 1;
                    prop_assert_eq!(game.lives(), lives_before);
                }

                // Repeated input after the verdict changes nothing
                prop_assert_eq!(game.handle_input(wrong, now), None);
                prop_assert_eq!(game.handle_input(target, now), None);

                now += 100;
                let next = game.tick(now, || target);
                if failures == 3 {
                    prop_assert_eq!(next, Some(Outcome::GameOver { score: hits }));
                    break;
                }
                prop_assert_eq!(next, Some(Outcome::RoundStarted(target)));
            }

            prop_assert_eq!(game.is_over(), failures == 3);
            prop_assert_eq!(game.score(), hits);
            prop_assert_eq!(u32::from(game.lives()), 3 - u32::from(failures));
        }
    }
}
