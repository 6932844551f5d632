//! Single round state

use reflex_protocol::Direction;

/// Round verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RoundStatus {
    /// Waiting for input
    Pending,
    /// Target direction pressed in time
    Hit,
    /// Wrong direction, or any direction after the deadline
    Miss,
    /// Nothing pressed before the deadline
    Timeout,
}

impl RoundStatus {
    /// Check if the round has a verdict
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RoundStatus::Pending)
    }

    /// Check if this verdict costs a life
    pub fn costs_life(&self) -> bool {
        matches!(self, RoundStatus::Miss | RoundStatus::Timeout)
    }
}

/// The input that decided a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    pub direction: Direction,
    pub at_ms: u32,
}

/// One prompt-and-response cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RoundState {
    /// 1-based round counter
    pub number: u32,
    /// Direction the player must press
    pub target: Direction,
    /// When the prompt appeared
    pub started_ms: u32,
    /// Last instant an input still counts as on time (inclusive)
    pub deadline_ms: u32,
    /// Current verdict
    pub status: RoundStatus,
    /// Input that resolved the round, if any
    pub response: Option<Response>,
}

impl RoundState {
    /// Start a round at `now_ms` with a `window_ms` reaction window
    pub fn new(number: u32, target: Direction, now_ms: u32, window_ms: u32) -> Self {
        Self {
            number,
            target,
            started_ms: now_ms,
            deadline_ms: now_ms.saturating_add(window_ms),
            status: RoundStatus::Pending,
            response: None,
        }
    }

    /// Check if the round has a verdict
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Time left before the deadline (0 once it has passed)
    pub fn remaining_ms(&self, now_ms: u32) -> u32 {
        self.deadline_ms.saturating_sub(now_ms)
    }

    /// Check if an input at `at_ms` counts as on time
    ///
    /// The deadline instant itself is on time.
    pub fn is_on_time(&self, at_ms: u32) -> bool {
        at_ms <= self.deadline_ms
    }

    /// Check if the resolving input arrived after the deadline
    pub fn was_late(&self) -> bool {
        self.response.is_some_and(|r| !self.is_on_time(r.at_ms))
    }

    /// Apply a direction input
    ///
    /// Returns the new verdict, or `None` if the round already had one.
    pub fn respond(&mut self, direction: Direction, at_ms: u32) -> Option<RoundStatus> {
        if self.is_terminal() {
            return None;
        }

        self.status = if direction == self.target && self.is_on_time(at_ms) {
            RoundStatus::Hit
        } else {
            RoundStatus::Miss
        };
        self.response = Some(Response { direction, at_ms });
        Some(self.status)
    }

    /// Apply the passage of time
    ///
    /// Returns `Timeout` the first time `now_ms` is past the deadline while
    /// the round is still pending.
    pub fn expire(&mut self, now_ms: u32) -> Option<RoundStatus> {
        if self.is_terminal() || self.is_on_time(now_ms) {
            return None;
        }
        self.status = RoundStatus::Timeout;
        Some(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_input_hits() {
        let mut round = RoundState::new(1, Direction::Up, 0, 2000);
        assert_eq!(round.respond(Direction::Up, 500), Some(RoundStatus::Hit));
        assert!(round.is_terminal());
        assert!(!round.was_late());
    }

    #[test]
    fn test_wrong_input_misses() {
        let mut round = RoundState::new(1, Direction::Left, 0, 2000);
        assert_eq!(round.respond(Direction::Right, 200), Some(RoundStatus::Miss));
        assert_eq!(
            round.response,
            Some(Response {
                direction: Direction::Right,
                at_ms: 200
            })
        );
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let mut round = RoundState::new(1, Direction::Down, 1000, 2000);
        assert_eq!(round.expire(3000), None);
        assert_eq!(round.respond(Direction::Down, 3000), Some(RoundStatus::Hit));
    }

    #[test]
    fn test_late_correct_input_misses() {
        let mut round = RoundState::new(1, Direction::Down, 0, 2000);
        assert_eq!(round.respond(Direction::Down, 2001), Some(RoundStatus::Miss));
        assert!(round.was_late());
    }

    #[test]
    fn test_expire_after_deadline() {
        let mut round = RoundState::new(1, Direction::Down, 0, 2000);
        assert_eq!(round.expire(1999), None);
        assert_eq!(round.expire(2000), None);
        assert_eq!(round.expire(2001), Some(RoundStatus::Timeout));
        // Only once
        assert_eq!(round.expire(2500), None);
    }

    #[test]
    fn test_verdict_is_final() {
        let mut round = RoundState::new(1, Direction::Up, 0, 2000);
        round.respond(Direction::Left, 100);
        assert_eq!(round.respond(Direction::Up, 200), None);
        assert_eq!(round.expire(5000), None);
        assert_eq!(round.status, RoundStatus::Miss);
    }

    #[test]
    fn test_remaining_time() {
        let round = RoundState::new(1, Direction::Up, 100, 1500);
        assert_eq!(round.remaining_ms(100), 1500);
        assert_eq!(round.remaining_ms(1000), 600);
        assert_eq!(round.remaining_ms(5000), 0);
    }

    #[test]
    fn test_status_helpers() {
        assert!(!RoundStatus::Pending.is_terminal());
        assert!(RoundStatus::Hit.is_terminal());
        assert!(!RoundStatus::Hit.costs_life());
        assert!(RoundStatus::Miss.costs_life());
        assert!(RoundStatus::Timeout.costs_life());
    }
}
