//! Round engine
//!
//! A game is a sequence of rounds. Each round shows one target direction and
//! ends in exactly one verdict. The engine is explicit, finite and
//! deterministic: every transition is a function of the current phase, the
//! time passed in, and at most one input direction.

pub mod machine;
pub mod round;

pub use machine::{Game, Outcome, Phase};
pub use round::{Response, RoundState, RoundStatus};
