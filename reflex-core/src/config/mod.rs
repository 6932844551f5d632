//! Game configuration
//!
//! There is no configuration file. The host builds a [`GameConfig`] from
//! command-line flags; anything not given falls back to the defaults here.

pub mod types;

pub use types::*;
