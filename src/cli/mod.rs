//! CLI commands
//!
//! Command implementation for the `deckdiff` binary.

mod run;

pub use run::run;
