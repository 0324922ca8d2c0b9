//! deckdiff - slide-deck diff staging for pull requests
//!
//! Given a pull request that modifies a `.pptx` file, deckdiff fetches the
//! file's pre-change and post-change versions from the GitHub API, stages
//! them in a per-run temporary directory, and publishes a branch/commit/PR
//! pair in a destination repository for visual-diff review.
//!
//! The pipeline is strictly sequential: configuration → host handles →
//! extraction → staging → publishing. Any error aborts the run; remote
//! objects already created are left in place.

pub mod config;
pub mod error;
pub mod extract;
pub mod host;
pub mod publish;
pub mod stage;
pub mod types;
