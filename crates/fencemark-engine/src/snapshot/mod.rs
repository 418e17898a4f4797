//! # Snapshot Testing Support
//!
//! Helpers shared by the unit tests, the integration tests and the CLI's
//! `check` command.
//!
//! - **`invariants`**: panicking checks that a tree tiles the code, that
//!   lines cover every offset once and that rendered lines are consistent
//! - **`outline`**: a stable one-row-per-line text form of a rendered block,
//!   used with `insta` inline snapshots

pub mod invariants;
pub mod outline;

pub use invariants::{check_lines, check_rendered, check_tree};
pub use outline::outline;
