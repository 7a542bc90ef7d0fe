//! Text protocol.
//!
//! The one-line board notation used by the command-line binary and tests.

pub mod notation;

pub use notation::{format_position, parse_position, NotationError};
