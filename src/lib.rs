//! Tactician engine library.
//!
//! The Boss side of a chess-like tactical card game: board snapshots, the
//! movement resolver, move resolution, static evaluation, alpha-beta search,
//! and the card target selectors that tie them to a live game.

pub mod board;
pub mod builder;
pub mod config;
pub mod engine;
pub mod eval;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod search;
pub mod select;
pub mod table;
