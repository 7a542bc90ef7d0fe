//! Search and planning.
//!
//! Alpha-beta minimax with killer-move ordering.

pub mod minimax;
pub mod ordering;

pub use minimax::{SearchEngine, SearchResult, SearchStats};
pub use ordering::{KillerMove, KillerTable, OrderingWeights};
