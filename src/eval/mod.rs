//! Position evaluation.
//!
//! Scores a board from the Boss's perspective with a weighted,
//! multi-component heuristic. Weights are injected, never hard-coded.

pub mod heuristic;
pub mod weights;

pub use heuristic::{unit_value, EvalBreakdown, Evaluator};
pub use weights::EvalWeights;
