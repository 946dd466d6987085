//! Position evaluation.
//!
//! Scores a board position from a given player's perspective, blending a
//! static positional weight table with a game-progression signal.

pub(crate) mod heuristic;
pub mod weights;

pub use heuristic::{positional_signal, progression_signal, utility, EvalError, Evaluator};
pub use weights::{Tier, WeightTable};
