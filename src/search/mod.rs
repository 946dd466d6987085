//! Search and planning.
//!
//! Explores the game tree from the current position to find the move that
//! holds up best against a minimizing opponent.

pub mod alphabeta;

pub use alphabeta::{SearchConfig, SearchResult, SearchStats, Searcher, MAX_DEPTH};
