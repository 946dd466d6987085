//! Board representation and game-state types.
//!
//! Contains the players, board coordinates, the cell grid and the overall
//! game state handed to strategies.

pub mod player;
pub mod position;
pub mod state;

pub use player::Player;
pub use position::Position;
pub use state::{Board, BoardError, GameState, MAX_SIZE, MIN_SIZE, STANDARD_SIZE};
