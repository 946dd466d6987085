//! OTP protocol handling.
//!
//! Parsing and serialization for the line-based Othello text protocol:
//! board and move notation plus the command parser for the main loop.

pub mod notation;
pub mod parser;

pub use notation::{
    encode_board, format_move, format_position, parse_board, parse_move, NotationError,
};
pub use parser::{parse_command, Command, GoParams, PositionSpec};
