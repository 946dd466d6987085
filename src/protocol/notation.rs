//! Board and move notation.
//!
//! A board is written row by row from row 0 downwards, rows separated by
//! `/`. Within a row `b` is a Black token, `w` a White token and a decimal
//! number a run of empty cells. A space and the side to move (`b` or `w`)
//! follow the rows:
//!
//! ```text
//! 8/8/8/3wb3/3bw3/8/8/8 b
//! ```
//!
//! Moves use a column letter and a 1-based row number (`c4` is column 2,
//! row 3). A pass is written `pass`.

use crate::board::{Board, BoardError, GameState, Player, Position, MAX_SIZE};

/// Errors that can occur while parsing notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("expected '<rows> <side>', got '{0}'")]
    MissingSide(String),

    #[error("invalid side to move: '{0}'")]
    InvalidSide(String),

    #[error("invalid character '{0}' in board notation")]
    InvalidChar(char),

    #[error("row {row} has {len} cells, expected {size}")]
    RowLength { row: usize, len: usize, size: usize },

    #[error("expected {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },

    #[error("invalid move notation: '{0}'")]
    InvalidMove(String),

    #[error("move '{mv}' is off the {size}x{size} board")]
    MoveOffBoard { mv: String, size: usize },

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Parses `<rows> <side>` into a game state.
///
/// The board size is the number of rows; every row must describe exactly
/// that many cells.
pub fn parse_board(s: &str) -> Result<GameState, NotationError> {
    let mut parts = s.split_whitespace();
    let (rows, side) = match (parts.next(), parts.next(), parts.next()) {
        (Some(rows), Some(side), None) => (rows, side),
        _ => return Err(NotationError::MissingSide(s.trim().to_string())),
    };

    let to_move = match side {
        "b" => Player::Black,
        "w" => Player::White,
        other => return Err(NotationError::InvalidSide(other.to_string())),
    };

    let rows: Vec<&str> = rows.split('/').collect();
    let size = rows.len();
    let mut board = Board::empty(size)?;

    for (row, text) in rows.iter().enumerate() {
        let mut col = 0usize;
        let mut run = 0usize;
        for c in text.chars() {
            if let Some(d) = c.to_digit(10) {
                run = run * 10 + d as usize;
                if run > MAX_SIZE {
                    return Err(NotationError::RowLength {
                        row,
                        len: col + run,
                        size,
                    });
                }
                continue;
            }
            col += run;
            run = 0;
            let player = Player::from_notation_char(c).ok_or(NotationError::InvalidChar(c))?;
            if col >= size {
                return Err(NotationError::RowLength {
                    row,
                    len: col + 1,
                    size,
                });
            }
            board.set(Position::new(col as u8, row as u8), Some(player));
            col += 1;
        }
        col += run;
        if col != size {
            return Err(NotationError::RowLength { row, len: col, size });
        }
    }

    Ok(GameState::new(board, to_move))
}

/// Encodes a game state as `<rows> <side>`.
pub fn encode_board(state: &GameState) -> String {
    let size = state.size();
    let mut out = String::with_capacity(size * size + 4);

    for row in 0..size {
        if row > 0 {
            out.push('/');
        }
        let mut empty = 0usize;
        for col in 0..size {
            match state.board.get(Position::new(col as u8, row as u8)) {
                Some(p) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(p.notation_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
    }

    out.push(' ');
    out.push(state.to_move.notation_char());
    out
}

/// Parses a move such as `c4`, or `pass` for no move.
pub fn parse_move(s: &str, size: usize) -> Result<Option<Position>, NotationError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("pass") {
        return Ok(None);
    }

    let invalid = || NotationError::InvalidMove(s.to_string());
    let mut chars = s.chars();
    let letter = chars.next().ok_or_else(invalid)?.to_ascii_lowercase();
    if !letter.is_ascii_lowercase() {
        return Err(invalid());
    }
    let col = (letter as u8 - b'a') as usize;
    let row: usize = chars.as_str().parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }
    let row = row - 1;

    if col >= size || row >= size {
        return Err(NotationError::MoveOffBoard {
            mv: s.to_string(),
            size,
        });
    }
    Ok(Some(Position::new(col as u8, row as u8)))
}

/// Formats a single position, e.g. `c4`.
pub fn format_position(pos: Position) -> String {
    format!("{}{}", (b'a' + pos.col) as char, pos.row as usize + 1)
}

/// Formats a move, writing `pass` for no move.
pub fn format_move(mv: Option<Position>) -> String {
    match mv {
        Some(pos) => format_position(pos),
        None => "pass".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::apply_move;

    const START: &str = "8/8/8/3wb3/3bw3/8/8/8 b";

    #[test]
    fn encode_start_position() {
        let state = GameState::start(8).unwrap();
        assert_eq!(encode_board(&state), START);
    }

    #[test]
    fn parse_start_position() {
        let state = parse_board(START).unwrap();
        assert_eq!(state, GameState::start(8).unwrap());
    }

    #[test]
    fn roundtrip_after_moves() {
        let mut state = GameState::start(6).unwrap();
        state = apply_move(&state, Position::new(2, 1));
        state = apply_move(&state, Position::new(1, 1));
        let encoded = encode_board(&state);
        assert_eq!(parse_board(&encoded).unwrap(), state);
        assert!(encoded.ends_with(" b"));
    }

    #[test]
    fn parse_full_row_and_multi_digit_runs() {
        let s = "bbbbbbbbbb/10/10/10/10/10/10/10/10/wwwww5 w";
        let state = parse_board(s).unwrap();
        assert_eq!(state.size(), 10);
        assert_eq!(state.token_counts(), (10, 5));
        assert_eq!(state.to_move, Player::White);
        assert_eq!(encode_board(&state), s);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            parse_board("8/8/8/3wb3/3bw3/8/8/8"),
            Err(NotationError::MissingSide("8/8/8/3wb3/3bw3/8/8/8".to_string()))
        );
        assert_eq!(
            parse_board("8/8/8/3wb3/3bw3/8/8/8 x"),
            Err(NotationError::InvalidSide("x".to_string()))
        );
        assert_eq!(
            parse_board("8/8/8/3wq3/3bw3/8/8/8 b"),
            Err(NotationError::InvalidChar('q'))
        );
        assert_eq!(
            parse_board("8/8/8/3wb4/3bw3/8/8/8 b"),
            Err(NotationError::RowLength {
                row: 3,
                len: 9,
                size: 8
            })
        );
        assert_eq!(
            parse_board("7/7/7/7/7/7/7 b"),
            Err(NotationError::Board(BoardError::InvalidSize(7)))
        );
    }

    #[test]
    fn parse_and_format_moves() {
        assert_eq!(parse_move("c4", 8), Ok(Some(Position::new(2, 3))));
        assert_eq!(parse_move("H8", 8), Ok(Some(Position::new(7, 7))));
        assert_eq!(parse_move("pass", 8), Ok(None));
        assert_eq!(parse_move("z26", 26), Ok(Some(Position::new(25, 25))));
        assert!(matches!(
            parse_move("i1", 8),
            Err(NotationError::MoveOffBoard { .. })
        ));
        assert!(matches!(parse_move("a0", 8), Err(NotationError::InvalidMove(_))));
        assert!(matches!(parse_move("4c", 8), Err(NotationError::InvalidMove(_))));
        assert!(matches!(parse_move("", 8), Err(NotationError::InvalidMove(_))));

        assert_eq!(format_move(Some(Position::new(2, 3))), "c4");
        assert_eq!(format_move(None), "pass");
        assert_eq!(format_position(Position::new(25, 0)), "z1");
    }
}
