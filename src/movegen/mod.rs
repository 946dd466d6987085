//! Legal move generation.
//!
//! Implements the rules collaborator the search consumes: enumerating the
//! legal moves for the player to move and producing successor states. None
//! of these functions mutate their input state.

use rand::Rng;

use crate::board::{GameState, Player, Position};

/// The eight compass directions as `(dcol, drow)`.
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Errors raised when a driver applies a move it did not get from
/// [`legal_moves`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("({col}, {row}) is outside a {size}x{size} board")]
    OutOfBounds { col: u8, row: u8, size: usize },

    #[error("({col}, {row}) is not a legal move for {player}")]
    Illegal { col: u8, row: u8, player: &'static str },
}

/// Counts the opponent tokens that placing `player` at `pos` would flip
/// along direction `(dc, dr)`. Zero if the run is not capped by `player`.
#[inline]
fn flips_in_direction(state: &GameState, pos: Position, player: Player, dc: i32, dr: i32) -> usize {
    let board = &state.board;
    let size = board.size();
    let opponent = player.opponent();
    let mut run = 0;
    let mut cur = pos;

    while let Some(next) = cur.offset(dc, dr, size) {
        match board.get(next) {
            Some(p) if p == opponent => run += 1,
            Some(_) => return run,
            None => return 0,
        }
        cur = next;
    }
    0
}

/// Returns true if the player to move may place a token at `pos`.
pub fn is_legal(state: &GameState, pos: Position) -> bool {
    if !state.board.contains(pos) || state.board.get(pos).is_some() {
        return false;
    }
    DIRECTIONS
        .iter()
        .any(|&(dc, dr)| flips_in_direction(state, pos, state.to_move, dc, dr) > 0)
}

/// Enumerates the legal moves for the player to move, in row-major order.
///
/// The order is stable, so callers that break ties by "first seen" are
/// deterministic.
pub fn legal_moves(state: &GameState) -> Vec<Position> {
    state
        .board
        .cells()
        .filter(|&(pos, owner)| owner.is_none() && is_legal(state, pos))
        .map(|(pos, _)| pos)
        .collect()
}

/// Returns true if the player to move has at least one legal move.
pub fn has_legal_move(state: &GameState) -> bool {
    state
        .board
        .cells()
        .any(|(pos, owner)| owner.is_none() && is_legal(state, pos))
}

/// Returns true when neither player can move.
pub fn is_game_over(state: &GameState) -> bool {
    !has_legal_move(state) && !has_legal_move(&state.pass())
}

/// Produces the successor state after the player to move plays `pos`.
///
/// `pos` must be legal; flips are applied in every capped direction and the
/// turn passes to the opponent. The input state is left untouched.
pub fn apply_move(state: &GameState, pos: Position) -> GameState {
    debug_assert!(is_legal(state, pos), "apply_move called with illegal move {:?}", pos);

    let player = state.to_move;
    let size = state.size();
    let mut next = GameState::new(state.board.clone(), player.opponent());
    next.board.set(pos, Some(player));

    for &(dc, dr) in DIRECTIONS.iter() {
        let run = flips_in_direction(state, pos, player, dc, dr);
        let mut cur = pos;
        for _ in 0..run {
            match cur.offset(dc, dr, size) {
                Some(p) => {
                    next.board.set(p, Some(player));
                    cur = p;
                }
                None => break,
            }
        }
    }

    next
}

/// Checked variant of [`apply_move`] for drivers applying moves that came
/// from outside the engine.
pub fn try_apply_move(state: &GameState, pos: Position) -> Result<GameState, MoveError> {
    if !state.board.contains(pos) {
        return Err(MoveError::OutOfBounds {
            col: pos.col,
            row: pos.row,
            size: state.size(),
        });
    }
    if !is_legal(state, pos) {
        return Err(MoveError::Illegal {
            col: pos.col,
            row: pos.row,
            player: state.to_move.name(),
        });
    }
    Ok(apply_move(state, pos))
}

/// Picks a uniformly random legal move, or `None` if there is none.
pub fn random_move(state: &GameState, rng: &mut impl Rng) -> Option<Position> {
    let moves = legal_moves(state);
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.gen_range(0..moves.len())])
}
