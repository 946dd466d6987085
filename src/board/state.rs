//! Game state representation.
//!
//! Holds a snapshot of an Othello game at a given point in time: the cell
//! grid and the player to move. States are cheap to clone and every explored
//! branch of a search owns its own copy.

use super::player::Player;
use super::position::Position;

/// Smallest supported board edge.
pub const MIN_SIZE: usize = 4;
/// Largest supported board edge (one column letter per column).
pub const MAX_SIZE: usize = 26;
/// Edge of the standard tournament board.
pub const STANDARD_SIZE: usize = 8;

/// Errors raised when constructing a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board size must be even and within {min}..={max}, got {0}", min = MIN_SIZE, max = MAX_SIZE)]
    InvalidSize(usize),
}

/// A square grid of cells, each empty or owned by one player.
///
/// Token counts are maintained incrementally by [`Board::set`] so that the
/// evaluator never rescans the grid for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Player>>,
    black: usize,
    white: usize,
}

impl Board {
    /// Creates an empty board. Rejects odd sizes and sizes outside
    /// `MIN_SIZE..=MAX_SIZE`.
    pub fn empty(size: usize) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) || size % 2 != 0 {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Board {
            size,
            cells: vec![None; size * size],
            black: 0,
            white: 0,
        })
    }

    /// Creates a board with the four standard centre tokens.
    pub fn standard(size: usize) -> Result<Self, BoardError> {
        let mut board = Board::empty(size)?;
        let lo = (size / 2 - 1) as u8;
        let hi = (size / 2) as u8;
        board.set(Position::new(lo, lo), Some(Player::White));
        board.set(Position::new(hi, hi), Some(Player::White));
        board.set(Position::new(hi, lo), Some(Player::Black));
        board.set(Position::new(lo, hi), Some(Player::Black));
        Ok(board)
    }

    /// Edge length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if `pos` lies on the board.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        (pos.col as usize) < self.size && (pos.row as usize) < self.size
    }

    /// Returns the owner of a cell. `pos` must lie on the board.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Player> {
        debug_assert!(self.contains(pos), "{pos:?} is off a {0}x{0} board", self.size);
        self.cells[pos.index(self.size)]
    }

    /// Sets the owner of a cell, keeping token counts in sync. `pos` must
    /// lie on the board.
    pub fn set(&mut self, pos: Position, owner: Option<Player>) {
        debug_assert!(self.contains(pos), "{pos:?} is off a {0}x{0} board", self.size);
        let idx = pos.index(self.size);
        match self.cells[idx] {
            Some(Player::Black) => self.black -= 1,
            Some(Player::White) => self.white -= 1,
            None => {}
        }
        match owner {
            Some(Player::Black) => self.black += 1,
            Some(Player::White) => self.white += 1,
            None => {}
        }
        self.cells[idx] = owner;
    }

    /// Number of tokens owned by `player`.
    #[inline]
    pub fn count(&self, player: Player) -> usize {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    /// Number of occupied cells.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.black + self.white
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Option<Player>)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (Position::from_index(i, size), c))
    }
}

/// A board together with the player to move.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    pub board: Board,
    pub to_move: Player,
}

impl GameState {
    /// Creates a state from a board and the player to move.
    pub fn new(board: Board, to_move: Player) -> Self {
        GameState { board, to_move }
    }

    /// Standard start position with Black to move.
    pub fn start(size: usize) -> Result<Self, BoardError> {
        Ok(GameState::new(Board::standard(size)?, Player::Black))
    }

    /// Edge length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Token counts as `(black, white)`.
    #[inline]
    pub fn token_counts(&self) -> (usize, usize) {
        (self.board.count(Player::Black), self.board.count(Player::White))
    }

    /// Returns a copy of this state with the turn handed to the opponent.
    pub fn pass(&self) -> GameState {
        GameState::new(self.board.clone(), self.to_move.opponent())
    }

    /// The player with more tokens, or `None` on equal counts.
    pub fn leader(&self) -> Option<Player> {
        let (black, white) = self.token_counts();
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Some(Player::Black),
            std::cmp::Ordering::Less => Some(Player::White),
            std::cmp::Ordering::Equal => None,
        }
    }
}
