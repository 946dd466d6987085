//! Board coordinates.

/// A cell on the board, addressed by column then row, both zero-based.
///
/// APIs that may have nothing to play return `Option<Position>`; `None` is
/// the "no move available" signal and callers treat it as a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub col: u8,
    pub row: u8,
}

impl Position {
    /// Creates a position from a column and a row.
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Returns the row-major cell index on a board of the given size.
    #[inline]
    pub const fn index(self, size: usize) -> usize {
        self.row as usize * size + self.col as usize
    }

    /// Inverse of [`Position::index`].
    #[inline]
    pub const fn from_index(index: usize, size: usize) -> Self {
        Self {
            col: (index % size) as u8,
            row: (index / size) as u8,
        }
    }

    /// Steps one cell in direction `(dc, dr)`, returning `None` when the
    /// step leaves a board of the given size.
    #[inline]
    pub fn offset(self, dc: i32, dr: i32, size: usize) -> Option<Position> {
        let col = self.col as i32 + dc;
        let row = self.row as i32 + dr;
        let limit = size as i32;
        if col < 0 || row < 0 || col >= limit || row >= limit {
            return None;
        }
        Some(Position::new(col as u8, row as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_row_major() {
        assert_eq!(Position::new(0, 0).index(8), 0);
        assert_eq!(Position::new(7, 0).index(8), 7);
        assert_eq!(Position::new(0, 1).index(8), 8);
        assert_eq!(Position::new(2, 3).index(8), 26);
        assert_eq!(Position::from_index(26, 8), Position::new(2, 3));
    }

    #[test]
    fn offset_stays_on_board() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.offset(-1, 0, 8), None);
        assert_eq!(corner.offset(0, -1, 8), None);
        assert_eq!(corner.offset(1, 1, 8), Some(Position::new(1, 1)));
        assert_eq!(Position::new(7, 7).offset(1, 0, 8), None);
    }
}
