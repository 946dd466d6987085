//! Static positional weight table.
//!
//! Every cell is classified into one of six tiers by its distance to the
//! nearest corner and edge. The classification only looks at how far each
//! coordinate is from an extreme, so the table is invariant under the eight
//! rotations and reflections of the square.

use crate::board::Position;

/// Positional tier of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Both coordinates on an extreme.
    Corner,
    /// On an edge, one step along it from a corner.
    CornerAdjacent,
    /// One step in from a corner along both axes.
    CornerDiagonal,
    /// Remaining border cells.
    OuterEdge,
    /// Remaining cells one step inside the border.
    InnerEdge,
    /// Everything else.
    Interior,
}

impl Tier {
    /// Classifies cell `(col, row)` on a `size`-edged board.
    pub fn of(col: usize, row: usize, size: usize) -> Tier {
        let edge = |c: usize| c == 0 || c + 1 == size;
        let near = |c: usize| c == 1 || c + 2 == size;

        match (edge(col), edge(row), near(col), near(row)) {
            (true, true, _, _) => Tier::Corner,
            (true, _, _, true) | (_, true, true, _) => Tier::CornerAdjacent,
            (_, _, true, true) => Tier::CornerDiagonal,
            (true, _, _, _) | (_, true, _, _) => Tier::OuterEdge,
            (_, _, true, _) | (_, _, _, true) => Tier::InnerEdge,
            _ => Tier::Interior,
        }
    }

    /// The fixed weight assigned to this tier.
    pub const fn weight(self) -> f64 {
        match self {
            Tier::Corner => 1.0,
            Tier::CornerAdjacent => -0.5,
            Tier::CornerDiagonal => -1.0,
            Tier::OuterEdge => 0.8,
            Tier::InnerEdge => -0.5,
            Tier::Interior => 0.3,
        }
    }
}

/// Per-cell positional weights for one board size.
///
/// Built once per size and never mutated. `total` is the signed sum of all
/// weights; `extreme` is the sum of their magnitudes and bounds
/// `|own - opponent|` for any distribution of tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    size: usize,
    weights: Vec<f64>,
    total: f64,
    extreme: f64,
}

impl WeightTable {
    /// Builds the table for a `size`-edged board.
    pub fn build(size: usize) -> Self {
        let mut weights = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                weights.push(Tier::of(col, row, size).weight());
            }
        }
        let total = weights.iter().sum();
        let extreme = weights.iter().map(|w: &f64| w.abs()).sum();
        WeightTable {
            size,
            weights,
            total,
            extreme,
        }
    }

    /// Edge length the table was built for.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Weight of a single cell.
    #[inline]
    pub fn weight(&self, pos: Position) -> f64 {
        self.weights[pos.index(self.size)]
    }

    /// Weights in row-major order.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Signed sum of every cell weight.
    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Sum of absolute cell weights; the normaliser of the positional signal.
    #[inline]
    pub fn extreme(&self) -> f64 {
        self.extreme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(table: &WeightTable, col: usize, row: usize) -> f64 {
        table.weight(Position::new(col as u8, row as u8))
    }

    #[test]
    fn standard_board_tiers() {
        let t = WeightTable::build(8);
        assert_eq!(at(&t, 0, 0), 1.0);
        assert_eq!(at(&t, 7, 7), 1.0);
        assert_eq!(at(&t, 1, 0), -0.5);
        assert_eq!(at(&t, 0, 6), -0.5);
        assert_eq!(at(&t, 1, 1), -1.0);
        assert_eq!(at(&t, 6, 1), -1.0);
        assert_eq!(at(&t, 3, 0), 0.8);
        assert_eq!(at(&t, 7, 2), 0.8);
        assert_eq!(at(&t, 3, 1), -0.5);
        assert_eq!(at(&t, 6, 4), -0.5);
        assert_eq!(at(&t, 3, 3), 0.3);
        assert_eq!(at(&t, 2, 5), 0.3);
    }

    #[test]
    fn tier_counts_on_standard_board() {
        let mut counts = std::collections::HashMap::new();
        for row in 0..8 {
            for col in 0..8 {
                *counts.entry(Tier::of(col, row, 8)).or_insert(0) += 1;
            }
        }
        assert_eq!(counts[&Tier::Corner], 4);
        assert_eq!(counts[&Tier::CornerAdjacent], 8);
        assert_eq!(counts[&Tier::CornerDiagonal], 4);
        assert_eq!(counts[&Tier::OuterEdge], 16);
        assert_eq!(counts[&Tier::InnerEdge], 16);
        assert_eq!(counts[&Tier::Interior], 16);
    }

    #[test]
    fn table_is_symmetric_for_every_size() {
        for size in (4..=26).step_by(2) {
            let t = WeightTable::build(size);
            for i in 0..size {
                for j in 0..size {
                    let w = at(&t, i, j);
                    assert_eq!(w, at(&t, size - 1 - i, size - 1 - j), "size {size} ({i},{j})");
                    assert_eq!(w, at(&t, j, i), "size {size} ({i},{j})");
                    assert_eq!(w, at(&t, size - 1 - i, j), "size {size} ({i},{j})");
                }
            }
        }
    }

    #[test]
    fn smallest_board_has_no_interior() {
        let t = WeightTable::build(4);
        for (i, _) in t.weights().iter().enumerate() {
            let pos = Position::from_index(i, 4);
            let tier = Tier::of(pos.col as usize, pos.row as usize, 4);
            assert!(!matches!(tier, Tier::Interior | Tier::OuterEdge | Tier::InnerEdge));
        }
        assert_eq!(at(&t, 1, 2), -1.0);
        assert_eq!(at(&t, 0, 2), -0.5);
    }

    #[test]
    fn totals_match_tier_counts() {
        let t = WeightTable::build(8);
        let expected = 4.0 * 1.0 + 8.0 * -0.5 + 4.0 * -1.0 + 16.0 * 0.8 + 16.0 * -0.5 + 16.0 * 0.3;
        assert!((t.total() - expected).abs() < 1e-9);
        let extreme = 4.0 * 1.0 + 8.0 * 0.5 + 4.0 * 1.0 + 16.0 * 0.8 + 16.0 * 0.5 + 16.0 * 0.3;
        assert!((t.extreme() - extreme).abs() < 1e-9);
    }
}
