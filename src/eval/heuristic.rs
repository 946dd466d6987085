//! Heuristic position evaluation.
//!
//! Scores a position from a fixed perspective player by blending two
//! signals:
//!
//! - **positional**: weighted cell ownership, normalised into `[-1, 1]`
//! - **progression**: token share scaled by how full the board is, in
//!   `[-1.5, 0.5]`; owning many tokens early counts against the player,
//!   owning many late counts for them
//!
//! The `Evaluator` owns the cached [`WeightTable`] for the board size in play
//! and rebuilds it only when the size changes.

use crate::board::{GameState, Player};
use crate::config::DEFAULT_BLEND_WEIGHT;
use crate::search::SearchConfig;

use super::weights::WeightTable;

/// Errors raised by [`Evaluator::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("no weight table prepared; call prepare() with the board size first")]
    Unprepared,

    #[error("board size {actual} does not match the prepared weight table size {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Positional signal in `[-1, 1]`.
///
/// Sum of weights of cells owned by `perspective`, minus the same sum for the
/// opponent, divided by the table's extreme.
pub fn positional_signal(table: &WeightTable, state: &GameState, perspective: Player) -> f64 {
    debug_assert_eq!(table.size(), state.size());
    let mut own: f64 = 0.0;
    let mut opp: f64 = 0.0;
    for (&w, (_, cell)) in table.weights().iter().zip(state.board.cells()) {
        match cell {
            Some(p) if p == perspective => own += w,
            Some(_) => opp += w,
            None => {}
        }
    }
    (own - opp) / table.extreme()
}

/// Progression signal in `[-1.5, 0.5]`.
///
/// `(2 * occupation - 1) * own_share - 0.5`, where `occupation` is the filled
/// fraction of the board and `own_share` the fraction owned by `perspective`.
pub fn progression_signal(state: &GameState, perspective: Player) -> f64 {
    let total = state.board.cell_count() as f64;
    let own = state.board.count(perspective) as f64;
    let occupation = state.board.occupied() as f64 / total;
    let own_share = own / total;
    let progression_factor = 2.0 * occupation - 1.0;
    progression_factor * own_share - 0.5
}

/// Blended utility `w * positional + (1 - w) * progression`.
#[inline]
pub fn utility(table: &WeightTable, blend: f64, state: &GameState, perspective: Player) -> f64 {
    blend * positional_signal(table, state, perspective)
        + (1.0 - blend) * progression_signal(state, perspective)
}

/// Evaluation context: the blend weight plus the lazily built weight table.
#[derive(Debug, Clone)]
pub struct Evaluator {
    blend: f64,
    table: Option<WeightTable>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator {
            blend: DEFAULT_BLEND_WEIGHT,
            table: None,
        }
    }
}

impl Evaluator {
    /// Creates an evaluator with the already validated blend of `config`.
    pub fn from_search_config(config: &SearchConfig) -> Self {
        Evaluator {
            blend: config.blend_weight(),
            table: None,
        }
    }

    /// Adopts the blend of `config`, keeping the cached table.
    pub fn apply_search_config(&mut self, config: &SearchConfig) {
        self.blend = config.blend_weight();
    }

    /// Current blend weight.
    #[inline]
    pub fn blend_weight(&self) -> f64 {
        self.blend
    }

    /// Returns the weight table for `size`, building it on first use or when
    /// the cached table was built for a different size.
    pub fn prepare(&mut self, size: usize) -> &WeightTable {
        if self.table.as_ref().map_or(true, |t| t.size() != size) {
            let table = WeightTable::build(size);
            log::debug!(
                "built {size}x{size} weight table: sum {:.2}, extreme {:.2}",
                table.total(),
                table.extreme()
            );
            self.table = Some(table);
        }
        self.table.get_or_insert_with(|| WeightTable::build(size))
    }

    /// The cached table, if one has been prepared.
    #[inline]
    pub fn table(&self) -> Option<&WeightTable> {
        self.table.as_ref()
    }

    /// Drops the cached table, e.g. at the start of a new game.
    pub fn reset(&mut self) {
        self.table = None;
    }

    /// Evaluates `state` from `perspective`.
    ///
    /// Fails if no table is prepared or if it was prepared for another size.
    pub fn evaluate(&self, state: &GameState, perspective: Player) -> Result<f64, EvalError> {
        let table = self.table.as_ref().ok_or(EvalError::Unprepared)?;
        if table.size() != state.size() {
            return Err(EvalError::SizeMismatch {
                expected: table.size(),
                actual: state.size(),
            });
        }
        Ok(utility(table, self.blend, state, perspective))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Position};
    use crate::movegen::{apply_move, legal_moves};

    fn fill(size: usize, owner: impl Fn(Position) -> Option<Player>) -> GameState {
        let mut board = Board::empty(size).unwrap();
        let cells: Vec<Position> = board.cells().map(|(p, _)| p).collect();
        for pos in cells {
            board.set(pos, owner(pos));
        }
        GameState::new(board, Player::Black)
    }

    #[test]
    fn start_position_is_balanced_positionally() {
        let state = GameState::start(8).unwrap();
        let table = WeightTable::build(8);
        assert_eq!(positional_signal(&table, &state, Player::Black), 0.0);
        assert_eq!(positional_signal(&table, &state, Player::White), 0.0);
    }

    #[test]
    fn positional_signal_is_antisymmetric() {
        let state = apply_move(&GameState::start(8).unwrap(), Position::new(3, 2));
        let table = WeightTable::build(8);
        let b = positional_signal(&table, &state, Player::Black);
        let w = positional_signal(&table, &state, Player::White);
        assert!(b > 0.0);
        assert!((b + w).abs() < 1e-12);
    }

    #[test]
    fn positional_signal_reaches_bounds() {
        let table = WeightTable::build(8);
        // Black owns every positively weighted cell, White every negative one.
        let state = fill(8, |p| {
            if table.weight(p) > 0.0 {
                Some(Player::Black)
            } else {
                Some(Player::White)
            }
        });
        assert!((positional_signal(&table, &state, Player::Black) - 1.0).abs() < 1e-12);
        assert!((positional_signal(&table, &state, Player::White) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn progression_signal_bounds() {
        let empty = GameState::new(Board::empty(8).unwrap(), Player::Black);
        assert_eq!(progression_signal(&empty, Player::Black), -0.5);

        let all_black = fill(8, |_| Some(Player::Black));
        assert!((progression_signal(&all_black, Player::Black) - 0.5).abs() < 1e-12);
        assert!((progression_signal(&all_black, Player::White) + 0.5).abs() < 1e-12);

        // One token alone on the board: factor is close to -1.
        let mut lone = Board::empty(4).unwrap();
        lone.set(Position::new(0, 0), Some(Player::White));
        let lone = GameState::new(lone, Player::Black);
        let expected = (2.0 * (1.0 / 16.0) - 1.0) * (1.0 / 16.0) - 0.5;
        assert!((progression_signal(&lone, Player::White) - expected).abs() < 1e-12);
    }

    #[test]
    fn signals_stay_in_range_along_a_game() {
        let table = WeightTable::build(8);
        let mut state = GameState::start(8).unwrap();
        loop {
            for p in [Player::Black, Player::White] {
                let pos = positional_signal(&table, &state, p);
                let prog = progression_signal(&state, p);
                assert!((-1.0..=1.0).contains(&pos), "positional {pos}");
                assert!((-1.5..=0.5).contains(&prog), "progression {prog}");
            }
            let moves = legal_moves(&state);
            let next = match moves.last() {
                Some(&m) => apply_move(&state, m),
                None => {
                    let passed = state.pass();
                    match legal_moves(&passed).last() {
                        Some(&m) => apply_move(&passed, m),
                        None => break,
                    }
                }
            };
            state = next;
        }
    }

    #[test]
    fn utility_blends_signals() {
        let table = WeightTable::build(8);
        let state = apply_move(&GameState::start(8).unwrap(), Position::new(2, 3));
        let pos = positional_signal(&table, &state, Player::Black);
        let prog = progression_signal(&state, Player::Black);
        assert_eq!(utility(&table, 1.0, &state, Player::Black), pos);
        assert_eq!(utility(&table, 0.0, &state, Player::Black), prog);
        let mid = utility(&table, 0.5, &state, Player::Black);
        assert!((mid - (0.5 * pos + 0.5 * prog)).abs() < 1e-12);
    }

    #[test]
    fn evaluator_requires_prepared_table() {
        let state = GameState::start(8).unwrap();
        let mut eval = Evaluator::default();
        assert_eq!(eval.evaluate(&state, Player::Black), Err(EvalError::Unprepared));
        eval.prepare(8);
        assert!(eval.evaluate(&state, Player::Black).is_ok());
    }

    #[test]
    fn evaluator_rejects_size_mismatch() {
        let mut eval = Evaluator::default();
        eval.prepare(6);
        let state = GameState::start(8).unwrap();
        assert_eq!(
            eval.evaluate(&state, Player::Black),
            Err(EvalError::SizeMismatch {
                expected: 6,
                actual: 8
            })
        );
    }

    #[test]
    fn prepare_rebuilds_only_on_size_change() {
        let mut eval = Evaluator::default();
        assert_eq!(eval.prepare(8).size(), 8);
        let first = eval.table().unwrap().weights().as_ptr();
        eval.prepare(8);
        assert_eq!(eval.table().unwrap().weights().as_ptr(), first);
        assert_eq!(eval.prepare(10).size(), 10);
        eval.reset();
        assert!(eval.table().is_none());
    }

    #[test]
    fn evaluator_follows_search_config_blend() {
        let config = SearchConfig::default().with_blend_weight(0.3).unwrap();
        let mut eval = Evaluator::from_search_config(&config);
        assert_eq!(eval.blend_weight(), 0.3);
        eval.prepare(8);
        let state = apply_move(&GameState::start(8).unwrap(), Position::new(2, 3));
        let table = WeightTable::build(8);
        assert_eq!(
            eval.evaluate(&state, Player::White),
            Ok(utility(&table, 0.3, &state, Player::White))
        );
        eval.apply_search_config(&SearchConfig::default());
        assert_eq!(eval.blend_weight(), DEFAULT_BLEND_WEIGHT);
        assert!(eval.table().is_some());
    }
}
