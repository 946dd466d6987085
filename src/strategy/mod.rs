//! Move-selection strategies.
//!
//! Every player the engine can field implements [`Strategy`]: the alpha-beta
//! [`Searcher`](crate::search::Searcher) plus the cheap baselines below,
//! which self-play pits the search against.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{GameState, Position};
use crate::movegen::{apply_move, legal_moves, random_move};

/// Chooses a move for the player to move in a given state.
pub trait Strategy {
    /// Short lowercase name used in logs and self-play records.
    fn name(&self) -> &'static str;

    /// Returns a legal move, or `None` if the player to move must pass.
    fn decide_move(&mut self, state: &GameState) -> Option<Position>;
}

/// Plays a uniformly random legal move.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: SmallRng,
}

impl RandomStrategy {
    /// Seeded for reproducible games; a seed of 0 draws from entropy.
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        RandomStrategy { rng }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn decide_move(&mut self, state: &GameState) -> Option<Position> {
        random_move(state, &mut self.rng)
    }
}

/// Plays the first legal move in row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMoveStrategy;

impl Strategy for FirstMoveStrategy {
    fn name(&self) -> &'static str {
        "first"
    }

    fn decide_move(&mut self, state: &GameState) -> Option<Position> {
        legal_moves(state).first().copied()
    }
}

/// Plays the move that leaves it with the most tokens; earliest move wins
/// ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyStrategy;

impl Strategy for GreedyStrategy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn decide_move(&mut self, state: &GameState) -> Option<Position> {
        let me = state.to_move;
        let mut best: Option<(Position, usize)> = None;
        for mv in legal_moves(state) {
            let tokens = apply_move(state, mv).board.count(me);
            if best.map_or(true, |(_, most)| tokens > most) {
                best = Some((mv, tokens));
            }
        }
        best.map(|(mv, _)| mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Player};

    #[test]
    fn first_move_is_row_major_first() {
        let state = GameState::start(8).unwrap();
        assert_eq!(FirstMoveStrategy.decide_move(&state), Some(Position::new(3, 2)));
    }

    #[test]
    fn random_strategy_is_reproducible_with_seed() {
        let state = GameState::start(8).unwrap();
        let mut a = RandomStrategy::new(7);
        let mut b = RandomStrategy::new(7);
        for _ in 0..10 {
            let mv = a.decide_move(&state);
            assert_eq!(mv, b.decide_move(&state));
            assert!(legal_moves(&state).contains(&mv.unwrap()));
        }
    }

    #[test]
    fn greedy_prefers_the_biggest_capture() {
        // (3,0) flips two along the top row, (5,7) flips one.
        let mut board = Board::empty(8).unwrap();
        board.set(Position::new(0, 0), Some(Player::Black));
        board.set(Position::new(1, 0), Some(Player::White));
        board.set(Position::new(2, 0), Some(Player::White));
        board.set(Position::new(5, 5), Some(Player::Black));
        board.set(Position::new(5, 6), Some(Player::White));
        let state = GameState::new(board, Player::Black);

        let moves = legal_moves(&state);
        assert_eq!(moves, vec![Position::new(3, 0), Position::new(5, 7)]);
        assert_eq!(GreedyStrategy.decide_move(&state), Some(Position::new(3, 0)));
    }

    #[test]
    fn greedy_keeps_the_first_of_equal_moves() {
        let state = GameState::start(8).unwrap();
        assert_eq!(GreedyStrategy.decide_move(&state), Some(Position::new(3, 2)));
    }

    #[test]
    fn strategies_pass_without_moves() {
        let mut board = Board::empty(4).unwrap();
        board.set(Position::new(0, 0), Some(Player::White));
        let state = GameState::new(board, Player::Black);
        assert_eq!(FirstMoveStrategy.decide_move(&state), None);
        assert_eq!(GreedyStrategy.decide_move(&state), None);
        assert_eq!(RandomStrategy::new(1).decide_move(&state), None);
    }
}
