//! Depth-limited minimax with alpha-beta pruning.
//!
//! The tree is explored depth-first over cloned `GameState`s; no branch ever
//! shares or mutates another branch's state. Every leaf is scored from the
//! perspective of the player to move at the root, so maximizing and
//! minimizing nodes compare values on a single scale.
//!
//! Children are visited in legal-move order and ties keep the first child,
//! so pruned and exhaustive searches agree on both move and value.

use std::time::{Duration, Instant};

use crate::board::{GameState, Player, Position};
use crate::config::ConfigError;
use crate::eval::{utility, EvalError, Evaluator, WeightTable};
use crate::movegen::{apply_move, legal_moves};
use crate::strategy::Strategy;

/// Deepest search the engine accepts.
pub const MAX_DEPTH: u32 = 16;

/// Validated search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    depth: u32,
    blend_weight: f64,
    pruning: bool,
    movetime: Option<Duration>,
}

impl SearchConfig {
    /// Creates a configuration with the given depth limit and default
    /// evaluation settings. Depth must be within `1..=MAX_DEPTH`.
    pub fn new(depth: u32) -> Result<Self, ConfigError> {
        Ok(SearchConfig {
            depth: check_depth(depth)?,
            ..SearchConfig::default()
        })
    }

    /// Sets the evaluator blend weight.
    pub fn with_blend_weight(mut self, blend_weight: f64) -> Result<Self, ConfigError> {
        if !blend_weight.is_finite() || !(0.0..=1.0).contains(&blend_weight) {
            return Err(ConfigError::InvalidBlendWeight(blend_weight));
        }
        self.blend_weight = blend_weight;
        Ok(self)
    }

    /// Enables or disables alpha-beta pruning.
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    /// Sets an optional wall-clock budget per search.
    pub fn with_movetime(mut self, movetime: Option<Duration>) -> Self {
        self.movetime = movetime;
        self
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn blend_weight(&self) -> f64 {
        self.blend_weight
    }

    pub fn pruning(&self) -> bool {
        self.pruning
    }

    pub fn movetime(&self) -> Option<Duration> {
        self.movetime
    }
}

fn check_depth(depth: u32) -> Result<u32, ConfigError> {
    if depth == 0 || depth > MAX_DEPTH {
        return Err(ConfigError::InvalidDepth(depth));
    }
    Ok(depth)
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: crate::config::DEFAULT_DEPTH,
            blend_weight: crate::config::DEFAULT_BLEND_WEIGHT,
            pruning: true,
            movetime: None,
        }
    }
}

/// Node and cutoff counters for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Calls into the minimax recursion, root included.
    pub nodes: u64,
    /// Times the remaining children of a node were skipped.
    pub cutoffs: u64,
}

/// Result of a search: the chosen move, its utility and search statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// `None` when the player to move has no legal move.
    pub best_move: Option<Position>,
    /// Utility of the chosen line from the root player's perspective.
    pub score: f64,
    /// Depth searched; 0 when the result was decided without a search.
    pub depth: u32,
    pub stats: SearchStats,
    pub elapsed: Duration,
    /// True if the deadline cut the search short.
    pub timed_out: bool,
}

/// Per-search traversal context.
struct Tree<'a> {
    table: &'a WeightTable,
    blend: f64,
    root: Player,
    pruning: bool,
    deadline: Option<Instant>,
    timed_out: bool,
    stats: SearchStats,
}

impl Tree<'_> {
    #[inline]
    fn leaf(&self, state: &GameState) -> f64 {
        utility(self.table, self.blend, state, self.root)
    }

    /// Checks the deadline every 64 nodes; once expired it stays expired.
    #[inline]
    fn expired(&mut self) -> bool {
        if self.timed_out {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if self.stats.nodes & 63 == 0 && Instant::now() >= deadline {
                self.timed_out = true;
            }
        }
        self.timed_out
    }

    fn minimax(
        &mut self,
        state: &GameState,
        depth: u32,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
    ) -> (Option<Position>, f64) {
        self.stats.nodes += 1;

        if depth == 0 || self.expired() {
            return (None, self.leaf(state));
        }
        let moves = legal_moves(state);
        if moves.is_empty() {
            return (None, self.leaf(state));
        }

        let mut best_move = None;
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for mv in moves {
            let child = apply_move(state, mv);
            let (_, value) = self.minimax(&child, depth - 1, !maximizing, alpha, beta);

            if maximizing {
                if value > best {
                    best = value;
                    best_move = Some(mv);
                }
                if self.pruning {
                    alpha = alpha.max(best);
                    if best >= beta {
                        self.stats.cutoffs += 1;
                        break;
                    }
                }
            } else {
                if value < best {
                    best = value;
                    best_move = Some(mv);
                }
                if self.pruning {
                    beta = beta.min(best);
                    if best <= alpha {
                        self.stats.cutoffs += 1;
                        break;
                    }
                }
            }
        }

        (best_move, best)
    }
}

/// Alpha-beta move selector.
///
/// Owns the evaluator context, so the weight table is built once and reused
/// across turns of the same game.
#[derive(Debug, Clone)]
pub struct Searcher {
    config: SearchConfig,
    evaluator: Evaluator,
}

impl Searcher {
    /// Creates a searcher from a validated configuration.
    pub fn new(config: SearchConfig) -> Self {
        Searcher {
            config,
            evaluator: Evaluator::from_search_config(&config),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replaces the configuration, keeping the cached weight table.
    pub fn set_config(&mut self, config: SearchConfig) {
        self.evaluator.apply_search_config(&config);
        self.config = config;
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Forgets the cached weight table.
    pub fn reset(&mut self) {
        self.evaluator.reset();
    }

    /// Static utility of `state` for its player to move.
    pub fn evaluate(&mut self, state: &GameState) -> Result<f64, EvalError> {
        self.evaluator.prepare(state.size());
        self.evaluator.evaluate(state, state.to_move)
    }

    /// Chooses a move for the player to move.
    ///
    /// No legal move yields `None`; a single legal move is returned without
    /// searching. Otherwise runs the configured depth-limited search.
    pub fn search(&mut self, state: &GameState) -> SearchResult {
        let start = Instant::now();
        let moves = legal_moves(state);

        let result = match moves.as_slice() {
            [] | [_] => {
                let best_move = moves.first().copied();
                let blend = self.config.blend_weight;
                let table = self.evaluator.prepare(state.size());
                let score = match best_move {
                    Some(mv) => utility(table, blend, &apply_move(state, mv), state.to_move),
                    None => utility(table, blend, state, state.to_move),
                };
                SearchResult {
                    best_move,
                    score,
                    depth: 0,
                    stats: SearchStats::default(),
                    elapsed: start.elapsed(),
                    timed_out: false,
                }
            }
            _ => self.run(state, self.config.depth),
        };

        log::debug!(
            "{} to move: best {:?} score {:.4} depth {} nodes {} cutoffs {}",
            state.to_move.name(),
            result.best_move,
            result.score,
            result.depth,
            result.stats.nodes,
            result.stats.cutoffs
        );
        result
    }

    /// Runs the minimax recursion from the root at an explicit depth, with
    /// no single-move shortcut. Depth must be within `1..=MAX_DEPTH`.
    pub fn search_at_depth(
        &mut self,
        state: &GameState,
        depth: u32,
    ) -> Result<SearchResult, ConfigError> {
        let depth = check_depth(depth)?;
        Ok(self.run(state, depth))
    }

    fn run(&mut self, state: &GameState, depth: u32) -> SearchResult {
        let start = Instant::now();
        let config = self.config;
        let mut tree = Tree {
            table: self.evaluator.prepare(state.size()),
            blend: config.blend_weight,
            root: state.to_move,
            pruning: config.pruning,
            deadline: config.movetime.map(|d| start + d),
            timed_out: false,
            stats: SearchStats::default(),
        };

        let (best_move, score) = tree.minimax(state, depth, true, f64::NEG_INFINITY, f64::INFINITY);

        if tree.timed_out {
            log::debug!(
                "search hit its {:?} deadline after {} nodes",
                config.movetime.unwrap_or_default(),
                tree.stats.nodes
            );
        }

        SearchResult {
            best_move,
            score,
            depth,
            stats: tree.stats,
            elapsed: start.elapsed(),
            timed_out: tree.timed_out,
        }
    }

    /// Scores every root move with a full-window search `depth - 1` plies
    /// below it, in legal-move order. Used for diagnostics.
    pub fn score_moves(
        &mut self,
        state: &GameState,
        depth: u32,
    ) -> Result<Vec<(Position, f64)>, ConfigError> {
        let depth = check_depth(depth)?;
        let config = self.config;
        let mut tree = Tree {
            table: self.evaluator.prepare(state.size()),
            blend: config.blend_weight,
            root: state.to_move,
            pruning: config.pruning,
            deadline: None,
            timed_out: false,
            stats: SearchStats::default(),
        };

        Ok(legal_moves(state)
            .into_iter()
            .map(|mv| {
                let child = apply_move(state, mv);
                let (_, value) =
                    tree.minimax(&child, depth - 1, false, f64::NEG_INFINITY, f64::INFINITY);
                (mv, value)
            })
            .collect())
    }
}

impl Strategy for Searcher {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn decide_move(&mut self, state: &GameState) -> Option<Position> {
        self.search(state).best_move
    }
}
