//! Engine state management.
//!
//! Holds the current position and engine options between protocol commands
//! and runs the configured strategy for the `go` command. The alpha-beta
//! searcher lives for the whole session so its weight table survives from
//! one move to the next.

use std::io::{self, Write};

use crate::board::{BoardError, GameState, STANDARD_SIZE};
use crate::config::{ConfigError, EngineConfig, StrategyKind};
use crate::eval::EvalError;
use crate::protocol::{format_move, parse_board, GoParams, NotationError, PositionSpec};
use crate::search::{SearchConfig, Searcher, MAX_DEPTH};
use crate::strategy::Strategy;

/// Errors raised while handling a protocol command.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no position set")]
    NoPosition,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("failed to write response: {0}")]
    Io(#[from] io::Error),
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    position: Option<GameState>,
    config: EngineConfig,
    searcher: Searcher,
    /// Strategy used instead of the searcher when one is configured.
    baseline: Option<Box<dyn Strategy + Send>>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// Creates an engine with default options and no position.
    pub fn new() -> Self {
        Engine {
            position: None,
            config: EngineConfig::default(),
            searcher: Searcher::new(SearchConfig::default()),
            baseline: None,
        }
    }

    /// Creates an engine from a configuration, validating it first.
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        let mut engine = Engine {
            position: None,
            searcher: Searcher::new(config.search_config()?),
            config,
            baseline: None,
        };
        engine.rebuild_baseline()?;
        Ok(engine)
    }

    /// Current position, if one has been set.
    pub fn position(&self) -> Option<&GameState> {
        self.position.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resets the position and caches for a new game.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.position = None;
        self.searcher.reset();
        self.rebuild_baseline()?;
        Ok(())
    }

    /// Sets the current position. On error the previous position is kept.
    pub fn set_position(&mut self, spec: &PositionSpec) -> Result<(), EngineError> {
        let state = match spec {
            PositionSpec::StartPos { size } => GameState::start(size.unwrap_or(STANDARD_SIZE))?,
            PositionSpec::Board { notation } => parse_board(notation)?,
        };
        self.position = Some(state);
        Ok(())
    }

    /// Applies a `setoption` command. Rejected values leave every option
    /// unchanged.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), EngineError> {
        let mut next = self.config.clone();
        next.set_option(name, value)?;
        let search = next.search_config()?;
        let strategy_changed = next.strategy != self.config.strategy || next.seed != self.config.seed;

        self.config = next;
        self.searcher.set_config(search);
        if strategy_changed {
            self.rebuild_baseline()?;
        }
        Ok(())
    }

    fn rebuild_baseline(&mut self) -> Result<(), ConfigError> {
        self.baseline = match self.config.strategy {
            StrategyKind::Minimax => None,
            _ => Some(self.config.build_strategy()?),
        };
        Ok(())
    }

    /// Handles the handshake: writes id, options, protocol_version, and otpok.
    pub fn handle_handshake<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let defaults = EngineConfig::default();
        writeln!(out, "id name donathello")?;
        writeln!(out, "id author donathello developers")?;
        writeln!(
            out,
            "option name Depth type spin default {} min 1 max {}",
            defaults.depth, MAX_DEPTH
        )?;
        writeln!(
            out,
            "option name BlendWeight type string default {}",
            defaults.blend_weight
        )?;
        writeln!(
            out,
            "option name Strategy type combo default {} var minimax var greedy var random var first",
            defaults.strategy
        )?;
        writeln!(out, "option name Seed type spin default 0 min 0 max {}", u64::MAX)?;
        writeln!(out, "option name MoveTime type spin default 0 min 0 max 3600000")?;
        writeln!(
            out,
            "option name Pruning type check default {}",
            defaults.pruning
        )?;
        writeln!(out, "protocol_version 1")?;
        writeln!(out, "otpok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles the `go` command: an `info` line for searched moves, then
    /// `bestmove`. `depth` and `movetime` override the options for this
    /// move only.
    pub fn handle_go<W: Write>(&mut self, params: &GoParams, out: &mut W) -> Result<(), EngineError> {
        let state = self.position.as_ref().ok_or(EngineError::NoPosition)?;

        let best = match self.baseline.as_mut() {
            Some(strategy) => strategy.decide_move(state),
            None => {
                let mut config = self.config.clone();
                if let Some(depth) = params.depth {
                    config.depth = depth;
                }
                if let Some(ms) = params.movetime {
                    config.movetime_ms = ms;
                }
                self.searcher.set_config(config.search_config()?);

                let result = self.searcher.search(state);
                writeln!(
                    out,
                    "info depth {} nodes {} cutoffs {} score {:.6} time {}",
                    result.depth,
                    result.stats.nodes,
                    result.stats.cutoffs,
                    result.score,
                    result.elapsed.as_millis()
                )?;
                result.best_move
            }
        };

        writeln!(out, "bestmove {}", format_move(best))?;
        out.flush()?;
        Ok(())
    }

    /// Handles the `eval` command: the static utility for the side to move.
    pub fn handle_eval<W: Write>(&mut self, out: &mut W) -> Result<(), EngineError> {
        let state = self.position.as_ref().ok_or(EngineError::NoPosition)?;
        let score = self.searcher.evaluate(state)?;
        writeln!(out, "info score {score:.6}")?;
        out.flush()?;
        Ok(())
    }
}
