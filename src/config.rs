//! Engine configuration.
//!
//! `EngineConfig` is the user-facing, serialisable configuration. It is
//! mutated through protocol `setoption` commands or loaded from JSON by the
//! self-play CLI, and validated into a [`SearchConfig`] before any search
//! runs. Invalid values are rejected here and never reach the search.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::search::{SearchConfig, Searcher, MAX_DEPTH};
use crate::strategy::{FirstMoveStrategy, GreedyStrategy, RandomStrategy, Strategy};

/// Default search depth.
pub const DEFAULT_DEPTH: u32 = 5;
/// Default blend between the positional and progression signals.
pub const DEFAULT_BLEND_WEIGHT: f64 = 0.5;

/// Errors raised when validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("search depth must be within 1..={max}, got {0}", max = MAX_DEPTH)]
    InvalidDepth(u32),

    #[error("blend weight must be a finite value within [0, 1], got {0}")]
    InvalidBlendWeight(f64),

    #[error("unknown strategy '{0}' (expected minimax, greedy, random or first)")]
    UnknownStrategy(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("option '{name}' requires a value")]
    MissingValue { name: String },

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which move-selection strategy the engine plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Minimax,
    Greedy,
    Random,
    First,
}

impl StrategyKind {
    /// Lowercase name as used in options and records.
    pub const fn name(self) -> &'static str {
        match self {
            StrategyKind::Minimax => "minimax",
            StrategyKind::Greedy => "greedy",
            StrategyKind::Random => "random",
            StrategyKind::First => "first",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" | "alphabeta" => Ok(StrategyKind::Minimax),
            "greedy" => Ok(StrategyKind::Greedy),
            "random" => Ok(StrategyKind::Random),
            "first" => Ok(StrategyKind::First),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Serialisable engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Search depth limit in plies.
    pub depth: u32,
    /// Weight `w` of the positional signal; the progression signal gets `1 - w`.
    pub blend_weight: f64,
    /// Strategy used when asked for a move.
    pub strategy: StrategyKind,
    /// RNG seed for the random strategy (0 = entropy).
    pub seed: u64,
    /// Optional per-move deadline in milliseconds (0 = none).
    pub movetime_ms: u64,
    /// Alpha-beta pruning; disabling it runs plain minimax.
    pub pruning: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            depth: DEFAULT_DEPTH,
            blend_weight: DEFAULT_BLEND_WEIGHT,
            strategy: StrategyKind::Minimax,
            seed: 0,
            movetime_ms: 0,
            pruning: true,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.search_config()?;
        Ok(config)
    }

    /// Validates the search-related fields.
    pub fn search_config(&self) -> Result<SearchConfig, ConfigError> {
        let movetime = (self.movetime_ms > 0).then(|| Duration::from_millis(self.movetime_ms));
        Ok(SearchConfig::new(self.depth)?
            .with_blend_weight(self.blend_weight)?
            .with_pruning(self.pruning)
            .with_movetime(movetime))
    }

    /// Applies a named option. On error the configuration is left unchanged.
    ///
    /// Names are matched case-insensitively: `Depth`, `BlendWeight`,
    /// `Strategy`, `Seed`, `MoveTime`, `Pruning`.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), ConfigError> {
        let value = value.ok_or_else(|| ConfigError::MissingValue {
            name: name.to_string(),
        })?;
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };

        let mut next = self.clone();
        match name.to_ascii_lowercase().as_str() {
            "depth" => next.depth = value.parse().map_err(|_| invalid())?,
            "blendweight" => next.blend_weight = value.parse().map_err(|_| invalid())?,
            "strategy" => next.strategy = value.parse()?,
            "seed" => next.seed = value.parse().map_err(|_| invalid())?,
            "movetime" => next.movetime_ms = value.parse().map_err(|_| invalid())?,
            "pruning" => next.pruning = value.parse().map_err(|_| invalid())?,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        next.search_config()?;
        *self = next;
        Ok(())
    }

    /// Builds the configured strategy.
    pub fn build_strategy(&self) -> Result<Box<dyn Strategy + Send>, ConfigError> {
        Ok(match self.strategy {
            StrategyKind::Minimax => Box::new(Searcher::new(self.search_config()?)),
            StrategyKind::Greedy => Box::new(GreedyStrategy),
            StrategyKind::Random => Box::new(RandomStrategy::new(self.seed)),
            StrategyKind::First => Box::new(FirstMoveStrategy),
        })
    }
}
