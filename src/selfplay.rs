//! Self-play match runner.
//!
//! Plays complete Othello games between two configured strategies, records
//! the move list and outcome of each game, and writes the records as JSONL.
//! Games are independent, so they can run concurrently on a rayon pool; every
//! game owns its strategies, evaluator context and RNG.

use std::io::Write;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardError, GameState, Player, STANDARD_SIZE};
use crate::config::{ConfigError, EngineConfig, StrategyKind};
use crate::movegen::{has_legal_move, is_game_over, try_apply_move, MoveError};
use crate::protocol::format_move;

/// Errors raised while running self-play.
#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error("game {game_id}: {source}")]
    IllegalMove {
        game_id: usize,
        #[source]
        source: MoveError,
    },

    #[error("game {game_id}: {player} passed while holding a legal move")]
    IllegalPass { game_id: usize, player: &'static str },

    #[error("self-play needs at least one thread")]
    NoThreads,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to encode game record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for a self-play run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Board edge length.
    pub board_size: usize,
    /// Player moving first.
    pub black: EngineConfig,
    /// Player moving second.
    pub white: EngineConfig,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress logging.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            board_size: STANDARD_SIZE,
            black: EngineConfig::default(),
            white: EngineConfig {
                strategy: StrategyKind::Random,
                ..EngineConfig::default()
            },
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

impl SelfPlayConfig {
    /// Checks the board size, thread count and both players' settings.
    pub fn validate(&self) -> Result<(), SelfPlayError> {
        Board::empty(self.board_size)?;
        if self.threads == 0 {
            return Err(SelfPlayError::NoThreads);
        }
        self.black.search_config()?;
        self.white.search_config()?;
        Ok(())
    }
}

/// A complete self-play game record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    /// Strategy name of the first player.
    pub black: String,
    /// Strategy name of the second player.
    pub white: String,
    /// Every move in order, `pass` included.
    pub moves: Vec<String>,
    /// Final token counts as `[black, white]`.
    pub final_counts: [usize; 2],
    /// Player with more tokens at the end; `None` for a draw.
    pub winner: Option<Player>,
}

/// Aggregate results over a set of games.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub games: usize,
    pub black_wins: usize,
    pub white_wins: usize,
    pub draws: usize,
    pub avg_moves: f64,
}

/// Gives a side without an explicit seed one drawn from the game RNG, so
/// seeded runs replay exactly and games within a run differ.
fn side_config(config: &EngineConfig, rng: &mut SmallRng) -> EngineConfig {
    let mut config = config.clone();
    if config.seed == 0 {
        config.seed = rng.gen_range(1..=u64::MAX);
    }
    config
}

/// Plays a single game to completion.
pub fn play_game(
    config: &SelfPlayConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, SelfPlayError> {
    let mut black = side_config(&config.black, rng).build_strategy()?;
    let mut white = side_config(&config.white, rng).build_strategy()?;

    let mut state = GameState::start(config.board_size)?;
    let mut moves = Vec::new();

    while !is_game_over(&state) {
        let strategy = match state.to_move {
            Player::Black => &mut black,
            Player::White => &mut white,
        };
        let choice = strategy.decide_move(&state);
        state = match choice {
            Some(mv) => try_apply_move(&state, mv)
                .map_err(|source| SelfPlayError::IllegalMove { game_id, source })?,
            None if has_legal_move(&state) => {
                return Err(SelfPlayError::IllegalPass {
                    game_id,
                    player: state.to_move.name(),
                })
            }
            None => state.pass(),
        };
        moves.push(format_move(choice));
    }

    let (b, w) = state.token_counts();
    Ok(GameRecord {
        game_id,
        black: black.name().to_string(),
        white: white.name().to_string(),
        moves,
        final_counts: [b, w],
        winner: state.leader(),
    })
}

fn game_rng(config: &SelfPlayConfig, game_id: usize) -> SmallRng {
    if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn play_logged(config: &SelfPlayConfig, game_id: usize) -> Result<GameRecord, SelfPlayError> {
    let game_start = Instant::now();
    let game = play_game(config, game_id, &mut game_rng(config, game_id))?;
    if !config.quiet {
        let outcome = match game.winner {
            Some(p) => format!("{} wins", p.name()),
            None => "draw".to_string(),
        };
        log::info!(
            "game {}/{}: {} {}-{} after {} moves ({:.2}s)",
            game_id + 1,
            config.num_games,
            outcome,
            game.final_counts[0],
            game.final_counts[1],
            game.moves.len(),
            game_start.elapsed().as_secs_f64()
        );
    }
    Ok(game)
}

/// Runs self-play, returning game records ordered by game ID.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    config.validate()?;

    if config.threads > 1 {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| {
            (0..config.num_games)
                .into_par_iter()
                .map(|i| play_logged(config, i))
                .collect()
        })
    } else {
        (0..config.num_games)
            .map(|i| play_logged(config, i))
            .collect()
    }
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> Result<(), SelfPlayError> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Tallies wins, draws and game length.
pub fn summarize(games: &[GameRecord]) -> Summary {
    let mut summary = Summary {
        games: games.len(),
        ..Summary::default()
    };
    let mut total_moves = 0usize;
    for game in games {
        total_moves += game.moves.len();
        match game.winner {
            Some(Player::Black) => summary.black_wins += 1,
            Some(Player::White) => summary.white_wins += 1,
            None => summary.draws += 1,
        }
    }
    summary.avg_moves = total_moves as f64 / games.len().max(1) as f64;
    summary
}

/// Logs a summary of self-play results.
pub fn log_summary(config: &SelfPlayConfig, games: &[GameRecord]) {
    let s = summarize(games);
    let pct = |n: usize| 100.0 * n as f64 / s.games.max(1) as f64;
    log::info!(
        "{} games on {}x{}: black ({}) {} ({:.1}%), white ({}) {} ({:.1}%), draws {} ({:.1}%), {:.1} moves/game",
        s.games,
        config.board_size,
        config.board_size,
        config.black.strategy,
        s.black_wins,
        pct(s.black_wins),
        config.white.strategy,
        s.white_wins,
        pct(s.white_wins),
        s.draws,
        pct(s.draws),
        s.avg_moves
    );
}
