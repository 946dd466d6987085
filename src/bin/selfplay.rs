//! Self-play match CLI.
//!
//! Plays Othello games between two strategies and writes one JSONL record
//! per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N        Number of games to play (default: 10)
//!   --size N         Board size, even, 4-26 (default: 8)
//!   --black NAME     Black strategy: minimax, greedy, random, first (default: minimax)
//!   --white NAME     White strategy (default: random)
//!   --depth N        Search depth for minimax players (default: 5)
//!   --threads N      Number of parallel threads (default: 4)
//!   --seed N         Random seed, 0 for entropy (default: 0)
//!   --config FILE    JSON self-play configuration; flags override it
//!   --output FILE    Output file path (default: stdout)
//!   --quiet          Suppress progress and summary logging

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use donathello::config::StrategyKind;
use donathello::selfplay::{self, SelfPlayConfig, SelfPlayError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("invalid value '{value}' for {flag}")]
    InvalidValue { flag: String, value: String },

    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    #[error("cannot read {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed config file: {0}")]
    ParseConfig(#[from] serde_json::Error),

    #[error(transparent)]
    SelfPlay(#[from] SelfPlayError),

    #[error("cannot create {path}: {source}")]
    CreateOutput {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Flags as given on the command line; unset flags keep the config value.
#[derive(Default)]
struct Args {
    config_path: Option<String>,
    output_path: Option<String>,
    games: Option<usize>,
    size: Option<usize>,
    black: Option<StrategyKind>,
    white: Option<StrategyKind>,
    depth: Option<u32>,
    threads: Option<usize>,
    seed: Option<u64>,
    quiet: bool,
    help: bool,
}

fn value<T: FromStr>(args: &[String], i: usize) -> Result<T, CliError> {
    let flag = &args[i - 1];
    let raw = args
        .get(i)
        .ok_or_else(|| CliError::MissingValue(flag.clone()))?;
    raw.parse().map_err(|_| CliError::InvalidValue {
        flag: flag.clone(),
        value: raw.clone(),
    })
}

fn parse_args(args: &[String]) -> Result<Args, CliError> {
    let mut parsed = Args::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                parsed.games = Some(value(args, i)?);
            }
            "--size" => {
                i += 1;
                parsed.size = Some(value(args, i)?);
            }
            "--black" => {
                i += 1;
                parsed.black = Some(value(args, i)?);
            }
            "--white" => {
                i += 1;
                parsed.white = Some(value(args, i)?);
            }
            "--depth" => {
                i += 1;
                parsed.depth = Some(value(args, i)?);
            }
            "--threads" => {
                i += 1;
                parsed.threads = Some(value(args, i)?);
            }
            "--seed" => {
                i += 1;
                parsed.seed = Some(value(args, i)?);
            }
            "--config" => {
                i += 1;
                parsed.config_path = Some(value(args, i)?);
            }
            "--output" => {
                i += 1;
                parsed.output_path = Some(value(args, i)?);
            }
            "--quiet" => parsed.quiet = true,
            "--help" | "-h" => parsed.help = true,
            other => return Err(CliError::UnknownArgument(other.to_string())),
        }
        i += 1;
    }
    Ok(parsed)
}

fn build_config(args: &Args) -> Result<SelfPlayConfig, CliError> {
    let mut config = match &args.config_path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&text)?
        }
        None => SelfPlayConfig::default(),
    };

    if let Some(n) = args.games {
        config.num_games = n;
    }
    if let Some(n) = args.size {
        config.board_size = n;
    }
    if let Some(kind) = args.black {
        config.black.strategy = kind;
    }
    if let Some(kind) = args.white {
        config.white.strategy = kind;
    }
    if let Some(depth) = args.depth {
        config.black.depth = depth;
        config.white.depth = depth;
    }
    if let Some(n) = args.threads {
        config.threads = n;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.quiet |= args.quiet;
    Ok(config)
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = build_config(args)?;
    config.validate()?;

    if !config.quiet {
        log::info!(
            "self-play: {} games on {}x{}, black {} (depth {}) vs white {} (depth {}), {} threads",
            config.num_games,
            config.board_size,
            config.board_size,
            config.black.strategy,
            config.black.depth,
            config.white.strategy,
            config.white.depth,
            config.threads
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&config)?;
    let elapsed = start.elapsed();

    if !config.quiet {
        log::info!(
            "completed {} games in {:.1}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        selfplay::log_summary(&config, &games);
    }

    match &args.output_path {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            selfplay::write_jsonl(&games, &mut BufWriter::new(file))?;
            if !config.quiet {
                log::info!("wrote {} games to {}", games.len(), path);
            }
        }
        None => {
            let stdout = io::stdout();
            selfplay::write_jsonl(&games, &mut BufWriter::new(stdout.lock()))?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::error!("{e}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };
    if parsed.help {
        print_usage();
        return ExitCode::SUCCESS;
    }

    match run(&parsed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --size N         Board size, even, 4-26 (default: 8)");
    eprintln!("  --black NAME     Black strategy: minimax, greedy, random, first (default: minimax)");
    eprintln!("  --white NAME     White strategy (default: random)");
    eprintln!("  --depth N        Search depth for minimax players (default: 5)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --config FILE    JSON self-play configuration; flags override it");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary logging");
    eprintln!("  --help           Show this help");
}
