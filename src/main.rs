//! Donathello -- an Othello engine speaking a line-based text protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr through `env_logger` (`RUST_LOG`, default
//! `warn`).

use std::io::{self, BufRead, Write};

use donathello::engine::{Engine, EngineError};
use donathello::protocol::{parse_command, Command};

/// Runs the main protocol loop, reading commands from stdin and writing
/// responses to stdout.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("failed to read stdin: {e}");
                break;
            }
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        let result: Result<(), EngineError> = match cmd {
            Command::Otp => engine.handle_handshake(&mut out).map_err(EngineError::from),
            Command::IsReady => engine.handle_isready(&mut out).map_err(EngineError::from),
            Command::SetOption { name, value } => engine.set_option(&name, value.as_deref()),
            Command::NewGame => engine.new_game(),
            Command::Position(spec) => engine.set_position(&spec),
            Command::Go(params) => engine.handle_go(&params, &mut out),
            Command::Eval => engine.handle_eval(&mut out),
            // Searches are synchronous; nothing to interrupt.
            Command::Stop => Ok(()),
            Command::Quit => break,
        };

        match result {
            Ok(()) => {}
            Err(EngineError::Io(e)) => {
                log::error!("stdout closed: {e}");
                break;
            }
            Err(e) => log::warn!("{line}: {e}"),
        }
    }

    let _ = out.flush();
}
