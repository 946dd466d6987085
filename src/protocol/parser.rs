//! OTP command parser.
//!
//! Parses incoming protocol commands from raw text into structured
//! `Command` variants that the engine main loop can dispatch on.

/// Search constraints passed with the `go` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u32>,
    pub movetime: Option<u64>,
}

/// Position source for the `position` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionSpec {
    /// Standard start position, optionally on a non-standard board size.
    StartPos { size: Option<usize> },
    /// Explicit board notation including the side to move.
    Board { notation: String },
}

/// A parsed driver-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize the protocol handshake.
    Otp,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Reset engine state for a new game.
    NewGame,

    /// Set the board position.
    Position(PositionSpec),

    /// Choose a move with optional search constraints.
    Go(GoParams),

    /// Report the static evaluation of the current position.
    Eval,

    /// Interrupt the current search.
    Stop,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, _) = tokens.split_first()?;

    match head {
        "otp" => Some(Command::Otp),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),
        "stop" => Some(Command::Stop),
        "eval" => Some(Command::Eval),

        "setoption" => parse_setoption(&tokens),
        "position" => parse_position(&tokens),
        "go" => parse_go(&tokens),

        other => {
            log::warn!("unknown command: {other}");
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        log::warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let (name, value) = match tokens.iter().position(|&t| t == "value") {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                log::warn!("malformed setoption: empty name");
                return None;
            }
            let value = (!value_parts.is_empty()).then(|| value_parts.join(" "));
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `position startpos [size <n>]` or `position <rows> <side>`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    match tokens {
        [_, "startpos"] => Some(Command::Position(PositionSpec::StartPos { size: None })),
        [_, "startpos", "size", n] => match n.parse::<usize>() {
            Ok(size) => Some(Command::Position(PositionSpec::StartPos { size: Some(size) })),
            Err(_) => {
                log::warn!("invalid board size: '{n}'");
                None
            }
        },
        [_, rows, side] => Some(Command::Position(PositionSpec::Board {
            notation: format!("{rows} {side}"),
        })),
        _ => {
            log::warn!("malformed position: expected 'position startpos [size <n>]' or 'position <rows> <side>'");
            None
        }
    }
}

/// Parses `go [depth <n>] [movetime <ms>]`.
fn parse_go(tokens: &[&str]) -> Option<Command> {
    let mut params = GoParams::default();
    let mut i = 1;

    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                if let Some(t) = tokens.get(i) {
                    match t.parse::<u32>() {
                        Ok(v) => params.depth = Some(v),
                        Err(_) => log::warn!("invalid depth value: '{t}'"),
                    }
                }
            }
            "movetime" => {
                i += 1;
                if let Some(t) = tokens.get(i) {
                    match t.parse::<u64>() {
                        Ok(v) => params.movetime = Some(v),
                        Err(_) => log::warn!("invalid movetime value: '{t}'"),
                    }
                }
            }
            other => log::warn!("unknown go parameter: '{other}'"),
        }
        i += 1;
    }

    Some(Command::Go(params))
}
