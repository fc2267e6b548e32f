//! Cache operation scripts
//!
//! A script holds one command per line: `put <key> <value>`, `get <key>`
//! or `len`. Blank lines and `#` comments are skipped.

use anyhow::{Context, Result};
use lru_core::LruCache;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Replays the reference scenario; meant for a capacity-2 cache
pub const DEMO_SCRIPT: &str = "\
# put two keys, touch 1, then force two evictions
put 1 1
put 2 2
len
get 1
put 3 3
len
get 2
put 4 4
len
get 1
get 3
get 4
";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("`{command}` takes {expected} argument(s), got {actual}")]
    Arity {
        command: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid integer: {0}")]
    InvalidInteger(String),
}

/// A single cache operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Put { key: i64, value: i64 },
    Get { key: i64 },
    Len,
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let (command, expected) = match name.to_lowercase().as_str() {
            "put" => ("put", 2),
            "get" => ("get", 1),
            "len" => ("len", 0),
            _ => return Err(ParseCommandError::Unknown(name.to_string())),
        };

        if args.len() != expected {
            return Err(ParseCommandError::Arity {
                command,
                expected,
                actual: args.len(),
            });
        }

        match command {
            "put" => Ok(Command::Put {
                key: parse_int(args[0])?,
                value: parse_int(args[1])?,
            }),
            "get" => Ok(Command::Get {
                key: parse_int(args[0])?,
            }),
            _ => Ok(Command::Len),
        }
    }
}

fn parse_int(s: &str) -> Result<i64, ParseCommandError> {
    s.parse()
        .map_err(|_| ParseCommandError::InvalidInteger(s.to_string()))
}

/// Parse a whole script, failing on the first bad line
pub fn parse_script(input: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        let command = line
            .parse::<Command>()
            .with_context(|| format!("line {}: {}", idx + 1, raw.trim()))?;
        commands.push(command);
    }

    Ok(commands)
}

/// Apply `commands` to `cache`, writing one line per `get` and `len`
pub fn run<W: Write>(
    cache: &mut LruCache<i64, i64>,
    commands: &[Command],
    out: &mut W,
) -> Result<()> {
    debug!("Replaying {} commands", commands.len());

    for command in commands {
        match *command {
            Command::Put { key, value } => cache.put(key, value),
            Command::Get { key } => match cache.get(&key) {
                Some(value) => writeln!(out, "get {} -> {}", key, value)?,
                None => writeln!(out, "get {} -> miss", key)?,
            },
            Command::Len => writeln!(out, "len -> {}", cache.len())?,
        }
    }

    Ok(())
}
