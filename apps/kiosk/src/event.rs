//! # Kiosk Events
//!
//! Everything the event loop reacts to arrives as a [`KioskEvent`] on one
//! mpsc channel.
//!
//! ```text
//!   keyboard task ──► Key / Command / InputClosed ─┐
//!   ad ticker     ──► RotateAd                     ├──► event loop
//!   toast ticker  ──► PruneNotifications           ┘
//! ```
//!
//! ## Operator Commands
//! | Line             | Command                        |
//! |------------------|--------------------------------|
//! | `/search [q]`    | add first match for `q`        |
//! | `/find [q]`      | list matches for `q`           |
//! | `/rec <n>`       | add recommendation `n` (1-based) |
//! | `/inc <id>`      | quantity +1                    |
//! | `/dec <id>`      | quantity -1 (floor 1)          |
//! | `/rm <id>`       | remove line                    |
//! | `/pay`           | proceed to payment             |
//! | `/clear`         | dismiss the error banner       |
//! | `/quit`          | end the session                |

use std::time::Instant;

use checkout_core::KeyEvent;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskEvent {
    /// One raw key press from the scanner or keyboard.
    Key(KeyEvent),
    Command(Command),
    RotateAd,
    PruneNotifications(Instant),
    /// Stdin reached EOF.
    InputClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Find(String),
    /// Zero-based index into the recommendation panel.
    AddRecommended(usize),
    ChangeQuantity { product_id: String, delta: i64 },
    Remove(String),
    Pay,
    ClearError,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: /{0}")]
    Unknown(String),

    #[error("/{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("Invalid recommendation number: {0}")]
    InvalidIndex(String),
}

impl Command {
    /// Parses an operator line. The leading `/` is optional.
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let required = |cmd: &'static str| {
            if arg.is_empty() {
                Err(CommandError::MissingArgument(cmd))
            } else {
                Ok(arg.to_string())
            }
        };

        match name.to_lowercase().as_str() {
            // an empty query is contained in every name
            "search" => Ok(Command::Search(arg.to_string())),
            "find" => Ok(Command::Find(arg.to_string())),
            "rec" => {
                let raw = required("rec")?;
                match raw.parse::<usize>() {
                    Ok(n) if n >= 1 => Ok(Command::AddRecommended(n - 1)),
                    _ => Err(CommandError::InvalidIndex(raw)),
                }
            }
            "inc" => Ok(Command::ChangeQuantity {
                product_id: required("inc")?,
                delta: 1,
            }),
            "dec" => Ok(Command::ChangeQuantity {
                product_id: required("dec")?,
                delta: -1,
            }),
            "rm" => Ok(Command::Remove(required("rm")?)),
            "pay" => Ok(Command::Pay),
            "clear" => Ok(Command::ClearError),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
