// crates/nim-client/src/command.rs

use std::str::FromStr;

use nim_core::Move;
use thiserror::Error;

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    NewGame,
    Move(Move),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (h for help)")]
    Unknown(String),

    #[error("a move needs three numbers: pile start amount")]
    WrongArity,

    #[error("{field} '{value}' is not a number from 0 to 255")]
    BadNumber { field: &'static str, value: String },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();

        match words.as_slice() {
            [] => Err(CommandError::Empty),
            [w] if w.eq_ignore_ascii_case("h") || w.eq_ignore_ascii_case("help") => {
                Ok(Command::Help)
            }
            [w] if w.eq_ignore_ascii_case("q") => Ok(Command::Quit),
            [w] if w.eq_ignore_ascii_case("n") => Ok(Command::NewGame),
            [pile, start, amount] => Ok(Command::Move(Move::new(
                number("pile", pile)?,
                number("start", start)?,
                number("amount", amount)?,
            ))),
            [w] if w.parse::<u8>().is_err() => Err(CommandError::Unknown(w.to_string())),
            _ => Err(CommandError::WrongArity),
        }
    }
}

fn number(field: &'static str, value: &str) -> Result<u8, CommandError> {
    value.parse().map_err(|_| CommandError::BadNumber {
        field,
        value: value.to_string(),
    })
}
