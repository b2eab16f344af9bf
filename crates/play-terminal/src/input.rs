//! Parsing of typed commands.

use board_core::Square;
use board_engine::Difficulty;
use thiserror::Error;

/// A line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Select a piece, or move the selected piece there.
    Square(Square),
    /// Move in one go, e.g. `e2 e4` or `e2e4`.
    Move(Square, Square),
    /// Choose the promotion piece by its letter.
    Promote(char),
    Undo,
    Hint,
    NewGame,
    /// Set the difficulty, or cycle it when none is given.
    Difficulty(Option<Difficulty>),
    Resign,
    Scores,
    Board,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("empty input")]
    Empty,
    #[error("unknown command: {0} (type 'help')")]
    UnknownCommand(String),
    #[error("invalid square: {0}")]
    InvalidSquare(String),
    #[error("{0}")]
    InvalidDifficulty(#[from] board_engine::ParseDifficultyError),
    #[error("usage: promote <q|r|b|n>")]
    MissingPiece,
}

pub const HELP: &str = "\
commands:
  <square>            select a piece, or move the selected piece there
  <from> <to>         move, e.g. e2 e4 (or e2e4)
  promote <q|r|b|n>   choose a promotion piece
  undo | hint | new | resign | scores | board | help | quit
  difficulty [easy|medium|hard]";

fn square(text: &str) -> Result<Square, InputError> {
    Square::from_algebraic(text).ok_or_else(|| InputError::InvalidSquare(text.to_string()))
}

/// Parses one line of input.
pub fn parse(line: &str) -> Result<Input, InputError> {
    let words: Vec<String> = line.split_whitespace().map(str::to_lowercase).collect();
    let Some(first) = words.first() else {
        return Err(InputError::Empty);
    };

    let input = match first.as_str() {
        "undo" | "u" => Input::Undo,
        "hint" | "h" => Input::Hint,
        "new" => Input::NewGame,
        "resign" => Input::Resign,
        "scores" => Input::Scores,
        "board" | "b" => Input::Board,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        "difficulty" | "d" => match words.get(1) {
            Some(level) => Input::Difficulty(Some(level.parse()?)),
            None => Input::Difficulty(None),
        },
        "promote" | "p" => {
            let piece = words
                .get(1)
                .and_then(|w| w.chars().next())
                .ok_or(InputError::MissingPiece)?;
            Input::Promote(piece)
        }
        word if word.is_ascii() && word.len() == 4 && words.len() == 1 => {
            Input::Move(square(&word[..2])?, square(&word[2..])?)
        }
        word if word.len() == 2 => match words.get(1) {
            Some(to) => Input::Move(square(word)?, square(to)?),
            None => Input::Square(square(word)?),
        },
        word => return Err(InputError::UnknownCommand(word.to_string())),
    };
    Ok(input)
}
