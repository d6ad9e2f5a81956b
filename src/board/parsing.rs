use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

use crate::board::owned::OwnedBoard;

impl FromStr for OwnedBoard {
    type Err = BoardCreationError;

    /// Parses a whitespace-separated row-major cell list, e.g.
    /// `1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 0` for a solved 4x4 board.
    /// The number of values determines the board side.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<u8> = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()?;

        Self::new(cells)
    }
}

#[derive(Debug, Clone)]
pub enum BoardCreationError {
    ParsingError(ParseIntError),
    /// The number of cells is not a supported square
    InvalidSize(usize),
    MissingCells,
    DuplicateCells,
}

impl From<ParseIntError> for BoardCreationError {
    fn from(value: ParseIntError) -> Self {
        BoardCreationError::ParsingError(value)
    }
}

impl Display for BoardCreationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardCreationError::ParsingError(err) => {
                write!(f, "Error while parsing board: {err}")
            }
            BoardCreationError::InvalidSize(count) => {
                write!(f, "{count} cells do not form a square board")
            }
            BoardCreationError::MissingCells => write!(
                f,
                "The board does not contain all of the required cell values"
            ),
            BoardCreationError::DuplicateCells => {
                write!(f, "The board contains multiple cells with the same number")
            }
        }
    }
}

impl Error for BoardCreationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BoardCreationError::ParsingError(err) => Some(err),
            _ => None,
        }
    }
}
