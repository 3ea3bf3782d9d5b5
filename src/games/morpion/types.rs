//! Core domain types for morpion.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// A mark a seat places on the grid.
///
/// Seats receive marks in declaration order: seat 1 plays `X`,
/// seat 2 plays `O`, and so on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
pub enum Mark {
    /// First seat.
    #[serde(rename = "X")]
    #[strum(serialize = "X")]
    X,
    /// Second seat.
    #[serde(rename = "O")]
    #[strum(serialize = "O")]
    O,
    /// Third seat.
    #[serde(rename = "+")]
    #[strum(serialize = "+")]
    Plus,
    /// Fourth seat.
    #[serde(rename = "*")]
    #[strum(serialize = "*")]
    Star,
}

impl Mark {
    /// Returns the mark assigned to a 1-based seat, if one exists.
    pub fn for_seat(seat_id: usize) -> Option<Self> {
        seat_id.checked_sub(1).and_then(|idx| Self::iter().nth(idx))
    }
}

/// A cell on the grid.
///
/// On the wire an empty cell is `""` and an occupied cell is the mark's
/// symbol, so a drawn `gameOver` carries `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Cell taken by a mark.
    Occupied(Mark),
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => String::new(),
            Cell::Occupied(mark) => mark.to_string(),
        }
    }
}

impl TryFrom<String> for Cell {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Cell::Empty);
        }
        Mark::from_str(&value).map(Cell::Occupied)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => write!(f, "."),
            Cell::Occupied(mark) => write!(f, "{}", mark),
        }
    }
}
