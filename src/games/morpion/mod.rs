//! Generalized tic-tac-toe: an N×N grid, up to four marks, K in a row wins.

mod grid;
mod phases;
pub mod rules;
mod types;

pub use grid::Grid;
pub use phases::{MatchState, Outcome};
pub use types::{Cell, Mark};
