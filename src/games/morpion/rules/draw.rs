//! Draw detection logic for morpion.

use super::super::{Cell, Grid};
use tracing::instrument;

/// Checks if the grid is full (every cell occupied).
///
/// A full grid after a move that did not win is a draw.
#[instrument(skip(grid), fields(size = grid.size()))]
pub fn is_full(grid: &Grid) -> bool {
    grid.cells().iter().all(|c| *c != Cell::Empty)
}
