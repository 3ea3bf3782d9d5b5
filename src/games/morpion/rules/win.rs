//! Win detection logic for morpion.
//!
//! Only the lines through the last placed cell are inspected. For each of
//! the four axes a window of up to `2 * win_condition - 1` cells centred on
//! that cell is scanned for `win_condition` consecutive equal marks.
//!
//! The window is clamped by walking outward from the played cell one step at
//! a time along the axis direction and stopping at the first step that
//! leaves the grid. Both coordinates are clamped together, so the diagonal
//! and anti-diagonal windows are always the in-bounds segment of the real
//! line through the cell and never a mirrored approximation of it.

use super::super::{Cell, Grid, Mark};
use tracing::instrument;

/// A line direction through a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
pub enum Axis {
    /// Along a row.
    Horizontal,
    /// Along a column.
    Vertical,
    /// Top-left to bottom-right.
    Diagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl Axis {
    /// Row and column delta of one step along this axis.
    fn direction(self) -> (isize, isize) {
        match self {
            Axis::Horizontal => (0, 1),
            Axis::Vertical => (1, 0),
            Axis::Diagonal => (1, 1),
            Axis::AntiDiagonal => (1, -1),
        }
    }

    /// Cell reached by moving `offset` steps from `(row, column)`.
    fn step(self, grid: &Grid, row: usize, column: usize, offset: isize) -> Option<(usize, usize)> {
        let (dr, dc) = self.direction();
        let r = usize::try_from(row as isize + dr * offset).ok()?;
        let c = usize::try_from(column as isize + dc * offset).ok()?;
        grid.in_bounds(r, c).then_some((r, c))
    }

    /// Whether the window along this axis holds a run of `win_condition`.
    fn has_run(self, grid: &Grid, row: usize, column: usize, mark: Mark, win_condition: usize) -> bool {
        let reach = win_condition as isize - 1;

        let mut low = 0;
        while low > -reach && self.step(grid, row, column, low - 1).is_some() {
            low -= 1;
        }
        let mut high = 0;
        while high < reach && self.step(grid, row, column, high + 1).is_some() {
            high += 1;
        }

        let mut count = 0;
        for offset in low..=high {
            let cell = self
                .step(grid, row, column, offset)
                .and_then(|(r, c)| grid.get(r, c));
            if cell == Some(Cell::Occupied(mark)) {
                count += 1;
                if count >= win_condition {
                    return true;
                }
            } else {
                count = 0;
            }
        }
        false
    }
}

/// Returns the first axis through `(row, column)` holding a winning run of
/// `mark`, if any.
#[instrument(skip(grid))]
pub fn winning_axis(
    grid: &Grid,
    row: usize,
    column: usize,
    mark: Mark,
    win_condition: usize,
) -> Option<Axis> {
    if win_condition == 0 || !grid.in_bounds(row, column) {
        return None;
    }
    <Axis as strum::IntoEnumIterator>::iter()
        .find(|axis| axis.has_run(grid, row, column, mark, win_condition))
}

/// Checks whether the move just played at `(row, column)` completes a run
/// of `win_condition` consecutive `mark`s on any axis.
pub fn is_winning_move(
    grid: &Grid,
    row: usize,
    column: usize,
    mark: Mark,
    win_condition: usize,
) -> bool {
    winning_axis(grid, row, column, mark, win_condition).is_some()
}
