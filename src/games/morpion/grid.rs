//! Square playing grid.

use super::types::{Cell, Mark};

/// Square grid of cells stored in row-major order.
///
/// The side length is fixed at construction. Cells only ever go from
/// `Empty` to `Occupied`; there is no way to clear one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty grid with the given side length.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether `(row, column)` lies on the grid.
    pub fn in_bounds(&self, row: usize, column: usize) -> bool {
        row < self.size && column < self.size
    }

    /// Gets the cell at `(row, column)`, or `None` off the grid.
    pub fn get(&self, row: usize, column: usize) -> Option<Cell> {
        if !self.in_bounds(row, column) {
            return None;
        }
        self.cells.get(row * self.size + column).copied()
    }

    /// Whether `(row, column)` is on the grid and still empty.
    pub fn is_empty(&self, row: usize, column: usize) -> bool {
        matches!(self.get(row, column), Some(Cell::Empty))
    }

    /// Places a mark on an empty cell.
    ///
    /// Returns `false` and leaves the grid untouched when the cell is off
    /// the grid or already taken.
    pub fn place(&mut self, row: usize, column: usize, mark: Mark) -> bool {
        if !self.is_empty(row, column) {
            return false;
        }
        self.cells[row * self.size + column] = Cell::Occupied(mark);
        true
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Formats the grid as rows of symbols, `.` for empty cells.
    pub fn display(&self) -> String {
        self.cells
            .chunks(self.size.max(1))
            .map(|row| {
                row.iter()
                    .map(|cell| cell.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
