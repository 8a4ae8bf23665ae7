//! Cell Grid
//!
//! A flat, row-major array of cells. Index of `(x, y)` is `y * cols + x`.

use super::cell::Cell;
use super::style::Style;

/// The visible grid of cells
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Cell>,
    cols: usize,
    rows: usize,
}

impl Grid {
    /// Allocate a blank grid. Dimensions are clamped to at least 1x1.
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cells: vec![Cell::default(); cols * rows],
            cols,
            rows,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// `(cols, rows)`
    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Flat index of `(x, y)`, or `None` outside the grid
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some(y * self.cols + x)
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index(x, y).map(move |i| &mut self.cells[i])
    }

    /// Overwrite every cell with `ch` in `style`
    pub fn fill(&mut self, ch: char, style: Style) {
        for cell in &mut self.cells {
            cell.set(ch, &[], style);
        }
    }

    /// Mark every cell for re-resolution
    pub fn invalidate(&mut self) {
        for cell in &mut self.cells {
            cell.invalidate();
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}
