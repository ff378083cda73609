//! Grid partition of a screen into labelled cells.
//!
//! A screen is divided into `n × n` cells using integer division, so the
//! cells may fall short of the right and bottom edges by at most `n - 1`
//! pixels.  Row `i` is labelled with the letter `'A' + i`, column `j` with
//! the number `j + 1`: `A1 … A{n}`, `B1 … B{n}`, and so on.
//!
//! Cell rectangles are relative to the screen origin; [`Grid`] adds the
//! origin back when resolving a label to a pointer coordinate.

use crate::command::{Point, ScreenGeometry};

/// Largest supported grid dimension (one row per letter).
pub const MAX_GRID_SIZE: usize = 26;

/// Errors from building a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The grid dimension is not positive or exceeds the 26 available row
    /// letters.  Signed so that negative configured sizes are reported as is.
    #[error("invalid grid size {0} (expected 1..=26)")]
    InvalidGrid(i64),
}

/// A rectangle relative to the screen origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Whether `(x, y)` lies inside the rectangle (edges inclusive).
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Centre point, rounded down.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// One labelled cell of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Row letter followed by 1-based column number, e.g. `"C4"`.
    pub label: String,
    pub rect: Rect,
}

/// Row letter for a 0-based row index.
fn row_letter(row: usize) -> char {
    (b'A' + row as u8) as char
}

/// Partition `screen` into `n × n` labelled cells, row by row.
pub fn compute_cells(screen: &ScreenGeometry, n: usize) -> Result<Vec<Cell>, GridError> {
    if n == 0 || n > MAX_GRID_SIZE {
        return Err(GridError::InvalidGrid(i64::try_from(n).unwrap_or(i64::MAX)));
    }
    let cell_width = (screen.width / n as u32) as i32;
    let cell_height = (screen.height / n as u32) as i32;

    let mut cells = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            cells.push(Cell {
                label: format!("{}{}", row_letter(row), col + 1),
                rect: Rect {
                    x: col as i32 * cell_width,
                    y: row as i32 * cell_height,
                    width: cell_width,
                    height: cell_height,
                },
            });
        }
    }
    Ok(cells)
}

/// Centre of the cell labelled `label`, relative to the screen origin.
///
/// Returns `None` for labels that are not part of the grid.
pub fn cell_center(cells: &[Cell], label: &str) -> Option<(i32, i32)> {
    cells
        .iter()
        .find(|c| c.label == label)
        .map(|c| c.rect.center())
}

/// The cell set of one screen, kept together with the screen it was
/// computed for.
#[derive(Debug, Clone)]
pub struct Grid {
    screen: ScreenGeometry,
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(screen: ScreenGeometry, size: usize) -> Result<Self, GridError> {
        let cells = compute_cells(&screen, size)?;
        Ok(Self {
            screen,
            size,
            cells,
        })
    }

    pub fn screen(&self) -> &ScreenGeometry {
        &self.screen
    }

    /// Grid dimension `n` (the grid has `n × n` cells).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Width and height of every cell.
    pub fn cell_size(&self) -> (i32, i32) {
        self.cells
            .first()
            .map(|c| (c.rect.width, c.rect.height))
            .unwrap_or((0, 0))
    }

    /// Absolute pointer coordinate of the centre of `label`.
    pub fn center(&self, label: &str) -> Option<Point> {
        cell_center(&self.cells, label)
            .map(|(x, y)| Point::new(self.screen.x + x, self.screen.y + y))
    }
}
