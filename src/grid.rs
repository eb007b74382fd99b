//! Cell positions and scale factors derived from grid and canvas dimensions.

use crate::foundation::core::Point;
use crate::foundation::error::{TixelError, TixelResult};

/// Fraction of half a cell that a full-size dot covers.
pub const DOT_FILL: f64 = 0.95;

/// Largest accepted cells-per-side. Keeps `grid_size²` cell indices in `u32`.
pub const MAX_GRID_SIZE: u32 = 4096;

/// Offset that centers each dot in its cell.
const CELL_CENTER: f64 = 0.5;

/// Grid dimensions plus the canvas they are laid out on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    grid_size: u32,
    canvas_width: f64,
    canvas_height: f64,
}

pub(crate) fn check_grid_size(grid_size: u32) -> TixelResult<()> {
    if grid_size == 0 {
        return Err(TixelError::validation("grid_size must be >= 1"));
    }
    if grid_size > MAX_GRID_SIZE {
        return Err(TixelError::validation(format!(
            "grid_size must be <= {MAX_GRID_SIZE}, got {grid_size}"
        )));
    }
    Ok(())
}

impl GridConfig {
    /// Create a validated grid configuration.
    pub fn new(grid_size: u32, canvas_width: f64, canvas_height: f64) -> TixelResult<Self> {
        check_grid_size(grid_size)?;
        if !(canvas_width.is_finite() && canvas_width > 0.0) {
            return Err(TixelError::validation(format!(
                "canvas width must be finite and > 0, got {canvas_width}"
            )));
        }
        if !(canvas_height.is_finite() && canvas_height > 0.0) {
            return Err(TixelError::validation(format!(
                "canvas height must be finite and > 0, got {canvas_height}"
            )));
        }
        Ok(Self {
            grid_size,
            canvas_width,
            canvas_height,
        })
    }

    /// Number of cells along each axis.
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Canvas width in pixels.
    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Canvas height in pixels.
    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Horizontal pixels per cell.
    pub fn cell_scale_x(&self) -> f64 {
        self.canvas_width / f64::from(self.grid_size)
    }

    /// Vertical pixels per cell.
    pub fn cell_scale_y(&self) -> f64 {
        self.canvas_height / f64::from(self.grid_size)
    }

    /// Radius of a dot whose clamped value has magnitude 1.
    ///
    /// Derived from the width only, so non-square canvases keep round dots.
    pub fn max_radius(&self) -> f64 {
        (self.canvas_width / f64::from(self.grid_size) / 2.0) * DOT_FILL
    }

    /// Total number of cells (`grid_size²`).
    pub fn cell_count(&self) -> usize {
        let n = self.grid_size as usize;
        n * n
    }
}

/// One grid position with its precomputed canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    /// Column in `[0, grid_size)`.
    pub col: u32,
    /// Row in `[0, grid_size)`.
    pub row: u32,
    /// Row-major flat index, `row * grid_size + col`.
    pub index: u32,
    /// Dot center x in canvas pixels.
    pub canvas_x: f64,
    /// Dot center y in canvas pixels.
    pub canvas_y: f64,
}

impl Cell {
    /// Dot center as a point.
    pub fn center(&self) -> Point {
        Point::new(self.canvas_x, self.canvas_y)
    }
}

/// Compute every cell of an `N x N` grid in row-major order.
pub fn compute_cells(grid_size: u32, width: f64, height: f64) -> TixelResult<Vec<Cell>> {
    let config = GridConfig::new(grid_size, width, height)?;
    Ok(cells_for(&config))
}

fn cells_for(config: &GridConfig) -> Vec<Cell> {
    let n = config.grid_size;
    let sx = config.cell_scale_x();
    let sy = config.cell_scale_y();
    let mut cells = Vec::with_capacity(config.cell_count());
    for row in 0..n {
        for col in 0..n {
            cells.push(Cell {
                col,
                row,
                index: row * n + col,
                canvas_x: sx * (f64::from(col) + CELL_CENTER),
                canvas_y: sy * (f64::from(row) + CELL_CENTER),
            });
        }
    }
    cells
}

/// A [`GridConfig`] together with the cells derived from it.
///
/// Every mutation rebuilds the cell list, so the two never disagree.
#[derive(Clone, Debug)]
pub struct GridLayout {
    config: GridConfig,
    cells: Vec<Cell>,
}

impl GridLayout {
    /// Build a layout from validated dimensions.
    pub fn new(grid_size: u32, canvas_width: f64, canvas_height: f64) -> TixelResult<Self> {
        let config = GridConfig::new(grid_size, canvas_width, canvas_height)?;
        Ok(Self::from_config(config))
    }

    /// Build a layout from an existing configuration.
    pub fn from_config(config: GridConfig) -> Self {
        let cells = cells_for(&config);
        Self { config, cells }
    }

    /// Current configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Change the canvas size, keeping the grid size.
    pub fn resize(&mut self, canvas_width: f64, canvas_height: f64) -> TixelResult<()> {
        let config = GridConfig::new(self.config.grid_size, canvas_width, canvas_height)?;
        *self = Self::from_config(config);
        Ok(())
    }

    /// Change the grid size, keeping the canvas size.
    pub fn set_grid_size(&mut self, grid_size: u32) -> TixelResult<()> {
        let config = GridConfig::new(
            grid_size,
            self.config.canvas_width,
            self.config.canvas_height,
        )?;
        *self = Self::from_config(config);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/grid.rs"]
mod tests;
