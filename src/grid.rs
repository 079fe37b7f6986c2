//! Square grid topology and the clamping cell indexer.

use crate::error::FluidError;

/// Smallest grid that still has an interior ring of cells.
pub const MIN_GRID_SIZE: usize = 3;

/// Largest grid whose cell count still fits in an `i32`.
pub const MAX_GRID_SIZE: usize = 46_340;

/// An `N x N` grid. Cells are stored row-major as `y * N + x`.
///
/// Coordinates handed to [`Grid::index`] are clamped to the grid edge, never
/// wrapped, so every lookup resolves into `[0, N*N)`. Advection relies on this
/// when its bilinear stencil reaches one cell past the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: usize,
}

impl Grid {
    pub fn new(size: usize) -> Result<Self, FluidError> {
        if size < MIN_GRID_SIZE {
            return Err(FluidError::InvalidConfiguration(format!(
                "grid size {size} is below the minimum of {MIN_GRID_SIZE}"
            )));
        }
        if size > MAX_GRID_SIZE {
            return Err(FluidError::InvalidConfiguration(format!(
                "grid size {size} exceeds the maximum of {MAX_GRID_SIZE}"
            )));
        }
        Ok(Self { size })
    }

    /// Side length `N`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length as a signed coordinate bound.
    #[inline]
    pub fn size_i32(&self) -> i32 {
        self.size as i32
    }

    /// Number of cells, `N * N`.
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Storage offset of cell `(x, y)`, clamping each coordinate to `[0, N-1]`.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> usize {
        let last = self.size_i32() - 1;
        let x = x.clamp(0, last) as usize;
        let y = y.clamp(0, last) as usize;
        y * self.size + x
    }

    /// Storage offset for a continuous position, truncated toward zero first.
    pub fn index_of(&self, x: f32, y: f32) -> usize {
        self.index(x as i32, y as i32)
    }
}
