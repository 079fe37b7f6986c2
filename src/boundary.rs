//! Edge and corner rules applied after every relaxation pass.

use crate::grid::Grid;

/// Weight of each of the three samples averaged into a corner cell.
const CORNER_WEIGHT: f32 = 1.0 / 3.0;

/// Which boundary rule a field obeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Density, pressure and divergence: edges copy their interior neighbour.
    Neutral,
    /// X velocity: negated across the left and right edges.
    HorizontalVelocity,
    /// Y velocity: negated across the top and bottom edges.
    VerticalVelocity,
}

impl Boundary {
    fn flips_left_right(self) -> bool {
        self == Boundary::HorizontalVelocity
    }

    fn flips_top_bottom(self) -> bool {
        self == Boundary::VerticalVelocity
    }
}

/// Rewrite the four edges and four corners of `field` for boundary `kind`.
///
/// Edges are written first; each corner then becomes the mean of its two
/// freshly written edge neighbours and its own current value.
pub fn set_boundary(grid: &Grid, kind: Boundary, field: &mut [f32]) {
    debug_assert_eq!(field.len(), grid.cell_count());
    let n = grid.size_i32();
    let ix = |x: i32, y: i32| grid.index(x, y);

    let top_bottom = if kind.flips_top_bottom() { -1.0 } else { 1.0 };
    for i in 1..n - 1 {
        field[ix(i, 0)] = top_bottom * field[ix(i, 1)];
        field[ix(i, n - 1)] = top_bottom * field[ix(i, n - 2)];
    }

    let left_right = if kind.flips_left_right() { -1.0 } else { 1.0 };
    for j in 1..n - 1 {
        field[ix(0, j)] = left_right * field[ix(1, j)];
        field[ix(n - 1, j)] = left_right * field[ix(n - 2, j)];
    }

    for (cx, cy, nx, ny) in [
        (0, 0, 1, 1),
        (0, n - 1, 1, n - 2),
        (n - 1, 0, n - 2, 1),
        (n - 1, n - 1, n - 2, n - 2),
    ] {
        field[ix(cx, cy)] =
            CORNER_WEIGHT * (field[ix(nx, cy)] + field[ix(cx, ny)] + field[ix(cx, cy)]);
    }
}
