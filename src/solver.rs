//! Diffusion, projection and advection stages of the stable-fluids solver.
//!
//! Every stage works on interior cells only and leaves the outer ring to
//! [`set_boundary`]. Fields are plain slices of `N * N` values laid out by
//! [`Grid::index`]; each stage borrows the fields it writes mutably and the
//! fields it reads shared, so sources and destinations never alias.

use crate::boundary::{Boundary, set_boundary};
use crate::grid::Grid;

/// Relaxation sweeps per diffusion or pressure solve.
pub const SOLVER_ITERATIONS: usize = 16;

/// Gauss-Seidel relaxation of `x` toward `(x0 + a * neighbours) / c`.
///
/// Cells are updated in place in `j`-outer, `i`-inner order, so later cells in
/// a sweep already see this sweep's values. The centre cell enters the
/// neighbour sum twice, which pairs with `c = 1 + 6a` (or `c = 6` for the
/// pressure solve). The boundary is re-applied after every sweep.
pub fn lin_solve(
    grid: &Grid,
    boundary: Boundary,
    x: &mut [f32],
    x0: &[f32],
    a: f32,
    c: f32,
    iterations: usize,
) {
    debug_assert_eq!(x.len(), grid.cell_count());
    debug_assert_eq!(x0.len(), grid.cell_count());
    let n = grid.size_i32();
    let c_recip = 1.0 / c;

    for _ in 0..iterations {
        for j in 1..n - 1 {
            for i in 1..n - 1 {
                let idx = grid.index(i, j);
                let neighbours = x[grid.index(i + 1, j)]
                    + x[grid.index(i - 1, j)]
                    + x[grid.index(i, j + 1)]
                    + x[grid.index(i, j - 1)]
                    + x[idx]
                    + x[idx];
                x[idx] = (x0[idx] + a * neighbours) * c_recip;
            }
        }
        set_boundary(grid, boundary, x);
    }
}

/// Implicit diffusion of `x0` into `x` with coefficient `coeff` over `dt`.
///
/// `x` doubles as the initial guess, so whatever it held before the call
/// influences the result when `iterations` is small.
pub fn diffuse(
    grid: &Grid,
    boundary: Boundary,
    x: &mut [f32],
    x0: &[f32],
    coeff: f32,
    dt: f32,
    iterations: usize,
) {
    let inner = (grid.size() - 2) as f32;
    let a = dt * coeff * inner * inner;
    lin_solve(grid, boundary, x, x0, a, 1.0 + 6.0 * a, iterations);
}

/// Remove the divergent part of `(vx, vy)` in place.
///
/// `pressure` and `divergence` are scratch: both are fully rewritten on the
/// interior and re-bounded before they are read, so their contents on entry
/// do not matter and their contents on exit are only meaningful until the
/// next stage overwrites them.
pub fn project(
    grid: &Grid,
    vx: &mut [f32],
    vy: &mut [f32],
    pressure: &mut [f32],
    divergence: &mut [f32],
    iterations: usize,
) {
    let n = grid.size_i32();
    let scale = grid.size() as f32;

    for j in 1..n - 1 {
        for i in 1..n - 1 {
            let idx = grid.index(i, j);
            divergence[idx] = -0.5
                * (vx[grid.index(i + 1, j)] - vx[grid.index(i - 1, j)]
                    + vy[grid.index(i, j + 1)]
                    - vy[grid.index(i, j - 1)])
                / scale;
            pressure[idx] = 0.0;
        }
    }

    set_boundary(grid, Boundary::Neutral, divergence);
    set_boundary(grid, Boundary::Neutral, pressure);
    lin_solve(grid, Boundary::Neutral, pressure, divergence, 1.0, 6.0, iterations);

    for j in 1..n - 1 {
        for i in 1..n - 1 {
            let idx = grid.index(i, j);
            vx[idx] -= 0.5 * (pressure[grid.index(i + 1, j)] - pressure[grid.index(i - 1, j)]) * scale;
            vy[idx] -= 0.5 * (pressure[grid.index(i, j + 1)] - pressure[grid.index(i, j - 1)]) * scale;
        }
    }

    set_boundary(grid, Boundary::HorizontalVelocity, vx);
    set_boundary(grid, Boundary::VerticalVelocity, vy);
}

/// Semi-Lagrangian transport of `d0` into `d` along `(vx, vy)`.
///
/// Each interior cell traces back `dt * (N - 2)` cells along its own velocity,
/// clamps the sample point to `[0.5, N + 0.5]` and blends the four surrounding
/// source cells bilinearly. Sample cells past the last row or column resolve
/// to the edge through the clamping indexer.
pub fn advect(
    grid: &Grid,
    boundary: Boundary,
    d: &mut [f32],
    d0: &[f32],
    vx: &[f32],
    vy: &[f32],
    dt: f32,
) {
    debug_assert_eq!(d.len(), grid.cell_count());
    debug_assert_eq!(d0.len(), grid.cell_count());
    let n = grid.size_i32();
    let dt0 = dt * (grid.size() - 2) as f32;
    let upper = grid.size() as f32 + 0.5;

    for j in 1..n - 1 {
        for i in 1..n - 1 {
            let idx = grid.index(i, j);
            let x = (i as f32 - dt0 * vx[idx]).clamp(0.5, upper);
            let y = (j as f32 - dt0 * vy[idx]).clamp(0.5, upper);

            let x0 = x.floor();
            let y0 = y.floor();
            let s1 = x - x0;
            let s0 = 1.0 - s1;
            let t1 = y - y0;
            let t0 = 1.0 - t1;

            let (i0, j0) = (x0 as i32, y0 as i32);
            let (i1, j1) = (i0 + 1, j0 + 1);

            d[idx] = s0 * (t0 * d0[grid.index(i0, j0)] + t1 * d0[grid.index(i0, j1)])
                + s1 * (t0 * d0[grid.index(i1, j0)] + t1 * d0[grid.index(i1, j1)]);
        }
    }

    set_boundary(grid, boundary, d);
}
