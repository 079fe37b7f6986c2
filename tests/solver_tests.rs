use dyeflow::boundary::{Boundary, set_boundary};
use dyeflow::solver::{SOLVER_ITERATIONS, advect, diffuse, lin_solve, project};
use dyeflow::Grid;
use std::f32::consts::PI;

fn interior_sum(grid: &Grid, field: &[f32]) -> f32 {
    let n = grid.size_i32();
    let mut total = 0.0;
    for j in 1..n - 1 {
        for i in 1..n - 1 {
            total += field[grid.index(i, j)];
        }
    }
    total
}

/// Sum of |central-difference divergence| over cells at least `margin` from the edge.
fn divergence_norm(grid: &Grid, vx: &[f32], vy: &[f32], margin: i32) -> f32 {
    let n = grid.size_i32();
    let mut total = 0.0;
    for j in margin..n - margin {
        for i in margin..n - margin {
            let div = 0.5
                * (vx[grid.index(i + 1, j)] - vx[grid.index(i - 1, j)] + vy[grid.index(i, j + 1)]
                    - vy[grid.index(i, j - 1)]);
            total += div.abs();
        }
    }
    total
}

#[test]
fn test_boundary_sign_conventions_left_edge() {
    let grid = Grid::new(5).unwrap();
    let v = 3.0;

    for (kind, expected) in [
        (Boundary::Neutral, v),
        (Boundary::HorizontalVelocity, -v),
        (Boundary::VerticalVelocity, v),
    ] {
        let mut field = vec![0.0; grid.cell_count()];
        field[grid.index(1, 2)] = v;
        set_boundary(&grid, kind, &mut field);
        assert_eq!(field[grid.index(0, 2)], expected, "left edge for {:?}", kind);
    }
}

#[test]
fn test_boundary_sign_conventions_bottom_and_top() {
    let grid = Grid::new(5).unwrap();
    let v = 4.0;

    for (kind, expected) in [
        (Boundary::Neutral, v),
        (Boundary::HorizontalVelocity, v),
        (Boundary::VerticalVelocity, -v),
    ] {
        let mut field = vec![0.0; grid.cell_count()];
        field[grid.index(2, 1)] = v;
        field[grid.index(2, 3)] = v;
        set_boundary(&grid, kind, &mut field);
        assert_eq!(field[grid.index(2, 0)], expected, "bottom edge for {:?}", kind);
        assert_eq!(field[grid.index(2, 4)], expected, "top edge for {:?}", kind);
    }
}

#[test]
fn test_boundary_right_edge_mirrors() {
    let grid = Grid::new(6).unwrap();
    let mut field = vec![0.0; grid.cell_count()];
    field[grid.index(4, 3)] = 2.0;

    set_boundary(&grid, Boundary::HorizontalVelocity, &mut field);
    assert_eq!(field[grid.index(5, 3)], -2.0);
}

#[test]
fn test_corner_is_three_way_average() {
    let grid = Grid::new(4).unwrap();
    let mut field = vec![0.0; grid.cell_count()];
    field[grid.index(1, 1)] = 6.0;
    field[grid.index(0, 0)] = 3.0;
    field[grid.index(2, 2)] = 9.0;
    field[grid.index(3, 3)] = 0.0;

    set_boundary(&grid, Boundary::Neutral, &mut field);

    // Edges next to (0, 0) both mirror (1, 1).
    assert!((field[grid.index(0, 0)] - 5.0).abs() < 1e-6, "got {}", field[grid.index(0, 0)]);
    // Edges next to (3, 3) both mirror (2, 2); the corner itself started at 0.
    assert!((field[grid.index(3, 3)] - 6.0).abs() < 1e-6, "got {}", field[grid.index(3, 3)]);
}

#[test]
fn test_corner_average_uses_signed_edges() {
    let grid = Grid::new(4).unwrap();
    let mut field = vec![0.0; grid.cell_count()];
    field[grid.index(1, 1)] = 3.0;

    set_boundary(&grid, Boundary::HorizontalVelocity, &mut field);

    // (1, 0) mirrors unchanged, (0, 1) is negated: (3 - 3 + 0) / 3.
    assert!(field[grid.index(0, 0)].abs() < 1e-6);
}

#[test]
fn test_lin_solve_zero_source_stays_zero() {
    let grid = Grid::new(8).unwrap();
    let mut x = vec![0.0; grid.cell_count()];
    let x0 = vec![0.0; grid.cell_count()];
    lin_solve(&grid, Boundary::Neutral, &mut x, &x0, 2.0, 13.0, SOLVER_ITERATIONS);
    assert!(x.iter().all(|&v| v == 0.0));
}

#[test]
fn test_diffusion_with_zero_coefficient_copies_interior() {
    let grid = Grid::new(8).unwrap();
    let mut source = vec![0.0; grid.cell_count()];
    source[grid.index(3, 4)] = 10.0;
    source[grid.index(5, 2)] = -2.0;
    let mut x = vec![7.0; grid.cell_count()];

    diffuse(&grid, Boundary::Neutral, &mut x, &source, 0.0, 0.1, SOLVER_ITERATIONS);

    for j in 1..7 {
        for i in 1..7 {
            assert_eq!(x[grid.index(i, j)], source[grid.index(i, j)]);
        }
    }
}

#[test]
fn test_diffusion_does_not_create_mass() {
    let grid = Grid::new(16).unwrap();

    for (px, py, coeff) in [(8, 8, 0.01), (8, 8, 1.0), (1, 8, 0.01), (2, 5, 1.0)] {
        let mut source = vec![0.0; grid.cell_count()];
        source[grid.index(px, py)] = 50.0;
        let before = interior_sum(&grid, &source);

        let mut x = vec![0.0; grid.cell_count()];
        diffuse(&grid, Boundary::Neutral, &mut x, &source, coeff, 0.1, SOLVER_ITERATIONS);
        let after = interior_sum(&grid, &x);

        assert!(
            after <= before * (1.0 + 1e-5),
            "diffusion at ({}, {}) with {} grew mass: {} -> {}",
            px,
            py,
            coeff,
            before,
            after
        );
    }
}

#[test]
fn test_diffusion_spreads_to_neighbours() {
    let grid = Grid::new(16).unwrap();
    let mut source = vec![0.0; grid.cell_count()];
    source[grid.index(8, 8)] = 50.0;
    let mut x = vec![0.0; grid.cell_count()];

    diffuse(&grid, Boundary::Neutral, &mut x, &source, 0.01, 0.1, SOLVER_ITERATIONS);

    assert!(x[grid.index(8, 8)] < 50.0);
    for (i, j) in [(7, 8), (9, 8), (8, 7), (8, 9)] {
        assert!(x[grid.index(i, j)] > 0.0, "neighbour ({}, {}) got nothing", i, j);
    }
}

fn smooth_divergent_field(grid: &Grid) -> (Vec<f32>, Vec<f32>) {
    let n = grid.size_i32();
    let mut vx = vec![0.0; grid.cell_count()];
    let vy = vec![0.0; grid.cell_count()];
    for j in 0..n {
        for i in 0..n {
            let x = i as f32 / (n - 1) as f32;
            let y = j as f32 / (n - 1) as f32;
            vx[grid.index(i, j)] = (PI * x).sin() * (PI * y).sin();
        }
    }
    (vx, vy)
}

#[test]
fn test_projection_reduces_divergence() {
    let grid = Grid::new(16).unwrap();
    let (mut vx, mut vy) = smooth_divergent_field(&grid);
    set_boundary(&grid, Boundary::HorizontalVelocity, &mut vx);
    set_boundary(&grid, Boundary::VerticalVelocity, &mut vy);

    let before = divergence_norm(&grid, &vx, &vy, 2);
    let mut pressure = vec![0.0; grid.cell_count()];
    let mut divergence = vec![0.0; grid.cell_count()];
    project(&grid, &mut vx, &mut vy, &mut pressure, &mut divergence, SOLVER_ITERATIONS);
    let after = divergence_norm(&grid, &vx, &vy, 2);

    assert!(after < before, "divergence grew: {} -> {}", before, after);
}

#[test]
fn test_converged_projection_removes_divergence() {
    let grid = Grid::new(16).unwrap();
    let (mut vx, mut vy) = smooth_divergent_field(&grid);
    set_boundary(&grid, Boundary::HorizontalVelocity, &mut vx);
    set_boundary(&grid, Boundary::VerticalVelocity, &mut vy);

    let before = divergence_norm(&grid, &vx, &vy, 2);
    let mut pressure = vec![0.0; grid.cell_count()];
    let mut divergence = vec![0.0; grid.cell_count()];
    project(&grid, &mut vx, &mut vy, &mut pressure, &mut divergence, 400);
    let after = divergence_norm(&grid, &vx, &vy, 2);

    assert!(
        after * 10.0 < before,
        "divergence not reduced by an order of magnitude: {} -> {}",
        before,
        after
    );
}

#[test]
fn test_projection_scratch_contents_do_not_matter() {
    let grid = Grid::new(12).unwrap();
    let (vx, vy) = smooth_divergent_field(&grid);

    let run = |fill: f32| {
        let (mut vx, mut vy) = (vx.clone(), vy.clone());
        let mut pressure = vec![fill; grid.cell_count()];
        let mut divergence = vec![fill; grid.cell_count()];
        project(&grid, &mut vx, &mut vy, &mut pressure, &mut divergence, SOLVER_ITERATIONS);
        (vx, vy)
    };

    let n = grid.size_i32();
    let (clean_x, clean_y) = run(0.0);
    let (dirty_x, dirty_y) = run(123.0);
    for j in 1..n - 1 {
        for i in 1..n - 1 {
            let idx = grid.index(i, j);
            assert_eq!(clean_x[idx], dirty_x[idx]);
            assert_eq!(clean_y[idx], dirty_y[idx]);
        }
    }
}

#[test]
fn test_advection_with_zero_velocity_is_identity() {
    let grid = Grid::new(10).unwrap();
    let source: Vec<f32> = (0..grid.cell_count()).map(|i| (i % 7) as f32 * 1.5).collect();
    let zero = vec![0.0; grid.cell_count()];
    let mut dest = vec![0.0; grid.cell_count()];

    advect(&grid, Boundary::Neutral, &mut dest, &source, &zero, &zero, 0.5);

    for j in 1..9 {
        for i in 1..9 {
            let idx = grid.index(i, j);
            assert_eq!(dest[idx], source[idx], "cell ({}, {})", i, j);
        }
    }
}

#[test]
fn test_advection_shifts_along_velocity() {
    // dt * (N - 2) = 1, so a unit velocity moves values one cell per step.
    let grid = Grid::new(10).unwrap();
    let mut source = vec![0.0; grid.cell_count()];
    source[grid.index(4, 5)] = 1.0;
    let vx = vec![1.0; grid.cell_count()];
    let vy = vec![0.0; grid.cell_count()];
    let mut dest = vec![0.0; grid.cell_count()];

    advect(&grid, Boundary::Neutral, &mut dest, &source, &vx, &vy, 0.125);

    assert_eq!(dest[grid.index(5, 5)], 1.0);
    assert_eq!(dest[grid.index(4, 5)], 0.0);
}

#[test]
fn test_advection_far_backtrace_samples_edge() {
    let grid = Grid::new(8).unwrap();
    let source: Vec<f32> = (0..grid.cell_count()).map(|i| i as f32).collect();
    let vx = vec![-1000.0; grid.cell_count()];
    let vy = vec![-1000.0; grid.cell_count()];
    let mut dest = vec![0.0; grid.cell_count()];

    advect(&grid, Boundary::Neutral, &mut dest, &source, &vx, &vy, 1.0);

    // Backtrace overshoots to N + 0.5; the clamped stencil repeats the far corner.
    let corner = source[grid.index(7, 7)];
    for j in 1..7 {
        for i in 1..7 {
            assert!((dest[grid.index(i, j)] - corner).abs() < 1e-4);
        }
    }
}
