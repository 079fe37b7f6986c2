use crate::export::FluidData;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FluidMetrics {
    pub total_mass: f32,
    pub max_density: f32,
    pub avg_density: f32,
    pub total_kinetic_energy: f32,
    pub max_velocity: f32,
    pub avg_velocity: f32,
    /// Mean absolute central-difference divergence over interior cells.
    pub velocity_divergence: f32,
    /// Mean absolute vorticity over interior cells.
    pub vorticity: f32,
    pub frame: usize,
}

/// Per-row partial sums, merged across rows.
#[derive(Debug, Default, Clone, Copy)]
struct RowTotals {
    mass: f32,
    max_density: f32,
    kinetic_energy: f32,
    max_velocity: f32,
    velocity_sum: f32,
    divergence: f32,
    vorticity: f32,
}

impl RowTotals {
    fn merge(self, other: Self) -> Self {
        Self {
            mass: self.mass + other.mass,
            max_density: self.max_density.max(other.max_density),
            kinetic_energy: self.kinetic_energy + other.kinetic_energy,
            max_velocity: self.max_velocity.max(other.max_velocity),
            velocity_sum: self.velocity_sum + other.velocity_sum,
            divergence: self.divergence + other.divergence,
            vorticity: self.vorticity + other.vorticity,
        }
    }
}

fn is_interior(size: usize, x: usize, y: usize) -> bool {
    (1..size.saturating_sub(1)).contains(&x) && (1..size.saturating_sub(1)).contains(&y)
}

/// Central-difference divergence of `(vx, vy)` at interior cell `(x, y)`.
///
/// `x` and `y` must lie in `1..size - 1`; edge cells have no neighbour on one
/// side and panic.
pub fn divergence_at(size: usize, vx: &[f32], vy: &[f32], x: usize, y: usize) -> f32 {
    debug_assert!(is_interior(size, x, y), "({}, {}) is not an interior cell", x, y);
    let idx = y * size + x;
    (vx[idx + 1] - vx[idx - 1] + vy[idx + size] - vy[idx - size]) / 2.0
}

/// Central-difference curl of `(vx, vy)` at interior cell `(x, y)`. Same
/// precondition as [`divergence_at`].
pub fn vorticity_at(size: usize, vx: &[f32], vy: &[f32], x: usize, y: usize) -> f32 {
    debug_assert!(is_interior(size, x, y), "({}, {}) is not an interior cell", x, y);
    let idx = y * size + x;
    (vy[idx + 1] - vy[idx - 1] - (vx[idx + size] - vx[idx - size])) / 2.0
}

impl FluidMetrics {
    pub fn analyze(simulation: &impl FluidData, frame: usize) -> Self {
        let size = simulation.size();
        let density = simulation.density();
        let vx = simulation.velocity_x();
        let vy = simulation.velocity_y();

        let totals = (1..size - 1)
            .into_par_iter()
            .map(|y| {
                let mut row = RowTotals::default();
                for x in 1..size - 1 {
                    let idx = y * size + x;
                    let d = density[idx];
                    let speed = (vx[idx] * vx[idx] + vy[idx] * vy[idx]).sqrt();

                    row.mass += d;
                    row.max_density = row.max_density.max(d);
                    row.kinetic_energy += 0.5 * d * speed * speed;
                    row.max_velocity = row.max_velocity.max(speed);
                    row.velocity_sum += speed;
                    row.divergence += divergence_at(size, vx, vy, x, y).abs();
                    row.vorticity += vorticity_at(size, vx, vy, x, y).abs();
                }
                row
            })
            .reduce(RowTotals::default, RowTotals::merge);

        let interior = ((size - 2) * (size - 2)) as f32;

        Self {
            total_mass: totals.mass,
            max_density: totals.max_density,
            avg_density: totals.mass / interior,
            total_kinetic_energy: totals.kinetic_energy,
            max_velocity: totals.max_velocity,
            avg_velocity: totals.velocity_sum / interior,
            velocity_divergence: totals.divergence / interior,
            vorticity: totals.vorticity / interior,
            frame,
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "Frame {}: mass {:.4}, max density {:.4}, kinetic energy {:.4}, max velocity {:.4}, divergence {:.6}, vorticity {:.6}",
            self.frame,
            self.total_mass,
            self.max_density,
            self.total_kinetic_energy,
            self.max_velocity,
            self.velocity_divergence,
            self.vorticity
        );
    }
}

#[derive(Debug, Default, Serialize)]
pub struct AnalysisRecorder {
    pub metrics_history: Vec<FluidMetrics>,
}

impl AnalysisRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, simulation: &impl FluidData, frame: usize) -> &FluidMetrics {
        self.metrics_history.push(FluidMetrics::analyze(simulation, frame));
        &self.metrics_history[self.metrics_history.len() - 1]
    }

    pub fn log_trends(&self) {
        let (Some(first), Some(last)) = (self.metrics_history.first(), self.metrics_history.last())
        else {
            return;
        };
        if self.metrics_history.len() < 2 {
            return;
        }

        log::info!(
            "Mass change: {:.4} -> {:.4} ({:+.3}%)",
            first.total_mass,
            last.total_mass,
            (last.total_mass - first.total_mass) / first.total_mass.max(0.001) * 100.0
        );
        log::info!(
            "Kinetic energy change: {:.4} -> {:.4} ({:+.3}%)",
            first.total_kinetic_energy,
            last.total_kinetic_energy,
            (last.total_kinetic_energy - first.total_kinetic_energy)
                / first.total_kinetic_energy.max(0.001)
                * 100.0
        );
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
