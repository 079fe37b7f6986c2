use crate::boundary::Boundary;
use crate::color::ColorMode;
use crate::config::{FluidConfig, validate_rate};
use crate::error::FluidError;
use crate::grid::Grid;
use crate::solver::{SOLVER_ITERATIONS, advect, diffuse, project};
use glam::Vec2;

/// Dye-carrying incompressible fluid on a fixed square grid.
///
/// External code writes to the fields only through [`Fluid::add_density`],
/// [`Fluid::add_velocity`] and [`Fluid::fade_density`], between calls to
/// [`Fluid::update`]. Reading the result goes through [`Fluid::draw`] or the
/// read-only accessors.
#[derive(Debug, Clone)]
pub struct Fluid {
    grid: Grid,
    diffusion: f32,
    viscosity: f32,
    velocity_x: Vec<f32>,
    velocity_y: Vec<f32>,
    // Holds the diffused, projected velocity from the first half of an update
    // and is the advection source for the second half. Stale between updates.
    velocity_x_prev: Vec<f32>,
    velocity_y_prev: Vec<f32>,
    density: Vec<f32>,
    // Diffused density, valid only between the last two stages of an update.
    density_prev: Vec<f32>,
    // Projection scratch, rewritten by every projection.
    pressure: Vec<f32>,
    divergence: Vec<f32>,
    color_mode: ColorMode,
    pixels: Vec<[f32; 4]>,
}

impl Fluid {
    /// Zero-initialized fluid with side `grid_size` and fixed rates.
    pub fn new(grid_size: usize, diffusion: f32, viscosity: f32) -> Result<Self, FluidError> {
        let grid = Grid::new(grid_size)?;
        validate_rate("diffusion", diffusion)?;
        validate_rate("viscosity", viscosity)?;

        let size = grid.cell_count();
        log::debug!(
            "Created {}x{} fluid (diffusion {}, viscosity {})",
            grid_size,
            grid_size,
            diffusion,
            viscosity
        );

        Ok(Self {
            grid,
            diffusion,
            viscosity,
            velocity_x: vec![0.0; size],
            velocity_y: vec![0.0; size],
            velocity_x_prev: vec![0.0; size],
            velocity_y_prev: vec![0.0; size],
            density: vec![0.0; size],
            density_prev: vec![0.0; size],
            pressure: vec![0.0; size],
            divergence: vec![0.0; size],
            color_mode: ColorMode::Grayscale,
            pixels: vec![[0.0; 4]; size],
        })
    }

    pub fn from_config(config: &FluidConfig) -> Result<Self, FluidError> {
        config.validate()?;
        let mut fluid = Self::new(config.grid_size, config.diffusion, config.viscosity)?;
        fluid.color_mode = config.color_mode;
        Ok(fluid)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn diffusion(&self) -> f32 {
        self.diffusion
    }

    pub fn viscosity(&self) -> f32 {
        self.viscosity
    }

    pub fn density(&self) -> &[f32] {
        &self.density
    }

    pub fn velocity_x(&self) -> &[f32] {
        &self.velocity_x
    }

    pub fn velocity_y(&self) -> &[f32] {
        &self.velocity_y
    }

    /// The RGBA buffer as of the last [`Fluid::render`] or [`Fluid::draw`].
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Add `amount` of dye to the cell containing `(x, y)`.
    pub fn add_density(&mut self, x: f32, y: f32, amount: f32) {
        let idx = self.grid.index_of(x, y);
        self.density[idx] += amount;
    }

    /// Add `amount` to the velocity of the cell containing `(x, y)`.
    pub fn add_velocity(&mut self, x: f32, y: f32, amount: Vec2) {
        let idx = self.grid.index_of(x, y);
        self.velocity_x[idx] += amount.x;
        self.velocity_y[idx] += amount.y;
    }

    /// Subtract `amount` from every density cell, flooring at zero.
    pub fn fade_density(&mut self, amount: f32) {
        for value in self.density.iter_mut() {
            *value = (*value - amount).max(0.0);
        }
    }

    /// Advance the fluid by `dt`.
    ///
    /// The stages always run in this order:
    /// diffuse velocity, project, advect velocity, project, diffuse density,
    /// advect density. `dt` is used as given; large steps can destabilize the
    /// solver and keeping them in check is up to the caller.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Fluid update with unusual dt {}", dt);
        }
        log::trace!("Fluid update dt={}", dt);

        let grid = &self.grid;

        diffuse(
            grid,
            Boundary::HorizontalVelocity,
            &mut self.velocity_x_prev,
            &self.velocity_x,
            self.viscosity,
            dt,
            SOLVER_ITERATIONS,
        );
        diffuse(
            grid,
            Boundary::VerticalVelocity,
            &mut self.velocity_y_prev,
            &self.velocity_y,
            self.viscosity,
            dt,
            SOLVER_ITERATIONS,
        );

        project(
            grid,
            &mut self.velocity_x_prev,
            &mut self.velocity_y_prev,
            &mut self.pressure,
            &mut self.divergence,
            SOLVER_ITERATIONS,
        );

        advect(
            grid,
            Boundary::HorizontalVelocity,
            &mut self.velocity_x,
            &self.velocity_x_prev,
            &self.velocity_x_prev,
            &self.velocity_y_prev,
            dt,
        );
        advect(
            grid,
            Boundary::VerticalVelocity,
            &mut self.velocity_y,
            &self.velocity_y_prev,
            &self.velocity_x_prev,
            &self.velocity_y_prev,
            dt,
        );

        project(
            grid,
            &mut self.velocity_x,
            &mut self.velocity_y,
            &mut self.pressure,
            &mut self.divergence,
            SOLVER_ITERATIONS,
        );

        diffuse(
            grid,
            Boundary::Neutral,
            &mut self.density_prev,
            &self.density,
            self.diffusion,
            dt,
            SOLVER_ITERATIONS,
        );
        advect(
            grid,
            Boundary::Neutral,
            &mut self.density,
            &self.density_prev,
            &self.velocity_x,
            &self.velocity_y,
            dt,
        );
    }

    /// Recompute the RGBA buffer from density under the active color mode.
    pub fn render(&mut self) -> &[[f32; 4]] {
        let mode = self.color_mode;
        for (pixel, &density) in self.pixels.iter_mut().zip(&self.density) {
            *pixel = mode.to_rgba(density).to_array();
        }
        &self.pixels
    }

    /// Render and copy the RGBA buffer into `dest`, which must hold
    /// `N * N * 4` floats.
    pub fn draw(&mut self, dest: &mut [f32]) -> Result<(), FluidError> {
        let expected = self.pixels.len() * 4;
        if dest.len() != expected {
            return Err(FluidError::BufferSize {
                expected,
                actual: dest.len(),
            });
        }
        let pixels = self.render();
        dest.copy_from_slice(bytemuck::cast_slice(pixels));
        Ok(())
    }

    /// Render and copy the RGBA buffer as native-endian `f32` bytes, as a
    /// mapped GPU buffer expects. `dest` must hold `N * N * 16` bytes.
    pub fn draw_bytes(&mut self, dest: &mut [u8]) -> Result<(), FluidError> {
        let expected = std::mem::size_of_val(self.pixels.as_slice());
        if dest.len() != expected {
            return Err(FluidError::BufferSize {
                expected,
                actual: dest.len(),
            });
        }
        let pixels = self.render();
        dest.copy_from_slice(bytemuck::cast_slice(pixels));
        Ok(())
    }

    /// Zero every field and the output buffer without reallocating.
    pub fn reset(&mut self) {
        for field in [
            &mut self.velocity_x,
            &mut self.velocity_y,
            &mut self.velocity_x_prev,
            &mut self.velocity_y_prev,
            &mut self.density,
            &mut self.density_prev,
            &mut self.pressure,
            &mut self.divergence,
        ] {
            field.fill(0.0);
        }
        self.pixels.fill([0.0; 4]);
        log::debug!("Fluid reset");
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        if mode != self.color_mode {
            log::info!("Switched color mode to {:?}", mode);
        }
        self.color_mode = mode;
    }

    pub fn toggle_color_mode(&mut self) {
        self.set_color_mode(self.color_mode.toggled());
    }

    /// Tab-separated dump of the density field, one grid row per line.
    pub fn density_table(&self) -> String {
        let n = self.grid.size_i32();
        let mut out = String::new();
        for y in 0..n {
            for x in 0..n {
                if x > 0 {
                    out.push('\t');
                }
                out.push_str(&self.density[self.grid.index(x, y)].to_string());
            }
            out.push('\n');
        }
        out
    }
}
