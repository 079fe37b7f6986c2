//! JSON configuration for a simulation and its headless run.

use crate::color::ColorMode;
use crate::error::FluidError;
use crate::grid::{MAX_GRID_SIZE, MIN_GRID_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fluid parameters fixed at construction, plus the run settings used by the
/// headless driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidConfig {
    pub grid_size: usize,
    pub diffusion: f32,
    pub viscosity: f32,
    pub color_mode: ColorMode,
    pub run: RunConfig,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            grid_size: 216,
            diffusion: 0.00001,
            viscosity: 0.001,
            color_mode: ColorMode::Grayscale,
            run: RunConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub frames: usize,
    /// Time step handed to every update.
    pub dt: f32,
    /// Export a PNG every this many frames; 0 disables export.
    pub export_every: usize,
    /// Side length of exported images in pixels.
    pub image_size: u32,
    pub output_dir: PathBuf,
    /// Density injected by the stirring emitter each frame.
    pub emitter_density: f32,
    /// Scale applied to the emitter's per-frame displacement, measured in grid
    /// widths, to get the injected velocity.
    pub emitter_force: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            dt: 1.0 / 60.0,
            export_every: 10,
            image_size: 864,
            output_dir: PathBuf::from("frames"),
            emitter_density: 3000.0,
            emitter_force: 100.0,
        }
    }
}

impl FluidConfig {
    pub fn from_json_str(json: &str) -> Result<Self, FluidError> {
        let config: FluidConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, FluidError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded fluid config from {:?}", path);
        Ok(config)
    }

    /// Reject values the solver cannot run with.
    pub fn validate(&self) -> Result<(), FluidError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(FluidError::InvalidConfiguration(format!(
                "grid_size must be in {MIN_GRID_SIZE}..={MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        validate_rate("diffusion", self.diffusion)?;
        validate_rate("viscosity", self.viscosity)?;

        if !self.run.dt.is_finite() || self.run.dt < 0.0 {
            return Err(FluidError::InvalidConfiguration(format!(
                "run.dt must be finite and non-negative, got {}",
                self.run.dt
            )));
        }
        if self.run.image_size == 0 {
            return Err(FluidError::InvalidConfiguration(
                "run.image_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Diffusion and viscosity share the same constraint.
pub(crate) fn validate_rate(name: &str, value: f32) -> Result<(), FluidError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FluidError::InvalidConfiguration(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}
