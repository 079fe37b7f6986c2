//! Stable-fluids dye simulation on a square grid.
//!
//! [`Fluid`] owns every field and runs the per-frame pipeline; the stage
//! functions in [`solver`] and the boundary rules in [`boundary`] are public
//! so they can be exercised and benchmarked on their own.

pub mod analysis;
pub mod boundary;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod fluid;
pub mod grid;
pub mod render;
pub mod solver;

pub use analysis::{AnalysisRecorder, FluidMetrics};
pub use boundary::{Boundary, set_boundary};
pub use color::ColorMode;
pub use config::{FluidConfig, RunConfig};
pub use error::FluidError;
pub use export::{FluidData, ImageExporter};
pub use fluid::Fluid;
pub use grid::Grid;
pub use render::Renderer;
pub use solver::SOLVER_ITERATIONS;
