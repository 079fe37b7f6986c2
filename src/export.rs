use crate::error::FluidError;
use crate::fluid::Fluid;
use crate::render::Renderer;
use std::path::Path;

/// Read-only view of a simulated grid, shared by rendering and analysis.
pub trait FluidData {
    fn size(&self) -> usize;
    fn density(&self) -> &[f32];
    fn velocity_x(&self) -> &[f32];
    fn velocity_y(&self) -> &[f32];
}

impl FluidData for Fluid {
    fn size(&self) -> usize { Fluid::size(self) }
    fn density(&self) -> &[f32] { Fluid::density(self) }
    fn velocity_x(&self) -> &[f32] { Fluid::velocity_x(self) }
    fn velocity_y(&self) -> &[f32] { Fluid::velocity_y(self) }
}

pub struct ImageExporter {
    renderer: Renderer,
}

impl ImageExporter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            renderer: Renderer::new(width, height),
        }
    }

    /// Render the fluid's output buffer and save it as a PNG.
    pub fn export_density_png(&self, fluid: &mut Fluid, path: &Path) -> Result<(), FluidError> {
        let size = fluid.size();
        let img = self.renderer.render_pixels(fluid.render(), size);
        img.save(path)?;
        log::debug!("Exported density frame to {:?}", path);
        Ok(())
    }

    pub fn export_velocity_png(&self, simulation: &impl FluidData, path: &Path) -> Result<(), FluidError> {
        let img = self.renderer.render_velocity_field(simulation);
        img.save(path)?;
        Ok(())
    }

    /// Advance `fluid` by `dt` for `steps` frames, saving a density PNG after each.
    pub fn export_frame_sequence(
        &self,
        fluid: &mut Fluid,
        steps: usize,
        dt: f32,
        output_dir: &Path,
        prefix: &str,
    ) -> Result<(), FluidError> {
        std::fs::create_dir_all(output_dir)?;
        for i in 0..steps {
            fluid.update(dt);

            let filename = format!("{}_frame_{:04}.png", prefix, i);
            let path = output_dir.join(filename);

            self.export_density_png(fluid, &path)?;
        }
        Ok(())
    }
}
