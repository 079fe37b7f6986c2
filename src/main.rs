use dyeflow::{AnalysisRecorder, Fluid, FluidConfig, ImageExporter};
use glam::Vec2;
use rand::Rng;
use std::path::Path;

/// Radians the emitter advances around the grid centre each frame.
const EMITTER_ANGULAR_SPEED: f32 = 0.05;
/// Largest random rotation applied to the injected velocity.
const EMITTER_JITTER: f32 = 0.2;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(path) => FluidConfig::load(Path::new(path))?,
        None => FluidConfig::default(),
    };

    run_headless(&config)
}

fn run_headless(config: &FluidConfig) -> Result<(), Box<dyn std::error::Error>> {
    let run = &config.run;
    log::info!(
        "Running {}x{} fluid for {} frames (dt {})",
        config.grid_size,
        config.grid_size,
        run.frames,
        run.dt
    );

    let mut fluid = Fluid::from_config(config)?;
    let exporter = ImageExporter::new(run.image_size, run.image_size);
    let mut recorder = AnalysisRecorder::new();
    let mut emitter = StirringEmitter::new(config.grid_size);

    if run.export_every > 0 {
        std::fs::create_dir_all(&run.output_dir)?;
    }

    recorder.record_frame(&fluid, 0).log_summary();

    for frame in 1..=run.frames {
        emitter.inject(&mut fluid, run.emitter_density, run.emitter_force);
        fluid.update(run.dt);

        let metrics = recorder.record_frame(&fluid, frame);
        if run.export_every > 0 && frame % run.export_every == 0 {
            metrics.log_summary();
            let path = run.output_dir.join(format!("frame_{:04}.png", frame));
            exporter.export_density_png(&mut fluid, &path)?;
        }

        if log::log_enabled!(log::Level::Trace) && config.grid_size <= 32 {
            log::trace!("Density after frame {}:\n{}", frame, fluid.density_table());
        }
    }

    recorder.log_trends();

    if run.export_every > 0 {
        let path = run.output_dir.join("metrics.json");
        std::fs::write(&path, recorder.to_json()?)?;
        log::info!("Wrote metrics to {:?}", path);
    }

    Ok(())
}

/// Injects dye and velocity from a point circling the grid centre, the way a
/// dragged pointer would.
struct StirringEmitter {
    centre: Vec2,
    radius: f32,
    angle: f32,
    grid_size: f32,
}

impl StirringEmitter {
    fn new(grid_size: usize) -> Self {
        let size = grid_size as f32;
        Self {
            centre: Vec2::splat(size / 2.0),
            radius: size / 4.0,
            angle: 0.0,
            grid_size: size,
        }
    }

    fn position(&self) -> Vec2 {
        self.centre + self.radius * Vec2::from_angle(self.angle)
    }

    fn inject(&mut self, fluid: &mut Fluid, density: f32, force: f32) {
        let previous = self.position();
        self.angle += EMITTER_ANGULAR_SPEED;
        let current = self.position();

        let jitter = rand::thread_rng().gen_range(-EMITTER_JITTER..=EMITTER_JITTER);
        let offset = Vec2::from_angle(jitter).rotate(current - previous) / self.grid_size;

        fluid.add_density(current.x, current.y, density);
        fluid.add_velocity(current.x, current.y, offset * force);
    }
}
