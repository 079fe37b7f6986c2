use crate::export::FluidData;
use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};

/// Upscales grid-sized buffers into images of a fixed pixel size.
pub struct Renderer {
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Convert an `N * N` RGBA float buffer into an image, nearest-neighbour.
    pub fn render_pixels(&self, pixels: &[[f32; 4]], grid_size: usize) -> RgbaImage {
        let mut img = ImageBuffer::new(self.width, self.height);

        let scale_x = self.width as f32 / grid_size as f32;
        let scale_y = self.height as f32 / grid_size as f32;

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let sim_x = ((x as f32 / scale_x) as usize).min(grid_size - 1);
            // Grid row 0 is the bottom of the picture.
            let sim_y = grid_size - 1 - ((y as f32 / scale_y) as usize).min(grid_size - 1);

            let [r, g, b, a] = pixels[sim_y * grid_size + sim_x];
            *pixel = Rgba([to_byte(r), to_byte(g), to_byte(b), to_byte(a)]);
        }

        img
    }

    /// Velocity magnitude per component: red for x, green for y.
    pub fn render_velocity_field(&self, simulation: &impl FluidData) -> RgbImage {
        let mut img = ImageBuffer::new(self.width, self.height);
        let size = simulation.size();

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let sim_x = ((x as f32 / self.width as f32 * size as f32) as usize).min(size - 1);
            let sim_y = size - 1 - ((y as f32 / self.height as f32 * size as f32) as usize).min(size - 1);

            let idx = sim_y * size + sim_x;
            let vel_x = simulation.velocity_x()[idx];
            let vel_y = simulation.velocity_y()[idx];

            let r = (vel_x.abs() * 255.0).min(255.0) as u8;
            let g = (vel_y.abs() * 255.0).min(255.0) as u8;
            *pixel = Rgb([r, g, 128]);
        }

        img
    }
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
