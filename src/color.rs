//! Density to RGBA mapping for the output buffer.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// How density values are turned into colors. Physics is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// `density / 255` on every color channel.
    #[default]
    Grayscale,
    /// Density read as a hue angle in degrees at full saturation and value.
    Hue,
}

impl ColorMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Grayscale => ColorMode::Hue,
            ColorMode::Hue => ColorMode::Grayscale,
        }
    }

    /// RGBA color for one density value. Alpha is always 1.
    pub fn to_rgba(self, density: f32) -> Vec4 {
        let rgb = match self {
            ColorMode::Grayscale => Vec3::splat(density / 255.0),
            ColorMode::Hue => hsv_to_rgb(Vec3::new(density, 1.0, 1.0)),
        };
        rgb.extend(1.0)
    }
}

/// Convert `(hue in degrees, saturation, value)` to RGB.
///
/// Hue is not wrapped: any 60 degree sector outside `0..=5` (hues below 0 or
/// at or past 360) is colored as sector 0, keeping its fractional part.
pub fn hsv_to_rgb(hsv: Vec3) -> Vec3 {
    let (hue, saturation, value) = (hsv.x, hsv.y, hsv.z);
    if saturation == 0.0 {
        return Vec3::splat(value);
    }

    let scaled = hue / 60.0;
    let sector = scaled.floor();
    let frac = scaled - sector;

    let o = value * (1.0 - saturation);
    let p = value * (1.0 - saturation * frac);
    let q = value * (1.0 - saturation * (1.0 - frac));

    match sector as i32 {
        1 => Vec3::new(p, value, o),
        2 => Vec3::new(o, value, q),
        3 => Vec3::new(o, p, value),
        4 => Vec3::new(q, o, value),
        5 => Vec3::new(value, o, p),
        _ => Vec3::new(value, q, o),
    }
}
