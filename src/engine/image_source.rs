// Image sources that taps sample colors from.
//
// The viewer has no camera; `LiveBackdrop` is a procedurally animated image
// that plays the part of the live feed. It is rendered on the CPU, uploaded to
// a texture every frame, and sampled from the same pixels it displays.

use glam::Vec2;

use crate::quilt::Color;

/// Anything with addressable pixels.
pub trait ImageSource {
    fn dimensions(&self) -> (u32, u32);

    /// Pixel at column `x`, row `y` (row 0 at the top).
    /// Callers keep `x < width` and `y < height`.
    fn pixel(&self, x: u32, y: u32) -> Color;
}

/// Pixel under a window-relative position, `ratio` in [0, 1]² with (0, 0) at
/// the top-left. Coordinates are truncated and clamped to the image, so a tap
/// on the far edge reads the last row/column. `None` for an empty image.
pub fn sample_at_ratio<S: ImageSource + ?Sized>(source: &S, ratio: Vec2) -> Option<Color> {
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    let x = ((w as f32 * ratio.x) as u32).min(w - 1);
    let y = ((h as f32 * ratio.y) as u32).min(h - 1);
    Some(source.pixel(x, y))
}

// ============================================================================
// LIVE BACKDROP
// ============================================================================

pub struct LiveBackdrop {
    width: u32,
    height: u32,
    /// Seconds since creation; drives the animation.
    time: f32,
    pixels: Vec<[u8; 4]>,
}

impl LiveBackdrop {
    pub fn new(width: u32, height: u32) -> Self {
        let mut backdrop = Self {
            width,
            height,
            time: 0.0,
            pixels: vec![[0, 0, 0, 255]; (width * height) as usize],
        };
        backdrop.render();
        backdrop
    }

    /// Step the animation and re-render.
    pub fn advance(&mut self, dt: f32) {
        self.time += dt;
        self.render();
    }

    pub fn time(&self) -> f32 { self.time }

    /// Tightly packed RGBA8 rows, top row first.
    pub fn rgba_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    // Slow drifting color bands: red follows x, green follows y, blue the diagonal.
    fn render(&mut self) {
        use std::f32::consts::TAU;

        let t = self.time;
        let (w, h) = (self.width.max(1) as f32, self.height.max(1) as f32);
        let channel = |phase: f32| ((0.5 + 0.5 * phase.sin()) * 255.0).round() as u8;

        for y in 0..self.height {
            let v = y as f32 / h;
            for x in 0..self.width {
                let u = x as f32 / w;
                self.pixels[(y * self.width + x) as usize] = [
                    channel(TAU * (u + 0.05 * t)),
                    channel(TAU * (0.8 * v + 0.07 * t) + 2.1),
                    channel(TAU * (0.6 * (u + v) - 0.03 * t) + 4.2),
                    255,
                ];
            }
        }
    }
}

impl ImageSource for LiveBackdrop {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        Color::from_rgba8(self.pixels[(y * self.width + x) as usize])
    }
}
