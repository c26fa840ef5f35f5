// Flat RGB color carried by every vertex of a quilt triangle.

use rand::Rng;

/// RGB color for rendering.
/// Channels are nominally in [0, 1] but are never clamped: a sampled value is
/// stored exactly as it was handed in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::gray(0.0);
    pub const WHITE: Self = Self::gray(1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// A shade with all three channels equal.
    pub const fn gray(value: f32) -> Self {
        Self { r: value, g: value, b: value }
    }

    /// Uniform random gray in [0, 1) drawn from `rng`.
    pub fn random_gray<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::gray(rng.gen_range(0.0..1.0))
    }

    /// Convert an 8-bit RGBA pixel; alpha is dropped.
    pub fn from_rgba8([r, g, b, _]: [u8; 4]) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Opaque RGBA, the layout the vertex shader expects.
    pub fn to_rgba(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }

    /// Quantize to 8-bit channels (saturating), for UI swatches.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}
