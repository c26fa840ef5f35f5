// Viewer configuration.
// Defaults live in `new()`; a handful can be overridden from the environment
// so the viewer can be poked at without a rebuild.

use crate::quilt::{QuiltLayout, MAX_BLOCKS_ACROSS};

pub struct ViewerConfig {
    /// Width shared by one row of blocks, in layout units.
    pub quilt_width: f32,
    /// Z of every quilt vertex.
    pub triangle_depth: f32,
    pub x_offset: f32,
    pub y_offset: f32,

    /// Blocks per side in quilt view. Block view always shows one.
    pub quilt_blocks_across: u32,

    /// Frames to ignore taps for after an accepted tap.
    pub tap_debounce_frames: u32,

    /// Resolution of the live backdrop image that taps sample from.
    pub backdrop_size: (u32, u32),

    /// Seed for the initial random grays. `None` = seed from entropy.
    pub seed: Option<u64>,

    pub window_size: (u32, u32),
}

impl ViewerConfig {
    pub fn new() -> Self {
        Self {
            quilt_width: 300.0,
            triangle_depth: -10.0,
            x_offset: 200.0,
            y_offset: -150.0,
            quilt_blocks_across: 3,
            tap_debounce_frames: 5,
            backdrop_size: (160, 120),
            seed: None,
            window_size: (1280, 720),
        }
    }

    /// Defaults overridden by `QUILT_BLOCKS`, `QUILT_SEED`, `QUILT_WIDTH` and
    /// `QUILT_DEBOUNCE_FRAMES`. Bad values are logged and ignored.
    pub fn from_env() -> Self {
        Self::new().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key → value lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(n) = parse_var::<u32>(&lookup, "QUILT_BLOCKS") {
            if (1..=MAX_BLOCKS_ACROSS).contains(&n) {
                self.quilt_blocks_across = n;
            } else {
                log::warn!("QUILT_BLOCKS={n} ignored: must be between 1 and {MAX_BLOCKS_ACROSS}");
            }
        }
        if let Some(seed) = parse_var::<u64>(&lookup, "QUILT_SEED") {
            self.seed = Some(seed);
        }
        if let Some(width) = parse_var::<f32>(&lookup, "QUILT_WIDTH") {
            if width.is_finite() && width > 0.0 {
                self.quilt_width = width;
            } else {
                log::warn!("QUILT_WIDTH={width} ignored: must be a positive number");
            }
        }
        if let Some(frames) = parse_var::<u32>(&lookup, "QUILT_DEBOUNCE_FRAMES") {
            self.tap_debounce_frames = frames;
        }
        self
    }

    /// Layout for the given number of blocks across.
    pub fn layout(&self, blocks_across: u32) -> QuiltLayout {
        QuiltLayout::new(
            self.quilt_width,
            self.triangle_depth,
            self.x_offset,
            self.y_offset,
            blocks_across,
        )
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("{key}={raw:?} ignored: not a valid value");
            None
        }
    }
}
