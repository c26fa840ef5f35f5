// Per-triangle color state for the quilt mesh.
//
// Colors live in a flat array parallel to the vertex array, three identical
// entries per triangle. The store survives regeneration: when the mesh is
// rebuilt at a different size, user edits are carried over by `resize`.

use rand::Rng;

use super::color::Color;
use super::error::QuiltError;
use super::pattern::VERTICES_PER_BLOCK;

/// How `resize` produced the new color array. Reported for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remap {
    /// No user edits yet: every triangle got a fresh random gray.
    Randomized,
    /// Grew: the first block's coloring is tiled across every new block.
    Tiled,
    /// Shrank or kept its size: the leading triangles are kept as-is.
    Truncated,
}

#[derive(Debug, Clone, Default)]
pub struct ColorStore {
    colors: Vec<Color>,
    /// Set by the first `set_triangle`; never cleared.
    user_edited: bool,
}

impl ColorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.colors.len() / 3
    }

    pub fn is_user_edited(&self) -> bool {
        self.user_edited
    }

    /// Color of one triangle (all three of its slots agree).
    pub fn triangle(&self, triangle: usize) -> Result<Color, QuiltError> {
        let count = self.triangle_count();
        if triangle >= count {
            return Err(QuiltError::TriangleOutOfRange { index: triangle, count });
        }
        Ok(self.colors[triangle * 3])
    }

    /// Overwrite the three slots of `triangle` with `color` and mark the store
    /// as edited. Out-of-range indices fail and leave the store untouched.
    pub fn set_triangle(&mut self, triangle: usize, color: Color) -> Result<(), QuiltError> {
        let count = self.triangle_count();
        if triangle >= count {
            return Err(QuiltError::TriangleOutOfRange { index: triangle, count });
        }
        let start = triangle * 3;
        self.colors[start..start + 3].fill(color);
        self.user_edited = true;
        Ok(())
    }

    /// Replace the color array with one of `vertex_count` slots.
    ///
    /// Before any edit the store is re-randomized, one gray per triangle.
    /// After an edit, growing tiles the first 24 slots (one block) cyclically
    /// and shrinking keeps the leading slots. Only 1-block ↔ N-block
    /// transitions give a meaningful picture; N ↔ M reuses the same rules.
    /// An empty store has nothing to tile from and is re-randomized.
    ///
    /// `vertex_count` must be a multiple of 3; otherwise the store is left
    /// untouched.
    pub fn resize<R: Rng + ?Sized>(
        &mut self,
        vertex_count: usize,
        rng: &mut R,
    ) -> Result<Remap, QuiltError> {
        if vertex_count % 3 != 0 {
            return Err(QuiltError::PartialTriangle { vertex_count });
        }

        let old = std::mem::take(&mut self.colors);
        let mut colors = Vec::with_capacity(vertex_count);

        let remap = if !self.user_edited || old.is_empty() {
            Remap::Randomized
        } else if vertex_count > old.len() {
            Remap::Tiled
        } else {
            Remap::Truncated
        };

        // Generated meshes hold whole blocks, so the period is one block
        // unless the store was sized by hand.
        let period = old.len().min(VERTICES_PER_BLOCK);

        for slot in (0..vertex_count).step_by(3) {
            let color = match remap {
                Remap::Randomized => Color::random_gray(rng),
                Remap::Tiled => old[slot % period],
                Remap::Truncated => old[slot],
            };
            colors.extend([color; 3]);
        }

        self.colors = colors;
        Ok(remap)
    }
}
