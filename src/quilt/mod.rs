// Quilt core: the flying geese mesh generator and its per-triangle color state.
//
//   QuiltLayout → pattern::generate() → Geometry ─┐
//                                                  ├→ QuiltMesh (borrowed view) → renderer / picker
//   ColorStore::resize() ← previous colors ────────┘
//
// A `Quilt` owns both halves. Nothing here touches windows, GPUs or input;
// callers compose it with whatever draws and hit-tests the mesh.

mod color;
mod error;
mod mesh;
pub mod palette;
pub mod pattern;

pub use color::Color;
pub use error::QuiltError;
pub use mesh::QuiltMesh;
pub use palette::{ColorStore, Remap};
pub use pattern::{Geometry, QuiltLayout, MAX_BLOCKS_ACROSS, TRIANGLES_PER_BLOCK, VERTICES_PER_BLOCK};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generator instance: the current mesh geometry plus the colors painted on it.
///
/// `R` is the random source used for the initial grayscale coloring. Tests
/// pass a seeded `StdRng`; the viewer uses an entropy-seeded one.
pub struct Quilt<R = StdRng> {
    geometry: Geometry,
    palette: ColorStore,
    layout: Option<QuiltLayout>,
    rng: R,
}

impl Quilt<StdRng> {
    /// Empty quilt with an entropy-seeded random source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Empty quilt whose random coloring is reproducible from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Quilt<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Quilt<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            geometry: Geometry::default(),
            palette: ColorStore::new(),
            layout: None,
            rng,
        }
    }

    /// Regenerate the whole mesh for `layout` and remap the colors onto it.
    ///
    /// On error nothing changes: the previous geometry and colors stay in place.
    pub fn draw_quilt_block(&mut self, layout: QuiltLayout) -> Result<(), QuiltError> {
        let geometry = pattern::generate(&layout)?;
        let old_len = self.palette.len();
        let remap = self.palette.resize(geometry.vertex_count(), &mut self.rng)?;

        log::debug!(
            "quilt regenerated: {n}x{n} blocks, triangle width {w}, {verts} vertices, colors {old_len} -> {new_len} ({remap:?})",
            n = layout.blocks_across,
            w = geometry.triangle_width,
            verts = geometry.vertex_count(),
            new_len = self.palette.len(),
        );

        self.geometry = geometry;
        self.layout = Some(layout);
        Ok(())
    }

    /// Paint one triangle. The new color is visible through `mesh()` at once.
    pub fn set_colors(&mut self, color: Color, triangle: usize) -> Result<(), QuiltError> {
        self.palette.set_triangle(triangle, color)?;
        log::debug!("triangle {triangle} set to {color:?}");
        Ok(())
    }

    pub fn mesh(&self) -> QuiltMesh<'_> {
        QuiltMesh {
            vertices: &self.geometry.vertices,
            triangles: &self.geometry.triangles,
            normals: &self.geometry.normals,
            uvs: &self.geometry.uvs,
            colors: self.palette.colors(),
        }
    }

    pub fn triangles(&self) -> &[u32] {
        &self.geometry.triangles
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.geometry.vertices
    }

    pub fn colors(&self) -> &[Color] {
        self.palette.colors()
    }

    pub fn triangle_count(&self) -> usize {
        self.geometry.triangle_count()
    }

    /// Layout of the last successful `draw_quilt_block`, if any.
    pub fn layout(&self) -> Option<&QuiltLayout> {
        self.layout.as_ref()
    }

    pub fn has_user_edits(&self) -> bool {
        self.palette.is_user_edited()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout(blocks_across: u32) -> QuiltLayout {
        QuiltLayout::new(300.0, -10.0, 200.0, -150.0, blocks_across)
    }

    #[test]
    fn new_quilt_is_empty() {
        let quilt = Quilt::seeded(1);
        assert!(quilt.mesh().is_empty());
        assert_eq!(quilt.triangle_count(), 0);
        assert!(quilt.layout().is_none());
    }

    #[test]
    fn set_colors_before_any_draw_is_out_of_range() {
        let mut quilt = Quilt::seeded(1);
        assert_eq!(
            quilt.set_colors(Color::WHITE, 0),
            Err(QuiltError::TriangleOutOfRange { index: 0, count: 0 }),
        );
        assert!(!quilt.has_user_edits());
    }

    #[test]
    fn failed_draw_keeps_previous_mesh() {
        let mut quilt = Quilt::seeded(2);
        quilt.draw_quilt_block(layout(1)).unwrap();
        let vertices = quilt.vertices().to_vec();
        let colors = quilt.colors().to_vec();

        assert!(quilt.draw_quilt_block(layout(0)).is_err());

        assert_eq!(quilt.vertices(), &vertices[..]);
        assert_eq!(quilt.colors(), &colors[..]);
        assert_eq!(quilt.layout(), Some(&layout(1)));
    }

    #[test]
    fn redraw_without_edits_rerandomizes_but_keeps_geometry() {
        let mut quilt = Quilt::seeded(3);
        quilt.draw_quilt_block(layout(2)).unwrap();
        let mesh = quilt.mesh();
        let (vertices, triangles, normals, uvs, colors) = (
            mesh.vertices.to_vec(),
            mesh.triangles.to_vec(),
            mesh.normals.to_vec(),
            mesh.uvs.to_vec(),
            mesh.colors.to_vec(),
        );

        quilt.draw_quilt_block(layout(2)).unwrap();
        let mesh = quilt.mesh();
        assert_eq!(mesh.vertices, &vertices[..]);
        assert_eq!(mesh.triangles, &triangles[..]);
        assert_eq!(mesh.normals, &normals[..]);
        assert_eq!(mesh.uvs, &uvs[..]);
        assert_ne!(mesh.colors, &colors[..]);
    }

    #[test]
    fn triangle_corners_follow_index_list() {
        let mut quilt = Quilt::seeded(4);
        quilt.draw_quilt_block(layout(1)).unwrap();
        let mesh = quilt.mesh();
        assert_eq!(
            mesh.triangle_corners(0),
            Ok([
                Vec3::new(200.0, 0.0, -10.0),
                Vec3::new(200.0, 150.0, -10.0),
                Vec3::new(350.0, 150.0, -10.0),
            ]),
        );
        assert_eq!(
            mesh.triangle_corners(8),
            Err(QuiltError::TriangleOutOfRange { index: 8, count: 8 }),
        );
    }

    proptest! {
        #[test]
        fn counts_scale_with_block_grid(n in 1u32..=12) {
            let mut quilt = Quilt::seeded(u64::from(n));
            quilt.draw_quilt_block(layout(n)).unwrap();
            let expected = 24 * (n * n) as usize;

            prop_assert_eq!(quilt.vertices().len(), expected);
            prop_assert_eq!(quilt.triangles().len(), expected);
            prop_assert_eq!(quilt.colors().len(), expected);
            prop_assert_eq!(quilt.triangle_count(), 8 * (n * n) as usize);
            prop_assert!(quilt.triangles().iter().enumerate().all(|(i, &t)| t as usize == i));
        }

        #[test]
        fn set_colors_touches_only_its_triangle(
            n in 1u32..=4,
            pick in any::<prop::sample::Index>(),
            r in -1.0f32..2.0,
            g in -1.0f32..2.0,
            b in -1.0f32..2.0,
        ) {
            let mut quilt = Quilt::seeded(99);
            quilt.draw_quilt_block(layout(n)).unwrap();
            let before = quilt.colors().to_vec();
            let t = pick.index(quilt.triangle_count());
            let c = Color::new(r, g, b);

            quilt.set_colors(c, t).unwrap();

            for (i, (now, was)) in quilt.colors().iter().zip(&before).enumerate() {
                if i / 3 == t {
                    prop_assert_eq!(*now, c);
                } else {
                    prop_assert_eq!(now, was);
                }
            }
        }
    }
}
