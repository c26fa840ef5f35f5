// Read-only view of the combined quilt mesh (geometry + colors).
// Renderers and hit-testers borrow this; only `Quilt` can change what it shows.

use glam::{Vec2, Vec3};

use super::color::Color;
use super::error::QuiltError;

/// Borrowed mesh arrays, all indexed per vertex except `triangles`.
/// Invariant: every per-vertex slice has the same length, a multiple of 3.
#[derive(Debug, Clone, Copy)]
pub struct QuiltMesh<'a> {
    pub vertices: &'a [Vec3],
    pub triangles: &'a [u32],
    pub normals: &'a [Vec3],
    pub uvs: &'a [Vec2],
    pub colors: &'a [Color],
}

impl<'a> QuiltMesh<'a> {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// World-space corners of one triangle, looked up through the index list.
    pub fn triangle_corners(&self, triangle: usize) -> Result<[Vec3; 3], QuiltError> {
        let count = self.triangle_count();
        if triangle >= count {
            return Err(QuiltError::TriangleOutOfRange { index: triangle, count });
        }
        let idx = &self.triangles[triangle * 3..triangle * 3 + 3];
        Ok([
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        ])
    }

    /// Flat color of one triangle.
    pub fn triangle_color(&self, triangle: usize) -> Result<Color, QuiltError> {
        let count = self.triangle_count();
        if triangle >= count {
            return Err(QuiltError::TriangleOutOfRange { index: triangle, count });
        }
        Ok(self.colors[triangle * 3])
    }

    /// Axis-aligned bounds of all vertices, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
        )
    }
}
