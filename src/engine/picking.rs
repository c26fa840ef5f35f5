// Ray casting against the quilt mesh.
// Resolves a screen tap to a triangle index; the quilt core never sees rays.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize() }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub triangle: usize,
    /// Distance along the ray.
    pub distance: f32,
    pub point: Vec3,
}

const EPSILON: f32 = 1e-6;

/// Möller–Trumbore ray/triangle test. Double-sided; returns the distance along
/// the ray, or `None` on a miss or a hit behind the origin.
pub fn intersect_triangle(ray: &Ray, [a, b, c]: [Vec3; 3]) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None; // parallel to the triangle plane
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Nearest triangle hit by `ray`, walking the index list three at a time.
/// Edges shared by two triangles resolve to the lower index.
pub fn pick_triangle(ray: &Ray, vertices: &[Vec3], triangles: &[u32]) -> Option<RayHit> {
    let mut best: Option<RayHit> = None;

    for (triangle, idx) in triangles.chunks_exact(3).enumerate() {
        let corners = [
            vertices[idx[0] as usize],
            vertices[idx[1] as usize],
            vertices[idx[2] as usize],
        ];
        let Some(t) = intersect_triangle(ray, corners) else {
            continue;
        };
        if best.is_none_or(|hit| t < hit.distance) {
            best = Some(RayHit { triangle, distance: t, point: ray.at(t) });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quilt::{Quilt, QuiltLayout};

    fn down_z(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, -100.0), Vec3::Z)
    }

    #[test]
    fn hits_triangle_under_point() {
        let tri = [Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        assert_eq!(intersect_triangle(&down_z(0.25, 0.25), tri), Some(100.0));
        assert_eq!(intersect_triangle(&down_z(0.75, 0.75), tri), None);
        // Behind the origin.
        let away = Ray::new(Vec3::new(0.25, 0.25, -100.0), Vec3::NEG_Z);
        assert_eq!(intersect_triangle(&away, tri), None);
        // Edge-on.
        let grazing = Ray::new(Vec3::new(-1.0, 0.25, 0.0), Vec3::X);
        assert_eq!(intersect_triangle(&grazing, tri), None);
    }

    #[test]
    fn picks_each_triangle_of_a_block_at_its_centroid() {
        let mut quilt = Quilt::seeded(11);
        quilt.draw_quilt_block(QuiltLayout::new(300.0, -10.0, 200.0, -150.0, 1)).unwrap();
        let mesh = quilt.mesh();

        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle_corners(t).unwrap();
            let centroid = (a + b + c) / 3.0;
            let hit = pick_triangle(&down_z(centroid.x, centroid.y), mesh.vertices, mesh.triangles)
                .expect("centroid should hit");
            assert_eq!(hit.triangle, t);
            assert!((hit.distance - 90.0).abs() < 1e-3, "distance {}", hit.distance);
            assert!((hit.point.z + 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn misses_outside_the_quilt() {
        let mut quilt = Quilt::seeded(12);
        quilt.draw_quilt_block(QuiltLayout::new(300.0, -10.0, 200.0, -150.0, 3)).unwrap();
        assert_eq!(pick_triangle(&down_z(0.0, 0.0), quilt.vertices(), quilt.triangles()), None);
        assert_eq!(pick_triangle(&down_z(350.0, 151.0), quilt.vertices(), quilt.triangles()), None);
    }

    #[test]
    fn nearest_of_stacked_triangles_wins() {
        let near = [Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 1.0, -5.0), Vec3::new(1.0, 0.0, -5.0)];
        let far = [Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 1.0, 5.0), Vec3::new(1.0, 0.0, 5.0)];
        let vertices: Vec<Vec3> = far.into_iter().chain(near).collect();
        let triangles: Vec<u32> = (0..6).collect();
        let hit = pick_triangle(&down_z(0.2, 0.2), &vertices, &triangles).unwrap();
        assert_eq!(hit.triangle, 1);
        assert_eq!(hit.distance, 95.0);
    }
}
