// Orthographic camera that frames the quilt.
//
// Camera model:
//   - Left-handed: +X right, +Y up, looking down +Z at the quilt plane
//   - The quilt's bounds are fitted to the window with a margin, whatever
//     the aspect ratio
//   - No user control: every regeneration re-frames the mesh

use glam::{Mat4, Vec2, Vec3};

use super::picking::Ray;

pub struct QuiltCamera {
    /// Center of the framed region on the XY plane.
    /// Private: set through frame(). Use center() to read.
    center: Vec2,

    /// Half size of the framed content, before aspect fitting.
    half_extent: Vec2,

    /// Extra space around the content, as a fraction of its half size.
    pub margin: f32,

    /// How far in front of Z = 0 the eye sits (along -Z).
    pub eye_distance: f32,
    pub near: f32,
    pub far: f32,
}

impl QuiltCamera {
    pub fn new() -> Self {
        Self {
            center: Vec2::ZERO,
            half_extent: Vec2::splat(1.0),
            margin: 0.15,
            eye_distance: 100.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Fit the camera to an axis-aligned box. Degenerate extents fall back to
    /// one unit so the projection stays invertible.
    pub fn frame(&mut self, min: Vec3, max: Vec3) {
        self.center = ((min + max) / 2.0).truncate();
        self.half_extent = ((max - min) / 2.0).truncate().max(Vec2::splat(1.0));
    }

    pub fn center(&self) -> Vec2 { self.center }

    /// Half width/height actually visible for `aspect` (width / height).
    pub fn visible_half_extent(&self, aspect: f32) -> Vec2 {
        let padded = self.half_extent * (1.0 + self.margin);
        if padded.x / padded.y < aspect {
            Vec2::new(padded.y * aspect, padded.y)
        } else {
            Vec2::new(padded.x, padded.x / aspect)
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.center.extend(-self.eye_distance)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.eye(), self.center.extend(0.0), Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let half = self.visible_half_extent(aspect);
        Mat4::orthographic_lh(-half.x, half.x, -half.y, half.y, self.near, self.far)
    }

    /// Combined view-projection matrix ready to upload to the GPU.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Ray through a window pixel (origin top-left, +Y down).
    /// `None` while the window has no area.
    pub fn screen_ray(&self, screen: Vec2, window_size: (u32, u32)) -> Option<Ray> {
        let (w, h) = (window_size.0 as f32, window_size.1 as f32);
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(2.0 * screen.x / w - 1.0, 1.0 - 2.0 * screen.y / h);
        let inv = self.view_projection(w / h).inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        Some(Ray::new(near, far - near))
    }

    /// Window pixel of a world point (origin top-left, +Y down).
    pub fn world_to_screen(&self, point: Vec3, window_size: (u32, u32)) -> Vec2 {
        let (w, h) = (window_size.0 as f32, window_size.1 as f32);
        let ndc = self.view_projection(w / h).project_point3(point);
        Vec2::new((ndc.x + 1.0) / 2.0 * w, (1.0 - ndc.y) / 2.0 * h)
    }
}

impl Default for QuiltCamera {
    fn default() -> Self {
        Self::new()
    }
}
