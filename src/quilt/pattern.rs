// Flying geese pattern generator.
//
// Lays out an N×N grid of square quilt blocks. Every block is the same fixed
// decomposition into 8 right triangles (24 vertices): a top strip of 4 and a
// bottom strip of 4. No vertex is shared between triangles, so each triangle
// can carry its own flat color.
//
// Block layout, w = triangle width, (x, y) = block's top-left corner:
//
//   (x,y)     (x+w,y)    (x+2w,y)
//     ┌─────────┬─────────┐
//     │ 0     ╱ │ ╲     3 │
//     │   ╱   1 │ 2   ╲   │
//     ├─────────┼─────────┤   (x, y-w)
//     │ ╲     5 │ 6     ╱ │
//     │ 4   ╲   │   ╱   7 │
//     └─────────┴─────────┘   (x, y-2w)
//
// Triangles 1+2 form the upward goose, 5+6 the mirrored downward one.

use glam::{Vec2, Vec3};

use super::error::QuiltError;

pub const TRIANGLES_PER_BLOCK: usize = 8;
pub const VERTICES_PER_BLOCK: usize = TRIANGLES_PER_BLOCK * 3;

/// Upper bound on `blocks_across`. Keeps the vertex count well inside `u32`
/// index range (24 * 1024² ≈ 25M vertices).
pub const MAX_BLOCKS_ACROSS: u32 = 1024;

/// Every quilt vertex faces a viewer looking down +Z.
pub const QUILT_NORMAL: Vec3 = Vec3::NEG_Z;

// ============================================================================
// BLOCK TEMPLATE
// ============================================================================

/// One corner of the block template.
struct Corner {
    /// Offset from the block origin in triangle widths: `[right, down]`.
    step: [f32; 2],
    uv: [f32; 2],
}

const fn corner(right: f32, down: f32, u: f32, v: f32) -> Corner {
    Corner { step: [right, down], uv: [u, v] }
}

// The UV assignments of the bottom strip do not mirror its geometry exactly;
// they are kept as-is so existing texture atlases line up.
const FLYING_GEESE: [Corner; VERTICES_PER_BLOCK] = [
    // top strip
    corner(0.0, 1.0, 0.0, 0.5),
    corner(0.0, 0.0, 0.0, 1.0),
    corner(1.0, 0.0, 0.5, 1.0),

    corner(0.0, 1.0, 0.0, 0.5),
    corner(1.0, 0.0, 0.5, 1.0),
    corner(1.0, 1.0, 0.5, 0.5),

    corner(1.0, 1.0, 0.5, 0.5),
    corner(1.0, 0.0, 0.5, 1.0),
    corner(2.0, 1.0, 1.0, 0.5),

    corner(1.0, 0.0, 0.5, 1.0),
    corner(2.0, 0.0, 1.0, 1.0),
    corner(2.0, 1.0, 1.0, 0.5),

    // bottom strip
    corner(0.0, 2.0, 0.0, 0.0),
    corner(0.0, 1.0, 0.0, 0.5),
    corner(1.0, 2.0, 0.5, 0.5),

    corner(0.0, 1.0, 0.0, 0.0),
    corner(1.0, 1.0, 0.5, 0.5),
    corner(1.0, 2.0, 0.5, 0.0),

    corner(1.0, 2.0, 0.5, 0.0),
    corner(1.0, 1.0, 0.5, 0.5),
    corner(2.0, 1.0, 1.0, 0.0),

    corner(1.0, 2.0, 0.5, 0.5),
    corner(2.0, 1.0, 1.0, 0.5),
    corner(2.0, 2.0, 1.0, 0.0),
];

// ============================================================================
// LAYOUT PARAMETERS
// ============================================================================

/// Parameters of one `draw_quilt_block` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuiltLayout {
    /// Width of one block row in layout units. Shared by all blocks in the
    /// row, so the quilt keeps roughly the same size at any block count.
    pub quilt_width: f32,
    /// Constant Z applied to every vertex.
    pub triangle_depth: f32,
    pub x_offset: f32,
    pub y_offset: f32,
    /// Blocks per side; the grid is always square.
    pub blocks_across: u32,
}

impl QuiltLayout {
    pub fn new(
        quilt_width: f32,
        triangle_depth: f32,
        x_offset: f32,
        y_offset: f32,
        blocks_across: u32,
    ) -> Self {
        Self { quilt_width, triangle_depth, x_offset, y_offset, blocks_across }
    }

    /// Same layout at a different grid size.
    pub fn with_blocks_across(self, blocks_across: u32) -> Self {
        Self { blocks_across, ..self }
    }

    /// Leg length of each right triangle.
    ///
    /// The per-block width is truncated to a whole number before halving with
    /// integer division, so this is always integral: 300 / 1 → 150, 300 / 3 → 50,
    /// 301 / 1 → 150.
    pub fn triangle_width(&self) -> f32 {
        let block_width = (self.quilt_width / self.blocks_across as f32).trunc() as i64;
        (block_width / 2) as f32
    }

    pub fn block_count(&self) -> usize {
        let n = self.blocks_across as usize;
        n * n
    }

    pub fn vertex_count(&self) -> usize {
        self.block_count() * VERTICES_PER_BLOCK
    }

    pub fn triangle_count(&self) -> usize {
        self.block_count() * TRIANGLES_PER_BLOCK
    }

    pub fn validate(&self) -> Result<(), QuiltError> {
        if self.blocks_across == 0 || self.blocks_across > MAX_BLOCKS_ACROSS {
            return Err(QuiltError::InvalidBlockCount {
                blocks_across: self.blocks_across,
                max: MAX_BLOCKS_ACROSS,
            });
        }
        for (name, value) in [
            ("quilt_width", self.quilt_width),
            ("triangle_depth", self.triangle_depth),
            ("x_offset", self.x_offset),
            ("y_offset", self.y_offset),
        ] {
            if !value.is_finite() {
                return Err(QuiltError::NonFiniteParameter { name, value });
            }
        }
        Ok(())
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Everything about the quilt mesh except its colors.
/// Rebuilt from scratch on every generation, never edited in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vec3>,
    /// Identity list `0..vertices.len()`: disjoint triangles, nothing welded.
    pub triangles: Vec<u32>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub triangle_width: f32,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Build the full mesh geometry for `layout`.
///
/// Blocks are visited in row-major order. Starting a row (including the first)
/// moves the y offset up one block height and resets x to the input offset;
/// every other block moves x right one block width. The first block therefore
/// spans `[x_offset, x_offset + 2w] × [y_offset, y_offset + 2w]`.
pub fn generate(layout: &QuiltLayout) -> Result<Geometry, QuiltError> {
    layout.validate()?;

    let w = layout.triangle_width();
    let block_step = 2.0 * w;
    let n_blocks = layout.block_count();
    let n_verts = layout.vertex_count();
    let across = layout.blocks_across as usize;

    let mut vertices = Vec::with_capacity(n_verts);
    let mut uvs = Vec::with_capacity(n_verts);

    let mut x = layout.x_offset;
    let mut y = layout.y_offset;

    for block in 0..n_blocks {
        if block % across == 0 {
            y += block_step;
            x = layout.x_offset;
        } else {
            x += block_step;
        }
        log::trace!("block {block}: offset ({x}, {y})");

        for c in &FLYING_GEESE {
            vertices.push(Vec3::new(
                x + c.step[0] * w,
                y - c.step[1] * w,
                layout.triangle_depth,
            ));
            uvs.push(Vec2::from(c.uv));
        }
    }

    debug_assert_eq!(vertices.len(), n_verts);

    Ok(Geometry {
        vertices,
        triangles: (0..n_verts as u32).collect(),
        normals: vec![QUILT_NORMAL; n_verts],
        uvs,
        triangle_width: w,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single_block() -> QuiltLayout {
        QuiltLayout::new(300.0, -10.0, 200.0, -150.0, 1)
    }

    #[test]
    fn triangle_width_truncates_before_halving() {
        assert_eq!(single_block().triangle_width(), 150.0);
        assert_eq!(single_block().with_blocks_across(3).triangle_width(), 50.0);
        assert_eq!(QuiltLayout::new(301.0, 0.0, 0.0, 0.0, 1).triangle_width(), 150.0);
        assert_eq!(QuiltLayout::new(300.0, 0.0, 0.0, 0.0, 7).triangle_width(), 21.0);
    }

    #[test]
    fn single_block_matches_template() {
        let geo = generate(&single_block()).unwrap();
        assert_eq!(geo.vertex_count(), 24);
        assert_eq!(geo.triangle_count(), 8);

        // First row starts one block height above the input y offset.
        let (x, y, w, z) = (200.0, 150.0, 150.0, -10.0);
        let expected = [
            Vec3::new(x, y - w, z), Vec3::new(x, y, z), Vec3::new(x + w, y, z),
            Vec3::new(x, y - w, z), Vec3::new(x + w, y, z), Vec3::new(x + w, y - w, z),
            Vec3::new(x + w, y - w, z), Vec3::new(x + w, y, z), Vec3::new(x + 2.0 * w, y - w, z),
            Vec3::new(x + w, y, z), Vec3::new(x + 2.0 * w, y, z), Vec3::new(x + 2.0 * w, y - w, z),
            Vec3::new(x, y - 2.0 * w, z), Vec3::new(x, y - w, z), Vec3::new(x + w, y - 2.0 * w, z),
            Vec3::new(x, y - w, z), Vec3::new(x + w, y - w, z), Vec3::new(x + w, y - 2.0 * w, z),
            Vec3::new(x + w, y - 2.0 * w, z), Vec3::new(x + w, y - w, z), Vec3::new(x + 2.0 * w, y - w, z),
            Vec3::new(x + w, y - 2.0 * w, z), Vec3::new(x + 2.0 * w, y - w, z), Vec3::new(x + 2.0 * w, y - 2.0 * w, z),
        ];
        assert_eq!(geo.vertices, expected);
    }

    #[test]
    fn uvs_stay_in_half_unit_grid() {
        let geo = generate(&single_block().with_blocks_across(2)).unwrap();
        for uv in &geo.uvs {
            for c in uv.to_array() {
                assert!(c == 0.0 || c == 0.5 || c == 1.0, "uv component {c}");
            }
        }
        // Every block reuses the same UV table.
        assert_eq!(&geo.uvs[..24], &geo.uvs[24..48]);
        assert_eq!(geo.uvs[0], Vec2::new(0.0, 0.5));
        assert_eq!(geo.uvs[23], Vec2::new(1.0, 0.0));
    }

    #[test]
    fn three_by_three_tiles_without_gaps() {
        let geo = generate(&single_block().with_blocks_across(3)).unwrap();
        assert_eq!(geo.vertex_count(), 216);
        assert_eq!(geo.triangle_width, 50.0);

        // Top-left corner of each block is template vertex 1.
        for block in 0..9 {
            let (row, col) = (block / 3, block % 3);
            let corner = geo.vertices[block * 24 + 1];
            assert_eq!(corner.x, 200.0 + 100.0 * col as f32);
            assert_eq!(corner.y, -50.0 + 100.0 * row as f32);
        }

        let (min, max) = geo.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), v| (lo.min(*v), hi.max(*v)),
        );
        assert_eq!(min, Vec3::new(200.0, -150.0, -10.0));
        assert_eq!(max, Vec3::new(500.0, 150.0, -10.0));
    }

    #[test]
    fn triangles_are_identity_and_normals_constant() {
        let geo = generate(&single_block().with_blocks_across(2)).unwrap();
        assert!(geo.triangles.iter().enumerate().all(|(i, &t)| t as usize == i));
        assert!(geo.normals.iter().all(|n| *n == QUILT_NORMAL));
    }

    #[test]
    fn every_triangle_is_a_right_triangle_with_legs_w() {
        let geo = generate(&single_block()).unwrap();
        for tri in geo.vertices.chunks_exact(3) {
            let mut sides = [
                tri[0].distance_squared(tri[1]),
                tri[1].distance_squared(tri[2]),
                tri[2].distance_squared(tri[0]),
            ];
            sides.sort_by(f32::total_cmp);
            assert_eq!(sides[0], 150.0 * 150.0);
            assert_eq!(sides[1], 150.0 * 150.0);
            assert_eq!(sides[2], 2.0 * 150.0 * 150.0);
        }
    }

    #[test]
    fn rejects_bad_layouts() {
        assert_eq!(
            generate(&single_block().with_blocks_across(0)),
            Err(QuiltError::InvalidBlockCount { blocks_across: 0, max: MAX_BLOCKS_ACROSS }),
        );
        assert!(matches!(
            generate(&single_block().with_blocks_across(MAX_BLOCKS_ACROSS + 1)),
            Err(QuiltError::InvalidBlockCount { .. }),
        ));
        let mut layout = single_block();
        layout.y_offset = f32::NAN;
        assert!(matches!(
            generate(&layout),
            Err(QuiltError::NonFiniteParameter { name: "y_offset", .. }),
        ));
    }
}
