// Errors raised by the quilt core.
// Every variant is a caller precondition violation; nothing here is transient.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuiltError {
    #[error("invalid block count {blocks_across}: the grid needs at least one block and at most {max} across")]
    InvalidBlockCount { blocks_across: u32, max: u32 },

    #[error("layout parameter `{name}` must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f32 },

    #[error("triangle index {index} out of range for a mesh of {count} triangles")]
    TriangleOutOfRange { index: usize, count: usize },

    #[error("vertex count {vertex_count} does not split into whole triangles")]
    PartialTriangle { vertex_count: usize },
}
