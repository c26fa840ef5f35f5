// Flying geese quilt: a procedural triangle-mesh generator with per-triangle
// color state, plus the viewer glue (camera, picking, input, overlay) that drives it.

pub mod engine;
pub mod quilt;

pub use quilt::{Color, Quilt, QuiltError, QuiltLayout, QuiltMesh};
