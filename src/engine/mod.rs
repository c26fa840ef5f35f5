// Viewer glue around the quilt core: camera, picking, input, image source,
// session state and the egui overlay. The quilt core never depends on this.

pub mod camera;
pub mod config;
pub mod debug_overlay;
pub mod gpu;
pub mod image_source;
pub mod input;
pub mod picking;
pub mod session;

// Re-export commonly used items
pub use camera::QuiltCamera;
pub use config::ViewerConfig;
pub use image_source::{ImageSource, LiveBackdrop};
pub use input::{InputState, TapDebounce};
pub use session::{QuiltSession, TapOutcome, ViewMode};
