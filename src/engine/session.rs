// Interaction state around one quilt: view mode, selection, tap handling.
//
// This is the layer that turns taps into quilt calls. It knows nothing about
// wgpu; the renderer polls `take_mesh_dirty()` to decide when to re-upload.
//
// Tap rules:
//   - tap on the quilt          → select that triangle and outline it
//   - tap off the quilt (block) → sample the image under the tap and paint
//                                 the selected triangle with it
//   - tap off the quilt (quilt) → ignored; painting happens in block view

use glam::{Vec2, Vec3};
use rand::Rng;
use rand::rngs::StdRng;

use crate::quilt::{Color, Quilt, QuiltError, QuiltLayout};
use super::camera::QuiltCamera;
use super::config::ViewerConfig;
use super::image_source::{sample_at_ratio, ImageSource};
use super::picking::pick_triangle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// A single block, editable.
    Block,
    /// The full N×N grid.
    Quilt,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Block => ViewMode::Quilt,
            ViewMode::Quilt => ViewMode::Block,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Block => "block",
            ViewMode::Quilt => "quilt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    Selected { triangle: usize },
    Recolored { triangle: usize, color: Color },
    /// Missed the quilt in quilt view, or the window has no area.
    Ignored,
}

pub struct QuiltSession<R = StdRng> {
    quilt: Quilt<R>,
    block_layout: QuiltLayout,
    quilt_blocks_across: u32,
    view: ViewMode,
    pub camera: QuiltCamera,

    /// Triangle that off-quilt taps paint. Starts at 0, like an untouched cursor.
    selected: usize,
    outline_visible: bool,
    last_hit: Option<usize>,
    last_sample: Option<Color>,

    /// Set whenever geometry or colors changed since the renderer last looked.
    mesh_dirty: bool,
}

impl<R: Rng> QuiltSession<R> {
    /// Start in block view with `quilt` freshly drawn.
    pub fn new(config: &ViewerConfig, quilt: Quilt<R>) -> Result<Self, QuiltError> {
        let mut session = Self {
            quilt,
            block_layout: config.layout(1),
            quilt_blocks_across: config.quilt_blocks_across,
            view: ViewMode::Block,
            camera: QuiltCamera::new(),
            selected: 0,
            outline_visible: false,
            last_hit: None,
            last_sample: None,
            mesh_dirty: true,
        };
        session.redraw()?;
        Ok(session)
    }

    fn current_layout(&self) -> QuiltLayout {
        match self.view {
            ViewMode::Block => self.block_layout,
            ViewMode::Quilt => self.block_layout.with_blocks_across(self.quilt_blocks_across),
        }
    }

    fn redraw(&mut self) -> Result<(), QuiltError> {
        self.quilt.draw_quilt_block(self.current_layout())?;
        if let Some((min, max)) = self.quilt.mesh().bounds() {
            self.camera.frame(min, max);
        }
        if self.selected >= self.quilt.triangle_count() {
            log::debug!("selection {} dropped after resize", self.selected);
            self.selected = 0;
        }
        self.mesh_dirty = true;
        Ok(())
    }

    /// Switch between block and quilt view. Hides the outline.
    pub fn toggle_view(&mut self) -> Result<(), QuiltError> {
        let previous = self.view;
        self.view = self.view.toggled();
        if let Err(e) = self.redraw() {
            self.view = previous;
            return Err(e);
        }
        self.outline_visible = false;
        log::info!("switched to {} view ({} triangles)", self.view.label(), self.quilt.triangle_count());
        Ok(())
    }

    /// Apply one accepted tap at window pixel `tap`.
    pub fn handle_tap<S: ImageSource + ?Sized>(
        &mut self,
        tap: Vec2,
        window_size: (u32, u32),
        image: &S,
    ) -> Result<TapOutcome, QuiltError> {
        let Some(ray) = self.camera.screen_ray(tap, window_size) else {
            return Ok(TapOutcome::Ignored);
        };

        if let Some(hit) = pick_triangle(&ray, self.quilt.vertices(), self.quilt.triangles()) {
            log::debug!("mesh triangle index: {}", hit.triangle);
            self.selected = hit.triangle;
            self.last_hit = Some(hit.triangle);
            self.outline_visible = true;
            return Ok(TapOutcome::Selected { triangle: hit.triangle });
        }

        if self.view != ViewMode::Block {
            return Ok(TapOutcome::Ignored);
        }

        let ratio = tap / Vec2::new(window_size.0 as f32, window_size.1 as f32);
        let Some(color) = sample_at_ratio(image, ratio) else {
            return Ok(TapOutcome::Ignored);
        };
        self.quilt.set_colors(color, self.selected)?;
        self.last_sample = Some(color);
        self.mesh_dirty = true;
        Ok(TapOutcome::Recolored { triangle: self.selected, color })
    }

    /// Corners of the selected triangle while its outline is shown.
    pub fn outline(&self) -> Option<[Vec3; 3]> {
        if !self.outline_visible {
            return None;
        }
        self.quilt.mesh().triangle_corners(self.selected).ok()
    }

    /// True once per change; clears the flag.
    pub fn take_mesh_dirty(&mut self) -> bool {
        std::mem::take(&mut self.mesh_dirty)
    }

    pub fn quilt(&self) -> &Quilt<R> { &self.quilt }
    pub fn view(&self) -> ViewMode { self.view }
    pub fn selected(&self) -> usize { self.selected }
    pub fn last_hit(&self) -> Option<usize> { self.last_hit }
    pub fn last_sample(&self) -> Option<Color> { self.last_sample }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: (u32, u32) = (800, 600);

    struct Solid(Color);

    impl ImageSource for Solid {
        fn dimensions(&self) -> (u32, u32) { (4, 4) }
        fn pixel(&self, _x: u32, _y: u32) -> Color { self.0 }
    }

    fn session() -> QuiltSession {
        QuiltSession::new(&ViewerConfig::new(), Quilt::seeded(21)).unwrap()
    }

    fn centroid_on_screen(s: &QuiltSession, triangle: usize) -> Vec2 {
        let [a, b, c] = s.quilt().mesh().triangle_corners(triangle).unwrap();
        s.camera.world_to_screen((a + b + c) / 3.0, SIZE)
    }

    #[test]
    fn starts_in_block_view_with_one_block() {
        let mut s = session();
        assert_eq!(s.view(), ViewMode::Block);
        assert_eq!(s.quilt().triangle_count(), 8);
        assert!(s.take_mesh_dirty());
        assert!(!s.take_mesh_dirty());
        assert_eq!(s.outline(), None);
    }

    #[test]
    fn tap_on_quilt_selects_and_outlines() {
        let mut s = session();
        let tap = centroid_on_screen(&s, 6);
        let outcome = s.handle_tap(tap, SIZE, &Solid(Color::WHITE)).unwrap();
        assert_eq!(outcome, TapOutcome::Selected { triangle: 6 });
        assert_eq!(s.selected(), 6);
        assert_eq!(s.last_hit(), Some(6));
        assert_eq!(s.outline(), s.quilt().mesh().triangle_corners(6).ok());
    }

    #[test]
    fn tap_off_quilt_paints_selection_in_block_view() {
        let mut s = session();
        let tap = centroid_on_screen(&s, 3);
        s.handle_tap(tap, SIZE, &Solid(Color::WHITE)).unwrap();
        s.take_mesh_dirty();

        let teal = Color::new(0.0, 0.5, 0.5);
        let outcome = s.handle_tap(Vec2::new(2.0, 2.0), SIZE, &Solid(teal)).unwrap();

        assert_eq!(outcome, TapOutcome::Recolored { triangle: 3, color: teal });
        assert_eq!(s.quilt().mesh().triangle_color(3), Ok(teal));
        assert_eq!(s.last_sample(), Some(teal));
        assert!(s.take_mesh_dirty());
    }

    #[test]
    fn tap_off_quilt_is_ignored_in_quilt_view() {
        let mut s = session();
        s.toggle_view().unwrap();
        let before = s.quilt().colors().to_vec();
        let outcome = s.handle_tap(Vec2::new(2.0, 2.0), SIZE, &Solid(Color::BLACK)).unwrap();
        assert_eq!(outcome, TapOutcome::Ignored);
        assert_eq!(s.quilt().colors(), &before[..]);
    }

    #[test]
    fn toggling_round_trip_keeps_first_block_edits() {
        let mut s = session();
        let gold = Color::new(1.0, 0.8, 0.0);
        // Nothing selected yet: paints triangle 0.
        s.handle_tap(Vec2::new(2.0, 2.0), SIZE, &Solid(gold)).unwrap();

        s.toggle_view().unwrap();
        assert_eq!(s.view(), ViewMode::Quilt);
        assert_eq!(s.quilt().triangle_count(), 72);
        for t in (0..72).step_by(8) {
            assert_eq!(s.quilt().mesh().triangle_color(t), Ok(gold));
        }

        s.toggle_view().unwrap();
        assert_eq!(s.view(), ViewMode::Block);
        assert_eq!(s.quilt().mesh().triangle_color(0), Ok(gold));
    }

    #[test]
    fn toggle_hides_outline_and_drops_stale_selection() {
        let mut s = session();
        s.toggle_view().unwrap();
        let tap = centroid_on_screen(&s, 50);
        s.handle_tap(tap, SIZE, &Solid(Color::WHITE)).unwrap();
        assert_eq!(s.selected(), 50);
        assert!(s.outline().is_some());

        s.toggle_view().unwrap();
        assert_eq!(s.outline(), None);
        assert_eq!(s.selected(), 0);
    }

    #[test]
    fn zero_sized_window_ignores_taps() {
        let mut s = session();
        assert_eq!(
            s.handle_tap(Vec2::ZERO, (0, 0), &Solid(Color::WHITE)).unwrap(),
            TapOutcome::Ignored,
        );
    }
}
