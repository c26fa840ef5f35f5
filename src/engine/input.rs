// Input state tracking for taps, clicks and keys
// Abstracts winit events into a queryable per-frame snapshot

use std::collections::HashSet;
use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

pub struct InputState {
    // Keyboard
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    // Pointer
    pub cursor_position: Vec2,

    // Taps (left clicks and touch starts) since the last end_frame(), in window pixels
    taps: Vec<Vec2>,

    pub window_size: (u32, u32),
}

impl InputState {
    pub fn new(window_size: (u32, u32)) -> Self {
        Self {
            keys_held: HashSet::new(),
            keys_pressed: HashSet::new(),
            cursor_position: Vec2::ZERO,
            taps: Vec::new(),
            window_size,
        }
    }

    /// Feed a winit WindowEvent into the input state.
    /// Events the UI consumed should not be fed here.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.process_key(key, event.state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                self.taps.push(self.cursor_position);
            }
            WindowEvent::Touch(touch) if touch.phase == TouchPhase::Started => {
                self.taps.push(Vec2::new(touch.location.x as f32, touch.location.y as f32));
            }
            WindowEvent::Resized(size) => {
                self.window_size = (size.width, size.height);
            }
            _ => {}
        }
    }

    // Key repeat reports Pressed again while held; only the first one counts.
    fn process_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => { self.keys_held.remove(&key); }
        }
    }

    /// First tap of this frame, if any. Later taps in the same frame are
    /// dropped, like a finger that only reports its first contact.
    pub fn tap(&self) -> Option<Vec2> {
        self.taps.first().copied()
    }

    pub fn push_tap(&mut self, position: Vec2) {
        self.taps.push(position);
    }

    /// True only on the frame the key went down.
    pub fn was_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Call once per frame after update() has consumed input.
    /// Resets per-frame accumulators.
    pub fn end_frame(&mut self) {
        self.taps.clear();
        self.keys_pressed.clear();
    }
}

/// Ignores taps for a few frames after each accepted one, so a single touch
/// that lingers across frames is not applied repeatedly.
pub struct TapDebounce {
    frames_since_tap: u32,
    pub debounce_frames: u32,
}

impl TapDebounce {
    pub fn new(debounce_frames: u32) -> Self {
        // Start settled so the very first tap is accepted.
        Self { frames_since_tap: debounce_frames, debounce_frames }
    }

    /// Call once per frame with that frame's tap. Returns the tap if it is
    /// accepted.
    pub fn filter(&mut self, tap: Option<Vec2>) -> Option<Vec2> {
        if self.frames_since_tap < self.debounce_frames {
            self.frames_since_tap += 1;
            return None;
        }
        let tap = tap?;
        self.frames_since_tap = 0;
        Some(tap)
    }
}
