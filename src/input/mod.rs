//! Frame-coherent input state.
//!
//! The host feeds raw key and mouse events in as they arrive; behaviours read
//! a stable snapshot during update. Edge states (pressed this frame, released
//! this frame) and the mouse delta are cleared by [`Input::end_frame`], which
//! the host calls after every executed frame, while held-key state persists
//! until the matching release event.
//!
//! Key names are case-insensitive: `"W"` and `"w"` are the same key.

use std::collections::HashSet;

use crate::foundation::math::Vec2;

/// Aggregated keyboard and mouse state for one frame.
#[derive(Debug, Default, Clone)]
pub struct Input {
    keys_down: HashSet<String>,
    keys_pressed: HashSet<String>,
    keys_released: HashSet<String>,
    buttons_down: HashSet<u8>,
    buttons_pressed: HashSet<u8>,
    buttons_released: HashSet<u8>,
    mouse_position: Vec2,
    mouse_delta: Vec2,
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

impl Input {
    /// Empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down event. Repeats while held are ignored.
    pub fn press_key(&mut self, key: &str) {
        let key = normalize(key);
        if self.keys_down.insert(key.clone()) {
            self.keys_pressed.insert(key);
        }
    }

    /// Record a key-up event.
    pub fn release_key(&mut self, key: &str) {
        let key = normalize(key);
        if self.keys_down.remove(&key) {
            self.keys_released.insert(key);
        }
    }

    /// Whether the key is currently held.
    pub fn key_down(&self, key: &str) -> bool {
        self.keys_down.contains(&normalize(key))
    }

    /// Whether the key went down this frame.
    pub fn key_pressed(&self, key: &str) -> bool {
        self.keys_pressed.contains(&normalize(key))
    }

    /// Whether the key went up this frame.
    pub fn key_released(&self, key: &str) -> bool {
        self.keys_released.contains(&normalize(key))
    }

    /// Record a mouse-button-down event.
    pub fn press_button(&mut self, button: u8) {
        if self.buttons_down.insert(button) {
            self.buttons_pressed.insert(button);
        }
    }

    /// Record a mouse-button-up event.
    pub fn release_button(&mut self, button: u8) {
        if self.buttons_down.remove(&button) {
            self.buttons_released.insert(button);
        }
    }

    /// Whether the mouse button is currently held.
    pub fn button_down(&self, button: u8) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Whether the mouse button went down this frame.
    pub fn button_pressed(&self, button: u8) -> bool {
        self.buttons_pressed.contains(&button)
    }

    /// Move the cursor; the delta accumulates until `end_frame`.
    pub fn move_mouse(&mut self, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        self.mouse_delta += position - self.mouse_position;
        self.mouse_position = position;
    }

    /// Current cursor position.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Cursor movement accumulated this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Clear per-frame edge state. Held keys and buttons persist.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.mouse_delta = Vec2::zeros();
    }
}
