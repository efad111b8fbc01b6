use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Keyboard state seen by one frame.
///
/// `held` tracks keys currently down; `pressed` only holds keys that went down
/// since the previous frame and is cleared by `end_frame`.
#[derive(Debug, Default, Clone)]
pub struct Input {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_key(&mut self, key: KeyCode) {
        // OS key repeat sends presses for keys already down.
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// -1, 0 or 1 depending on which of the two keys is down.
    pub fn axis(&self, negative: KeyCode, positive: KeyCode) -> i32 {
        self.is_key_down(positive) as i32 - self.is_key_down(negative) as i32
    }

    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// Forgets every key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_lasts_one_frame() {
        let mut input = Input::new();
        input.press_key(KeyCode::Backquote);
        assert!(input.is_key_pressed(KeyCode::Backquote));
        assert!(input.is_key_down(KeyCode::Backquote));

        input.end_frame();
        assert!(!input.is_key_pressed(KeyCode::Backquote));
        assert!(input.is_key_down(KeyCode::Backquote));

        // key repeat
        input.press_key(KeyCode::Backquote);
        assert!(!input.is_key_pressed(KeyCode::Backquote));
    }

    #[test]
    fn axis_cancels_opposite_keys() {
        let mut input = Input::new();
        input.press_key(KeyCode::ArrowLeft);
        assert_eq!(input.axis(KeyCode::ArrowLeft, KeyCode::ArrowRight), -1);
        input.press_key(KeyCode::ArrowRight);
        assert_eq!(input.axis(KeyCode::ArrowLeft, KeyCode::ArrowRight), 0);
        input.release_key(KeyCode::ArrowLeft);
        assert_eq!(input.axis(KeyCode::ArrowLeft, KeyCode::ArrowRight), 1);
    }
}
