use crate::{AnimationState, SpriteFrame, SpriteSheet};

/// Per-entity playback position inside a sprite sheet.
///
/// The sheet itself is shared and immutable; each entity tracks which state
/// it shows, which frame of it, and how long that frame has been up.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Animator {
    current_state: String,
    current_frame_index: usize,
    elapsed: f32,
}

impl Animator {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            current_state: state.into(),
            ..Self::default()
        }
    }

    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    pub fn frame_index(&self) -> usize {
        self.current_frame_index
    }

    /// Switches state, restarting playback. Setting the current state again
    /// keeps the playback position.
    pub fn set_state(&mut self, name: &str) {
        if self.current_state != name {
            self.current_state.clear();
            self.current_state.push_str(name);
            self.current_frame_index = 0;
            self.elapsed = 0.0;
        }
    }

    /// The tracked state, or the sheet's first state when the sheet has no
    /// state of that name.
    pub fn resolve<'a>(&self, sheet: &'a SpriteSheet) -> Option<&'a AnimationState> {
        sheet
            .state(&self.current_state)
            .or_else(|| sheet.first_state())
    }

    /// Advances playback by `dt` seconds at the resolved state's fps,
    /// wrapping at the last frame. A state with fps 0 stays on its frame.
    pub fn advance(&mut self, dt: f32, sheet: &SpriteSheet) {
        let Some(state) = self.resolve(sheet) else {
            return;
        };
        if state.fps == 0 || state.frames.is_empty() {
            return;
        }

        // Closed form: at very high fps a step is below the precision of
        // `elapsed` and subtracting it one at a time would never finish.
        let step = 1.0 / state.fps as f64;
        let elapsed = self.elapsed as f64 + dt.max(0.0) as f64;
        let steps = (elapsed / step).floor();
        let len = state.frames.len();

        self.elapsed = (elapsed - steps * step).clamp(0.0, step) as f32;
        let advanced = (steps % len as f64) as usize;
        self.current_frame_index = (self.current_frame_index % len + advanced) % len;
    }

    pub fn current_frame(&self, sheet: &SpriteSheet) -> Option<SpriteFrame> {
        let state = self.resolve(sheet)?;
        if state.frames.is_empty() {
            return None;
        }
        Some(state.frames[self.current_frame_index % state.frames.len()])
    }
}
