use std::time::{Duration, Instant};

/// Frame timing for the game loop and the debug overlay.
pub struct DeltaTimer {
    last_frame_time: Instant,
    frame_count: u64,
    fps_timer: Instant,
    fps: u32,
}

impl Default for DeltaTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl DeltaTimer {
    /// Longest delta handed to the game, so a stall does not teleport entities.
    pub const MAX_DELTA: f32 = 1.0 / 30.0;

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame_time: now,
            frame_count: 0,
            fps_timer: now,
            fps: 0,
        }
    }

    /// Records a frame at `now` and returns the clamped time since the last one.
    pub fn update_at(&mut self, now: Instant) -> f32 {
        let duration = now.saturating_duration_since(self.last_frame_time);
        let delta_time = duration.as_secs_f32().min(Self::MAX_DELTA);

        self.last_frame_time = now;
        self.frame_count += 1;

        if now.saturating_duration_since(self.fps_timer) >= Duration::from_secs(1) {
            self.fps = self.frame_count as u32;
            self.frame_count = 0;
            self.fps_timer = now;
        }

        delta_time
    }

    /// Frames counted over the last full second.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// When the next frame is due for the given frame budget.
    pub fn next_frame_at(&self, budget: Duration) -> Instant {
        self.last_frame_time + budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_long_frames() {
        let start = Instant::now();
        let mut timer = DeltaTimer::new();
        let dt = timer.update_at(start + Duration::from_millis(500));
        assert_eq!(dt, DeltaTimer::MAX_DELTA);
    }

    #[test]
    fn counts_frames_per_second() {
        let start = Instant::now();
        let mut timer = DeltaTimer::new();
        for i in 1..=60 {
            timer.update_at(start + Duration::from_millis(i * 16));
        }
        assert_eq!(timer.fps(), 0);

        timer.update_at(start + Duration::from_millis(1100));
        assert_eq!(timer.fps(), 61);
    }
}
