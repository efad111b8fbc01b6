use std::path::Path;

use crate::{Canvas, Color, EngineConfig, EngineState, Vec2};

const TEXT_SIZE: f32 = 20.0;

/// Per-frame numbers shown by the debug overlay.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    pub fps: u32,
    /// Seconds spent on the previous frame.
    pub frame_time: f32,
    /// Refresh rate of the monitor the window is on, in Hz.
    pub refresh_rate: Option<u32>,
}

pub fn debug_lines(stats: &FrameStats) -> [String; 5] {
    [
        EngineState::NAME.to_string(),
        format!("{} version : {}", EngineState::NAME, EngineState::VERSION),
        format!("FPS : {}", stats.fps),
        format!("FrameTime (DeltaTime) : {:.6}", stats.frame_time),
        match stats.refresh_rate {
            Some(hz) => format!("Monitor refresh rate : {}", hz),
            None => "Monitor refresh rate : unknown".to_string(),
        },
    ]
}

/// Engine name, version and frame timing in the top-left corner.
pub fn draw_debug_overlay(canvas: &mut dyn Canvas, stats: &FrameStats) {
    for (i, line) in debug_lines(stats).iter().enumerate() {
        canvas.text(
            Vec2::new(5.0, 1.0 + TEXT_SIZE * i as f32),
            line,
            TEXT_SIZE,
            Color::PINK,
        );
    }
}

/// Screen shown every frame when the game data could not be opened.
pub fn draw_missing_data(canvas: &mut dyn Canvas, config: &EngineConfig, path: &Path) {
    let lines = [
        "Game data is not found!".to_string(),
        format!("Please check if {:?} exists", path.display().to_string()),
    ];
    let center = config.width as f32 / 2.0;

    for (i, line) in lines.iter().enumerate() {
        let width = canvas.measure_text(line, TEXT_SIZE);
        canvas.text(
            Vec2::new(center - width / 2.0, 100.0 + 25.0 * i as f32),
            line,
            TEXT_SIZE,
            Color::RED,
        );
    }
}
