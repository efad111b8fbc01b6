use std::time::Instant;

use crate::{
    Canvas, DeltaTimer, EngineConfig, EngineState, FrameStats, Input, LoadState,
    MaterializeReport, TextureUploader, draw_debug_overlay, draw_missing_data,
};

/// What the game sees of the current frame.
pub struct Frame<'a> {
    pub input: &'a Input,
    pub config: &'a EngineConfig,
    /// Seconds since the previous frame, clamped to `DeltaTimer::MAX_DELTA`.
    pub dt: f32,
}

/// Game logic driven once per frame by `FrameDriver`. Only called while the
/// game data is loaded.
pub trait Game {
    fn update(&mut self, frame: &Frame, state: &EngineState);
    fn draw(&self, canvas: &mut dyn Canvas, state: &EngineState);
}

/// Owns everything the frame loop needs and runs one frame at a time.
pub struct FrameDriver<G: Game> {
    config: EngineConfig,
    load: LoadState,
    game: G,
    timer: DeltaTimer,
    input: Input,
    frames: u64,
}

impl<G: Game> FrameDriver<G> {
    pub fn new(mut config: EngineConfig, load: LoadState, game: G) -> Self {
        if let Some(manifest) = load.manifest() {
            config.apply_manifest(manifest);
        }
        Self {
            config,
            load,
            game,
            timer: DeltaTimer::new(),
            input: Input::new(),
            frames: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    pub fn timer(&self) -> &DeltaTimer {
        &self.timer
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Uploads sheet textures. Must run once the window's egui context exists
    /// and before the first frame; a no-op when the data is missing.
    pub fn materialize(&mut self, uploader: &dyn TextureUploader) -> Option<MaterializeReport> {
        self.load
            .state_mut()
            .map(|state| state.materialize(uploader))
    }

    pub fn frame(&mut self, world: &mut dyn Canvas, screen: &mut dyn Canvas, refresh_rate: Option<u32>) {
        self.frame_at(Instant::now(), world, screen, refresh_rate);
    }

    /// Runs one frame as of `now`. `world` draws at the virtual resolution;
    /// the debug overlay goes to `screen`.
    pub fn frame_at(
        &mut self,
        now: Instant,
        world: &mut dyn Canvas,
        screen: &mut dyn Canvas,
        refresh_rate: Option<u32>,
    ) {
        let dt = self.timer.update_at(now);
        self.frames += 1;

        if self.input.is_key_pressed(self.config.debug_key) {
            self.config.debug = !self.config.debug;
            log::debug!("debug overlay {}", if self.config.debug { "on" } else { "off" });
        }

        match &self.load {
            LoadState::Loaded(state) => {
                let frame = Frame {
                    input: &self.input,
                    config: &self.config,
                    dt,
                };
                self.game.update(&frame, state);
                self.game.draw(world, state);
            }
            LoadState::Missing { path, .. } => draw_missing_data(world, &self.config, path),
        }

        if self.config.debug {
            draw_debug_overlay(
                screen,
                &FrameStats {
                    fps: self.timer.fps(),
                    frame_time: dt,
                    refresh_rate,
                },
            );
        }

        self.input.end_frame();
    }
}
