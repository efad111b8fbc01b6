use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use egui_wgpu::wgpu;
use engine::{EguiCanvas, FrameDriver, Letterbox, Vec2, Window, WindowState};
use winit::{
    dpi::LogicalSize, event_loop::ActiveEventLoop, keyboard::KeyCode, window::WindowAttributes,
};

use crate::player::Player;

/// The single game window. Owns the frame driver and paints every frame
/// through egui.
pub struct GameWindow {
    window: Arc<winit::window::Window>,
    state: Arc<Mutex<WindowState>>,
    driver: FrameDriver<Player>,
}

impl GameWindow {
    pub async fn create(event_loop: &ActiveEventLoop, mut driver: FrameDriver<Player>) -> Result<Self> {
        let config = driver.config();
        let attributes = WindowAttributes::default()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("cannot create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("cannot create surface")?;

        let size = window.inner_size();
        let state = WindowState::new(&instance, surface, &window, size.width, size.height).await?;

        // Textures go through the window's egui context, so this waits for it.
        driver.materialize(&state.egui_context());

        Ok(Self {
            window,
            state: Arc::new(Mutex::new(state)),
            driver,
        })
    }

    pub fn frame_budget(&self) -> Option<Duration> {
        self.driver.config().frame_duration()
    }

    pub fn next_frame_at(&self, budget: Duration) -> Instant {
        self.driver.timer().next_frame_at(budget)
    }

    /// Drops held keys, e.g. after losing focus.
    pub fn clear_input(&mut self) {
        self.driver.input_mut().clear();
    }

    fn refresh_rate(&self) -> Option<u32> {
        self.window
            .current_monitor()
            .and_then(|monitor| monitor.refresh_rate_millihertz())
            .map(|mhz| mhz / 1000)
    }
}

impl Window for GameWindow {
    fn state(&self) -> &Arc<Mutex<WindowState>> {
        &self.state
    }

    fn window(&self) -> &Arc<winit::window::Window> {
        &self.window
    }

    fn draw(&mut self, ctx: &egui::Context) {
        let screen = ctx.screen_rect();
        let letterbox = Letterbox::fit(
            Vec2::new(screen.width(), screen.height()),
            self.driver.config().virtual_size(),
        );

        let mut world = EguiCanvas::new(ctx.layer_painter(egui::LayerId::background()), letterbox);
        let mut overlay = EguiCanvas::screen(ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("debug_overlay"),
        )));

        let refresh_rate = self.refresh_rate();
        self.driver.frame(&mut world, &mut overlay, refresh_rate);
    }

    fn on_key_pressed(&mut self, key: KeyCode) {
        self.driver.input_mut().press_key(key);
    }

    fn on_key_released(&mut self, key: KeyCode) {
        self.driver.input_mut().release_key(key);
    }
}
