use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use egui_wgpu::wgpu;
use winit::{event::WindowEvent, keyboard::KeyCode};

use crate::WindowState;

/// Locks the window state. A panic while the lock was held leaves the GPU
/// objects usable, so poisoning is ignored.
pub fn lock_state(state: &Mutex<WindowState>) -> MutexGuard<'_, WindowState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A winit window painted through egui.
pub trait Window {
    fn state(&self) -> &Arc<Mutex<WindowState>>;
    fn window(&self) -> &Arc<winit::window::Window>;

    /// Builds this frame's egui output.
    fn draw(&mut self, ctx: &egui::Context);

    fn clear_color(&self) -> wgpu::Color {
        wgpu::Color::BLACK
    }

    fn id(&self) -> winit::window::WindowId {
        self.window().id()
    }

    fn request_redraw(&self) {
        self.window().request_redraw();
    }

    fn is_minimized(&self) -> bool {
        self.window().is_minimized().unwrap_or(false)
    }

    /// Feeds `event` to egui. Returns whether egui consumed it.
    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        let window = Arc::clone(self.window());
        let mut state = lock_state(self.state());
        state.egui_renderer.handle_input(&window, event).consumed
    }

    fn handle_resized(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            lock_state(self.state()).resize_surface(width, height);
        }
    }

    fn handle_redraw(&mut self) {
        if self.is_minimized() {
            return;
        }

        let window = Arc::clone(self.window());
        let state_arc = Arc::clone(self.state());
        let mut state = lock_state(&state_arc);

        let Some(surface_texture) = state.acquire() else {
            return;
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        state.begin_frame(&window);
        let ctx = state.egui_context();
        self.draw(&ctx);
        state.finish_frame(&window, &view, self.clear_color());

        window.pre_present_notify();
        surface_texture.present();
    }

    fn on_key_pressed(&mut self, _key: KeyCode) {}
    fn on_key_released(&mut self, _key: KeyCode) {}
}
