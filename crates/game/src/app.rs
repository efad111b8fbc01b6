use std::time::Instant;

use engine::{FrameDriver, Window};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow},
    keyboard::PhysicalKey,
    window::WindowId,
};

use crate::{game_window::GameWindow, player::Player};

pub struct App {
    driver: Option<FrameDriver<Player>>,
    window: Option<GameWindow>,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(driver: FrameDriver<Player>) -> Self {
        Self {
            driver: Some(driver),
            window: None,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn into_result(self) -> anyhow::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(driver) = self.driver.take() else {
            return;
        };

        match pollster::block_on(GameWindow::create(event_loop, driver)) {
            Ok(window) => {
                window.request_redraw();
                self.window = Some(window);
            }
            Err(err) => {
                log::error!("Failed to open the game window: {:#}", err);
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_mut().filter(|w| w.id() == window_id) else {
            return;
        };

        let consumed = window.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => window.handle_redraw(),
            WindowEvent::Resized(size) => window.handle_resized(size.width, size.height),
            WindowEvent::Focused(false) => window.clear_input(),
            WindowEvent::KeyboardInput { event, .. } => {
                if !consumed && let PhysicalKey::Code(keycode) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => window.on_key_pressed(keycode),
                        ElementState::Released => window.on_key_released(keycode),
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        match window.frame_budget() {
            Some(budget) => {
                let next = window.next_frame_at(budget);
                if Instant::now() >= next {
                    window.request_redraw();
                }
                event_loop.set_control_flow(ControlFlow::WaitUntil(next));
            }
            None => {
                window.request_redraw();
                event_loop.set_control_flow(ControlFlow::Poll);
            }
        }
    }
}
