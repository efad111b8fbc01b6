//! GPU state of one window: wgpu device, queue and surface, plus the egui
//! renderer everything is painted through.

use egui_wgpu::{ScreenDescriptor, wgpu};
use winit::window::Window as WinitWindow;

use crate::{EguiRenderer, EngineError, Result};

pub struct WindowState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    /// Extra multiplier on top of the window's scale factor.
    pub scale_factor: f32,

    pub egui_renderer: EguiRenderer,
}

impl WindowState {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        window: &WinitWindow,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .map_err(|e| EngineError::Graphics(format!("no suitable adapter: {e}")))?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| EngineError::Graphics(format!("cannot create device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| *f == wgpu::TextureFormat::Bgra8UnormSrgb)
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| EngineError::Graphics("surface supports no format".to_string()))?;

        // Fifo is always available and paces presentation to the monitor.
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = EguiRenderer::new(&device, format, window);

        Ok(Self {
            device,
            queue,
            surface,
            config,
            scale_factor: 1.0,
            egui_renderer,
        })
    }

    /// Next surface texture to draw into. `None` skips this frame; a lost
    /// surface is reconfigured first.
    pub fn acquire(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(texture) => Some(texture),
            Err(wgpu::SurfaceError::Outdated) => None,
            Err(wgpu::SurfaceError::Lost) => {
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
                None
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
                None
            }
        }
    }

    pub fn begin_frame(&mut self, window: &WinitWindow) {
        self.egui_renderer.begin_frame(window);
    }

    /// The egui context. Cloning is cheap; it is also the texture uploader.
    pub fn egui_context(&self) -> egui::Context {
        self.egui_renderer.context().clone()
    }

    /// Ends the egui pass, paints it into `target` and submits the work.
    pub fn finish_frame(&mut self, window: &WinitWindow, target: &wgpu::TextureView, clear: wgpu::Color) {
        let screen = ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32 * self.scale_factor,
        };

        let Some(frame) = self
            .egui_renderer
            .end_frame(window, screen.pixels_per_point)
        else {
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.egui_renderer.paint(
            &self.device,
            &self.queue,
            &mut encoder,
            target,
            &screen,
            frame,
            clear,
        );
        self.queue.submit(Some(encoder.finish()));
    }

    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }
}
