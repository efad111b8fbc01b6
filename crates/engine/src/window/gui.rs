use egui::{ClippedPrimitive, Context, TexturesDelta, ViewportId};
use egui_wgpu::wgpu::{self, CommandEncoder, Device, Queue, TextureFormat, TextureView};
use egui_wgpu::{Renderer, ScreenDescriptor};
use egui_winit::{EventResponse, State};
use winit::event::WindowEvent;
use winit::window::Window;

/// Input budget handed to egui-winit, in texture side pixels.
const MAX_TEXTURE_SIDE: usize = 2048;

/// Tessellated output of one egui pass, ready to paint.
pub struct EguiFrame {
    primitives: Vec<ClippedPrimitive>,
    textures: TexturesDelta,
}

/// egui on top of wgpu. Collects winit input, runs egui passes and paints
/// their output, including the textures created through the egui context.
pub struct EguiRenderer {
    state: State,
    renderer: Renderer,
    in_pass: bool,
}

impl EguiRenderer {
    pub fn new(device: &Device, format: TextureFormat, window: &Window) -> Self {
        let state = State::new(
            Context::default(),
            ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(MAX_TEXTURE_SIDE),
        );

        Self {
            state,
            renderer: Renderer::new(device, format, None, 1, true),
            in_pass: false,
        }
    }

    pub fn context(&self) -> &Context {
        self.state.egui_ctx()
    }

    pub fn handle_input(&mut self, window: &Window, event: &WindowEvent) -> EventResponse {
        self.state.on_window_event(window, event)
    }

    pub fn begin_frame(&mut self, window: &Window) {
        let input = self.state.take_egui_input(window);
        self.state.egui_ctx().begin_pass(input);
        self.in_pass = true;
    }

    /// Ends the current pass. `None` when no pass was started.
    pub fn end_frame(&mut self, window: &Window, pixels_per_point: f32) -> Option<EguiFrame> {
        if !std::mem::take(&mut self.in_pass) {
            log::warn!("egui frame ended without begin_frame");
            return None;
        }

        let ctx = self.state.egui_ctx().clone();
        ctx.set_pixels_per_point(pixels_per_point);
        let output = ctx.end_pass();
        self.state
            .handle_platform_output(window, output.platform_output);

        Some(EguiFrame {
            primitives: ctx.tessellate(output.shapes, ctx.pixels_per_point()),
            textures: output.textures_delta,
        })
    }

    /// Uploads new textures, then paints `frame` over a target cleared to
    /// `clear`. Freed textures are released after the pass.
    #[allow(clippy::too_many_arguments)]
    pub fn paint(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        screen: &ScreenDescriptor,
        frame: EguiFrame,
        clear: wgpu::Color,
    ) {
        for (id, delta) in &frame.textures.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &frame.primitives, screen);

        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("frame"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.renderer
            .render(&mut pass.forget_lifetime(), &frame.primitives, screen);

        for id in &frame.textures.free {
            self.renderer.free_texture(id);
        }
    }
}
