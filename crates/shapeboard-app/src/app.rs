//! Core application state and lifecycle.

use kurbo::{Point, Size};
use peniko::Color;
use shapeboard_core::canvas::Canvas;
use shapeboard_core::config::{CanvasConfig, ConfigError};
use shapeboard_core::gesture::CanvasEvent;
use shapeboard_render::{RenderContext, RenderResult, Renderer, RendererError, VelloRenderer};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::Key;
use winit::window::{Window, WindowId};

use crate::event_handler::EventHandler;
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::ui::{render_ui, UiAction, UiState};

/// Environment variable naming an optional canvas config file.
pub const CONFIG_ENV: &str = "SHAPEBOARD_CONFIG";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Renderer(#[from] RendererError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    pub canvas: CanvasConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Shapeboard".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            canvas: CanvasConfig::default(),
        }
    }
}

impl AppConfig {
    /// Default config, with canvas settings read from `$SHAPEBOARD_CONFIG` when set.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
            config.canvas = CanvasConfig::load(&path)?;
        }
        Ok(config)
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    // State
    canvas: Canvas,
    event_handler: EventHandler,
}

impl AppState {
    fn apply_ui_action(&mut self, action: UiAction) {
        match action {
            UiAction::SetTool(tool) => self.canvas.dispatch(CanvasEvent::SetTool(tool)),
            UiAction::ResetView => self.canvas.reset_view(),
        }
        self.window.request_redraw();
    }

    fn ui_state(&self) -> UiState {
        UiState {
            current_tool: self.canvas.tool(),
            zoom: self.canvas.current_viewport().scale(),
            shape_count: self.canvas.current_shapes().len(),
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// First fatal error raised inside the event loop.
    error: Option<AppError>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            error: None,
        }
    }

    /// Run the application until the window closes.
    pub fn run(config: AppConfig) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let mut app = App::with_config(config);
        event_loop.run_app(&mut app)?;
        app.error.map_or(Ok(()), Err)
    }

    /// Create the window, surface and renderers.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self.render_cx.get_or_insert_with(vello::util::RenderContext::new);
        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .map_err(|e| RendererError::Surface(e.to_string()))?;

        let device = &render_cx.devices[surface.dev_id].device;
        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;

        // Vello renders to Rgba8Unorm; the surface format may differ.
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let mut canvas = Canvas::with_config(self.config.canvas.clone());
        canvas.dispatch(CanvasEvent::Resize {
            width: surface.config.width as f64,
            height: surface.config.height as f64,
        });

        log::info!(
            "Shapeboard initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        log::info!("Keyboard shortcuts:");
        ShortcutRegistry::log_all();

        window.request_redraw();
        self.state = Some(AppState {
            window,
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            canvas,
            event_handler: EventHandler::new(),
        });
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Initialization failed: {}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }

        let egui_wants_pointer = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.canvas.dispatch(CanvasEvent::Resize {
                    width: size.width as f64,
                    height: size.height as f64,
                });
                log::debug!("Resized to {}x{}", size.width, size.height);

                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                if let Err(e) = render_frame(state, render_cx, self.config.background_color) {
                    log::error!("Failed to render: {}", e);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                // A drag that started on the canvas keeps going over egui panels.
                if egui_wants_pointer && !state.event_handler.is_pointer_active() {
                    return;
                }
                let point = Point::new(position.x, position.y);
                if state.event_handler.handle_cursor_moved(&mut state.canvas, point) {
                    state.window.request_redraw();
                }
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let pressed = btn_state == ElementState::Pressed;
                if pressed && egui_wants_pointer {
                    return;
                }
                if state
                    .event_handler
                    .handle_button(&mut state.canvas, button, pressed)
                {
                    state.window.request_redraw();
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if egui_wants_pointer {
                    return;
                }
                if state.event_handler.handle_wheel(&mut state.canvas, delta) {
                    state.window.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if state.egui_ctx.wants_keyboard_input()
                    || event.state != ElementState::Pressed
                    || event.repeat
                {
                    return;
                }
                let Key::Character(key) = &event.logical_key else {
                    return;
                };
                match ShortcutRegistry::lookup(key.as_str()) {
                    Some(ShortcutAction::SetTool(tool)) => {
                        log::debug!("Tool: {:?}", tool);
                        state.apply_ui_action(UiAction::SetTool(tool));
                    }
                    Some(ShortcutAction::ResetView) => state.apply_ui_action(UiAction::ResetView),
                    None => {}
                }
            }

            WindowEvent::Focused(false) => {
                state.event_handler.cancel(&mut state.canvas);
                state.window.request_redraw();
            }

            _ => {}
        }
    }
}

/// Draw one frame: canvas through Vello, then egui on top.
fn render_frame(
    state: &mut AppState,
    render_cx: &vello::util::RenderContext,
    background_color: Color,
) -> RenderResult<()> {
    // Run egui and collect any toolbar action
    let ui_state = state.ui_state();
    let egui_input = state.egui_state.take_egui_input(&state.window);
    let mut ui_action = None;
    let egui_output = state.egui_ctx.run(egui_input, |ctx| {
        ui_action = render_ui(ctx, &ui_state);
    });
    state
        .egui_state
        .handle_platform_output(&state.window, egui_output.platform_output);
    let egui_primitives = state
        .egui_ctx
        .tessellate(egui_output.shapes, egui_output.pixels_per_point);

    if let Some(action) = ui_action {
        state.apply_ui_action(action);
    }

    let width = state.surface.config.width;
    let height = state.surface.config.height;

    let ctx = RenderContext::new(&state.canvas, Size::new(width as f64, height as f64))
        .with_scale_factor(state.window.scale_factor())
        .with_background(background_color);
    state.shape_renderer.build_scene(&ctx);
    let base_color = state.shape_renderer.background_color(&ctx);
    let scene = state.shape_renderer.take_scene();

    let device_handle = &render_cx.devices[state.surface.dev_id];
    let device = &device_handle.device;
    let queue = &device_handle.queue;

    let surface_texture = match state.surface.surface.get_current_texture() {
        Ok(t) => t,
        Err(e) => {
            log::warn!("Failed to get surface texture: {:?}", e);
            return Ok(());
        }
    };

    let params = RenderParams {
        base_color,
        width,
        height,
        antialiasing_method: AaConfig::Area,
    };

    // Vello's compute shaders need a StorageBinding Rgba8Unorm target.
    let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
        label: Some("vello render texture"),
        size: vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: vello::wgpu::TextureDimension::D2,
        format: vello::wgpu::TextureFormat::Rgba8Unorm,
        usage: vello::wgpu::TextureUsages::STORAGE_BINDING
            | vello::wgpu::TextureUsages::COPY_SRC
            | vello::wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let render_texture_view =
        render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

    state
        .vello_renderer
        .render_to_texture(device, queue, &scene, &render_texture_view, &params)
        .map_err(|e| RendererError::RenderFailed(e.to_string()))?;

    let surface_view = surface_texture
        .texture
        .create_view(&vello::wgpu::TextureViewDescriptor::default());

    // Blit the RGBA intermediate texture to the surface texture (which may be BGRA)
    {
        let mut blit_encoder =
            device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
        state
            .texture_blitter
            .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
        queue.submit(std::iter::once(blit_encoder.finish()));
    }

    for (id, image_delta) in &egui_output.textures_delta.set {
        state
            .egui_renderer
            .update_texture(device, queue, *id, image_delta);
    }

    let screen_descriptor = egui_wgpu::ScreenDescriptor {
        size_in_pixels: [width, height],
        pixels_per_point: egui_output.pixels_per_point,
    };

    {
        let mut egui_encoder =
            device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("egui encoder"),
            });
        state.egui_renderer.update_buffers(
            device,
            queue,
            &mut egui_encoder,
            &egui_primitives,
            &screen_descriptor,
        );

        let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
            label: Some("egui render pass"),
            color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                view: &surface_view,
                resolve_target: None,
                ops: vello::wgpu::Operations {
                    load: vello::wgpu::LoadOp::Load, // Keep Vello content
                    store: vello::wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // egui-wgpu wants a 'static render pass
        let mut render_pass = render_pass.forget_lifetime();
        state
            .egui_renderer
            .render(&mut render_pass, &egui_primitives, &screen_descriptor);
        drop(render_pass);

        queue.submit(std::iter::once(egui_encoder.finish()));
    }

    for id in &egui_output.textures_delta.free {
        state.egui_renderer.free_texture(id);
    }
    surface_texture.present();

    // Keep egui animations (hover fades) running.
    let repaint_now = egui_output
        .viewport_output
        .get(&egui::ViewportId::ROOT)
        .is_some_and(|viewport| viewport.repaint_delay.is_zero());
    if repaint_now {
        state.window.request_redraw();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.title, "Shapeboard");
        assert_eq!((config.width, config.height), (1280, 800));
        assert_eq!(config.canvas, CanvasConfig::default());
    }

    #[test]
    fn test_config_error_converts() {
        let dir = tempfile::tempdir().unwrap();
        let err: AppError = CanvasConfig::load(dir.path().join("absent.json"))
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Config(ConfigError::Io(_))));
    }

    #[test]
    fn test_canvas_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "zoom_factor": 1.5 }}"#).unwrap();
        let canvas = CanvasConfig::load(file.path()).unwrap();
        let config = AppConfig {
            canvas,
            ..AppConfig::default()
        };
        assert!((config.canvas.zoom_factor - 1.5).abs() < f64::EPSILON);
    }
}
