use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use gallery_input::{Handled, InputEvent};
use gallery_kernel::{GalleryConfig, Session};
use gallery_render::{DrawSurface, MinimapRenderer, OverlayRect, Rgba, Stroke, extract_scene};
use gallery_render_wgpu::{FirstPersonCamera, WgpuRenderer};
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

const MINIMAP_MARGIN: f32 = 10.0;

#[derive(Parser)]
#[command(name = "gallery-desktop", about = "First-person shooting gallery")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Tuning file (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Translate a winit key transition through the shared code table.
///
/// winit names `KeyCode` variants after the DOM `code` values, so the
/// variant's debug name is the code string `Binding::from_code` expects.
fn key_event(key: KeyCode, pressed: bool) -> Option<InputEvent> {
    InputEvent::key(&format!("{key:?}"), pressed)
}

/// Paints minimap commands with an egui painter, offset to the overlay's corner.
struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    size: Vec2,
}

impl EguiSurface<'_> {
    fn pos(&self, p: Vec2) -> egui::Pos2 {
        self.origin + egui::vec2(p.x, p.y)
    }

    fn rect(&self, r: OverlayRect) -> egui::Rect {
        egui::Rect::from_min_max(self.pos(r.min), self.pos(r.max))
    }

    fn color(c: Rgba) -> egui::Color32 {
        let [r, g, b, a] = c.to_array().map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
        egui::Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    fn stroke(s: Stroke) -> egui::Stroke {
        egui::Stroke::new(s.width, Self::color(s.color))
    }
}

impl DrawSurface for EguiSurface<'_> {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, rect: OverlayRect, color: Rgba) {
        self.painter
            .rect_filled(self.rect(rect), 0.0, Self::color(color));
    }

    fn stroke_rect(&mut self, rect: OverlayRect, stroke: Stroke) {
        self.painter.rect_stroke(
            self.rect(rect),
            0.0,
            Self::stroke(stroke),
            egui::StrokeKind::Middle,
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.painter
            .circle_filled(self.pos(center), radius, Self::color(color));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.painter
            .line_segment([self.pos(from), self.pos(to)], Self::stroke(stroke));
    }
}

/// Game state driven by the window.
struct AppState {
    session: Session,
    camera: FirstPersonCamera,
    minimap: MinimapRenderer,
    last_frame: Instant,
}

impl AppState {
    fn new(session: Session) -> Self {
        Self {
            session,
            camera: FirstPersonCamera::default(),
            minimap: MinimapRenderer::default(),
            last_frame: Instant::now(),
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        let Some(event) = key_event(key, pressed) else {
            return;
        };
        if self.session.handle(event) == Handled::ShotAccepted {
            tracing::debug!("shot fired");
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        let stats = self.session.frame(dt);
        tracing::trace!(
            frame = stats.frame,
            live = stats.live_effects,
            expired = stats.expired_effects,
            "frame"
        );
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        let size = self.minimap.config().size;
        egui::Area::new(egui::Id::new("minimap"))
            .anchor(
                egui::Align2::RIGHT_TOP,
                [-MINIMAP_MARGIN, MINIMAP_MARGIN],
            )
            .interactable(false)
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(egui::vec2(size.x, size.y), egui::Sense::hover());
                let mut surface = EguiSurface {
                    painter: &painter,
                    origin: response.rect.min,
                    size,
                };
                let layout = self.session.layout();
                self.minimap.draw(
                    &mut surface,
                    self.session.pose(),
                    layout.rooms(),
                    layout.doorways(),
                );
            });

        if !self.session.intents().pointer_locked() {
            egui::Area::new(egui::Id::new("instructions"))
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.heading("Shooting Gallery");
                        ui.label("Click to start");
                        ui.separator();
                        ui.label("Arrow Up / Down: move forward / back");
                        ui.label("Arrow Left / Right: turn");
                        ui.label("A / D: strafe");
                        ui.label("Mouse: look around");
                        ui.label("Space: shoot");
                        ui.label("Esc: release the mouse");
                    });
                });
        }
    }
}

/// Window, surface and GPU resources, created on resume.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Shooting Gallery")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no compatible GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("gallery_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn draw(&mut self, state: &AppState, egui_ctx: &EguiContext) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let scene = extract_scene(&state.session);
        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &state.camera,
            state.session.pose(),
            &scene,
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("overlay_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(session: Session) -> Self {
        Self {
            state: AppState::new(session),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn lock_pointer(&mut self) {
        let Some(gpu) = &self.gpu else { return };
        let grab = gpu
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| gpu.window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grab {
            tracing::warn!("pointer lock unavailable: {e}");
            return;
        }
        gpu.window.set_cursor_visible(false);
        self.state
            .session
            .handle(InputEvent::PointerLockChanged(true));
        tracing::debug!("cursor grabbed");
    }

    fn unlock_pointer(&mut self) {
        if !self.state.session.intents().pointer_locked() {
            return;
        }
        if let Some(gpu) = &self.gpu {
            if let Err(e) = gpu.window.set_cursor_grab(CursorGrabMode::None) {
                tracing::warn!("failed to release pointer: {e}");
            }
            gpu.window.set_cursor_visible(true);
        }
        self.state
            .session
            .handle(InputEvent::PointerLockChanged(false));
        tracing::debug!("cursor released");
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.camera.set_viewport(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.state
                    .camera
                    .set_viewport(new_size.width, new_size.height);
            }
            WindowEvent::Focused(false) => self.unlock_pointer(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                if key == KeyCode::Escape && pressed {
                    self.unlock_pointer();
                } else if !(repeat && pressed) {
                    self.state.handle_key(key, pressed);
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if !self.state.session.intents().pointer_locked() {
                    self.lock_pointer();
                }
            }
            WindowEvent::RedrawRequested => {
                self.state.update();
                if let Some(gpu) = &mut self.gpu {
                    gpu.draw(&self.state, &self.egui_ctx);
                    gpu.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state.session.handle(InputEvent::PointerMoved {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            });
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("gallery-desktop starting");

    let config = match &cli.config {
        Some(path) => GalleryConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GalleryConfig::default(),
    };
    let session = Session::new(config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(session);
    event_loop.run_app(&mut app)?;

    Ok(())
}
