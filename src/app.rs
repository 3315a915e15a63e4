use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Theme, Window, WindowId};

use crate::config::{
    DARK_BACKGROUND, DARK_FOREGROUND, LIGHT_BACKGROUND, LIGHT_FOREGROUND, TITLE_REVEAL_FRAMES,
    WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH,
};
use crate::gpu::{FrameBuffers, FrameUniforms, GpuContext, LinePipeline, ParticlePipeline};
use crate::simulation::Field;

/// Colors for one theme, resolved once at startup and on theme changes
struct Palette {
    background: wgpu::Color,
    foreground: [f32; 4],
}

impl Palette {
    fn dark() -> Self {
        Self {
            background: opaque(DARK_BACKGROUND),
            foreground: solid(DARK_FOREGROUND),
        }
    }

    fn light() -> Self {
        Self {
            background: opaque(LIGHT_BACKGROUND),
            foreground: solid(LIGHT_FOREGROUND),
        }
    }

    /// Dark is the default when the platform can't say
    fn for_theme(theme: Option<Theme>) -> Self {
        match theme {
            Some(Theme::Light) => Self::light(),
            _ => Self::dark(),
        }
    }
}

fn opaque(rgb: [f64; 3]) -> wgpu::Color {
    wgpu::Color {
        r: rgb[0],
        g: rgb[1],
        b: rgb[2],
        a: 1.0,
    }
}

fn solid(rgb: [f32; 3]) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], 1.0]
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    buffers: Option<FrameBuffers>,
    particle_pipeline: Option<ParticlePipeline>,
    line_pipeline: Option<LinePipeline>,
    field: Option<Field>,
    /// Last cursor position seen, for the press log lines
    cursor: Option<(f32, f32)>,
    fps_counter: FpsCounter,
    title_reveal: TitleReveal,
    palette: Palette,
}

impl App {
    pub fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            buffers: None,
            particle_pipeline: None,
            line_pipeline: None,
            field: None,
            cursor: None,
            fps_counter: FpsCounter::new(),
            title_reveal: TitleReveal::new(),
            palette: Palette::dark(),
        }
    }

    fn render(&mut self) {
        let gpu = self.gpu.as_ref().unwrap();
        let buffers = self.buffers.as_mut().unwrap();
        let particles = self.particle_pipeline.as_ref().unwrap();
        let lines = self.line_pipeline.as_ref().unwrap();
        let field = self.field.as_mut().unwrap();

        // Advance the simulation one step. The loop is paced by vsync and
        // velocities are in pixels per frame; there is no delta-time scaling.
        field.step();
        let connections = field.connections();

        let uniforms = FrameUniforms::new(
            [gpu.config.width as f32, gpu.config.height as f32],
            self.palette.foreground,
        );
        buffers.upload(
            &gpu.device,
            &gpu.queue,
            uniforms,
            field.particles(),
            &connections,
        );

        // Get surface texture
        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure surface
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                panic!("Surface out of memory");
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        // 1. Discs clear the frame and draw every particle
        let particle_bind_group = particles.create_bind_group(&gpu.device, &buffers.uniforms);
        particles.draw(
            &mut encoder,
            &view,
            &particle_bind_group,
            &buffers.particle_instances,
            buffers.particle_count,
            self.palette.background,
        );

        // 2. Connection lines composite over them
        let line_bind_group = lines.create_bind_group(&gpu.device, &buffers.uniforms);
        lines.draw(
            &mut encoder,
            &view,
            &line_bind_group,
            &buffers.line_instances,
            buffers.line_count,
        );

        // Submit work
        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        // Window title: the startup reveal types itself out first, then the
        // FPS readout takes over
        let fps = self.fps_counter.tick();
        if let Some(window) = &self.window {
            if let Some(partial) = self.title_reveal.advance() {
                window.set_title(partial);
            } else if self.title_reveal.done() {
                if let Some(fps) = fps {
                    window.set_title(&format!("{} - {:.0} FPS", WINDOW_TITLE, fps));
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing {}...", WINDOW_TITLE);

        // Create window; the title starts empty and types itself out
        let window_attrs = Window::default_attributes()
            .with_title("")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        self.palette = Palette::for_theme(window.theme());

        // Initialize GPU
        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()));

        // Populate the field from the actual surface size
        let (width, height) = (gpu.config.width, gpu.config.height);
        let field = Field::new(width, height);
        log::info!(
            "Field populated: {} particles over {}x{} px",
            field.particles().len(),
            width,
            height
        );

        // Create buffers and pipelines
        log::info!("Creating frame buffers...");
        let buffers = FrameBuffers::new(&gpu.device, field.particles().len());

        log::info!("Creating render pipelines...");
        let particle_pipeline = ParticlePipeline::new(&gpu.device, gpu.format());
        let line_pipeline = LinePipeline::new(&gpu.device, gpu.format());

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Mouse move: stir the particles");
        log::info!("  Escape: Quit");

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.buffers = Some(buffers);
        self.particle_pipeline = Some(particle_pipeline);
        self.line_pipeline = Some(line_pipeline);
        self.field = Some(field);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(KeyCode::Escape) = event.physical_key {
                        log::info!("Escape pressed, exiting...");
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
                if let Some(field) = &mut self.field {
                    field.resize(new_size.width, new_size.height);
                    log::info!(
                        "Resized to {}x{}, field regenerated with {} particles",
                        new_size.width,
                        new_size.height,
                        field.particles().len()
                    );
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.cursor = Some((x, y));
                if let Some(field) = &mut self.field {
                    field.apply_pointer_impulse(x, y);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if state.is_pressed() {
                    log::debug!("{}", describe_press(button, self.cursor));
                }
            }
            WindowEvent::ThemeChanged(theme) => {
                log::info!("System theme changed to {:?}", theme);
                self.palette = Palette::for_theme(Some(theme));
            }
            WindowEvent::RedrawRequested => {
                self.render();
                // Request another frame immediately
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

/// Debug line for a mouse press, with the cursor position once one has
/// been seen (a click can land before the first CursorMoved)
fn describe_press(button: MouseButton, cursor: Option<(f32, f32)>) -> String {
    match cursor {
        Some((x, y)) => format!("Mouse {:?} pressed at ({:.0}, {:.0})", button, x, y),
        None => format!("Mouse {:?} pressed", button),
    }
}

/// Startup typing effect for the window title
struct TitleReveal {
    frames: u32,
    shown: usize,
}

impl TitleReveal {
    fn new() -> Self {
        Self {
            frames: 0,
            shown: 0,
        }
    }

    /// Advance one frame; returns the grown title on frames where a new
    /// character appears, None otherwise
    fn advance(&mut self) -> Option<&'static str> {
        if self.done() {
            return None;
        }
        self.frames += 1;
        if self.frames % TITLE_REVEAL_FRAMES == 0 {
            self.shown += 1;
            Some(&WINDOW_TITLE[..self.shown])
        } else {
            None
        }
    }

    fn done(&self) -> bool {
        self.shown >= WINDOW_TITLE.len()
    }
}
