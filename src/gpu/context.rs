use std::sync::Arc;
use wgpu::{Adapter, Device, Queue, Surface, SurfaceConfiguration};
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Everything needed to put pixels on the window: surface, device, queue and
/// the live surface configuration. The config doubles as the authoritative
/// surface size; the field is sized from it, not from the window.
pub struct GpuContext {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
}

impl GpuContext {
    /// Acquire the GPU and configure the surface for the window.
    ///
    /// Host capability is the one precondition this program has: no adapter,
    /// no device or an unsupported surface aborts startup with a message
    /// instead of degrading into a window that never draws.
    pub async fn new(window: Arc<Window>) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to find suitable GPU adapter");

        log::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("constellation-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .expect("Failed to create device");

        let size = window.inner_size();
        let config = Self::configure(&surface, &adapter, &device, size);
        log::info!(
            "Surface configured: {}x{} px, {:?}",
            config.width,
            config.height,
            config.format
        );

        Self {
            surface,
            device,
            queue,
            config,
        }
    }

    fn configure(
        surface: &Surface<'static>,
        adapter: &Adapter,
        device: &Device,
        size: PhysicalSize<u32>,
    ) -> SurfaceConfiguration {
        let mut config = surface
            .get_default_config(adapter, size.width.max(1), size.height.max(1))
            .expect("Surface not supported by adapter");

        // The redraw loop paces the simulation and velocities are in pixels
        // per frame, so presentation must block on vsync.
        config.present_mode = wgpu::PresentMode::AutoVsync;
        surface.configure(device, &config);
        config
    }

    /// Adopt a new surface size, ignoring the zero-sized events minimized
    /// windows produce
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}
