use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::simulation::{Connection, Particle};

/// Per-instance data for one particle disc (16 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    /// Disc center in surface pixels
    pub position: [f32; 2],
    pub radius: f32,
    pub opacity: f32,
}

/// Per-instance data for one connection line (20 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineInstance {
    /// Segment endpoints in surface pixels
    pub start: [f32; 2],
    pub end: [f32; 2],
    /// Final alpha, already faded by separation
    pub opacity: f32,
}

/// Uniforms shared by both pipelines (32 bytes).
/// Note: vec4<f32> is 16-byte aligned in WGSL, so the resolution pair is
/// padded out to 16 before the color.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// Surface size in physical pixels
    pub resolution: [f32; 2],
    pub _padding: [f32; 2],
    /// Foreground color shared by discs and lines
    pub color: [f32; 4],
}

impl FrameUniforms {
    pub fn new(resolution: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            resolution,
            _padding: [0.0, 0.0],
            color,
        }
    }
}

/// Smallest instance buffer sizes; the connection count swings every frame,
/// so the line buffer in particular starts roomy
const MIN_PARTICLE_CAPACITY: usize = 64;
const MIN_LINE_CAPACITY: usize = 256;

/// Owns the uniform buffer and the two instance buffers that the field is
/// flattened into every frame.
pub struct FrameBuffers {
    pub uniforms: Buffer,
    pub particle_instances: Buffer,
    pub line_instances: Buffer,
    particle_capacity: usize,
    line_capacity: usize,
    /// Instance counts uploaded for the current frame
    pub particle_count: u32,
    pub line_count: u32,
}

impl FrameBuffers {
    pub fn new(device: &Device, expected_particles: usize) -> Self {
        let particle_capacity = expected_particles
            .max(MIN_PARTICLE_CAPACITY)
            .next_power_of_two();
        let line_capacity = MIN_LINE_CAPACITY;

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            uniforms,
            particle_instances: create_instance_buffer(
                device,
                "particle-instances",
                particle_capacity * std::mem::size_of::<ParticleInstance>(),
            ),
            line_instances: create_instance_buffer(
                device,
                "line-instances",
                line_capacity * std::mem::size_of::<LineInstance>(),
            ),
            particle_capacity,
            line_capacity,
            particle_count: 0,
            line_count: 0,
        }
    }

    /// Refill everything for the coming frame. Instance buffers grow to the
    /// next power of two when a frame outgrows them; they are plain vertex
    /// buffers, so nothing needs rebinding afterwards.
    pub fn upload(
        &mut self,
        device: &Device,
        queue: &Queue,
        uniforms: FrameUniforms,
        particles: &[Particle],
        connections: &[Connection],
    ) {
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));

        if particles.len() > self.particle_capacity {
            self.particle_capacity = particles.len().next_power_of_two();
            self.particle_instances = create_instance_buffer(
                device,
                "particle-instances",
                self.particle_capacity * std::mem::size_of::<ParticleInstance>(),
            );
        }
        let discs: Vec<ParticleInstance> = particles
            .iter()
            .map(|p| ParticleInstance {
                position: [p.x, p.y],
                radius: p.radius,
                opacity: p.opacity,
            })
            .collect();
        if !discs.is_empty() {
            queue.write_buffer(&self.particle_instances, 0, bytemuck::cast_slice(&discs));
        }
        self.particle_count = discs.len() as u32;

        if connections.len() > self.line_capacity {
            self.line_capacity = connections.len().next_power_of_two();
            self.line_instances = create_instance_buffer(
                device,
                "line-instances",
                self.line_capacity * std::mem::size_of::<LineInstance>(),
            );
        }
        let segments: Vec<LineInstance> = connections
            .iter()
            .map(|c| {
                let (a, b) = (&particles[c.a], &particles[c.b]);
                LineInstance {
                    start: [a.x, a.y],
                    end: [b.x, b.y],
                    opacity: c.opacity,
                }
            })
            .collect();
        if !segments.is_empty() {
            queue.write_buffer(&self.line_instances, 0, bytemuck::cast_slice(&segments));
        }
        self.line_count = segments.len() as u32;
    }
}

fn create_instance_buffer(device: &Device, label: &str, size: usize) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: size as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_instance_size() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 16);
    }

    #[test]
    fn test_line_instance_size() {
        assert_eq!(std::mem::size_of::<LineInstance>(), 20);
    }

    #[test]
    fn test_frame_uniforms_size() {
        // must match the WGSL struct layout: vec2 padded to 16, then a vec4
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 32);
    }
}
