mod buffers;
mod context;
mod lines;
mod particles;

pub use buffers::{FrameBuffers, FrameUniforms};
pub use context::GpuContext;
pub use lines::LinePipeline;
pub use particles::ParticlePipeline;
