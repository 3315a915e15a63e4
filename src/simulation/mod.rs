mod field;
mod particle;

pub use field::{Connection, Field};
pub use particle::Particle;
