/// Window title (also the string the startup reveal types out)
pub const WINDOW_TITLE: &str = "Constellation";

/// Initial window size in logical pixels
pub const WINDOW_WIDTH: f64 = 1280.0;
pub const WINDOW_HEIGHT: f64 = 800.0;

/// Frames per revealed title character during the startup typing effect
pub const TITLE_REVEAL_FRAMES: u32 = 3;

// ============================================
// Particle Field
// ============================================

/// Surface area (in physical pixels) that yields one particle.
/// A 1000x1000 surface carries 100 particles; count is floor(w*h / this).
pub const PIXELS_PER_PARTICLE: u32 = 10_000;

/// Per-axis velocity multiplier applied every tick, before bounce checks
pub const FRICTION: f32 = 0.98;

/// Spawn velocity is uniform in [-MAX_SPAWN_SPEED, MAX_SPAWN_SPEED) per axis,
/// in pixels per frame
pub const MAX_SPAWN_SPEED: f32 = 0.5;

/// Spawn radius range [MIN_RADIUS, MAX_RADIUS), fixed for a particle's lifetime
pub const MIN_RADIUS: f32 = 1.0;
pub const MAX_RADIUS: f32 = 3.0;

/// Spawn opacity range [MIN_OPACITY, MAX_OPACITY), fixed for a particle's lifetime
pub const MIN_OPACITY: f32 = 0.3;
pub const MAX_OPACITY: f32 = 0.8;

// ============================================
// Pointer Interaction
// ============================================

/// Particles strictly closer than this to the pointer receive an impulse
pub const POINTER_RADIUS: f32 = 150.0;

/// Impulse magnitude added to velocity, directed away from the pointer.
/// Impulses accumulate freely; friction is the only thing reining speed in.
pub const POINTER_IMPULSE: f32 = 0.5;

// ============================================
// Connections
// ============================================

/// Particle pairs strictly closer than this are joined by a line
pub const CONNECTION_RADIUS: f32 = 200.0;

/// Line alpha is (1 - distance / CONNECTION_RADIUS) * CONNECTION_ALPHA
pub const CONNECTION_ALPHA: f32 = 0.15;

// ============================================
// Palette
// ============================================

/// Dark theme: pale gray particles and lines over near-black
pub const DARK_BACKGROUND: [f64; 3] = [0.05, 0.05, 0.08];
pub const DARK_FOREGROUND: [f32; 3] = [0.878, 0.878, 0.878];

/// Light theme: charcoal particles and lines over off-white
pub const LIGHT_BACKGROUND: [f64; 3] = [0.94, 0.94, 0.96];
pub const LIGHT_FOREGROUND: [f32; 3] = [0.13, 0.13, 0.16];
