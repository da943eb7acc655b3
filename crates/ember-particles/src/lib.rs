//! Ember Particles - CPU particle simulation
//!
//! Provides a single-emitter particle simulation with:
//! - Fractional-accumulator emission that holds the configured rate under any frame timing
//! - Point or box-volume emitters with per-axis random velocity
//! - Mass-scaled force impulses and explicit Euler integration
//! - Elastic velocity reflection off a static sphere
//! - Stable in-place removal of expired particles
//! - GPU instance packing and TOML scene/preset loading for the host

mod config;
pub mod emitter;
pub mod obstacle;
pub mod particle;
pub mod rng;
pub mod scene;
pub mod simulation;
pub mod system;

pub use emitter::{Emitter, EmitterConfig, MAX_BATCH};
pub use obstacle::Obstacle;
pub use particle::{Particle, ParticleInstance};
pub use rng::ParticleRng;
pub use scene::{Scene, PRESETS};
pub use simulation::{RunTotals, Simulation};
pub use system::{FrameStats, ParticleSystem};
