//! Particle types: CPU simulation state and GPU instance data

use bytemuck::{Pod, Zeroable};
use ember_core::{Color, EmberError, Result, Vec3};

/// One simulated point.
///
/// Position and velocity are advanced in place every tick; color, mass and
/// lifetime are fixed at creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    color: Color,
    age: f32,
    lifetime: f32,
    mass: f32,
}

impl Particle {
    /// Build a fresh particle (age 0). Mass and lifetime must be positive.
    pub fn new(
        position: Vec3,
        velocity: Vec3,
        color: Color,
        lifetime: f32,
        mass: f32,
    ) -> Result<Self> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(EmberError::out_of_range("particle.mass", "finite and > 0", mass));
        }
        if !(lifetime > 0.0 && lifetime.is_finite()) {
            return Err(EmberError::out_of_range(
                "particle.lifetime",
                "finite and > 0",
                lifetime,
            ));
        }
        Ok(Self::spawned(position, velocity, color, lifetime, mass))
    }

    /// Unchecked constructor for emitters whose config is already validated
    pub(crate) fn spawned(
        position: Vec3,
        velocity: Vec3,
        color: Color,
        lifetime: f32,
        mass: f32,
    ) -> Self {
        Self {
            position,
            velocity,
            color,
            age: 0.0,
            lifetime,
            mass,
        }
    }

    /// `velocity += force / mass`
    pub fn apply_force(&mut self, force: Vec3) {
        self.velocity += force / self.mass;
    }

    /// Explicit Euler step; also ages the particle by `dt`.
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.age += dt;
    }

    pub fn is_expired(&self) -> bool {
        self.age > self.lifetime
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Normalized age in [0, 1]
    pub fn age_ratio(&self) -> f32 {
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

/// GPU instance data for one particle sprite/sphere.
/// 32 bytes (2 rows of vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// World position + render radius packed into vec4
    pub pos_size: [f32; 4], // xyz = position, w = radius
    /// Normalized color with alpha
    pub color: [f32; 4], // rgba
}

impl ParticleInstance {
    pub fn from_particle(p: &Particle, radius: f32) -> Self {
        let [x, y, z] = p.position.to_array();
        Self {
            pos_size: [x, y, z, radius],
            color: p.color.to_array(),
        }
    }
}
