//! Static sphere that particles bounce off

use crate::config::{read_f32, read_vec3};
use crate::particle::Particle;
use ember_core::{EmberError, Result, Vec3};

/// A static collision sphere. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    center: Vec3,
    radius: f32,
}

impl Obstacle {
    pub fn new(center: Vec3, radius: f32) -> Result<Self> {
        if !center.is_finite() {
            return Err(EmberError::InvalidFieldType {
                field: "obstacle.center".into(),
                expected: "finite coordinates",
            });
        }
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(EmberError::out_of_range("obstacle.radius", "finite and > 0", radius));
        }
        Ok(Self::from_parts(center, radius))
    }

    /// Unchecked constructor for built-in presets
    pub(crate) const fn from_parts(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Parse and validate an `[obstacle]` TOML table
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        let center = read_vec3(table, "obstacle", "center", Vec3::ZERO)?;
        let radius = read_f32(table, "obstacle", "radius", 1.0)?;
        Self::new(center, radius)
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Inside or on the surface
    pub fn contains(&self, point: Vec3) -> bool {
        (point - self.center).length() <= self.radius
    }

    /// Mirror the particle's velocity about the tangent plane at its position
    /// if it is inside the sphere. Returns whether a reflection happened.
    ///
    /// Position is left untouched, so a particle may stay inside for a frame
    /// after bouncing. A particle exactly at the center has no normal and is
    /// skipped.
    pub fn reflect(&self, particle: &mut Particle) -> bool {
        if !self.contains(particle.position) {
            return false;
        }
        let Some(n) = (particle.position - self.center).try_normalized() else {
            return false;
        };
        let v = particle.velocity;
        particle.velocity = v - n * (2.0 * v.dot(&n));
        true
    }
}
