//! The particle system: emission, integration, collision and expiry

use crate::emitter::Emitter;
use crate::obstacle::Obstacle;
use crate::particle::{Particle, ParticleInstance};
use ember_core::{Result, Vec3};

/// What one `update()` did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub emitted: usize,
    pub expired: usize,
    pub collisions: usize,
    /// Live particles after compaction
    pub alive: usize,
}

/// Owns the live particles and the emitter feeding them.
///
/// Per frame the host calls [`apply_force`](Self::apply_force) and then
/// [`update`](Self::update), and reads [`particles`](Self::particles) for
/// rendering once `update` has returned.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    emitter: Emitter,
    obstacle: Option<Obstacle>,
}

impl ParticleSystem {
    pub fn new(emitter: Emitter, obstacle: Option<Obstacle>) -> Self {
        Self {
            particles: Vec::new(),
            emitter,
            obstacle,
        }
    }

    /// Push `force` into every live particle (scaled by each particle's mass)
    pub fn apply_force(&mut self, force: Vec3) {
        for p in &mut self.particles {
            p.apply_force(force);
        }
    }

    /// Whether [`update`](Self::update) would accept `dt`. Changes nothing.
    pub fn check_step(&self, dt: f32) -> Result<()> {
        self.emitter.check_step(dt)
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Newly emitted particles join before integration, so they are moved and
    /// aged in the same tick. Expired particles are removed in one stable
    /// pass at the end. A step rejected by [`check_step`](Self::check_step)
    /// fails before any state changes.
    pub fn update(&mut self, dt: f32) -> Result<FrameStats> {
        self.check_step(dt)?;

        let batch = self.emitter.emit(dt)?;
        let emitted = batch.len();
        self.particles.extend(batch);

        let mut collisions = 0;
        let obstacle = self.obstacle;
        for p in &mut self.particles {
            p.integrate(dt);
            if let Some(sphere) = &obstacle {
                if sphere.reflect(p) {
                    collisions += 1;
                }
            }
        }

        let before = self.particles.len();
        self.particles.retain(|p| !p.is_expired());

        let stats = FrameStats {
            emitted,
            expired: before - self.particles.len(),
            collisions,
            alive: self.particles.len(),
        };
        log::trace!("particle update dt={dt}: {stats:?}");
        Ok(stats)
    }

    /// Reflect `particle` off the obstacle, if one is configured and the
    /// particle is inside it. Returns whether it bounced.
    pub fn resolve_collision(&self, particle: &mut Particle) -> bool {
        self.obstacle
            .as_ref()
            .is_some_and(|sphere| sphere.reflect(particle))
    }

    /// Add an externally built particle to the live set
    pub fn spawn(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Live particles in insertion order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn obstacle(&self) -> Option<&Obstacle> {
        self.obstacle.as_ref()
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Pack live particles into `out` for instanced drawing.
    /// `out` is cleared first so the host can reuse one buffer across frames.
    pub fn pack_instances(&self, radius: f32, out: &mut Vec<ParticleInstance>) {
        out.clear();
        out.extend(
            self.particles
                .iter()
                .map(|p| ParticleInstance::from_particle(p, radius)),
        );
    }
}
