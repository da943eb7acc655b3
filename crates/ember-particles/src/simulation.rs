//! Frame driver pairing a scene with the particle system built from it

use crate::scene::Scene;
use crate::system::{FrameStats, ParticleSystem};
use ember_core::Result;

/// Running totals across frames since the last reset
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunTotals {
    pub frames: u64,
    pub elapsed: f64,
    pub emitted: u64,
    pub expired: u64,
    pub collisions: u64,
    pub peak_alive: usize,
}

impl RunTotals {
    fn record(&mut self, dt: f32, stats: &FrameStats) {
        self.frames += 1;
        self.elapsed += dt as f64;
        self.emitted += stats.emitted as u64;
        self.expired += stats.expired as u64;
        self.collisions += stats.collisions as u64;
        self.peak_alive = self.peak_alive.max(stats.alive);
    }
}

/// Owns one scene and the single live system built from it.
///
/// Each [`frame`](Self::frame) applies the scene's wind and then advances the
/// system; [`reset`](Self::reset) throws the system away and builds a new one.
pub struct Simulation {
    scene: Scene,
    system: ParticleSystem,
    totals: RunTotals,
    resets: u32,
}

impl Simulation {
    pub fn new(scene: Scene) -> Result<Self> {
        let system = scene.build()?;
        Ok(Self {
            scene,
            system,
            totals: RunTotals::default(),
            resets: 0,
        })
    }

    /// One host frame: wind, then `update(dt)`. A rejected `dt` leaves the
    /// particles untouched, wind included.
    pub fn frame(&mut self, dt: f32) -> Result<FrameStats> {
        self.system.check_step(dt)?;
        self.system.apply_force(self.scene.wind);
        let stats = self.system.update(dt)?;
        self.totals.record(dt, &stats);
        Ok(stats)
    }

    /// Discard every particle and the emitter state, starting over from the scene
    pub fn reset(&mut self) -> Result<()> {
        self.system = self.scene.build()?;
        self.totals = RunTotals::default();
        self.resets += 1;
        log::info!("simulation reset ({} so far)", self.resets);
        Ok(())
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn totals(&self) -> &RunTotals {
        &self.totals
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }
}
