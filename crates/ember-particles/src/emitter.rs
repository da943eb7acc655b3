//! Emitter configuration (parsed from TOML) and runtime state

use crate::config::{read_color, read_f32, read_opt_vec3, read_vec3};
use crate::particle::Particle;
use crate::rng::ParticleRng;
use ember_core::{Color, EmberError, Result, Vec3};

/// Configuration for one emitter, usually parsed from a scene's `[emitter]` table
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    pub origin: Vec3,
    /// Per-axis half extent of the emission box; `None` emits from `origin` exactly
    pub spread: Option<Vec3>,
    /// Per-axis bound for initial velocity, sampled from `[-v, +v]`
    pub velocity_spread: Vec3,
    pub color: Color,
    pub lifetime: f32,
    /// Particles per second, need not be integral
    pub emission_rate: f32,
    pub mass: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            spread: None,
            velocity_spread: Vec3::ONE,
            color: Color::WHITE,
            lifetime: 3.0,
            emission_rate: 100.0,
            mass: 1.0,
        }
    }
}

impl EmitterConfig {
    /// Parse an EmitterConfig from an `[emitter]` TOML table.
    ///
    /// Missing keys keep their defaults. Values are not range-checked here;
    /// that happens in [`EmitterConfig::validate`].
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        const S: &str = "emitter";
        let d = Self::default();
        Ok(Self {
            origin: read_vec3(table, S, "origin", d.origin)?,
            spread: read_opt_vec3(table, S, "spread")?,
            velocity_spread: read_vec3(table, S, "velocity_spread", d.velocity_spread)?,
            color: read_color(table, S, "color", d.color)?,
            lifetime: read_f32(table, S, "lifetime", d.lifetime)?,
            emission_rate: read_f32(table, S, "emission_rate", d.emission_rate)?,
            mass: read_f32(table, S, "mass", d.mass)?,
        })
    }

    /// Reject configurations an emitter must never run with
    pub fn validate(&self) -> Result<()> {
        positive("emitter.emission_rate", self.emission_rate)?;
        positive("emitter.mass", self.mass)?;
        positive("emitter.lifetime", self.lifetime)?;
        if !self.origin.is_finite() {
            return Err(EmberError::InvalidFieldType {
                field: "emitter.origin".into(),
                expected: "finite coordinates",
            });
        }
        non_negative_extent("emitter.velocity_spread", self.velocity_spread)?;
        if let Some(spread) = self.spread {
            non_negative_extent("emitter.spread", spread)?;
        }
        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EmberError::out_of_range(field, "finite and > 0", value))
    }
}

fn non_negative_extent(field: &str, extent: Vec3) -> Result<()> {
    for (axis, v) in [("x", extent.x), ("y", extent.y), ("z", extent.z)] {
        if !(v >= 0.0 && v.is_finite()) {
            return Err(EmberError::out_of_range(
                format!("{field}.{axis}"),
                "finite and >= 0",
                v,
            ));
        }
    }
    Ok(())
}

/// Most particles one `emit` call may produce. A step owing more is rejected.
pub const MAX_BATCH: usize = 1_000_000;

/// Runtime state for one emitter
pub struct Emitter {
    config: EmitterConfig,
    /// Fractional emission carried between ticks, in seconds
    accumulator: f32,
    rng: ParticleRng,
}

impl Emitter {
    /// Validate `config` and build an emitter drawing from `rng`
    pub fn new(config: EmitterConfig, rng: ParticleRng) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "emitter at ({}, {}, {}) rate={}/s lifetime={}s {}",
            config.origin.x,
            config.origin.y,
            config.origin.z,
            config.emission_rate,
            config.lifetime,
            if config.spread.is_some() { "volume" } else { "point" },
        );
        Ok(Self {
            config,
            accumulator: 0.0,
            rng,
        })
    }

    pub fn seeded(config: EmitterConfig, seed: u64) -> Result<Self> {
        Self::new(config, ParticleRng::new(seed))
    }

    /// Entropy-seeded emitter
    pub fn from_config(config: EmitterConfig) -> Result<Self> {
        Self::new(config, ParticleRng::from_entropy())
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Check that `dt` is a usable step without touching any state.
    ///
    /// Rejects negative or non-finite steps, and steps that would owe more
    /// than [`MAX_BATCH`] particles at once.
    pub fn check_step(&self, dt: f32) -> Result<()> {
        if !(dt >= 0.0 && dt.is_finite()) {
            return Err(EmberError::InvalidTimeStep(dt));
        }
        let owed = (self.accumulator as f64 + dt as f64) * self.config.emission_rate as f64;
        if owed > MAX_BATCH as f64 {
            return Err(EmberError::out_of_range(
                "dt",
                "small enough to owe at most 1000000 particles",
                dt,
            ));
        }
        Ok(())
    }

    /// Produce the particles owed for `dt` seconds.
    ///
    /// Only whole particles are emitted; the fractional remainder stays in the
    /// accumulator so the long-run count converges to `emission_rate` per
    /// second however `dt` is chunked.
    pub fn emit(&mut self, dt: f32) -> Result<Vec<Particle>> {
        self.check_step(dt)?;

        let rate = self.config.emission_rate;
        self.accumulator += dt;
        // Truncate, never round; clamp guards float noise below zero
        let count = (self.accumulator * rate).floor().max(0.0) as usize;
        self.accumulator = (self.accumulator - count as f32 / rate).max(0.0);

        let mut batch = Vec::with_capacity(count);
        for _ in 0..count {
            batch.push(self.spawn_one());
        }
        Ok(batch)
    }

    fn spawn_one(&mut self) -> Particle {
        let c = &self.config;
        let position = match c.spread {
            Some(half) => self.rng.in_box(c.origin, half),
            None => c.origin,
        };
        let velocity = self.rng.symmetric(c.velocity_spread);
        Particle::spawned(position, velocity, c.color, c.lifetime, c.mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_point(rate: f32) -> EmitterConfig {
        EmitterConfig {
            velocity_spread: Vec3::ZERO,
            emission_rate: rate,
            ..Default::default()
        }
    }

    #[test]
    fn default_config_is_sane() {
        let config = EmitterConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.spread.is_none());
    }

    #[test]
    fn rejects_non_positive_rate() {
        for rate in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            let r = Emitter::seeded(still_point(rate), 1);
            assert!(matches!(r, Err(EmberError::ValueOutOfRange { .. })), "rate {rate}");
        }
    }

    #[test]
    fn rejects_bad_mass_lifetime_and_spread() {
        let bad = [
            EmitterConfig { mass: 0.0, ..Default::default() },
            EmitterConfig { lifetime: -1.0, ..Default::default() },
            EmitterConfig { spread: Some(Vec3::new(1.0, -0.1, 1.0)), ..Default::default() },
            EmitterConfig { velocity_spread: Vec3::new(-1.0, 0.0, 0.0), ..Default::default() },
        ];
        for config in bad {
            assert!(Emitter::seeded(config, 1).is_err());
        }
    }

    #[test]
    fn emission_converges_to_rate() {
        // 37.3/s over 10s in 1/60 steps: expect round(373) +-1
        let mut emitter = Emitter::seeded(still_point(37.3), 3).unwrap();
        let dt = 1.0 / 60.0;
        let mut total = 0usize;
        for _ in 0..600 {
            total += emitter.emit(dt).unwrap().len();
        }
        let expected = (37.3f32 * 10.0).round() as i64;
        assert!((total as i64 - expected).abs() <= 1, "emitted {total}");
    }

    #[test]
    fn emission_converges_under_jitter() {
        let mut emitter = Emitter::seeded(still_point(250.0), 5).unwrap();
        let mut jitter = ParticleRng::new(11);
        let mut elapsed = 0.0f64;
        let mut total = 0usize;
        while elapsed < 4.0 {
            let dt = jitter.range(0.001, 0.05);
            elapsed += dt as f64;
            total += emitter.emit(dt).unwrap().len();
        }
        let expected = 250.0 * elapsed;
        assert!((total as f64 - expected).abs() <= 1.5, "emitted {total}, expected {expected}");
    }

    #[test]
    fn accumulator_stays_below_one_particle() {
        let rate = 60.0;
        let mut emitter = Emitter::seeded(still_point(rate), 9).unwrap();
        for dt in [0.001, 0.016, 0.1, 0.0, 0.033, 0.5, 0.007] {
            emitter.emit(dt).unwrap();
            let acc = emitter.accumulator();
            assert!(acc >= 0.0);
            assert!(acc < 1.0 / rate + 1e-6, "accumulator {acc}");
        }
    }

    #[test]
    fn small_steps_accumulate_instead_of_dropping() {
        // 10/s at dt=0.03: no particle for three ticks, then one
        let mut emitter = Emitter::seeded(still_point(10.0), 2).unwrap();
        let counts: Vec<usize> = (0..4).map(|_| emitter.emit(0.03).unwrap().len()).collect();
        assert_eq!(counts, vec![0, 0, 0, 1]);
    }

    #[test]
    fn zero_dt_emits_nothing() {
        let mut emitter = Emitter::seeded(still_point(1000.0), 2).unwrap();
        assert!(emitter.emit(0.0).unwrap().is_empty());
        assert_eq!(emitter.accumulator(), 0.0);
    }

    #[test]
    fn negative_dt_is_rejected_without_state_change() {
        let mut emitter = Emitter::seeded(still_point(10.0), 2).unwrap();
        emitter.emit(0.05).unwrap();
        let before = emitter.accumulator();
        assert!(matches!(emitter.emit(-0.01), Err(EmberError::InvalidTimeStep(_))));
        assert!(emitter.emit(f32::NAN).is_err());
        assert_eq!(emitter.accumulator(), before);
    }

    #[test]
    fn oversized_step_is_rejected_without_state_change() {
        let mut emitter = Emitter::seeded(still_point(1000.0), 2).unwrap();
        emitter.emit(0.0005).unwrap();
        let before = emitter.accumulator();
        for dt in [1.0e30, 1.0e6, f32::MAX] {
            let r = emitter.emit(dt);
            assert!(matches!(r, Err(EmberError::ValueOutOfRange { .. })), "dt {dt}");
        }
        assert_eq!(emitter.accumulator(), before);

        // exactly at the limit is still fine
        let emitter = Emitter::seeded(still_point(1000.0), 2).unwrap();
        assert!(emitter.check_step(1000.0).is_ok());
        assert!(emitter.check_step(1000.5).is_err());
    }

    #[test]
    fn point_emitter_copies_config() {
        let config = EmitterConfig {
            origin: Vec3::new(-300.0, -250.0, 0.0),
            velocity_spread: Vec3::new(100.0, 100.0, 100.0),
            color: Color::rgb(200, 0, 40),
            lifetime: 3.0,
            emission_rate: 1000.0,
            mass: 2.0,
            spread: None,
        };
        let mut emitter = Emitter::seeded(config.clone(), 4).unwrap();
        let batch = emitter.emit(0.1).unwrap();
        assert!(!batch.is_empty());
        for p in &batch {
            assert_eq!(p.position, config.origin);
            assert!(p.velocity.x.abs() <= 100.0);
            assert!(p.velocity.y.abs() <= 100.0);
            assert!(p.velocity.z.abs() <= 100.0);
            assert_eq!(p.color(), config.color);
            assert_eq!(p.lifetime(), 3.0);
            assert_eq!(p.mass(), 2.0);
            assert_eq!(p.age(), 0.0);
        }
    }

    #[test]
    fn volume_emitter_stays_in_box() {
        let config = EmitterConfig {
            origin: Vec3::new(0.0, 500.0, 0.0),
            spread: Some(Vec3::new(1000.0, 0.0, 1000.0)),
            emission_rate: 400.0,
            ..Default::default()
        };
        let mut emitter = Emitter::seeded(config, 8).unwrap();
        let batch = emitter.emit(1.0).unwrap();
        assert_eq!(batch.len(), 400);
        assert!(batch.iter().all(|p| p.position.x.abs() <= 1000.0
            && p.position.y == 500.0
            && p.position.z.abs() <= 1000.0));
        // Not every particle lands on the origin
        assert!(batch.iter().any(|p| p.position.x != 0.0));
    }

    #[test]
    fn same_seed_same_batch() {
        let config = EmitterConfig {
            spread: Some(Vec3::ONE),
            ..Default::default()
        };
        let a = Emitter::seeded(config.clone(), 77).unwrap().emit(0.5).unwrap();
        let b = Emitter::seeded(config, 77).unwrap().emit(0.5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_from_toml() {
        let toml_str = r#"
origin = [0, 500, 0]
spread = [1000, 0, 1000]
velocity_spread = [1, 1, 1]
color = [255, 255, 255]
lifetime = 5
emission_rate = 400
mass = 1.0
"#;
        let table: toml::value::Table = toml::from_str(toml_str).unwrap();
        let config = EmitterConfig::from_toml(&table).unwrap();
        assert_eq!(config.origin, Vec3::new(0.0, 500.0, 0.0));
        assert_eq!(config.spread, Some(Vec3::new(1000.0, 0.0, 1000.0)));
        assert!((config.lifetime - 5.0).abs() < 1e-6);
        assert!((config.emission_rate - 400.0).abs() < 1e-6);
        assert_eq!(config.color, Color::WHITE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_keeps_defaults_and_defers_validation() {
        let table: toml::value::Table = toml::from_str("emission_rate = 0").unwrap();
        let config = EmitterConfig::from_toml(&table).unwrap();
        assert_eq!(config.mass, EmitterConfig::default().mass);
        assert!(config.spread.is_none());
        assert!(config.validate().is_err());
    }
}
