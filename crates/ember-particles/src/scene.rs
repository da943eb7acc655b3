//! Scene descriptions: everything needed to (re)build a particle system
//!
//! A scene file is TOML:
//!
//! ```toml
//! seed = 7
//!
//! [emitter]
//! origin = [-300, -250, 0]
//! velocity_spread = [100, 100, 100]
//! color = [200, 0, 40]
//! lifetime = 3.0
//! emission_rate = 1000
//! mass = 1.0
//!
//! [obstacle]
//! center = [0, 0, 0]
//! radius = 100
//!
//! [force]
//! wind = [2, 2, 0]
//! ```

use crate::config::{read_table, read_vec3};
use crate::emitter::{Emitter, EmitterConfig};
use crate::obstacle::Obstacle;
use crate::rng::ParticleRng;
use crate::system::ParticleSystem;
use ember_core::{Color, EmberError, Result, Vec3};
use std::path::Path;

/// Names accepted by [`Scene::preset`]
pub const PRESETS: &[&str] = &["fountain", "snowfall"];

/// A validated simulation setup
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub emitter: EmitterConfig,
    pub obstacle: Option<Obstacle>,
    /// Force applied to every particle once per frame, before `update`
    pub wind: Vec3,
    /// Emitter RNG seed; `None` seeds from entropy on every build
    pub seed: Option<u64>,
}

impl Scene {
    /// Parse and validate a scene from TOML source
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let root: toml::value::Table = toml::from_str(src)?;

        let emitter = match read_table(&root, "emitter")? {
            Some(t) => EmitterConfig::from_toml(t)?,
            None => EmitterConfig::default(),
        };
        emitter.validate()?;

        let obstacle = read_table(&root, "obstacle")?
            .map(Obstacle::from_toml)
            .transpose()?;

        let wind = match read_table(&root, "force")? {
            Some(t) => read_vec3(t, "force", "wind", Vec3::ZERO)?,
            None => Vec3::ZERO,
        };
        if !wind.is_finite() {
            return Err(EmberError::InvalidFieldType {
                field: "force.wind".into(),
                expected: "finite coordinates",
            });
        }

        let seed = match root.get("seed") {
            None => None,
            Some(v) => {
                let raw = v.as_integer().ok_or_else(|| EmberError::InvalidFieldType {
                    field: "seed".into(),
                    expected: "integer",
                })?;
                Some(u64::try_from(raw).map_err(|_| EmberError::ValueOutOfRange {
                    field: "seed".into(),
                    requirement: ">= 0",
                    value: raw as f64,
                })?)
            }
        };

        Ok(Self {
            emitter,
            obstacle,
            wind,
            seed,
        })
    }

    /// Read and parse a scene file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let src = std::fs::read_to_string(path.as_ref())?;
        let scene = Self::from_toml_str(&src)?;
        log::info!("loaded scene {}", path.as_ref().display());
        Ok(scene)
    }

    /// Look up a built-in scene by name
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "fountain" => Ok(Self::fountain()),
            "snowfall" => Ok(Self::snowfall()),
            _ => Err(EmberError::UnknownPreset(name.to_string())),
        }
    }

    /// Red point-source spray under a diagonal breeze, bouncing off a
    /// sphere at the world origin
    pub fn fountain() -> Self {
        Self {
            emitter: EmitterConfig {
                origin: Vec3::new(-300.0, -250.0, 0.0),
                spread: None,
                velocity_spread: Vec3::new(100.0, 100.0, 100.0),
                color: Color::rgb(200, 0, 40),
                lifetime: 3.0,
                emission_rate: 1000.0,
                mass: 1.0,
            },
            obstacle: Some(Obstacle::from_parts(Vec3::ZERO, 100.0)),
            wind: Vec3::new(2.0, 2.0, 0.0),
            seed: None,
        }
    }

    /// White flakes spawned across a wide horizontal slab, drifting down
    pub fn snowfall() -> Self {
        Self {
            emitter: EmitterConfig {
                origin: Vec3::new(0.0, 500.0, 0.0),
                spread: Some(Vec3::new(1000.0, 0.0, 1000.0)),
                velocity_spread: Vec3::ONE,
                color: Color::WHITE,
                lifetime: 5.0,
                emission_rate: 400.0,
                mass: 1.0,
            },
            obstacle: None,
            wind: Vec3::new(1.0, -2.0, 0.0),
            seed: None,
        }
    }

    /// Build a fresh, empty particle system for this scene.
    /// Calling this again is how a host resets the simulation.
    pub fn build(&self) -> Result<ParticleSystem> {
        let rng = match self.seed {
            Some(seed) => ParticleRng::new(seed),
            None => ParticleRng::from_entropy(),
        };
        let emitter = Emitter::new(self.emitter.clone(), rng)?;
        Ok(ParticleSystem::new(emitter, self.obstacle))
    }
}
