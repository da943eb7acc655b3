//! Run command - drives a scene headless and reports what happened

use anyhow::{bail, Context, Result};
use ember_core::Vec3;
use ember_particles::{ParticleRng, Scene, Simulation};
use serde::Serialize;

pub struct RunArgs {
    pub scene: Option<String>,
    pub preset: String,
    pub seconds: f32,
    pub fps: f32,
    pub jitter: f32,
    pub seed: Option<u64>,
    pub wind: Option<[f32; 3]>,
    pub reset_at: Option<f32>,
    pub format: String,
}

/// Frame timing for one run
pub struct FramePlan {
    pub seconds: f32,
    pub fps: f32,
    pub jitter: f32,
    pub reset_at: Option<f32>,
}

impl FramePlan {
    fn check(&self) -> Result<()> {
        if !(self.fps > 0.0 && self.fps.is_finite()) {
            bail!("--fps must be positive, got {}", self.fps);
        }
        if !(self.seconds >= 0.0 && self.seconds.is_finite()) {
            bail!("--seconds must be non-negative, got {}", self.seconds);
        }
        if !(0.0..1.0).contains(&self.jitter) {
            bail!("--jitter must be in [0, 1), got {}", self.jitter);
        }
        Ok(())
    }
}

/// Counts for one whole simulated second
#[derive(Debug, Default, Serialize)]
pub struct SecondReport {
    pub second: u32,
    pub frames: u32,
    pub emitted: usize,
    pub expired: usize,
    pub collisions: usize,
    pub alive: usize,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub source: String,
    pub frames: u64,
    pub elapsed: f64,
    pub emitted: u64,
    pub expired: u64,
    pub collisions: u64,
    pub peak_alive: usize,
    pub alive: usize,
    pub resets: u32,
    pub seconds: Vec<SecondReport>,
}

pub fn run(args: RunArgs) -> Result<()> {
    let (mut scene, source) = match &args.scene {
        Some(path) => (
            Scene::load(path).with_context(|| format!("Failed to load scene {}", path))?,
            path.clone(),
        ),
        None => (
            Scene::preset(&args.preset).context("Failed to load preset")?,
            format!("preset:{}", args.preset),
        ),
    };
    if args.seed.is_some() {
        scene.seed = args.seed;
    }
    if let Some(w) = args.wind {
        scene.wind = Vec3::from_array(w);
    }

    let plan = FramePlan {
        seconds: args.seconds,
        fps: args.fps,
        jitter: args.jitter,
        reset_at: args.reset_at,
    };
    let jitter_rng = match scene.seed {
        Some(seed) => ParticleRng::new(seed.wrapping_add(1)),
        None => ParticleRng::from_entropy(),
    };

    let mut sim = Simulation::new(scene).context("Failed to build particle system")?;
    let report = simulate(&mut sim, &plan, jitter_rng, source)?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }
    Ok(())
}

/// Step `sim` through `plan`, collecting per-second and overall counts
pub fn simulate(
    sim: &mut Simulation,
    plan: &FramePlan,
    mut jitter_rng: ParticleRng,
    source: String,
) -> Result<RunReport> {
    plan.check()?;

    let base_dt = 1.0 / plan.fps;
    let mut elapsed = 0.0f64;
    let mut pending_reset = plan.reset_at;
    let mut seconds = Vec::new();
    let mut window = SecondReport::default();
    let (mut frames, mut emitted, mut expired, mut collisions, mut peak_alive) =
        (0u64, 0u64, 0u64, 0u64, 0usize);

    while elapsed < plan.seconds as f64 {
        if let Some(at) = pending_reset {
            if elapsed >= at as f64 {
                sim.reset().context("Failed to reset particle system")?;
                pending_reset = None;
            }
        }

        let dt = base_dt * (1.0 + plan.jitter * jitter_rng.range(-1.0, 1.0));
        let stats = match sim.frame(dt) {
            Ok(stats) => stats,
            Err(e) => {
                log::warn!("frame {} rejected at {:.3}s: {}", frames + 1, elapsed, e);
                return Err(e).context("Simulation step failed");
            }
        };
        elapsed += dt as f64;

        frames += 1;
        emitted += stats.emitted as u64;
        expired += stats.expired as u64;
        collisions += stats.collisions as u64;
        peak_alive = peak_alive.max(stats.alive);

        window.frames += 1;
        window.emitted += stats.emitted;
        window.expired += stats.expired;
        window.collisions += stats.collisions;
        window.alive = stats.alive;

        // A long frame can cross several boundaries; seconds it skipped get
        // empty windows
        while elapsed >= (window.second + 1) as f64 {
            log::debug!("second {}: {:?}", window.second + 1, window);
            let next = window.second + 1;
            seconds.push(std::mem::replace(
                &mut window,
                SecondReport {
                    second: next,
                    alive: stats.alive,
                    ..Default::default()
                },
            ));
        }
    }
    if window.frames > 0 {
        seconds.push(window);
    }

    Ok(RunReport {
        source,
        frames,
        elapsed,
        emitted,
        expired,
        collisions,
        peak_alive,
        alive: sim.system().len(),
        resets: sim.resets(),
        seconds,
    })
}

fn print_text(report: &RunReport) {
    println!("Scene: {}", report.source);
    println!(
        "Simulated {:.3}s in {} frames ({} reset{})",
        report.elapsed,
        report.frames,
        report.resets,
        if report.resets == 1 { "" } else { "s" }
    );
    println!();
    println!(
        "{:>6} {:>7} {:>8} {:>8} {:>10} {:>8}",
        "second", "frames", "emitted", "expired", "collisions", "alive"
    );
    for s in &report.seconds {
        println!(
            "{:>6} {:>7} {:>8} {:>8} {:>10} {:>8}",
            s.second, s.frames, s.emitted, s.expired, s.collisions, s.alive
        );
    }
    println!();
    println!("Emitted:    {}", report.emitted);
    println!("Expired:    {}", report.expired);
    println!("Collisions: {}", report.collisions);
    println!("Peak alive: {}", report.peak_alive);
    println!("Alive now:  {}", report.alive);
}
