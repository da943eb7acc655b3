//! Scene validation command

use crate::commands::presets::describe;
use anyhow::{Context, Result};
use ember_particles::Scene;

pub fn run(path: &str) -> Result<()> {
    let scene = Scene::load(path).with_context(|| format!("Invalid scene {}", path))?;
    // Building exercises the same checks a run would
    scene
        .build()
        .with_context(|| format!("Scene {} cannot build a particle system", path))?;

    println!("{}: OK", path);
    print!("{}", describe(&scene));
    if scene.seed.is_none() {
        println!("  seed:     none (runs are not reproducible)");
    }
    Ok(())
}
