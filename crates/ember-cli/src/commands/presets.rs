//! Presets command - lists the built-in scenes

use anyhow::Result;
use ember_particles::{Scene, PRESETS};

pub fn run() -> Result<()> {
    for name in PRESETS {
        let scene = Scene::preset(name)?;
        println!("{}", name);
        print!("{}", describe(&scene));
    }
    Ok(())
}

/// Indented multi-line summary of a scene
pub fn describe(scene: &Scene) -> String {
    let e = &scene.emitter;
    let mut out = String::new();
    let shape = match e.spread {
        Some(s) => format!("box +-({}, {}, {})", s.x, s.y, s.z),
        None => "point".to_string(),
    };
    out.push_str(&format!(
        "  emitter:  {} at ({}, {}, {}), {}/s, lifetime {}s, mass {}\n",
        shape, e.origin.x, e.origin.y, e.origin.z, e.emission_rate, e.lifetime, e.mass
    ));
    out.push_str(&format!(
        "  color:    rgba({}, {}, {}, {})\n",
        e.color.r, e.color.g, e.color.b, e.color.a
    ));
    match &scene.obstacle {
        Some(o) => {
            let c = o.center();
            out.push_str(&format!(
                "  obstacle: sphere r={} at ({}, {}, {})\n",
                o.radius(),
                c.x,
                c.y,
                c.z
            ));
        }
        None => out.push_str("  obstacle: none\n"),
    }
    out.push_str(&format!(
        "  wind:     ({}, {}, {})\n",
        scene.wind.x, scene.wind.y, scene.wind.z
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_fountain() {
        let text = describe(&Scene::fountain());
        assert!(text.contains("point at (-300, -250, 0)"));
        assert!(text.contains("sphere r=100"));
        assert!(text.contains("rgba(200, 0, 40, 255)"));
    }

    #[test]
    fn describe_snowfall() {
        let text = describe(&Scene::snowfall());
        assert!(text.contains("box +-(1000, 0, 1000)"));
        assert!(text.contains("obstacle: none"));
    }
}
