//! Ember CLI - Headless driver for particle scenes

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{presets, run, validate};

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Run particle emitter scenes without a window", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a scene for a fixed span of time and report statistics
    Run {
        /// Path to a scene TOML file (overrides --preset)
        #[arg(long)]
        scene: Option<String>,

        /// Built-in scene to run when no file is given
        #[arg(long, default_value = "fountain")]
        preset: String,

        /// Simulated seconds
        #[arg(long, default_value = "5")]
        seconds: f32,

        /// Frames per simulated second
        #[arg(long, default_value = "60")]
        fps: f32,

        /// Relative frame-time jitter in [0, 1), e.g. 0.3 for +-30%
        #[arg(long, default_value = "0")]
        jitter: f32,

        /// Emitter RNG seed (overrides the scene's)
        #[arg(long)]
        seed: Option<u64>,

        /// Wind force per frame (comma-separated x,y,z, overrides the scene's)
        #[arg(long, value_parser = parse_vec3)]
        wind: Option<[f32; 3]>,

        /// Rebuild the system once this many seconds in
        #[arg(long)]
        reset_at: Option<f32>,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// List built-in scenes
    Presets,

    /// Check a scene file without running it
    Validate {
        /// Path to scene file
        scene: String,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    let z: f32 = parts[2].trim().parse().map_err(|e| format!("invalid z: {}", e))?;
    Ok([x, y, z])
}

/// Level forced by `-v`/`-q`; `None` leaves it to `RUST_LOG` (default warn)
fn flag_level(verbose: u8, quiet: bool) -> Option<log::LevelFilter> {
    match verbose {
        0 if quiet => Some(log::LevelFilter::Error),
        0 => None,
        1 => Some(log::LevelFilter::Info),
        2 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}

fn init_logging(verbose: u8, quiet: bool) -> Result<(), log::SetLoggerError> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = flag_level(verbose, quiet) {
        builder.filter_level(level);
    }
    builder.try_init()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Run {
            scene,
            preset,
            seconds,
            fps,
            jitter,
            seed,
            wind,
            reset_at,
            format,
        } => run::run(run::RunArgs {
            scene,
            preset,
            seconds,
            fps,
            jitter,
            seed,
            wind,
            reset_at,
            format,
        }),
        Commands::Presets => presets::run(),
        Commands::Validate { scene } => validate::run(&scene),
    }
}
