//! Lumen flow simulator
//!
//! Run the swarm flow on the sculpture graph and log what it does.
//!
//! ```text
//! lumen-sim [frames] [fps] [seed] [--config flow.json]
//! ```

use std::env;
use std::path::PathBuf;

use lumen_sim::{load_flow_config, FramePacer, Simulation, SimulationConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Parse command line args
    let mut config_path: Option<PathBuf> = None;
    let mut positional = Vec::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            config_path = args.next().map(PathBuf::from);
        } else {
            positional.push(arg);
        }
    }

    let mut config = SimulationConfig::default();
    if let Some(path) = &config_path {
        config.flow = load_flow_config(path)?;
    }
    if let Some(frames) = positional.first().and_then(|s| s.parse().ok()) {
        config.frames = frames;
    }
    if let Some(fps) = positional.get(1).and_then(|s| s.parse().ok()) {
        config.fps = fps;
    }
    if let Some(seed) = positional.get(2).and_then(|s| s.parse().ok()) {
        config.flow.seed = seed;
    }

    tracing::info!(
        frames = config.frames,
        fps = config.fps,
        seed = config.flow.seed,
        "starting lumen simulation"
    );

    let mut pacer = FramePacer::new(config.fps)?;
    let mut sim = Simulation::new(config)?;
    let stats = sim.run(&mut pacer);

    tracing::info!(
        frames = stats.frames,
        peak_population = stats.peak_population,
        final_population = stats.final_population,
        lit_pixels = stats.lit_pixels,
        achieved_fps = stats.achieved_fps,
        "simulation complete"
    );

    Ok(())
}
