//! Headless runs of a flow over the sculpture.

use std::num::NonZeroU16;
use std::path::Path;
use std::sync::Arc;

use lumen_flow::{
    Clock, DirectionSet, EdgeTypes, FlowConfig, FlowEngine, FlowRule, FrameBuffer, HookContext,
    MonotonicClock, Particle, ParticleHooks, Rgb,
};
use lumen_graph::sculpture::{self, SPIRAL_CENTERS};
use tracing::{debug, info};

use crate::pacer::FramePacer;
use crate::{Error, Result};

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Frames to render before stopping
    pub frames: u64,
    /// Frames per second
    pub fps: u32,
    /// Frames between statistics reports
    pub report_every: u64,
    /// Engine parameters
    pub flow: FlowConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 1_200,
            fps: lumen_flow::TARGET_FPS,
            report_every: 120,
            flow: swarm_preset(),
        }
    }
}

const SWARM_SPEED: NonZeroU16 = match NonZeroU16::new(42) {
    Some(speed) => speed,
    None => panic!("swarm speed must be non-zero"),
};

/// Particles rise from the spiral centres, leave at the rims and ride the
/// secondary helix, which leads back into the first spiral, until they burn
/// out.
pub fn swarm_preset() -> FlowConfig {
    FlowConfig {
        max_population: 16,
        max_spawn_per_second: 2,
        speed: SWARM_SPEED,
        lifespan: 8_192,
        flow_rule: FlowRule::Priority,
        require_exact_match: true,
        fade_down: 2,
        fade_up_distance: 3,
        spawn_pixels: Some(SPIRAL_CENTERS.to_vec()),
        ..FlowConfig::default()
    }
}

/// Read a [`FlowConfig`] from a JSON file. Missing fields keep their
/// defaults.
pub fn load_flow_config(path: &Path) -> Result<FlowConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&text)?;
    info!(path = %path.display(), "loaded flow config");
    Ok(config)
}

/// Hooks for the swarm: each particle follows the helix-bound route, takes
/// the next hue of the wheel, and dims over the last eighth of its life.
#[derive(Debug, Default)]
pub struct SwarmHooks {
    spawned: u8,
}

impl SwarmHooks {
    const HUE_STEP: u8 = 37;

    fn route() -> DirectionSet {
        DirectionSet::from([
            EdgeTypes::SPIRAL | EdgeTypes::OUTBOUND,
            EdgeTypes::LOOP2 | EdgeTypes::COUNTERCLOCKWISE,
            EdgeTypes::empty(),
            EdgeTypes::empty(),
        ])
    }
}

impl ParticleHooks for SwarmHooks {
    fn on_new(&mut self, particle: &mut Particle, _ctx: &HookContext<'_>) {
        self.spawned = self.spawned.wrapping_add(1);
        particle.directions = Self::route();
        particle.color_index = self.spawned.wrapping_mul(Self::HUE_STEP);
        particle.color = Rgb::from_hue(particle.color_index);
    }

    fn on_update(&mut self, particle: &mut Particle, ctx: &HookContext<'_>) {
        let tail = particle.lifespan / 8;
        if tail == 0 {
            return;
        }
        let left = particle.lifespan - particle.age(ctx.now);
        if left < tail {
            particle.brightness = (255 * left / tail) as u8;
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    pub frames: u64,
    pub peak_population: usize,
    pub final_population: usize,
    pub lit_pixels: usize,
    pub achieved_fps: f64,
}

/// A flow engine on the sculpture graph together with its frame buffer.
pub struct Simulation<C: Clock = MonotonicClock> {
    config: SimulationConfig,
    engine: FlowEngine<C>,
    frame: FrameBuffer,
    frames: u64,
    peak_population: usize,
}

impl Simulation<MonotonicClock> {
    /// Create a simulation running on wall-clock time.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> Simulation<C> {
    pub fn with_clock(config: SimulationConfig, clock: C) -> Result<Self> {
        let graph = Arc::new(sculpture::sculpture_graph()?);
        let engine =
            FlowEngine::new(graph, config.flow.clone(), clock)?.with_hooks(SwarmHooks::default());
        Ok(Self {
            frame: FrameBuffer::new(sculpture::LED_COUNT),
            config,
            engine,
            frames: 0,
            peak_population: 0,
        })
    }

    pub fn engine(&self) -> &FlowEngine<C> {
        &self.engine
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Render one frame.
    pub fn step(&mut self) {
        self.engine.update(&mut self.frame);
        self.frames += 1;
        self.peak_population = self.peak_population.max(self.engine.len());

        if self.config.report_every != 0 && self.frames % self.config.report_every == 0 {
            info!(
                frame = self.frames,
                population = self.engine.len(),
                lit = self.frame.lit_count(),
                brightness = average_brightness(&self.frame),
                "flow stats"
            );
            self.engine.dump_particles();
        }
    }

    /// Render every configured frame, sleeping between them.
    pub fn run(&mut self, pacer: &mut FramePacer) -> RunStats {
        while self.frames < self.config.frames {
            pacer.wait();
            self.step();
        }
        debug!(frames = pacer.frames(), "pacer finished");
        self.stats(pacer.achieved_fps())
    }

    pub fn stats(&self, achieved_fps: f64) -> RunStats {
        RunStats {
            frames: self.frames,
            peak_population: self.peak_population,
            final_population: self.engine.len(),
            lit_pixels: self.frame.lit_count(),
            achieved_fps,
        }
    }
}

/// Mean perceived brightness over the whole frame.
fn average_brightness(frame: &FrameBuffer) -> u8 {
    if frame.is_empty() {
        return 0;
    }
    let total: usize = frame.iter().map(|c| usize::from(c.average_light())).sum();
    (total / frame.len()) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_flow::{ManualClock, PixelIndex};

    fn manual_sim(frames: u64) -> (Simulation<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        let config = SimulationConfig {
            frames,
            report_every: 0,
            ..SimulationConfig::default()
        };
        (Simulation::with_clock(config, clock.clone()).unwrap(), clock)
    }

    #[test]
    fn swarm_spawns_at_spiral_centres() {
        let (mut sim, clock) = manual_sim(10);
        clock.set(500);
        sim.step();
        assert_eq!(sim.engine().len(), 1);
        assert!(SPIRAL_CENTERS.contains(&sim.engine().particles()[0].position));
    }

    #[test]
    fn swarm_leaves_spiral_for_secondary_helix() {
        let (mut sim, clock) = manual_sim(0);
        let mut reached_helix = false;
        for _ in 0..1_000 {
            clock.advance(8);
            sim.step();
            reached_helix |= sim.engine().particles().iter().any(|p| {
                let v = p.position.value();
                (sculpture::PRIMARY_HELIX_LED_COUNT..sculpture::SPIRAL_FIRST_INDEX).contains(&v)
            });
        }
        assert!(reached_helix);
        assert!(sim.stats(0.0).peak_population <= 16);
    }

    #[test]
    fn swarm_hooks_dim_the_tail_of_life() {
        let graph = sculpture::sculpture_graph().unwrap();
        let config = swarm_preset();
        let ctx = HookContext {
            config: &config,
            graph: &graph,
            now: 8_192 - 512,
        };
        let mut hooks = SwarmHooks::default();
        let mut p = Particle::new(PixelIndex(0), DirectionSet::EMPTY, 8_192, 0);
        hooks.on_new(&mut p, &ctx);
        assert_eq!(p.color_index, SwarmHooks::HUE_STEP);

        hooks.on_update(&mut p, &ctx);
        assert_eq!(p.brightness, 127);
    }

    #[test]
    fn loads_partial_json_config() {
        let path = std::env::temp_dir().join(format!("lumen-sim-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{ "max_population": 8, "speed": 30, "flow_rule": "split" }"#,
        )
        .unwrap();
        let config = load_flow_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.max_population, 8);
        assert_eq!(config.speed.get(), 30);
        assert_eq!(config.flow_rule, FlowRule::Split);
        assert_eq!(config.fade_down, FlowConfig::default().fade_down);
    }

    #[test]
    fn rejects_zero_speed_in_json() {
        let path = std::env::temp_dir().join(format!("lumen-sim-zero-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "speed": 0 }"#).unwrap();
        let result = load_flow_config(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn missing_config_file_reports_path() {
        let err = load_flow_config(Path::new("/nonexistent/lumen.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lumen.json"));
    }
}
