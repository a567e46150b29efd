//! The particle flow engine.
//!
//! One [`FlowEngine`] drives one animation. Each call to
//! [`update`](FlowEngine::update) is one frame:
//!
//! 1. fade the frame buffer in proportion to the time since the last frame
//! 2. spawn particles up to the population target, within the rate cap
//! 3. if a move is due, step every particle one hop along the graph
//! 4. run the update hook on every particle
//! 5. draw every particle at its pixel
//! 6. pre-light the pixels each particle is about to reach
//! 7. clear first-frame flags
//!
//! Moves happen every `1000 / speed` ms. The movement clock advances by
//! exactly that interval per move, so frame jitter does not accumulate into
//! drift. After a stall of more than two intervals it jumps to the present
//! instead of replaying the missed moves.

use std::sync::Arc;

use lumen_graph::{DirectionSet, EdgeTypes, Graph, PixelIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::clock::{elapsed, Clock, MonotonicClock};
use crate::color::{dim8_raw, FrameBuffer, Rgb};
use crate::config::{FlowConfig, SpawnRule};
use crate::flow::select_edges;
use crate::hooks::{HookContext, NoHooks, ParticleHooks};
use crate::particle::Particle;
use crate::{Error, Result};

/// Animates a population of particles over a shared graph.
pub struct FlowEngine<C: Clock = MonotonicClock> {
    graph: Arc<Graph>,
    config: FlowConfig,
    clock: C,
    hooks: Box<dyn ParticleHooks>,
    rng: StdRng,
    particles: Vec<Particle>,
    last_tick: u64,
    last_move: u64,
    last_spawn: u64,
}

impl<C: Clock> FlowEngine<C> {
    /// Create an engine over `graph`. All timestamps start at the clock's
    /// current reading.
    pub fn new(graph: Arc<Graph>, config: FlowConfig, clock: C) -> Result<Self> {
        if graph.vertex_count() == 0 {
            return Err(Error::EmptyGraph);
        }
        config.validate(&graph)?;

        let now = clock.now_millis();
        info!(
            vertices = graph.vertex_count(),
            max_population = config.max_population,
            speed = config.speed.get(),
            flow_rule = ?config.flow_rule,
            "flow engine created"
        );

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            particles: Vec::with_capacity(usize::from(config.max_population)),
            hooks: Box::new(NoHooks),
            graph,
            config,
            clock,
            last_tick: now,
            last_move: now,
            last_spawn: now,
        })
    }

    /// Replace the particle hooks.
    pub fn with_hooks(mut self, hooks: impl ParticleHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Adjust parameters between ticks.
    ///
    /// The edited configuration is validated against the graph and only
    /// takes effect if it passes; otherwise the engine keeps its old one.
    pub fn reconfigure<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut FlowConfig),
    {
        let mut config = self.config.clone();
        f(&mut config);
        config.validate(&self.graph)?;
        self.config = config;
        Ok(())
    }

    /// Change the speed in pixels per second.
    pub fn set_speed(&mut self, speed: u16) -> Result<()> {
        self.config.speed = FlowConfig::checked_speed(speed)?;
        Ok(())
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Clock reading of the most recent tick.
    pub fn last_tick(&self) -> u64 {
        self.last_tick
    }

    /// Movement clock: advances in whole move intervals.
    pub fn last_move(&self) -> u64 {
        self.last_move
    }

    /// Create a particle at a spawn location and run the new-particle hook.
    ///
    /// The particle is drawn on the next tick but does not move until the
    /// tick after, so callers may reposition it first.
    pub fn add_particle(&mut self) -> &mut Particle {
        let now = self.clock.now_millis();
        self.spawn(now)
    }

    /// Drop every particle without running kill hooks.
    pub fn remove_all_particles(&mut self) {
        self.particles.clear();
    }

    /// Recompute every particle's colour, e.g. after a palette change.
    pub fn recolor<F>(&mut self, mut f: F)
    where
        F: FnMut(&Particle) -> Rgb,
    {
        for particle in &mut self.particles {
            particle.color = f(particle);
        }
    }

    /// Log the whole population at debug level.
    pub fn dump_particles(&self) {
        let now = self.clock.now_millis();
        debug!(count = self.particles.len(), "particle population");
        for (i, p) in self.particles.iter().enumerate() {
            debug!(
                index = i,
                pixel = %p.position,
                age = p.exact_age(now),
                color_index = p.color_index,
                directions = ?p.directions.slots().map(|m| m.bits()),
                "particle"
            );
        }
    }

    /// Advance the animation by one frame, drawing into `frame`.
    pub fn update(&mut self, frame: &mut FrameBuffer) {
        let now = self.clock.now_millis();

        let fade = u64::from(self.config.fade_down)
            .saturating_mul(elapsed(now, self.last_tick))
            .min(255) as u8;
        frame.fade_to_black_by(fade);

        if self.config.spawn_rule == SpawnRule::MaintainPopulation {
            self.maintain_population(now);
        }

        let since_move = elapsed(now, self.last_move);
        if since_move >= self.config.move_interval() {
            self.move_particles(now);
            if since_move > self.config.resync_threshold() {
                self.last_move = now;
            } else {
                self.last_move = self.last_move.wrapping_add(self.config.move_interval());
            }
        }

        let ctx = HookContext {
            config: &self.config,
            graph: &self.graph,
            now,
        };
        for particle in &mut self.particles {
            self.hooks.on_update(particle, &ctx);
        }

        for particle in &self.particles {
            frame.set(particle.position, particle.rendered_color());
        }

        if self.config.fade_up_distance > 0 {
            self.fade_up(frame, now);
        }

        for particle in &mut self.particles {
            particle.end_first_frame();
        }
        self.last_tick = now;
    }

    fn maintain_population(&mut self, now: u64) {
        let target = usize::from(self.config.max_population);
        while self.particles.len() < target {
            if let Some(interval) = self.config.spawn_interval() {
                if elapsed(now, self.last_spawn) < interval {
                    break;
                }
            }
            self.spawn(now);
            self.last_spawn = now;
        }
    }

    fn spawn(&mut self, now: u64) -> &mut Particle {
        let position = self.spawn_location();
        let directions = self.draw_directions();
        let mut particle = Particle::new(position, directions, self.config.lifespan, now);
        particle.color = Rgb::from_hue(self.rng.gen());

        let ctx = HookContext {
            config: &self.config,
            graph: &self.graph,
            now,
        };
        self.hooks.on_new(&mut particle, &ctx);

        self.particles.push(particle);
        let last = self.particles.len() - 1;
        &mut self.particles[last]
    }

    fn spawn_location(&mut self) -> PixelIndex {
        if let Some(&px) = self
            .config
            .spawn_pixels
            .as_deref()
            .and_then(|pixels| pixels.choose(&mut self.rng))
        {
            return px;
        }
        let count = self.graph.vertex_count().min(usize::from(u16::MAX) + 1);
        PixelIndex(self.rng.gen_range(0..count) as u16)
    }

    /// Commit to one random tag from each candidate slot.
    fn draw_directions(&mut self) -> DirectionSet {
        let mut slots = [EdgeTypes::empty(); DirectionSet::MAX_SLOTS];
        for (slot, candidates) in slots.iter_mut().zip(self.config.directions.slots()) {
            let count = candidates.bits().count_ones() as usize;
            if count == 0 {
                continue;
            }
            let pick = self.rng.gen_range(0..count);
            if let Some(tag) = candidates.iter().nth(pick) {
                *slot = tag;
            }
        }
        DirectionSet::from(slots)
    }

    fn move_particles(&mut self, now: u64) {
        let current = std::mem::take(&mut self.particles);
        let mut survivors = Vec::with_capacity(current.len());
        let mut branches = Vec::new();
        let mut died = 0usize;

        let ctx = HookContext {
            config: &self.config,
            graph: &self.graph,
            now,
        };

        // Back to front, so kill hooks and random draws run newest first.
        for mut particle in current.into_iter().rev() {
            if particle.is_first_frame() {
                survivors.push(particle);
                continue;
            }

            let next = select_edges(
                &self.graph,
                &self.config,
                &mut self.rng,
                particle.position,
                &particle.directions,
            );
            let Some((primary, rest)) = next.split_first() else {
                debug!(pixel = %particle.position, "no path for particle");
                self.hooks.on_kill(&mut particle, &ctx);
                died += 1;
                continue;
            };

            particle.position = primary.to;
            for edge in rest {
                let mut branch = particle.clone();
                branch.position = edge.to;
                branches.push(branch);
            }

            if particle.is_expired(now) {
                self.hooks.on_kill(&mut particle, &ctx);
                died += 1;
                continue;
            }
            survivors.push(particle);
        }

        trace!(
            survivors = survivors.len(),
            branches = branches.len(),
            died,
            "particles moved"
        );
        survivors.reverse();
        survivors.append(&mut branches);
        self.particles = survivors;
    }

    /// Blend each particle's colour into the pixels ahead of it, brighter
    /// the sooner it will arrive.
    fn fade_up(&mut self, frame: &mut FrameBuffer, now: u64) {
        let speed = u64::from(self.config.speed.get());
        let distance = u64::from(self.config.fade_up_distance);
        let duration = 1000 * distance / speed;
        let since_move = elapsed(now, self.last_move);
        let mut stack: Vec<(PixelIndex, u64)> = Vec::new();

        for particle in &self.particles {
            if particle.is_first_frame() {
                continue;
            }
            // Young particles have not travelled far enough to cast a full glow.
            let reach = distance.min(speed.saturating_mul(particle.age(now)) / 1000);
            if reach == 0 {
                continue;
            }

            stack.push((particle.position, reach - 1));
            while let Some((px, remaining)) = stack.pop() {
                let next = select_edges(
                    &self.graph,
                    &self.config,
                    &mut self.rng,
                    px,
                    &particle.directions,
                );
                for edge in next {
                    let lead = since_move + remaining * 1000 / speed;
                    let progress = if duration == 0 {
                        u8::MAX
                    } else {
                        (255 * lead / duration).min(255) as u8
                    };
                    if let Some(pixel) = frame.get_mut(edge.to) {
                        *pixel = pixel
                            .blend(particle.color, dim8_raw(progress))
                            .scaled(particle.brightness);
                    }
                    if remaining > 0 {
                        stack.push((edge.to, remaining - 1));
                    }
                }
            }
        }
    }
}

impl<C: Clock + std::fmt::Debug> std::fmt::Debug for FlowEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowEngine")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("particles", &self.particles.len())
            .field("last_tick", &self.last_tick)
            .field("last_move", &self.last_move)
            .field("last_spawn", &self.last_spawn)
            .finish()
    }
}
