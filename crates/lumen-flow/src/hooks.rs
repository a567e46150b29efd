//! Client callbacks invoked at particle birth, every tick, and death.

use lumen_graph::Graph;

use crate::config::FlowConfig;
use crate::particle::Particle;

/// Read-only engine state handed to every hook call.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub config: &'a FlowConfig,
    pub graph: &'a Graph,
    /// Clock reading for the current tick.
    pub now: u64,
}

/// Per-particle callbacks. Every method defaults to doing nothing.
///
/// Hooks run synchronously inside [`FlowEngine::update`](crate::FlowEngine::update)
/// and share its frame budget.
pub trait ParticleHooks {
    /// A particle was just created, before it is first drawn.
    fn on_new(&mut self, _particle: &mut Particle, _ctx: &HookContext<'_>) {}

    /// Called once per tick for every live particle, after movement.
    fn on_update(&mut self, _particle: &mut Particle, _ctx: &HookContext<'_>) {}

    /// The particle is about to be removed.
    fn on_kill(&mut self, _particle: &mut Particle, _ctx: &HookContext<'_>) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ParticleHooks for NoHooks {}

type HookFn = Box<dyn FnMut(&mut Particle, &HookContext<'_>)>;

/// Hooks assembled from independent closures.
///
/// ```ignore
/// let hooks = FnHooks::new()
///     .on_new(|p, _| p.color = Rgb::from_hue(p.color_index))
///     .on_update(|p, ctx| p.brightness = fade_out(p.age(ctx.now)));
/// ```
#[derive(Default)]
pub struct FnHooks {
    new: Option<HookFn>,
    update: Option<HookFn>,
    kill: Option<HookFn>,
}

impl FnHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_new(mut self, f: impl FnMut(&mut Particle, &HookContext<'_>) + 'static) -> Self {
        self.new = Some(Box::new(f));
        self
    }

    pub fn on_update(mut self, f: impl FnMut(&mut Particle, &HookContext<'_>) + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn on_kill(mut self, f: impl FnMut(&mut Particle, &HookContext<'_>) + 'static) -> Self {
        self.kill = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for FnHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHooks")
            .field("on_new", &self.new.is_some())
            .field("on_update", &self.update.is_some())
            .field("on_kill", &self.kill.is_some())
            .finish()
    }
}

impl ParticleHooks for FnHooks {
    fn on_new(&mut self, particle: &mut Particle, ctx: &HookContext<'_>) {
        if let Some(f) = &mut self.new {
            f(particle, ctx);
        }
    }

    fn on_update(&mut self, particle: &mut Particle, ctx: &HookContext<'_>) {
        if let Some(f) = &mut self.update {
            f(particle, ctx);
        }
    }

    fn on_kill(&mut self, particle: &mut Particle, ctx: &HookContext<'_>) {
        if let Some(f) = &mut self.kill {
            f(particle, ctx);
        }
    }
}
