//! Lumen Particle Flow
//!
//! Animates light across the Lumen pixel graph by moving particles along
//! tagged edges.
//!
//! # Architecture
//!
//! - **Graph**: shared, immutable wiring from `lumen-graph`
//! - **Particles**: position, travel preferences, colour, lifespan
//! - **Flow rules**: priority, random or split edge selection per hop
//! - **Engine**: spawns, moves, kills and draws particles once per frame
//! - **Hooks**: client callbacks at particle birth, update and death
//!
//! # Usage
//!
//! ```ignore
//! let graph = Arc::new(lumen_graph::sculpture_graph()?);
//! let config = FlowConfig::new(16, 42, 8192, &[EdgeTypes::OUTBOUND])?;
//! let mut engine = FlowEngine::new(graph, config, MonotonicClock::new())?;
//! let mut frame = FrameBuffer::new(engine.graph().vertex_count());
//!
//! loop {
//!     engine.update(&mut frame);
//!     show(&frame);
//! }
//! ```

mod clock;
mod color;
mod config;
mod engine;
mod error;
mod flow;
mod hooks;
mod particle;

pub use clock::{elapsed, Clock, ManualClock, MonotonicClock};
pub use color::{dim8_raw, scale8, FrameBuffer, Rgb};
pub use config::{FlowConfig, FlowRule, SpawnRule};
pub use engine::FlowEngine;
pub use error::{Error, Result};
pub use flow::select_edges;
pub use hooks::{FnHooks, HookContext, NoHooks, ParticleHooks};
pub use particle::Particle;

pub use lumen_graph::{DirectionSet, EdgeTypes, Graph, PixelIndex};

/// Target frame rate the engine's budget is sized for.
pub const TARGET_FPS: u32 = 120;
