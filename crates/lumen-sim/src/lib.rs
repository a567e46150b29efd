//! Lumen Simulation Driver
//!
//! Runs a particle flow on the sculpture graph without LED hardware,
//! pacing frames in real time and reporting what the flow is doing.
//!
//! # Usage
//!
//! ```ignore
//! let mut sim = Simulation::new(SimulationConfig::default())?;
//! let mut pacer = FramePacer::new(120)?;
//! let stats = sim.run(&mut pacer);
//! ```

mod error;
mod pacer;
mod simulation;

pub use error::{Error, Result};
pub use pacer::FramePacer;
pub use simulation::{
    load_flow_config, swarm_preset, RunStats, Simulation, SimulationConfig, SwarmHooks,
};
