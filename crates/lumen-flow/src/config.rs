//! Engine configuration.

use std::collections::BTreeSet;
use std::num::NonZeroU16;

use lumen_graph::{DirectionSet, EdgeTypes, Graph, MatchMode, PixelIndex};

use crate::{Error, Result};

/// How a particle picks its next edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FlowRule {
    /// One matching edge, chosen uniformly.
    #[default]
    Random,
    /// The first matching edge of the first mask that has one.
    Priority,
    /// Every matching edge at a junction, cloning the particle.
    Split,
}

/// How particles come into being.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SpawnRule {
    /// Top the population up to `max_population` every tick.
    #[default]
    MaintainPopulation,
    /// Only `add_particle` creates particles.
    ManualSpawn,
}

/// Parameters for a [`FlowEngine`](crate::FlowEngine).
///
/// Everything here may be changed between ticks through
/// [`FlowEngine::reconfigure`](crate::FlowEngine::reconfigure).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlowConfig {
    /// Population target under [`SpawnRule::MaintainPopulation`].
    pub max_population: u16,
    /// Spawn rate cap in particles per second, 0 for no cap.
    pub max_spawn_per_second: u16,
    /// Pixels per second, at most [`MAX_SPEED`](Self::MAX_SPEED).
    pub speed: NonZeroU16,
    /// Lifespan of spawned particles in milliseconds, 0 for forever.
    pub lifespan: u64,
    /// Candidate tags per slot. Each spawned particle keeps one random tag
    /// from every non-empty slot.
    pub directions: DirectionSet,
    pub flow_rule: FlowRule,
    pub spawn_rule: SpawnRule,
    /// Frame-buffer fade per elapsed millisecond, in 1/255 steps.
    pub fade_down: u16,
    /// Pixels ahead of each particle to pre-light, 0 to disable.
    pub fade_up_distance: u8,
    /// Under [`FlowRule::Split`], the tags a branch must carry to be taken.
    pub split_directions: EdgeTypes,
    /// Pixels to spawn on. `None` spawns anywhere.
    pub spawn_pixels: Option<Vec<PixelIndex>>,
    /// Pixels particles may enter. `None` allows every pixel.
    pub allowed_pixels: Option<BTreeSet<PixelIndex>>,
    /// Require an edge to carry every tag of a mask, not just one.
    pub require_exact_match: bool,
    /// Seed for spawn placement, direction draws and random flow.
    pub seed: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_population: 0,
            max_spawn_per_second: 0,
            speed: NonZeroU16::MIN,
            lifespan: 0,
            directions: DirectionSet::EMPTY,
            flow_rule: FlowRule::default(),
            spawn_rule: SpawnRule::default(),
            fade_down: 4,
            fade_up_distance: 0,
            split_directions: EdgeTypes::all(),
            spawn_pixels: None,
            allowed_pixels: None,
            require_exact_match: false,
            seed: 42,
        }
    }
}

impl FlowConfig {
    /// Fastest supported speed: one move per millisecond.
    pub const MAX_SPEED: u16 = 1000;

    /// Check a speed in pixels per second.
    pub fn checked_speed(speed: u16) -> Result<NonZeroU16> {
        if speed > Self::MAX_SPEED {
            return Err(Error::SpeedTooHigh {
                max: Self::MAX_SPEED,
                got: speed,
            });
        }
        NonZeroU16::new(speed).ok_or(Error::ZeroSpeed)
    }

    /// Configuration with the four parameters every pattern sets.
    ///
    /// Fails with [`Error::ZeroSpeed`] for a speed of 0,
    /// [`Error::SpeedTooHigh`] above [`MAX_SPEED`](Self::MAX_SPEED) and with
    /// a graph error for more than four direction masks.
    pub fn new(
        max_population: u16,
        speed: u16,
        lifespan: u64,
        directions: &[EdgeTypes],
    ) -> Result<Self> {
        Ok(Self {
            max_population,
            speed: Self::checked_speed(speed)?,
            lifespan,
            directions: DirectionSet::from_slice(directions)?,
            ..Self::default()
        })
    }

    /// Milliseconds between moves.
    pub fn move_interval(&self) -> u64 {
        1000 / u64::from(self.speed.get())
    }

    /// Elapsed time past which the movement clock resynchronises instead of
    /// catching up.
    pub fn resync_threshold(&self) -> u64 {
        2000 / u64::from(self.speed.get())
    }

    /// Minimum milliseconds between spawns, if capped.
    pub fn spawn_interval(&self) -> Option<u64> {
        (self.max_spawn_per_second != 0).then(|| 1000 / u64::from(self.max_spawn_per_second))
    }

    pub fn match_mode(&self) -> MatchMode {
        MatchMode::from_exact(self.require_exact_match)
    }

    /// Whether particles may enter `px`.
    pub fn is_allowed(&self, px: PixelIndex) -> bool {
        self.allowed_pixels
            .as_ref()
            .map_or(true, |allowed| allowed.contains(&px))
    }

    /// Check the speed and every pixel reference against `graph`.
    pub fn validate(&self, graph: &Graph) -> Result<()> {
        Self::checked_speed(self.speed.get())?;
        let vertex_count = graph.vertex_count();
        if let Some(spawn) = &self.spawn_pixels {
            if spawn.is_empty() {
                return Err(Error::EmptySpawnPixels);
            }
            if let Some(&pixel) = spawn.iter().find(|px| !graph.contains(**px)) {
                return Err(Error::SpawnPixelOutOfRange {
                    pixel,
                    vertex_count,
                });
            }
        }
        if let Some(allowed) = &self.allowed_pixels {
            if let Some(&pixel) = allowed.iter().find(|px| !graph.contains(**px)) {
                return Err(Error::AllowedPixelOutOfRange {
                    pixel,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}
