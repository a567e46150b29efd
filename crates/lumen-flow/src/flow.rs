//! Edge selection for one hop.

use lumen_graph::{DirectionSet, Edge, Graph, PixelIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{FlowConfig, FlowRule};

/// Pick the edge(s) a particle at `from` follows next.
///
/// The first returned edge is where the particle itself goes; any further
/// edges are branches that get a clone. An empty result means `from` is a
/// leaf for these preferences.
pub fn select_edges<R: Rng + ?Sized>(
    graph: &Graph,
    config: &FlowConfig,
    rng: &mut R,
    from: PixelIndex,
    directions: &DirectionSet,
) -> Vec<Edge> {
    let mode = config.match_mode();

    if config.flow_rule == FlowRule::Priority {
        return directions
            .iter()
            .find_map(|mask| {
                graph
                    .matching(from, mask, mode)
                    .find(|edge| config.is_allowed(edge.to))
                    .copied()
            })
            .into_iter()
            .collect();
    }

    let mut candidates: Vec<Edge> = graph
        .adjacencies(from, directions, mode)
        .into_iter()
        .filter(|edge| config.is_allowed(edge.to))
        .collect();

    match config.flow_rule {
        FlowRule::Random => candidates.choose(rng).copied().into_iter().collect(),
        FlowRule::Split if candidates.len() > 1 => {
            candidates.retain(|edge| edge.types.intersects(config.split_directions));
            candidates
        }
        _ => candidates,
    }
}
