//! Lumen Pixel Graph
//!
//! Tagged adjacency graph over the pixels of the Lumen sculpture.
//!
//! # Model
//!
//! The sculpture is not a grid. Its pixels sit on two interleaved helices
//! and three spiral arms, and which pixel may light after which is decided
//! by the physical wiring. Each link is a directed [`Edge`] carrying a set
//! of [`EdgeTypes`] tags:
//!
//! - topology: `LOOP1`, `LOOP2`, `SPIRAL`
//! - direction of travel: `INBOUND`, `OUTBOUND`
//! - rotational sense: `CLOCKWISE`, `COUNTERCLOCKWISE`
//!
//! Links are inserted in both directions. The reverse link gets its tags
//! through a [`TransposeTable`], so `OUTBOUND` becomes `INBOUND` while
//! `LOOP2` stays `LOOP2`.
//!
//! # Queries
//!
//! Walkers ask for outgoing edges with a [`DirectionSet`]: up to four masks
//! tried in order. Matching is either "any tag" or "every tag"
//! ([`MatchMode`]).
//!
//! A built [`Graph`] is immutable and meant to be shared behind an `Arc`.

mod direction;
mod edge;
mod error;
mod graph;
pub mod sculpture;

pub use direction::DirectionSet;
pub use edge::{Edge, EdgeTypes, PixelIndex, TransposeTable};
pub use error::{Error, Result};
pub use graph::{Graph, GraphBuilder, MatchMode};
pub use sculpture::sculpture_graph;
