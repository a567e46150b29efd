//! Pixel adjacency graph.
//!
//! A directed multigraph over `0..N` with an ordered edge list per vertex.
//! The order edges were inserted in is kept: priority flow picks the first
//! matching edge, so wiring order decides ties.
//!
//! Graphs are assembled with a [`GraphBuilder`] and frozen into a [`Graph`],
//! which has no mutating methods and can be shared behind an `Arc` by any
//! number of engines.

use tracing::info;

use crate::{DirectionSet, Edge, EdgeTypes, Error, PixelIndex, Result, TransposeTable};

/// How an edge's tags are compared against a direction mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchMode {
    /// The edge carries at least one tag of the mask.
    #[default]
    Any,
    /// The edge carries every tag of the mask.
    Exact,
}

impl MatchMode {
    /// Pick the mode from an "exact match required" flag.
    pub const fn from_exact(exact: bool) -> Self {
        if exact {
            Self::Exact
        } else {
            Self::Any
        }
    }

    #[inline]
    pub fn matches(self, types: EdgeTypes, mask: EdgeTypes) -> bool {
        match self {
            Self::Any => types.matches_any(mask),
            Self::Exact => types.matches_all(mask),
        }
    }
}

/// Incrementally assembles a [`Graph`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    adjacency: Vec<Vec<Edge>>,
    transpose: TransposeTable,
}

impl GraphBuilder {
    /// Start a graph with `vertex_count` isolated vertices.
    pub fn new(vertex_count: usize, transpose: TransposeTable) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
            transpose,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    fn check(&self, vertex: PixelIndex) -> Result<()> {
        if vertex.index() >= self.adjacency.len() {
            return Err(Error::VertexOutOfRange {
                vertex,
                vertex_count: self.adjacency.len(),
            });
        }
        Ok(())
    }

    /// Append `edge` to its source vertex, and its transpose to the
    /// destination when `bidirectional` is set.
    pub fn add_edge(&mut self, edge: Edge, bidirectional: bool) -> Result<&mut Self> {
        self.check(edge.from)?;
        self.check(edge.to)?;
        if edge.from == edge.to {
            return Err(Error::SelfLoop(edge.from));
        }

        self.adjacency[edge.from.index()].push(edge);
        if bidirectional {
            let back = edge.transpose(&self.transpose);
            self.adjacency[edge.to.index()].push(back);
        }
        Ok(self)
    }

    /// Append every edge bidirectionally, in order.
    pub fn add_edges<'a, I>(&mut self, edges: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        for edge in edges {
            self.add_edge(*edge, true)?;
        }
        Ok(self)
    }

    /// Freeze into an immutable graph.
    pub fn build(self) -> Graph {
        let graph = Graph {
            adjacency: self.adjacency,
            transpose: self.transpose,
        };
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "pixel graph built"
        );
        graph
    }
}

/// Immutable pixel adjacency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
    transpose: TransposeTable,
}

impl Graph {
    /// Build a graph from a static wiring description, inserting every edge
    /// bidirectionally.
    pub fn build(edges: &[Edge], vertex_count: usize, transpose: TransposeTable) -> Result<Self> {
        let mut builder = GraphBuilder::new(vertex_count, transpose);
        builder.add_edges(edges)?;
        Ok(builder.build())
    }

    /// Number of vertices `N`.
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of directed edges, back-edges included.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Whether `vertex` is inside `0..N`.
    pub fn contains(&self, vertex: PixelIndex) -> bool {
        vertex.index() < self.adjacency.len()
    }

    /// The table used to derive back-edges.
    pub fn transpose_table(&self) -> &TransposeTable {
        &self.transpose
    }

    /// Every outgoing edge of `vertex`, in insertion order.
    ///
    /// Empty for out-of-range vertices.
    pub fn edges(&self, vertex: PixelIndex) -> &[Edge] {
        self.adjacency
            .get(vertex.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Outgoing edges of `vertex` matching `mask`, in insertion order.
    pub fn matching<'a>(
        &'a self,
        vertex: PixelIndex,
        mask: EdgeTypes,
        mode: MatchMode,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        let empty = mask.is_empty();
        self.edges(vertex)
            .iter()
            .filter(move |edge| !empty && mode.matches(edge.types, mask))
    }

    /// Outgoing edges of `vertex` matching each mask of `directions` in turn.
    ///
    /// Results for different masks are concatenated in mask order. An edge
    /// that matches two masks appears twice.
    pub fn adjacencies(
        &self,
        vertex: PixelIndex,
        directions: &DirectionSet,
        mode: MatchMode,
    ) -> Vec<Edge> {
        directions
            .iter()
            .flat_map(|mask| self.matching(vertex, mask, mode).copied())
            .collect()
    }
}
