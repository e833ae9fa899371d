//! Graph backing for the circuit.
//!
//! A thin wrapper around a petgraph [`DiGraph`] with one edge per wire
//! segment: an edge `(u -> v, w)` exists exactly when `u` is the in-neighbor
//! of `v` on wire `w`. Vertex indices coincide with node-storage ids; the
//! backing never removes a petgraph node, so removed vertices simply become
//! isolated.

use std::collections::VecDeque;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::node::{VertexId, WireId};

/// Node index type for the backing graph.
pub type NodeIndex = PetNodeIndex<u32>;

#[inline]
fn ix(v: VertexId) -> NodeIndex {
    NodeIndex::new(v)
}

/// An edge in the backing graph, labelled with the wire it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireEdge {
    /// The wire this edge represents.
    pub wire: WireId,
}

/// Forward/backward adjacency of the circuit DAG.
#[derive(Debug, Clone, Default)]
pub struct DagBacking {
    graph: DiGraph<(), WireEdge, u32>,
}

impl DagBacking {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an isolated vertex.
    pub fn add_vertex(&mut self) -> VertexId {
        self.graph.add_node(()).index()
    }

    /// Number of vertices, isolated ones included.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add the edge `(from -> to, wire)`.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, wire: WireId) {
        self.graph.add_edge(ix(from), ix(to), WireEdge { wire });
    }

    /// Remove the edge `(from -> to, wire)`. Returns whether it existed.
    pub fn remove_edge(&mut self, from: VertexId, to: VertexId, wire: WireId) -> bool {
        let edge = self
            .graph
            .edges_connecting(ix(from), ix(to))
            .find(|e| e.weight().wire == wire)
            .map(|e| e.id());
        match edge {
            Some(e) => self.graph.remove_edge(e).is_some(),
            None => false,
        }
    }

    /// Whether the edge `(from -> to, wire)` exists.
    pub fn has_edge(&self, from: VertexId, to: VertexId, wire: WireId) -> bool {
        self.graph
            .edges_connecting(ix(from), ix(to))
            .any(|e| e.weight().wire == wire)
    }

    /// Remove every edge incident to `v`.
    pub fn clear_vertex(&mut self, v: VertexId) {
        // Edge removal swaps indices, so always take the first remaining edge.
        for dir in [Direction::Incoming, Direction::Outgoing] {
            while let Some(e) = self.graph.first_edge(ix(v), dir) {
                self.graph.remove_edge(e);
            }
        }
    }

    /// Incoming edges of `v` as `(source, wire)`.
    pub fn in_edges(&self, v: VertexId) -> impl Iterator<Item = (VertexId, WireId)> + '_ {
        self.graph
            .edges_directed(ix(v), Direction::Incoming)
            .map(|e| (e.source().index(), e.weight().wire))
    }

    /// Outgoing edges of `v` as `(target, wire)`.
    pub fn out_edges(&self, v: VertexId) -> impl Iterator<Item = (VertexId, WireId)> + '_ {
        self.graph
            .edges_directed(ix(v), Direction::Outgoing)
            .map(|e| (e.target().index(), e.weight().wire))
    }

    /// Number of incoming edges of `v`.
    pub fn in_degree(&self, v: VertexId) -> usize {
        self.graph
            .edges_directed(ix(v), Direction::Incoming)
            .count()
    }

    /// Number of outgoing edges of `v`.
    pub fn out_degree(&self, v: VertexId) -> usize {
        self.graph
            .edges_directed(ix(v), Direction::Outgoing)
            .count()
    }

    /// Whether there is a directed path from `from` to `to`.
    ///
    /// A vertex always reaches itself.
    pub fn has_path(&self, from: VertexId, to: VertexId) -> bool {
        petgraph::algo::has_path_connecting(&self.graph, ix(from), ix(to), None)
    }

    /// Whether the graph contains a directed cycle.
    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Topological order of the vertices for which `include` holds (Kahn).
    ///
    /// Sources are seeded in id order. Vertices on or behind a cycle never
    /// reach in-degree zero and are left out, so a short result signals a
    /// cyclic graph.
    pub fn topological_order(&self, include: impl Fn(VertexId) -> bool) -> Vec<VertexId> {
        let n = self.num_vertices();
        let mut in_degree: Vec<usize> = (0..n).map(|v| self.in_degree(v)).collect();
        let mut queue: VecDeque<VertexId> = (0..n)
            .filter(|&v| include(v) && in_degree[v] == 0)
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for (t, _) in self.out_edges(v) {
                in_degree[t] -= 1;
                if in_degree[t] == 0 {
                    queue.push_back(t);
                }
            }
        }
        order
    }

    /// Copy of the graph with vertices renumbered through `remap`.
    ///
    /// Vertices mapped to `None` must be isolated.
    pub(crate) fn compacted(&self, remap: &[Option<VertexId>]) -> DagBacking {
        let mut out = DagBacking::new();
        for _ in remap.iter().flatten() {
            out.add_vertex();
        }
        for e in self.graph.edge_references() {
            if let (Some(s), Some(t)) = (remap[e.source().index()], remap[e.target().index()]) {
                out.add_edge(s, t, e.weight().wire);
            }
        }
        out
    }
}
