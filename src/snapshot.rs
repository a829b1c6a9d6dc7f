use egui::Pos2;
use petgraph::stable_graph::{DefaultIx, EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences, IntoNodeReferences};
use petgraph::Directed;
use serde::{Deserialize, Serialize};

use crate::{Edge, Node};

type StableGraphType<N, E> = StableGraph<Node<N>, Edge<E>, Directed, DefaultIx>;

/// One derived node/edge set, as exchanged between [`crate::PersistentGraph`] and its callers.
///
/// Wrapper around [`petgraph::stable_graph::StableGraph`]. Nodes keep insertion order and edges
/// reference nodes of the same snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<N, E> {
    g: StableGraphType<N, E>,
}

impl<N, E> Default for Snapshot<N, E> {
    fn default() -> Self {
        Self {
            g: StableGraph::default(),
        }
    }
}

impl<N, E> From<StableGraphType<N, E>> for Snapshot<N, E> {
    fn from(g: StableGraphType<N, E>) -> Self {
        Self { g }
    }
}

impl<N, E> Snapshot<N, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            g: StableGraph::with_capacity(nodes, edges),
        }
    }

    pub fn g(&self) -> &StableGraphType<N, E> {
        &self.g
    }

    pub fn g_mut(&mut self) -> &mut StableGraphType<N, E> {
        &mut self.g
    }

    /// Adds node with unplaced layout.
    pub fn add_node(&mut self, payload: N) -> NodeIndex {
        self.g.add_node(Node::new(payload))
    }

    /// Adds node placed at the given location.
    pub fn add_node_with_location(&mut self, payload: N, location: Pos2) -> NodeIndex {
        self.add_node_custom(payload, |n| n.set_location(location))
    }

    pub fn add_node_custom(
        &mut self,
        payload: N,
        node_transform: impl FnOnce(&mut Node<N>),
    ) -> NodeIndex {
        let mut node = Node::new(payload);
        node_transform(&mut node);
        self.g.add_node(node)
    }

    pub fn add_edge(&mut self, start: NodeIndex, end: NodeIndex, payload: E) -> EdgeIndex {
        self.g.add_edge(start, end, Edge::new(payload))
    }

    pub fn node(&self, i: NodeIndex) -> Option<&Node<N>> {
        self.g.node_weight(i)
    }

    pub fn node_mut(&mut self, i: NodeIndex) -> Option<&mut Node<N>> {
        self.g.node_weight_mut(i)
    }

    pub fn edge(&self, i: EdgeIndex) -> Option<&Edge<E>> {
        self.g.edge_weight(i)
    }

    pub fn edge_endpoints(&self, i: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.g.edge_endpoints(i)
    }

    /// Provides iterator over all nodes and their indices in insertion order.
    pub fn nodes_iter(&self) -> impl Iterator<Item = (NodeIndex, &Node<N>)> {
        self.g.node_references()
    }

    pub fn nodes_iter_mut(&mut self) -> impl Iterator<Item = &mut Node<N>> {
        self.g.node_weights_mut()
    }

    /// Provides iterator over all edges as `(index, source, target, edge)`.
    pub fn edges_iter(&self) -> impl Iterator<Item = (EdgeIndex, NodeIndex, NodeIndex, &Edge<E>)> {
        self.g
            .edge_references()
            .map(|e| (e.id(), e.source(), e.target(), e.weight()))
    }

    /// Finds the first node whose payload satisfies the predicate.
    pub fn find_node(&self, pred: impl Fn(&N) -> bool) -> Option<NodeIndex> {
        self.nodes_iter()
            .find(|(_, n)| pred(n.payload()))
            .map(|(idx, _)| idx)
    }

    pub fn node_count(&self) -> usize {
        self.g.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.g.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.g.node_count() == 0
    }
}
