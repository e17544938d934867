//! # Directed Graph Core
//!
//! Generic directed graph used as the structural backbone of the Markov models.
//!
//! ## Key Components
//!
//! - **Node**: carries a value of generic type plus its outgoing (successor)
//!   and incoming (predecessor) connections, the edges linked to it, and an
//!   optional parent.
//!
//! - **Edge**: a weighted link between two nodes, identified independently of
//!   its endpoints so that several edges may share the same pair of nodes.
//!
//! - **Graph**: owns nodes and edges, with O(1) id lookups via hash indexes
//!   and deterministic iteration in insertion order.
//!
//! ## Design
//!
//! Nodes refer to each other and to edges by id only; the graph is the single
//! owner of every node and edge. Mutators report duplicate or partial wiring
//! through [`Status`] rather than failing hard, so callers that build a fixed
//! topology can ignore the outcome of wiring steps they know are redundant.
//!
//! ## Example
//!
//! ```rust,ignore
//! use hmmgraph::engine::graph::*;
//! use hmmgraph::engine::registry::IdentityRegistry;
//!
//! let mut reg = IdentityRegistry::new();
//! let mut graph = Graph::new(&mut reg, "g");
//! let a = Node::new(&mut reg, "a", 1);
//! let b = Node::new(&mut reg, "b", 2);
//! let (a_id, b_id) = (a.id, b.id);
//! let _ = graph.add_node(a);
//! let _ = graph.add_node(b);
//! let (status, edge) = graph.bi_connect(&mut reg, a_id, b_id, 0.5)?;
//! ```

use rustc_hash::FxHashMap;

use crate::engine::errors::ModelError;
use crate::engine::registry::{IdentityRegistry, ObjectId, ObjectKind};
use crate::engine::status::Status;

/// A unique identifier for a node.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u64);

/// A unique identifier for an edge.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(pub u64);

impl From<NodeId> for ObjectId {
    fn from(id: NodeId) -> Self {
        ObjectId(id.0)
    }
}

impl From<EdgeId> for ObjectId {
    fn from(id: EdgeId) -> Self {
        ObjectId(id.0)
    }
}

/// A node carrying a value of type `V`.
#[derive(Debug, Clone)]
pub struct Node<V> {
    /// The unique node identifier
    pub id: NodeId,
    /// Free-form label, used by [`Graph::seek`]
    pub label: String,
    /// The attached value
    pub value: V,
    successors: Vec<NodeId>,
    predecessors: Vec<NodeId>,
    linked_edges: Vec<EdgeId>,
    connected: bool,
    has_input_connection: bool,
    parent: Option<NodeId>,
}

impl<V> Node<V> {
    /// Creates an unconnected node with a freshly issued id.
    pub fn new(registry: &mut IdentityRegistry, label: &str, value: V) -> Self {
        let id = registry.allocate(ObjectKind::Node, label);
        Self::unregistered(NodeId(id.0), label, value)
    }

    /// Creates an unconnected node under a caller-chosen id.
    ///
    /// # Errors
    ///
    /// * `ModelError::DuplicateId` - the id is already registered
    pub fn with_id(
        registry: &mut IdentityRegistry,
        id: NodeId,
        label: &str,
        value: V,
    ) -> Result<Self, ModelError> {
        registry.register(id.into(), ObjectKind::Node, label)?;
        Ok(Self::unregistered(id, label, value))
    }

    fn unregistered(id: NodeId, label: &str, value: V) -> Self {
        Self {
            id,
            label: label.to_string(),
            value,
            successors: Vec::new(),
            predecessors: Vec::new(),
            linked_edges: Vec::new(),
            connected: false,
            has_input_connection: false,
            parent: None,
        }
    }

    /// Structural copy of this node (same id, label, and wiring) holding `value`.
    pub fn with_value(&self, value: V) -> Self {
        Self {
            id: self.id,
            label: self.label.clone(),
            value,
            successors: self.successors.clone(),
            predecessors: self.predecessors.clone(),
            linked_edges: self.linked_edges.clone(),
            connected: self.connected,
            has_input_connection: self.has_input_connection,
            parent: self.parent,
        }
    }

    pub fn is_connected_to(&self, other: NodeId) -> bool {
        self.successors.contains(&other)
    }

    /// Outgoing connections in the order they were made.
    pub fn successors(&self) -> &[NodeId] {
        &self.successors
    }

    /// The `index`-th outgoing connection.
    pub fn successor_at(&self, index: usize) -> Option<NodeId> {
        self.successors.get(index).copied()
    }

    /// Incoming connections in the order they were made.
    pub fn predecessors(&self) -> &[NodeId] {
        &self.predecessors
    }

    /// Edges touching this node, from either end.
    pub fn linked_edges(&self) -> &[EdgeId] {
        &self.linked_edges
    }

    /// Whether this node has an outgoing connection that was not removed.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn has_input_connection(&self) -> bool {
        self.has_input_connection
    }

    pub fn has_output_connection(&self) -> bool {
        !self.successors.is_empty()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn link_edge(&mut self, edge: EdgeId) {
        if !self.linked_edges.contains(&edge) {
            self.linked_edges.push(edge);
        }
    }
}

/// A weighted directed link between two nodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// The unique edge identifier
    pub id: EdgeId,
    /// Label, `edge_<from label>_<to label>` for edges made by [`Graph::bi_connect`]
    pub label: String,
    /// Non-negative weight.
    ///
    /// Edges wired by the Markov models keep their construction cost of 0;
    /// their probabilities live in the models' [`ProbabilityMatrix`] tables.
    ///
    /// [`ProbabilityMatrix`]: crate::markov::matrix::ProbabilityMatrix
    pub cost: f64,
    /// The source node ID
    pub from: NodeId,
    /// The destination node ID
    pub to: NodeId,
}

/// A directed graph owning nodes with values of type `V` and weighted edges.
///
/// Nodes and edges keep their insertion order, which is also the order used by
/// index-based access ([`Graph::node_at`], [`Graph::value_at`]).
#[derive(Debug, Clone)]
pub struct Graph<V> {
    id: ObjectId,
    label: String,
    nodes: Vec<Node<V>>,
    /// Index mapping NodeId to position in nodes vector
    node_index: FxHashMap<NodeId, usize>,
    edges: Vec<Edge>,
    /// Index mapping EdgeId to position in edges vector
    edge_index: FxHashMap<EdgeId, usize>,
}

impl<V> Graph<V> {
    /// Creates an empty graph with a freshly issued id.
    pub fn new(registry: &mut IdentityRegistry, label: &str) -> Self {
        let id = registry.allocate(ObjectKind::Graph, label);
        Self::empty(id, label)
    }

    /// Creates an empty graph under a caller-chosen id.
    ///
    /// # Errors
    ///
    /// * `ModelError::DuplicateId` - the id is already registered
    pub fn with_id(
        registry: &mut IdentityRegistry,
        id: ObjectId,
        label: &str,
    ) -> Result<Self, ModelError> {
        registry.register(id, ObjectKind::Graph, label)?;
        Ok(Self::empty(id, label))
    }

    pub(crate) fn empty(id: ObjectId, label: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
            nodes: Vec::new(),
            node_index: FxHashMap::default(),
            edges: Vec::new(),
            edge_index: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node<V>] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Adds a node to the graph.
    ///
    /// Returns a failure, leaving the graph untouched, if a node with the same
    /// id is already present.
    pub fn add_node(&mut self, node: Node<V>) -> Status {
        if self.node_index.contains_key(&node.id) {
            #[cfg(feature = "tracing")]
            tracing::trace!(node = node.id.0, graph = %self.label, "duplicate node rejected");
            return Status::failure(format!("node {} already in graph", node.id.0));
        }
        self.node_index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Status::Success
    }

    /// Creates a node holding `value`, adds it, and returns its id.
    pub fn add_value(&mut self, registry: &mut IdentityRegistry, label: &str, value: V) -> NodeId {
        let node = Node::new(registry, label, value);
        let id = node.id;
        self.node_index.insert(id, self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    /// Looks up a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node<V>> {
        self.node_index.get(&id).and_then(|&idx| self.nodes.get(idx))
    }

    /// Looks up a node by ID with mutable access.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<V>> {
        self.node_index.get(&id).and_then(|&idx| self.nodes.get_mut(idx))
    }

    /// Looks up a node by insertion position. `None` when `index >= node_count()`.
    pub fn node_at(&self, index: usize) -> Option<&Node<V>> {
        self.nodes.get(index)
    }

    /// The value of the node at insertion position `index`.
    pub fn value_at(&self, index: usize) -> Option<&V> {
        self.node_at(index).map(|n| &n.value)
    }

    /// Looks up an edge by ID.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index.get(&id).and_then(|&idx| self.edges.get(idx))
    }

    /// Looks up an edge by ID with mutable access.
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edge_index.get(&id).and_then(|&idx| self.edges.get_mut(idx))
    }

    /// First node whose label equals `label`, in insertion order.
    pub fn seek(&self, label: &str) -> Option<&Node<V>> {
        self.nodes.iter().find(|n| n.label == label)
    }

    /// Every node whose label equals `label`, in insertion order.
    pub fn seek_all(&self, label: &str) -> Vec<&Node<V>> {
        self.nodes.iter().filter(|n| n.label == label).collect()
    }

    /// Nodes from which at least one outgoing connection was made.
    pub fn connected_nodes(&self) -> Vec<&Node<V>> {
        self.nodes.iter().filter(|n| n.is_connected()).collect()
    }

    /// Connects `a` to `b` (one direction).
    ///
    /// Fails if `a` already lists `b` as a successor or either node is not in
    /// the graph; otherwise records `b` as successor of `a` and `a` as
    /// predecessor of `b`.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Status {
        let (Some(&ia), Some(&ib)) = (self.node_index.get(&a), self.node_index.get(&b)) else {
            return Status::failure("cannot connect nodes outside the graph");
        };
        if self.nodes[ia].is_connected_to(b) {
            return Status::failure(format!("{} already connected to {}", a.0, b.0));
        }

        let from = &mut self.nodes[ia];
        from.successors.push(b);
        from.connected = true;

        let to = &mut self.nodes[ib];
        if !to.predecessors.contains(&a) {
            to.predecessors.push(a);
        }
        to.has_input_connection = true;
        Status::Success
    }

    /// Connects `child` under `parent` and records the parent link.
    ///
    /// The parent link is recorded even when the connection already existed;
    /// in that case the returned status is the failure from [`connect`](Self::connect).
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Status {
        let status = self.connect(parent, child);
        match self.node_mut(child) {
            Some(node) => {
                node.parent = Some(parent);
                status
            }
            None => status,
        }
    }

    /// Removes the connection between `a` and `b` in both directions.
    ///
    /// Fails, changing nothing, unless `a` lists `b` as a successor. Edges
    /// made by [`bi_connect`](Self::bi_connect) stay in the graph.
    pub fn disconnect(&mut self, a: NodeId, b: NodeId) -> Status {
        let connected = self.node(a).map(|n| n.is_connected_to(b)).unwrap_or(false);
        if !connected {
            return Status::failure(format!("{} is not connected to {}", a.0, b.0));
        }
        self.unlink(a, b);
        self.unlink(b, a);
        Status::Success
    }

    fn unlink(&mut self, from: NodeId, to: NodeId) {
        if let Some(n) = self.node_mut(from) {
            n.successors.retain(|id| *id != to);
            n.connected = !n.successors.is_empty();
        }
        if let Some(n) = self.node_mut(to) {
            n.predecessors.retain(|id| *id != from);
            n.has_input_connection = !n.predecessors.is_empty();
        }
    }

    /// Connects `a → b` and `b → a` and creates one edge `a → b` with `cost`.
    ///
    /// The edge is always created and linked into both nodes and the graph's
    /// edge map. The returned status is a failure if either direction was
    /// already connected or if `cost` is negative.
    ///
    /// # Errors
    ///
    /// * `ModelError::NotFound` - either endpoint is not in the graph
    pub fn bi_connect(
        &mut self,
        registry: &mut IdentityRegistry,
        a: NodeId,
        b: NodeId,
        cost: f64,
    ) -> Result<(Status, EdgeId), ModelError> {
        let label = match (self.node(a), self.node(b)) {
            (Some(na), Some(nb)) => format!("edge_{}_{}", na.label, nb.label),
            _ => {
                return Err(ModelError::NotFound(format!(
                    "bi-connection endpoints {} -> {}",
                    a.0, b.0
                )))
            }
        };

        let mut status = self.connect(a, b).and(self.connect(b, a));
        if cost < 0.0 {
            status = status.and(Status::failure(format!("negative edge cost {}", cost)));
        }

        let id = EdgeId(registry.allocate(ObjectKind::Edge, &label).0);
        self.insert_edge(Edge { id, label, cost, from: a, to: b });
        if let Some(n) = self.node_mut(a) {
            n.link_edge(id);
        }
        if let Some(n) = self.node_mut(b) {
            n.link_edge(id);
        }

        #[cfg(feature = "tracing")]
        {
            if status.is_failure() {
                tracing::trace!(edge = id.0, %status, "partial bi-connection");
            }
        }
        Ok((status, id))
    }

    fn insert_edge(&mut self, edge: Edge) {
        self.edge_index.insert(edge.id, self.edges.len());
        self.edges.push(edge);
    }

    /// Replaces the value of node `id` with a structural copy holding `value`.
    ///
    /// The previous node instance is dropped rather than mutated in place.
    ///
    /// # Errors
    ///
    /// * `ModelError::NotFound` - the node is not in the graph
    pub fn replace_node_value(&mut self, id: NodeId, value: V) -> Result<(), ModelError> {
        let idx = *self
            .node_index
            .get(&id)
            .ok_or_else(|| ModelError::NotFound(format!("node {}", id.0)))?;
        let copy = self.nodes[idx].with_value(value);
        self.nodes[idx] = copy;
        Ok(())
    }

    /// Removes every node and edge. Registry entries are left to the caller.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.node_index.clear();
        self.edges.clear();
        self.edge_index.clear();
    }
}

impl<V: PartialEq> Graph<V> {
    /// Every node whose value equals `value`, in insertion order.
    pub fn find_all_with_value(&self, value: &V) -> Vec<&Node<V>> {
        self.nodes.iter().filter(|n| n.value == *value).collect()
    }
}
