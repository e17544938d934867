//! # Discrete-time Markov chain
//!
//! A [`MarkovModel`] is a [`Graph`] with a fixed number of state nodes and a
//! complete set of transition edges between them, self-loops included. The
//! edge created for `i → j` sits at flat position `i * N + j` of the transition
//! edge array, and the matching probability sits at the same flat position of
//! the transition [`ProbabilityMatrix`].
//!
//! The topology is built once by the constructor; afterwards only state values
//! and probabilities change. Nothing is normalized automatically: callers may
//! assemble an inconsistent chain and find out through [`MarkovModel::check_values`].
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut reg = IdentityRegistry::new();
//! let mut chain: MarkovModel = MarkovModel::new(&mut reg, 2)?;
//! chain.set_states_named(&[0.6, 0.4], &["Pluie", "Soleil"])?;
//! chain.set_transitions(&[[0.7, 0.3], [0.4, 0.6]])?;
//! assert_eq!(chain.transition_by_name("Pluie", "Soleil")?, 0.3);
//! ```

use crate::engine::errors::ModelError;
use crate::engine::graph::{Edge, EdgeId, Graph, Node, NodeId};
use crate::engine::registry::{IdentityRegistry, ObjectId, ObjectKind};
use crate::markov::matrix::{sums_to_one, ProbabilityMatrix, DEFAULT_CHECK_TOLERANCE};
use crate::markov::state::{State, Vertex};

/// A Markov chain over `N` named states.
///
/// `T` is the observation symbol type of the graph's observation nodes. A plain
/// chain has none, hence the `()` default; [`HiddenMarkovModel`] fills it in.
///
/// [`HiddenMarkovModel`]: crate::hmm::HiddenMarkovModel
#[derive(Debug, Clone)]
pub struct MarkovModel<T = ()> {
    graph: Graph<Vertex<T>>,
    state_nodes: Vec<NodeId>,
    /// Row-major, `i * N + j` is the edge `i → j`
    transition_edges: Vec<EdgeId>,
    transitions: ProbabilityMatrix,
}

impl<T> MarkovModel<T> {
    /// Builds an unlabeled chain with `state_count` states.
    ///
    /// Every state starts unnamed with start probability 0 and every transition
    /// probability is 0.
    pub fn new(registry: &mut IdentityRegistry, state_count: usize) -> Result<Self, ModelError> {
        Self::with_label(registry, state_count, "")
    }

    pub fn with_label(
        registry: &mut IdentityRegistry,
        state_count: usize,
        label: &str,
    ) -> Result<Self, ModelError> {
        let id = registry.allocate(ObjectKind::MarkovModel, label);
        Self::build(registry, Graph::empty(id, label), state_count)
    }

    /// Builds a chain registered under a caller-chosen id.
    ///
    /// # Errors
    ///
    /// * `ModelError::DuplicateId` - the id is already registered
    pub fn with_id(
        registry: &mut IdentityRegistry,
        state_count: usize,
        id: ObjectId,
        label: &str,
    ) -> Result<Self, ModelError> {
        registry.register(id, ObjectKind::MarkovModel, label)?;
        Self::build(registry, Graph::empty(id, label), state_count)
    }

    /// Populates `graph` with the state nodes and the complete transition wiring.
    pub(crate) fn build(
        registry: &mut IdentityRegistry,
        mut graph: Graph<Vertex<T>>,
        state_count: usize,
    ) -> Result<Self, ModelError> {
        let mut state_nodes = Vec::with_capacity(state_count);
        for i in 0..state_count {
            let node = Node::new(
                registry,
                &format!("state_{}", i),
                Vertex::State(State::default()),
            );
            state_nodes.push(node.id);
            let _ = graph.add_node(node);
        }

        // Complete wiring makes most bi-connections partial (the reverse
        // direction already exists); the edges are created regardless.
        let mut transition_edges = Vec::with_capacity(state_count * state_count);
        for &from in &state_nodes {
            for &to in &state_nodes {
                let (_, edge) = graph.bi_connect(registry, from, to, 0.0)?;
                transition_edges.push(edge);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            model = graph.id().0,
            states = state_count,
            edges = transition_edges.len(),
            "built markov chain"
        );

        Ok(Self {
            graph,
            state_nodes,
            transition_edges,
            transitions: ProbabilityMatrix::zeros(state_count, state_count),
        })
    }

    pub fn id(&self) -> ObjectId {
        self.graph.id()
    }

    pub fn label(&self) -> &str {
        self.graph.label()
    }

    pub fn state_count(&self) -> usize {
        self.state_nodes.len()
    }

    /// The underlying graph (state nodes, plus observation nodes for an HMM).
    pub fn graph(&self) -> &Graph<Vertex<T>> {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut Graph<Vertex<T>> {
        &mut self.graph
    }

    /// Removes the model and every node and edge of its graph from `registry`.
    ///
    /// Returns how many entries were forgotten. The model itself is left as
    /// is; ids it holds are simply no longer known to the registry.
    pub fn unregister(&self, registry: &mut IdentityRegistry) -> usize {
        let nodes = self.graph.nodes().iter().map(|n| ObjectId::from(n.id));
        let edges = self.graph.edges().iter().map(|e| ObjectId::from(e.id));
        let forgotten = std::iter::once(self.id())
            .chain(nodes)
            .chain(edges)
            .filter(|&id| registry.forget(id).is_some())
            .count();

        #[cfg(feature = "tracing")]
        tracing::debug!(model = self.id().0, forgotten, "unregistered model");
        forgotten
    }

    // ------------------------------------------------------------------
    // States
    // ------------------------------------------------------------------

    fn state_node_id(&self, index: usize) -> Result<NodeId, ModelError> {
        self.state_nodes
            .get(index)
            .copied()
            .ok_or_else(|| ModelError::out_of_range("state", index, self.state_count()))
    }

    pub(crate) fn state_node_ids(&self) -> &[NodeId] {
        &self.state_nodes
    }

    pub fn state_node(&self, index: usize) -> Result<&Node<Vertex<T>>, ModelError> {
        let id = self.state_node_id(index)?;
        self.graph
            .node(id)
            .ok_or_else(|| ModelError::NotFound(format!("state node {}", index)))
    }

    pub fn state(&self, index: usize) -> Result<&State, ModelError> {
        self.state_node(index)?
            .value
            .as_state()
            .ok_or_else(|| ModelError::NotFound(format!("state value at {}", index)))
    }

    /// Index of the first state named `name`.
    pub fn state_index(&self, name: &str) -> Result<usize, ModelError> {
        (0..self.state_count())
            .find(|&i| self.state(i).map(|s| s.name == name).unwrap_or(false))
            .ok_or_else(|| ModelError::NotFound(format!("state '{}'", name)))
    }

    pub fn state_by_name(&self, name: &str) -> Result<&State, ModelError> {
        self.state(self.state_index(name)?)
    }

    /// Replaces state `index` with `state`.
    ///
    /// The node is swapped for a structural copy carrying the new value; the
    /// previous value is never mutated in place.
    pub fn set_state(&mut self, index: usize, state: State) -> Result<(), ModelError> {
        let id = self.state_node_id(index)?;
        self.graph.replace_node_value(id, Vertex::State(state))
    }

    pub fn set_state_by_name(&mut self, name: &str, state: State) -> Result<(), ModelError> {
        let index = self.state_index(name)?;
        self.set_state(index, state)
    }

    pub fn start_probability(&self, index: usize) -> Result<f64, ModelError> {
        Ok(self.state(index)?.start_probability)
    }

    pub fn set_start_probability(
        &mut self,
        index: usize,
        probability: f64,
    ) -> Result<(), ModelError> {
        let mut state = self.state(index)?.clone();
        state.start_probability = probability;
        self.set_state(index, state)
    }

    /// Start probabilities in state order.
    pub fn start_probabilities(&self) -> Vec<f64> {
        (0..self.state_count())
            .map(|i| self.start_probability(i).unwrap_or(0.0))
            .collect()
    }

    /// Sets every start probability, naming unnamed states `State_<i>`.
    pub fn set_states(&mut self, start_probabilities: &[f64]) -> Result<(), ModelError> {
        let names: Vec<String> = (0..self.state_count()).map(|i| format!("State_{}", i)).collect();
        self.set_states_named(start_probabilities, &names)
    }

    /// Sets every start probability and names the states.
    ///
    /// A state that already has a name keeps it; `names[i]` only applies to
    /// unnamed states.
    ///
    /// # Errors
    ///
    /// * `ModelError::DimensionMismatch` - either slice length differs from the
    ///   state count (nothing is changed)
    pub fn set_states_named<S: AsRef<str>>(
        &mut self,
        start_probabilities: &[f64],
        names: &[S],
    ) -> Result<(), ModelError> {
        let n = self.state_count();
        if start_probabilities.len() != n {
            return Err(ModelError::dimension("start probabilities", n, start_probabilities.len()));
        }
        if names.len() != n {
            return Err(ModelError::dimension("state names", n, names.len()));
        }
        for (i, (&p, name)) in start_probabilities.iter().zip(names).enumerate() {
            let current = self.state(i)?;
            let name = if current.is_named() {
                current.name.clone()
            } else {
                name.as_ref().to_string()
            };
            self.set_state(i, State::new(p, name))?;
        }
        Ok(())
    }

    /// Sets start probabilities and names from whole states.
    pub fn set_states_from(&mut self, states: &[State]) -> Result<(), ModelError> {
        let probabilities: Vec<f64> = states.iter().map(|s| s.start_probability).collect();
        let names: Vec<&str> = states.iter().map(|s| s.name.as_str()).collect();
        self.set_states_named(&probabilities, &names)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn check_transition(&self, from: usize, to: usize) -> Result<(), ModelError> {
        let n = self.state_count();
        if from >= n {
            return Err(ModelError::out_of_range("transition source", from, n));
        }
        if to >= n {
            return Err(ModelError::out_of_range("transition target", to, n));
        }
        Ok(())
    }

    pub fn transition(&self, from: usize, to: usize) -> Result<f64, ModelError> {
        self.check_transition(from, to)?;
        Ok(self.transitions[(from, to)])
    }

    pub fn set_transition(
        &mut self,
        from: usize,
        to: usize,
        probability: f64,
    ) -> Result<(), ModelError> {
        self.check_transition(from, to)?;
        self.transitions[(from, to)] = probability;
        Ok(())
    }

    /// Transition probability by row-major flat index `from * N + to`.
    pub fn transition_at(&self, index: usize) -> Result<f64, ModelError> {
        self.transitions
            .as_slice()
            .get(index)
            .copied()
            .ok_or_else(|| ModelError::out_of_range("transition", index, self.transitions.len()))
    }

    pub fn set_transition_at(&mut self, index: usize, probability: f64) -> Result<(), ModelError> {
        let n = self.state_count().max(1);
        let len = self.transitions.len();
        if index >= len {
            return Err(ModelError::out_of_range("transition", index, len));
        }
        self.transitions[(index / n, index % n)] = probability;
        Ok(())
    }

    pub fn transition_by_name(&self, from: &str, to: &str) -> Result<f64, ModelError> {
        let (i, j) = (self.state_index(from)?, self.state_index(to)?);
        self.transition(i, j)
    }

    pub fn set_transition_by_name(
        &mut self,
        from: &str,
        to: &str,
        probability: f64,
    ) -> Result<(), ModelError> {
        let (i, j) = (self.state_index(from)?, self.state_index(to)?);
        self.set_transition(i, j, probability)
    }

    /// Overwrites the whole transition table.
    ///
    /// # Errors
    ///
    /// * `ModelError::DimensionMismatch` - `matrix` is not `N × N` (nothing is
    ///   changed)
    pub fn set_transitions<R: AsRef<[f64]>>(&mut self, matrix: &[R]) -> Result<(), ModelError> {
        self.transitions.assign_rows(matrix, "transitions")
    }

    pub fn transitions(&self) -> &ProbabilityMatrix {
        &self.transitions
    }

    pub(crate) fn transitions_mut(&mut self) -> &mut ProbabilityMatrix {
        &mut self.transitions
    }

    /// The graph edge wired for `from → to`.
    ///
    /// The edge is structural and its cost stays 0; read the probability with
    /// [`transition`](Self::transition).
    pub fn transition_edge(&self, from: usize, to: usize) -> Result<&Edge, ModelError> {
        self.check_transition(from, to)?;
        let id = self.transition_edges[from * self.state_count() + to];
        self.graph
            .edge(id)
            .ok_or_else(|| ModelError::NotFound(format!("transition edge {} -> {}", from, to)))
    }

    // ------------------------------------------------------------------
    // Verification
    // ------------------------------------------------------------------

    /// Whether start probabilities and every transition row sum to one
    /// (within [`DEFAULT_CHECK_TOLERANCE`]).
    pub fn check_values(&self) -> bool {
        self.check_values_within(DEFAULT_CHECK_TOLERANCE)
    }

    pub fn check_values_within(&self, tolerance: f64) -> bool {
        if let Err(_sum) = sums_to_one(self.start_probabilities(), tolerance) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                model = self.id().0,
                sum = _sum,
                "start probabilities do not sum to one"
            );
            return false;
        }
        for i in 0..self.state_count() {
            let row = self.transitions.row(i).unwrap_or(&[]);
            if let Err(_sum) = sums_to_one(row.iter().copied(), tolerance) {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    model = self.id().0,
                    state = i,
                    sum = _sum,
                    "transition row does not sum to one"
                );
                return false;
            }
        }
        true
    }
}
