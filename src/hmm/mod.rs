//! # Hidden Markov models
//!
//! A [`HiddenMarkovModel`] extends a [`MarkovModel`] with `M` observation nodes
//! and a complete set of emission edges from every state to every observation.
//! Emission edge `i → k` sits at flat position `i * M + k`, aligned with the
//! emission [`ProbabilityMatrix`].
//!
//! ## Algorithms
//!
//! - **evaluation**: sequence likelihood by forward, backward, or combined pass
//! - **decoding**: most likely hidden state path (Viterbi)
//! - **learning**: Baum-Welch re-estimation of all parameters
//! - **verification**: stochastic row checks and numerical health report
//!
//! Every algorithm first maps the observed symbols to alphabet indices, so a
//! symbol outside the alphabet fails fast with `ModelError::NotFound` and the
//! numeric passes never compare symbols.

mod decoding;
mod evaluation;
mod learning;
mod trellis;
mod verification;

pub use evaluation::EvaluationMode;
pub use learning::{LearningConfig, LearningReport, StopReason, DEFAULT_EMISSION_FLOOR};

use crate::engine::errors::ModelError;
use crate::engine::graph::{Edge, EdgeId, Graph, Node, NodeId};
use crate::engine::registry::{IdentityRegistry, ObjectId, ObjectKind};
use crate::markov::chain::MarkovModel;
use crate::markov::matrix::ProbabilityMatrix;
use crate::markov::state::{State, Vertex};

use trellis::Parameters;

/// A hidden Markov model over `N` hidden states and an alphabet of `M`
/// observation symbols of type `T`.
#[derive(Debug, Clone)]
pub struct HiddenMarkovModel<T> {
    chain: MarkovModel<T>,
    observation_nodes: Vec<NodeId>,
    /// Row-major, `i * M + k` is the edge `state i → observation k`
    emission_edges: Vec<EdgeId>,
    emissions: ProbabilityMatrix,
}

impl<T> HiddenMarkovModel<T> {
    /// Builds an unlabeled model with `state_count` hidden states and
    /// `observation_count` observation slots, every probability at 0.
    pub fn new(
        registry: &mut IdentityRegistry,
        state_count: usize,
        observation_count: usize,
    ) -> Result<Self, ModelError> {
        Self::with_label(registry, state_count, observation_count, "")
    }

    /// Like [`new`](Self::new), registering the model under `label`.
    pub fn with_label(
        registry: &mut IdentityRegistry,
        state_count: usize,
        observation_count: usize,
        label: &str,
    ) -> Result<Self, ModelError> {
        let id = registry.allocate(ObjectKind::HiddenMarkovModel, label);
        Self::build(registry, Graph::empty(id, label), state_count, observation_count)
    }

    /// Builds a model registered under a caller-chosen id.
    ///
    /// # Errors
    ///
    /// * `ModelError::DuplicateId` - the id is already registered
    pub fn with_id(
        registry: &mut IdentityRegistry,
        state_count: usize,
        observation_count: usize,
        id: ObjectId,
        label: &str,
    ) -> Result<Self, ModelError> {
        registry.register(id, ObjectKind::HiddenMarkovModel, label)?;
        Self::build(registry, Graph::empty(id, label), state_count, observation_count)
    }

    fn build(
        registry: &mut IdentityRegistry,
        graph: Graph<Vertex<T>>,
        state_count: usize,
        observation_count: usize,
    ) -> Result<Self, ModelError> {
        let mut chain = MarkovModel::build(registry, graph, state_count)?;

        let mut observation_nodes = Vec::with_capacity(observation_count);
        for k in 0..observation_count {
            let label = format!("observation_{}", k);
            let node = Node::new(registry, &label, Vertex::Observation(None));
            observation_nodes.push(node.id);
            let _ = chain.graph_mut().add_node(node);
        }

        let state_nodes = chain.state_node_ids().to_vec();
        let mut emission_edges = Vec::with_capacity(state_count * observation_count);
        for &state in &state_nodes {
            for &observation in &observation_nodes {
                let (_, edge) = chain.graph_mut().bi_connect(registry, state, observation, 0.0)?;
                emission_edges.push(edge);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            model = chain.id().0,
            states = state_count,
            observations = observation_count,
            "built hidden markov model"
        );

        Ok(Self {
            chain,
            observation_nodes,
            emission_edges,
            emissions: ProbabilityMatrix::zeros(state_count, observation_count),
        })
    }

    /// The underlying Markov chain over the hidden states.
    pub fn chain(&self) -> &MarkovModel<T> {
        &self.chain
    }

    /// Size `M` of the observation alphabet.
    pub fn observation_count(&self) -> usize {
        self.observation_nodes.len()
    }

    pub(crate) fn parameters(&self) -> Parameters<'_> {
        Parameters {
            start: self.chain.start_probabilities(),
            transitions: self.chain.transitions(),
            emissions: &self.emissions,
        }
    }

    // ------------------------------------------------------------------
    // Forwarded chain API
    // ------------------------------------------------------------------

    pub fn id(&self) -> ObjectId {
        self.chain.id()
    }

    pub fn label(&self) -> &str {
        self.chain.label()
    }

    /// The underlying graph: state nodes first, then observation nodes.
    pub fn graph(&self) -> &Graph<Vertex<T>> {
        self.chain.graph()
    }

    /// Number `N` of hidden states.
    pub fn state_count(&self) -> usize {
        self.chain.state_count()
    }

    /// Removes the model and every node and edge it built from `registry`.
    ///
    /// See [`MarkovModel::unregister`].
    pub fn unregister(&self, registry: &mut IdentityRegistry) -> usize {
        self.chain.unregister(registry)
    }

    /// The graph node of hidden state `index`.
    pub fn state_node(&self, index: usize) -> Result<&Node<Vertex<T>>, ModelError> {
        self.chain.state_node(index)
    }

    /// Hidden state `index`.
    pub fn state(&self, index: usize) -> Result<&State, ModelError> {
        self.chain.state(index)
    }

    /// Index of the first hidden state named `name`.
    pub fn state_index(&self, name: &str) -> Result<usize, ModelError> {
        self.chain.state_index(name)
    }

    /// First hidden state named `name`.
    pub fn state_by_name(&self, name: &str) -> Result<&State, ModelError> {
        self.chain.state_by_name(name)
    }

    /// Replaces hidden state `index`; see [`MarkovModel::set_state`].
    pub fn set_state(&mut self, index: usize, state: State) -> Result<(), ModelError> {
        self.chain.set_state(index, state)
    }

    /// Replaces the first hidden state named `name`.
    pub fn set_state_by_name(&mut self, name: &str, state: State) -> Result<(), ModelError> {
        self.chain.set_state_by_name(name, state)
    }

    /// Start probability of hidden state `index`.
    pub fn start_probability(&self, index: usize) -> Result<f64, ModelError> {
        self.chain.start_probability(index)
    }

    /// Sets the start probability of hidden state `index`, keeping its name.
    pub fn set_start_probability(
        &mut self,
        index: usize,
        probability: f64,
    ) -> Result<(), ModelError> {
        self.chain.set_start_probability(index, probability)
    }

    /// Start probabilities in state order.
    pub fn start_probabilities(&self) -> Vec<f64> {
        self.chain.start_probabilities()
    }

    /// See [`MarkovModel::set_states`].
    pub fn set_states(&mut self, start_probabilities: &[f64]) -> Result<(), ModelError> {
        self.chain.set_states(start_probabilities)
    }

    /// See [`MarkovModel::set_states_named`].
    pub fn set_states_named<S: AsRef<str>>(
        &mut self,
        start_probabilities: &[f64],
        names: &[S],
    ) -> Result<(), ModelError> {
        self.chain.set_states_named(start_probabilities, names)
    }

    /// See [`MarkovModel::set_states_from`].
    pub fn set_states_from(&mut self, states: &[State]) -> Result<(), ModelError> {
        self.chain.set_states_from(states)
    }

    /// Transition probability `from → to`.
    pub fn transition(&self, from: usize, to: usize) -> Result<f64, ModelError> {
        self.chain.transition(from, to)
    }

    /// Transition probability by row-major flat index `from * N + to`.
    pub fn transition_at(&self, index: usize) -> Result<f64, ModelError> {
        self.chain.transition_at(index)
    }

    /// Transition probability between the states named `from` and `to`.
    pub fn transition_by_name(&self, from: &str, to: &str) -> Result<f64, ModelError> {
        self.chain.transition_by_name(from, to)
    }

    pub fn set_transition(
        &mut self,
        from: usize,
        to: usize,
        probability: f64,
    ) -> Result<(), ModelError> {
        self.chain.set_transition(from, to, probability)
    }

    pub fn set_transition_at(&mut self, index: usize, probability: f64) -> Result<(), ModelError> {
        self.chain.set_transition_at(index, probability)
    }

    pub fn set_transition_by_name(
        &mut self,
        from: &str,
        to: &str,
        probability: f64,
    ) -> Result<(), ModelError> {
        self.chain.set_transition_by_name(from, to, probability)
    }

    /// Overwrites the whole transition table; see [`MarkovModel::set_transitions`].
    pub fn set_transitions<R: AsRef<[f64]>>(&mut self, matrix: &[R]) -> Result<(), ModelError> {
        self.chain.set_transitions(matrix)
    }

    /// The `N × N` transition table.
    pub fn transitions(&self) -> &ProbabilityMatrix {
        self.chain.transitions()
    }

    /// The structural graph edge for `from → to`; see [`MarkovModel::transition_edge`].
    pub fn transition_edge(&self, from: usize, to: usize) -> Result<&Edge, ModelError> {
        self.chain.transition_edge(from, to)
    }

    // ------------------------------------------------------------------
    // Observations
    // ------------------------------------------------------------------

    fn observation_node_id(&self, index: usize) -> Result<NodeId, ModelError> {
        self.observation_nodes
            .get(index)
            .copied()
            .ok_or_else(|| ModelError::out_of_range("observation", index, self.observation_count()))
    }

    /// The graph node of observation slot `index`.
    pub fn observation_node(&self, index: usize) -> Result<&Node<Vertex<T>>, ModelError> {
        let id = self.observation_node_id(index)?;
        self.chain
            .graph()
            .node(id)
            .ok_or_else(|| ModelError::NotFound(format!("observation node {}", index)))
    }

    /// The symbol of observation `index`, `None` until one is assigned.
    pub fn observation(&self, index: usize) -> Result<Option<&T>, ModelError> {
        Ok(self.observation_node(index)?.value.as_observation())
    }

    /// Assigns the symbol of observation slot `index`.
    pub fn set_observation(&mut self, index: usize, symbol: T) -> Result<(), ModelError> {
        let id = self.observation_node_id(index)?;
        self.chain.graph_mut().replace_node_value(id, Vertex::Observation(Some(symbol)))
    }

    // ------------------------------------------------------------------
    // Emissions
    // ------------------------------------------------------------------

    fn check_emission(&self, state: usize, observation: usize) -> Result<(), ModelError> {
        if state >= self.state_count() {
            return Err(ModelError::out_of_range("emission state", state, self.state_count()));
        }
        if observation >= self.observation_count() {
            return Err(ModelError::out_of_range(
                "emission observation",
                observation,
                self.observation_count(),
            ));
        }
        Ok(())
    }

    /// Probability that hidden state `state` emits observation `observation`.
    pub fn emission(&self, state: usize, observation: usize) -> Result<f64, ModelError> {
        self.check_emission(state, observation)?;
        Ok(self.emissions[(state, observation)])
    }

    pub fn set_emission(
        &mut self,
        state: usize,
        observation: usize,
        probability: f64,
    ) -> Result<(), ModelError> {
        self.check_emission(state, observation)?;
        self.emissions[(state, observation)] = probability;
        Ok(())
    }

    /// Emission probability by row-major flat index `state * M + observation`.
    pub fn emission_at(&self, index: usize) -> Result<f64, ModelError> {
        self.emissions
            .as_slice()
            .get(index)
            .copied()
            .ok_or_else(|| ModelError::out_of_range("emission", index, self.emissions.len()))
    }

    /// Sets an emission probability by row-major flat index.
    pub fn set_emission_at(&mut self, index: usize, probability: f64) -> Result<(), ModelError> {
        let len = self.emissions.len();
        if index >= len {
            return Err(ModelError::out_of_range("emission", index, len));
        }
        let m = self.observation_count();
        self.emissions[(index / m, index % m)] = probability;
        Ok(())
    }

    /// Overwrites the whole emission table.
    ///
    /// # Errors
    ///
    /// * `ModelError::DimensionMismatch` - `matrix` is not `N × M` (nothing is
    ///   changed)
    pub fn set_emissions<R: AsRef<[f64]>>(&mut self, matrix: &[R]) -> Result<(), ModelError> {
        self.emissions.assign_rows(matrix, "emissions")
    }

    /// The `N × M` emission table.
    pub fn emissions(&self) -> &ProbabilityMatrix {
        &self.emissions
    }

    pub(crate) fn emissions_mut(&mut self) -> &mut ProbabilityMatrix {
        &mut self.emissions
    }

    pub(crate) fn transitions_mut(&mut self) -> &mut ProbabilityMatrix {
        self.chain.transitions_mut()
    }

    /// The graph edge wired for `state → observation`.
    ///
    /// The edge is structural and its cost stays 0; read the probability with
    /// [`emission`](Self::emission).
    pub fn emission_edge(&self, state: usize, observation: usize) -> Result<&Edge, ModelError> {
        self.check_emission(state, observation)?;
        let id = self.emission_edges[state * self.observation_count() + observation];
        self.chain.graph().edge(id).ok_or_else(|| {
            ModelError::NotFound(format!("emission edge {} -> {}", state, observation))
        })
    }
}

impl<T: PartialEq> HiddenMarkovModel<T> {
    /// Index of the first observation slot holding `symbol`.
    pub fn observation_index(&self, symbol: &T) -> Result<usize, ModelError> {
        (0..self.observation_count())
            .find(|&k| matches!(self.observation(k), Ok(Some(s)) if s == symbol))
            .ok_or_else(|| ModelError::NotFound("observation symbol not in alphabet".to_string()))
    }

    /// Emission probability of `symbol` from hidden state `state`.
    pub fn emission_for(&self, state: usize, symbol: &T) -> Result<f64, ModelError> {
        let k = self.observation_index(symbol)?;
        self.emission(state, k)
    }

    pub fn set_emission_for(
        &mut self,
        state: usize,
        symbol: &T,
        probability: f64,
    ) -> Result<(), ModelError> {
        let k = self.observation_index(symbol)?;
        self.set_emission(state, k, probability)
    }

    /// Emission probability of `symbol` from the hidden state named `state`.
    pub fn emission_by_name(&self, state: &str, symbol: &T) -> Result<f64, ModelError> {
        let (i, k) = (self.state_index(state)?, self.observation_index(symbol)?);
        self.emission(i, k)
    }

    pub fn set_emission_by_name(
        &mut self,
        state: &str,
        symbol: &T,
        probability: f64,
    ) -> Result<(), ModelError> {
        let (i, k) = (self.state_index(state)?, self.observation_index(symbol)?);
        self.set_emission(i, k, probability)
    }

    /// Maps a sequence of symbols to alphabet indices.
    ///
    /// # Errors
    ///
    /// * `ModelError::NotFound` - a symbol is not in the alphabet
    pub(crate) fn encode(&self, observations: &[T]) -> Result<Vec<usize>, ModelError> {
        observations.iter().map(|o| self.observation_index(o)).collect()
    }
}

impl<T: Clone> HiddenMarkovModel<T> {
    /// Assigns the whole alphabet, one symbol per observation slot.
    ///
    /// # Errors
    ///
    /// * `ModelError::DimensionMismatch` - `symbols.len()` differs from the
    ///   observation count (nothing is changed)
    pub fn set_observations(&mut self, symbols: &[T]) -> Result<(), ModelError> {
        let m = self.observation_count();
        if symbols.len() != m {
            return Err(ModelError::dimension("observations", m, symbols.len()));
        }
        for (k, symbol) in symbols.iter().enumerate() {
            self.set_observation(k, symbol.clone())?;
        }
        Ok(())
    }

    /// Assigns the whole alphabet and replaces every hidden state in one call.
    ///
    /// Each state is overwritten as given, name included, so an existing name
    /// does not survive as it does with [`set_states_from`](Self::set_states_from).
    ///
    /// # Errors
    ///
    /// * `ModelError::DimensionMismatch` - `symbols` is not `M` long or `states`
    ///   is not `N` long (nothing is changed)
    pub fn set_observations_with_states(
        &mut self,
        symbols: &[T],
        states: &[State],
    ) -> Result<(), ModelError> {
        let n = self.state_count();
        if states.len() != n {
            return Err(ModelError::dimension("states", n, states.len()));
        }
        self.set_observations(symbols)?;
        for (i, state) in states.iter().enumerate() {
            self.set_state(i, state.clone())?;
        }
        Ok(())
    }
}
