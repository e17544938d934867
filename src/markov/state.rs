//! Values attached to the nodes of a model graph.

/// A hidden state: its display name and the probability of starting in it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    pub name: String,
    pub start_probability: f64,
}

impl State {
    pub fn new(start_probability: f64, name: impl Into<String>) -> Self {
        Self { name: name.into(), start_probability }
    }

    /// Whether a name has been assigned yet.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Value carried by a node of a model graph.
///
/// State nodes and observation nodes share one graph, so the node value is a
/// tagged union. Observation nodes start out without a symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum Vertex<T> {
    State(State),
    Observation(Option<T>),
}

impl<T> Vertex<T> {
    pub fn as_state(&self) -> Option<&State> {
        match self {
            Vertex::State(s) => Some(s),
            Vertex::Observation(_) => None,
        }
    }

    /// The symbol of an observation node, if one has been assigned.
    pub fn as_observation(&self) -> Option<&T> {
        match self {
            Vertex::Observation(symbol) => symbol.as_ref(),
            Vertex::State(_) => None,
        }
    }

    pub fn is_state(&self) -> bool {
        matches!(self, Vertex::State(_))
    }
}
