//! # hmmgraph - Markov Models on a Directed Graph
//!
//! hmmgraph builds discrete Markov chains and hidden Markov models on top of a
//! generic directed graph, and runs the classic HMM algorithms on them.
//!
//! ## Architecture
//!
//! The crate is organized into three modules:
//!
//! - **engine**: Graph core, identity registry, status and error types
//! - **markov**: Markov chains, state values, and probability tables
//! - **hmm**: Hidden Markov models with evaluation (forward, backward),
//!   decoding (Viterbi), learning (Baum-Welch), and verification
//!
//! Every node, edge, and model receives an id from an [`IdentityRegistry`]
//! that the caller owns and passes to constructors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hmmgraph::{EvaluationMode, HiddenMarkovModel, IdentityRegistry};
//!
//! let mut reg = IdentityRegistry::new();
//! let mut hmm = HiddenMarkovModel::new(&mut reg, 2, 2)?;
//! hmm.set_states_named(&[1.0, 0.0], &["Samedi", "Dimanche"])?;
//! hmm.set_transitions(&[[0.5, 0.5], [0.0, 1.0]])?;
//! hmm.set_observations(&["Soleil", "Pluie"])?;
//! hmm.set_emissions(&[[0.3, 0.7], [0.8, 0.2]])?;
//!
//! let seq = ["Soleil", "Pluie", "Pluie", "Soleil"];
//! let p = hmm.evaluate(&seq, EvaluationMode::Forward)?;
//! let path = hmm.decode(&seq)?;
//! ```

#![forbid(unsafe_code)]

pub mod engine;
pub mod hmm;
pub mod markov;

// Re-export commonly used types
pub use engine::errors::ModelError;
pub use engine::graph::{Edge, EdgeId, Graph, Node, NodeId};
pub use engine::registry::{IdentityRegistry, ObjectId, ObjectKind, RegistryEntry};
pub use engine::status::Status;
pub use hmm::{
    EvaluationMode, HiddenMarkovModel, LearningConfig, LearningReport, StopReason,
    DEFAULT_EMISSION_FLOOR,
};
pub use markov::chain::MarkovModel;
pub use markov::matrix::{ProbabilityMatrix, DEFAULT_CHECK_TOLERANCE};
pub use markov::state::{State, Vertex};
