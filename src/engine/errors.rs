//! Error types for graph and model operations.

use thiserror::Error;

use crate::engine::registry::ObjectId;

/// Errors that can occur while building, querying, or training a model.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes.
///
/// Every lookup and every setter reports an unresolved index, name, or symbol
/// the same way, through [`ModelError::NotFound`] or [`ModelError::OutOfRange`].
/// Numerical trouble during learning is *not* an error: the EM loop reports it
/// as a stop reason instead.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A state name, observation symbol, node, or edge could not be resolved.
    #[error("not found: {0}")]
    NotFound(String),

    /// An index addressed past the end of a fixed-size collection.
    #[error("{what} index {index} out of range (len {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Input arrays did not match the model's fixed topology.
    #[error("{what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// An explicit identifier was already registered.
    #[error("duplicate id: {0}")]
    DuplicateId(ObjectId),

    /// Numerical stability error (NaN/Inf or negative probabilities).
    #[error("numerical error: {0}")]
    Numerical(String),
}

impl ModelError {
    pub(crate) fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        ModelError::OutOfRange { what, index, len }
    }

    pub(crate) fn dimension(what: &'static str, expected: usize, found: usize) -> Self {
        ModelError::DimensionMismatch { what, expected, found }
    }
}
