//! Sequence likelihood.

use super::trellis::terminal_sum;
use super::HiddenMarkovModel;
use crate::engine::errors::ModelError;

/// Which pass computes the likelihood.
///
/// All three agree (up to rounding) on a valid model; they differ in which
/// tables they build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvaluationMode {
    /// Σ_i α[T-1, i]
    #[default]
    Forward,
    /// Σ_i β[0, i] · start[i] · e[i, o0]
    Backward,
    /// Σ_j α[at, j] · β[at, j]
    ForwardBackward { at: usize },
}

impl<T: PartialEq> HiddenMarkovModel<T> {
    /// Probability that the model generates `observations`.
    ///
    /// An empty sequence evaluates to 0.
    ///
    /// # Errors
    ///
    /// * `ModelError::NotFound` - a symbol is not in the alphabet
    /// * `ModelError::OutOfRange` - `ForwardBackward { at }` with `at >= T`
    pub fn evaluate(&self, observations: &[T], mode: EvaluationMode) -> Result<f64, ModelError> {
        if observations.is_empty() {
            return Ok(0.0);
        }
        let encoded = self.encode(observations)?;
        let params = self.parameters();

        let likelihood = match mode {
            EvaluationMode::Forward => terminal_sum(&params.forward(&encoded)),
            EvaluationMode::Backward => {
                let beta = params.backward(&encoded);
                let first = encoded[0];
                (0..params.states())
                    .map(|i| beta[(0, i)] * params.start[i] * params.emissions[(i, first)])
                    .sum()
            }
            EvaluationMode::ForwardBackward { at } => {
                if at >= encoded.len() {
                    return Err(ModelError::out_of_range("time step", at, encoded.len()));
                }
                let alpha = params.forward(&encoded);
                let beta = params.backward(&encoded);
                (0..params.states()).map(|j| alpha[(at, j)] * beta[(at, j)]).sum()
            }
        };
        Ok(likelihood)
    }

    /// Shortcut for [`EvaluationMode::Forward`].
    pub fn evaluate_forward(&self, observations: &[T]) -> Result<f64, ModelError> {
        self.evaluate(observations, EvaluationMode::Forward)
    }
}
