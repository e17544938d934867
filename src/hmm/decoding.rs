//! Most likely hidden state path (Viterbi).

use super::HiddenMarkovModel;
use crate::engine::errors::ModelError;
use crate::markov::matrix::ProbabilityMatrix;

impl<T: PartialEq> HiddenMarkovModel<T> {
    /// The hidden state path most likely to have produced `observations`.
    ///
    /// Ties go to the lowest state index. An empty sequence decodes to an
    /// empty path.
    ///
    /// # Errors
    ///
    /// * `ModelError::NotFound` - a symbol is not in the alphabet, or the model
    ///   has no hidden states
    pub fn decode(&self, observations: &[T]) -> Result<Vec<usize>, ModelError> {
        self.decode_with_score(observations).map(|(path, _)| path)
    }

    /// Like [`decode`](Self::decode), also returning the probability of the
    /// winning path (max δ[T-1]).
    pub fn decode_with_score(&self, observations: &[T]) -> Result<(Vec<usize>, f64), ModelError> {
        if observations.is_empty() {
            return Ok((Vec::new(), 0.0));
        }
        let encoded = self.encode(observations)?;
        let params = self.parameters();
        let n = params.states();
        if n == 0 {
            return Err(ModelError::NotFound("hidden states to decode into".to_string()));
        }
        let len = encoded.len();

        let mut delta = ProbabilityMatrix::zeros(len, n);
        let mut psi = vec![0usize; len * n];

        for i in 0..n {
            delta[(0, i)] = params.start[i] * params.emissions[(i, encoded[0])];
        }
        for t in 1..len {
            for j in 0..n {
                let (best, score) =
                    argmax((0..n).map(|k| delta[(t - 1, k)] * params.transitions[(k, j)]));
                delta[(t, j)] = score * params.emissions[(j, encoded[t])];
                psi[t * n + j] = best;
            }
        }

        let (last, score) = argmax((0..n).map(|i| delta[(len - 1, i)]));
        let mut path = vec![0usize; len];
        path[len - 1] = last;
        for t in (0..len - 1).rev() {
            path[t] = psi[(t + 1) * n + path[t + 1]];
        }
        Ok((path, score))
    }
}

/// Index and value of the first strict maximum, scanning from index 0.
fn argmax(values: impl Iterator<Item = f64>) -> (usize, f64) {
    let mut best = (0, f64::NEG_INFINITY);
    for (k, v) in values.enumerate() {
        if k == 0 || v > best.1 {
            best = (k, v);
        }
    }
    best
}
