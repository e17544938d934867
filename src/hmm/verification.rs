//! Consistency checks on model parameters.

use super::HiddenMarkovModel;
use crate::engine::errors::ModelError;
use crate::markov::matrix::{sums_to_one, ProbabilityMatrix, DEFAULT_CHECK_TOLERANCE};

impl<T> HiddenMarkovModel<T> {
    /// Whether start probabilities, every transition row, and every emission
    /// row sum to one within [`DEFAULT_CHECK_TOLERANCE`].
    ///
    /// Reports only; nothing is normalized.
    pub fn check_values(&self) -> bool {
        self.check_values_within(DEFAULT_CHECK_TOLERANCE)
    }

    pub fn check_values_within(&self, tolerance: f64) -> bool {
        if !self.chain.check_values_within(tolerance) {
            return false;
        }
        for i in 0..self.state_count() {
            let row = self.emissions.row(i).unwrap_or(&[]);
            if let Err(_sum) = sums_to_one(row.iter().copied(), tolerance) {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    model = self.id().0,
                    state = i,
                    sum = _sum,
                    "emission row does not sum to one"
                );
                return false;
            }
        }
        true
    }

    /// Validates numerical health of every probability.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<String>)` - warnings for distributions that do not sum to one
    ///   (empty if none)
    /// - `Err(ModelError::Numerical)` - a probability is NaN, infinite, or
    ///   negative
    pub fn validate_numerical_stability(&self) -> Result<Vec<String>, ModelError> {
        let mut warnings = Vec::new();

        let start = self.start_probabilities();
        check_finite_non_negative("start probability", &start)?;
        if let Err(sum) = sums_to_one(start.iter().copied(), DEFAULT_CHECK_TOLERANCE) {
            warnings.push(format!("start probabilities sum to {:.6}", sum));
        }

        for (what, matrix) in [("transition", self.transitions()), ("emission", &self.emissions)] {
            check_finite_non_negative(what, matrix.as_slice())?;
            warnings.extend(row_warnings(what, matrix));
        }

        Ok(warnings)
    }
}

fn check_finite_non_negative(what: &str, values: &[f64]) -> Result<(), ModelError> {
    for (idx, &p) in values.iter().enumerate() {
        if !p.is_finite() {
            return Err(ModelError::Numerical(format!("{} {} is non-finite: {}", what, idx, p)));
        }
        if p < 0.0 {
            return Err(ModelError::Numerical(format!("{} {} is negative: {}", what, idx, p)));
        }
    }
    Ok(())
}

fn row_warnings(what: &str, matrix: &ProbabilityMatrix) -> Vec<String> {
    (0..matrix.rows())
        .filter_map(|i| {
            let row = matrix.row(i)?;
            sums_to_one(row.iter().copied(), DEFAULT_CHECK_TOLERANCE)
                .err()
                .map(|sum| format!("{} row {} sums to {:.6}", what, i, sum))
        })
        .collect()
}
