//! Forward and backward lattices over an encoded observation sequence.
//!
//! Both passes produce a `T × N` table (time by hidden state). Sequences are
//! already mapped to alphabet indices, so every lookup here is positional.

use crate::markov::matrix::ProbabilityMatrix;

/// Borrowed view of the three parameter sets of a model.
pub(crate) struct Parameters<'a> {
    pub start: Vec<f64>,
    pub transitions: &'a ProbabilityMatrix,
    pub emissions: &'a ProbabilityMatrix,
}

impl Parameters<'_> {
    pub fn states(&self) -> usize {
        self.start.len()
    }

    /// α[t, i]: probability of the first `t + 1` symbols ending in state `i`.
    pub fn forward(&self, observations: &[usize]) -> ProbabilityMatrix {
        let n = self.states();
        let mut alpha = ProbabilityMatrix::zeros(observations.len(), n);
        let Some(&first) = observations.first() else {
            return alpha;
        };

        for i in 0..n {
            alpha[(0, i)] = self.start[i] * self.emissions[(i, first)];
        }
        for (t, &o) in observations.iter().enumerate().skip(1) {
            for i in 0..n {
                let reach: f64 = (0..n).map(|j| alpha[(t - 1, j)] * self.transitions[(j, i)]).sum();
                alpha[(t, i)] = reach * self.emissions[(i, o)];
            }
        }
        alpha
    }

    /// β[t, i]: probability of the symbols after `t` given state `i` at `t`.
    pub fn backward(&self, observations: &[usize]) -> ProbabilityMatrix {
        let n = self.states();
        let len = observations.len();
        let mut beta = ProbabilityMatrix::zeros(len, n);
        if len == 0 {
            return beta;
        }

        for i in 0..n {
            beta[(len - 1, i)] = 1.0;
        }
        for t in (0..len - 1).rev() {
            let next = observations[t + 1];
            for i in 0..n {
                beta[(t, i)] = (0..n)
                    .map(|j| {
                        self.transitions[(i, j)] * self.emissions[(j, next)] * beta[(t + 1, j)]
                    })
                    .sum();
            }
        }
        beta
    }
}

/// Sum of the last row of a lattice, 0 for an empty one.
pub(crate) fn terminal_sum(lattice: &ProbabilityMatrix) -> f64 {
    lattice
        .rows()
        .checked_sub(1)
        .and_then(|last| lattice.row(last))
        .map(|row| row.iter().sum())
        .unwrap_or(0.0)
}
