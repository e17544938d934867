//! # Baum-Welch learning
//!
//! Expectation-maximization over a single observation sequence. Each round
//! builds the forward and backward lattices for the current parameters, derives
//! the state posteriors γ and the pairwise posteriors ξ, then re-estimates the
//! start, transition, and emission probabilities in place.
//!
//! ## Stopping
//!
//! The stop test runs before re-estimation, on the forward likelihood of the
//! current parameters. The previous likelihood starts at 0. Learning stops when
//!
//! - the likelihood is NaN or infinite,
//! - `tolerance > 0` and the likelihood moved by at most `tolerance`, or
//! - the remaining iteration budget is exactly 1.
//!
//! With `iterations = n > 0` that means at most `n - 1` re-estimations. With
//! `tolerance > 0` and `iterations <= 0` the budget never runs out and only
//! convergence stops the loop.

use super::trellis::{terminal_sum, Parameters};
use super::HiddenMarkovModel;
use crate::engine::errors::ModelError;
use crate::markov::matrix::ProbabilityMatrix;

/// Emission probability substituted when a symbol never occurs in the sequence.
pub const DEFAULT_EMISSION_FLOOR: f64 = 1e-10;

const DEFAULT_ITERATIONS: i32 = 100;

/// Learning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearningConfig {
    /// Convergence threshold on the likelihood change; `<= 0` disables it.
    pub tolerance: f64,
    /// Iteration budget; `<= 0` means no budget.
    pub iterations: i32,
    /// Emission probability used when the re-estimated numerator is exactly 0.
    pub emission_floor: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.0,
            iterations: DEFAULT_ITERATIONS,
            emission_floor: DEFAULT_EMISSION_FLOOR,
        }
    }
}

impl LearningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_iterations(mut self, iterations: i32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_emission_floor(mut self, emission_floor: f64) -> Self {
        self.emission_floor = emission_floor;
        self
    }
}

/// Why a learning run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// Neither a tolerance nor a budget was given, or the sequence was empty.
    Skipped,
    /// The likelihood changed by no more than the tolerance.
    Converged,
    /// The iteration budget ran out.
    BudgetExhausted,
    /// The likelihood became NaN or infinite.
    NonFinite,
}

/// Outcome of a learning run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearningReport {
    /// Number of re-estimations applied to the model
    pub iterations: usize,
    /// Forward likelihood of the final parameters (0 when skipped)
    pub likelihood: f64,
    pub stop: StopReason,
}

impl LearningReport {
    fn skipped() -> Self {
        Self { iterations: 0, likelihood: 0.0, stop: StopReason::Skipped }
    }
}

fn should_stop(
    previous: f64,
    likelihood: f64,
    remaining: i32,
    tolerance: f64,
) -> Option<StopReason> {
    if !likelihood.is_finite() {
        return Some(StopReason::NonFinite);
    }
    if tolerance > 0.0 && (previous - likelihood).abs() <= tolerance {
        return Some(StopReason::Converged);
    }
    if remaining == 1 {
        return Some(StopReason::BudgetExhausted);
    }
    None
}

/// γ[t, i] = α[t, i] · β[t, i], normalized per time step.
///
/// A time step whose products sum to exactly 0 is left unnormalized.
fn state_posteriors(alpha: &ProbabilityMatrix, beta: &ProbabilityMatrix) -> ProbabilityMatrix {
    let (len, n) = (alpha.rows(), alpha.cols());
    let mut gamma = ProbabilityMatrix::zeros(len, n);
    for t in 0..len {
        let mut scale = 0.0;
        for i in 0..n {
            let v = alpha[(t, i)] * beta[(t, i)];
            gamma[(t, i)] = v;
            scale += v;
        }
        if scale != 0.0 {
            for i in 0..n {
                gamma[(t, i)] /= scale;
            }
        }
    }
    gamma
}

/// Σ_{t < T-1} ξ[t, i, j], each ξ[t] normalized per time step.
///
/// ξ[t] is never materialized as a whole tensor; only its sum over time is
/// needed for re-estimation. A time step whose products sum to exactly 0
/// contributes nothing.
fn expected_transitions(
    params: &Parameters<'_>,
    observations: &[usize],
    alpha: &ProbabilityMatrix,
    beta: &ProbabilityMatrix,
) -> ProbabilityMatrix {
    let n = params.states();
    let mut totals = ProbabilityMatrix::zeros(n, n);
    let mut step = ProbabilityMatrix::zeros(n, n);

    for t in 0..observations.len().saturating_sub(1) {
        let next = observations[t + 1];
        let mut scale = 0.0;
        for i in 0..n {
            for j in 0..n {
                let v = alpha[(t, i)]
                    * params.transitions[(i, j)]
                    * beta[(t + 1, j)]
                    * params.emissions[(j, next)];
                step[(i, j)] = v;
                scale += v;
            }
        }
        if scale == 0.0 {
            continue;
        }
        for i in 0..n {
            for j in 0..n {
                totals[(i, j)] += step[(i, j)] / scale;
            }
        }
    }
    totals
}

/// Re-estimated parameters, computed from the current ones before any is
/// written back.
struct Estimate {
    start: Vec<f64>,
    transitions: ProbabilityMatrix,
    emissions: ProbabilityMatrix,
}

fn re_estimate(
    params: &Parameters<'_>,
    observations: &[usize],
    alpha: &ProbabilityMatrix,
    beta: &ProbabilityMatrix,
    emission_floor: f64,
) -> Estimate {
    let n = params.states();
    let m = params.emissions.cols();
    let len = observations.len();
    let gamma = state_posteriors(alpha, beta);
    let xi = expected_transitions(params, observations, alpha, beta);

    let start = gamma.row(0).map(<[f64]>::to_vec).unwrap_or_else(|| vec![0.0; n]);

    let mut transitions = ProbabilityMatrix::zeros(n, n);
    for i in 0..n {
        let occupancy: f64 = (0..len.saturating_sub(1)).map(|t| gamma[(t, i)]).sum();
        for j in 0..n {
            transitions[(i, j)] = if occupancy != 0.0 { xi[(i, j)] / occupancy } else { 0.0 };
        }
    }

    let mut emissions = ProbabilityMatrix::zeros(n, m);
    for i in 0..n {
        let occupancy: f64 = (0..len).map(|t| gamma[(t, i)]).sum();
        for k in 0..m {
            let emitted: f64 = observations
                .iter()
                .enumerate()
                .filter(|&(_, &o)| o == k)
                .map(|(t, _)| gamma[(t, i)])
                .sum();
            emissions[(i, k)] = if emitted == 0.0 { emission_floor } else { emitted / occupancy };
        }
    }

    Estimate { start, transitions, emissions }
}

impl<T: PartialEq> HiddenMarkovModel<T> {
    /// Re-estimates the model from `observations` (Baum-Welch).
    ///
    /// `tolerance` and `iterations` follow [`LearningConfig`]; when both are
    /// `<= 0` the model is left untouched.
    ///
    /// # Errors
    ///
    /// * `ModelError::NotFound` - a symbol is not in the alphabet
    pub fn update(
        &mut self,
        observations: &[T],
        tolerance: f64,
        iterations: i32,
    ) -> Result<LearningReport, ModelError> {
        let config = LearningConfig::default()
            .with_tolerance(tolerance)
            .with_iterations(iterations);
        self.update_with(observations, &config)
    }

    /// Like [`update`](Self::update), with every knob in `config`.
    pub fn update_with(
        &mut self,
        observations: &[T],
        config: &LearningConfig,
    ) -> Result<LearningReport, ModelError> {
        if config.tolerance <= 0.0 && config.iterations <= 0 {
            return Ok(LearningReport::skipped());
        }
        if observations.is_empty() {
            return Ok(LearningReport::skipped());
        }
        let encoded = self.encode(observations)?;

        let mut remaining = config.iterations;
        let mut previous = 0.0;
        let mut applied = 0usize;

        loop {
            let params = self.parameters();
            let alpha = params.forward(&encoded);
            let likelihood = terminal_sum(&alpha);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                model = self.id().0,
                iteration = applied,
                likelihood,
                "baum-welch step"
            );

            if let Some(stop) = should_stop(previous, likelihood, remaining, config.tolerance) {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    model = self.id().0,
                    iterations = applied,
                    ?stop,
                    "baum-welch stopped"
                );
                return Ok(LearningReport { iterations: applied, likelihood, stop });
            }

            let beta = params.backward(&encoded);
            let estimate = re_estimate(&params, &encoded, &alpha, &beta, config.emission_floor);

            for (i, &p) in estimate.start.iter().enumerate() {
                self.set_start_probability(i, p)?;
            }
            *self.transitions_mut() = estimate.transitions;
            *self.emissions_mut() = estimate.emissions;

            remaining = remaining.saturating_sub(1);
            previous = likelihood;
            applied += 1;
        }
    }
}
