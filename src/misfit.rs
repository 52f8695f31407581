//! Average misfit of an observation set against a candidate stress state.

use crate::error::{InversionError, Result};
use crate::observation::{Observation, Pairing};
use crate::stress::StressState;

/// Mean cost of `observations` against `state` under the standard pairing.
pub fn average_cost(observations: &[Observation], state: &StressState) -> Result<f64> {
    Ok(MisfitModel::new(observations, Pairing::Standard)?.evaluate(state))
}

/// A validated, borrowed observation set ready to score stress states.
///
/// Emptiness is checked once at construction, which leaves [`MisfitModel::evaluate`]
/// infallible and allocation-free for the search loops.
#[derive(Debug, Clone, Copy)]
pub struct MisfitModel<'a> {
    observations: &'a [Observation],
    pairing: Pairing,
}

impl<'a> MisfitModel<'a> {
    pub fn new(observations: &'a [Observation], pairing: Pairing) -> Result<Self> {
        if observations.is_empty() {
            return Err(InversionError::EmptyInput);
        }
        Ok(Self {
            observations,
            pairing,
        })
    }

    pub fn observations(&self) -> &'a [Observation] {
        self.observations
    }

    pub fn pairing(&self) -> Pairing {
        self.pairing
    }

    #[inline]
    pub fn evaluate(&self, state: &StressState) -> f64 {
        let total: f64 = self
            .observations
            .iter()
            .map(|o| o.cost_with(state, self.pairing))
            .sum();
        total / self.observations.len() as f64
    }

    /// Builds the stress state for `(theta, k)` and scores it.
    #[inline]
    pub fn evaluate_at(&self, theta: f64, k: f64) -> (f64, bool) {
        let state = StressState::new(theta, k);
        (self.evaluate(&state), state.is_degenerate())
    }
}
