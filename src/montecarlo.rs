//! Monte Carlo search over the (theta, k) domain.
//!
//! Parameters are drawn from a single seeded random stream in blocks. The
//! draws are sequential, so a given seed always yields the same sample
//! sequence; the scoring of each block is spread over the rayon thread pool
//! and folded back in sample order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{theta_at, validate_iterations, KRange};
use crate::error::Result;
use crate::misfit::MisfitModel;
use crate::observation::{Observation, Pairing};
use crate::result::{SearchOutcome, SearchResult};
use crate::search::{SearchControl, Tracker};

/// Number of samples drawn before each parallel scoring pass.
pub const BLOCK_SIZE: usize = 4096;

/// Random (Monte Carlo) sampling of the search domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomSearch {
    pub iterations: usize,
    /// Without a seed the stream is seeded from the OS and results vary run to run.
    pub seed: Option<u64>,
    pub k_range: KRange,
    pub pairing: Pairing,
}

impl RandomSearch {
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            seed: None,
            k_range: KRange::default(),
            pairing: Pairing::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_k_range(mut self, k_range: KRange) -> Self {
        self.k_range = k_range;
        self
    }

    pub fn with_pairing(mut self, pairing: Pairing) -> Self {
        self.pairing = pairing;
        self
    }

    /// Runs the search and returns the lowest-misfit sample.
    pub fn run(&self, observations: &[Observation]) -> Result<SearchResult> {
        Ok(self.search(observations, &SearchControl::default())?.best)
    }

    /// Runs the search, keeping the improvement history and sample counts.
    pub fn search(
        &self,
        observations: &[Observation],
        control: &SearchControl,
    ) -> Result<SearchOutcome> {
        validate_iterations(self.iterations)?;
        self.k_range.validate()?;
        let model = MisfitModel::new(observations, self.pairing)?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut tracker = Tracker::default();
        let mut block: Vec<(f64, f64)> = Vec::with_capacity(BLOCK_SIZE.min(self.iterations));
        let mut start = 0;

        while start < self.iterations && !control.is_aborted() {
            let len = BLOCK_SIZE.min(self.iterations - start);
            block.clear();
            block.extend((0..len).map(|_| {
                let theta = theta_at(rng.random::<f64>());
                let k = self.k_range.at(rng.random::<f64>());
                (theta, k)
            }));

            let partial = block
                .par_iter()
                .enumerate()
                .fold(Tracker::default, |tracker, (offset, &(theta, k))| {
                    if control.is_aborted() {
                        return tracker;
                    }
                    let (misfit, degenerate) = model.evaluate_at(theta, k);
                    tracker.record(SearchResult::new(theta, k, misfit, start + offset), degenerate)
                })
                .reduce(Tracker::default, Tracker::merge);

            tracker = tracker.merge(partial);
            control.advance(len as u64);
            start += len;
        }

        let aborted = tracker.evaluated() < self.iterations;
        tracker.finish(aborted)
    }
}
