//! Exhaustive grid search over the (theta, k) domain.
//!
//! The grid has `grid_size` nodes along each axis, both endpoints included.
//! Node `(i, j)` sits at stress ratio `k_at(i)` and orientation `theta_at(j)`
//! and is sample number `i * grid_size + j`. [`GridSearch::run`] keeps the
//! minimum; [`GridSearch::evaluate_surface`] keeps every node.

use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{self, validate_grid_size, KRange};
use crate::error::{InversionError, Result};
use crate::misfit::MisfitModel;
use crate::observation::{Observation, Pairing};
use crate::result::{SearchOutcome, SearchResult};
use crate::search::{SearchControl, Tracker};
use crate::surface::MisfitSurface;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSearch {
    pub grid_size: usize,
    pub k_range: KRange,
    pub pairing: Pairing,
}

impl GridSearch {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            k_range: KRange::default(),
            pairing: Pairing::default(),
        }
    }

    pub fn with_k_range(mut self, k_range: KRange) -> Self {
        self.k_range = k_range;
        self
    }

    pub fn with_pairing(mut self, pairing: Pairing) -> Self {
        self.pairing = pairing;
        self
    }

    /// Number of grid nodes.
    pub fn samples(&self) -> usize {
        self.grid_size * self.grid_size
    }

    pub fn k_at(&self, i: usize) -> f64 {
        self.k_range.at(self.fraction(i))
    }

    pub fn theta_at(&self, j: usize) -> f64 {
        domain::theta_at(self.fraction(j))
    }

    fn fraction(&self, index: usize) -> f64 {
        index as f64 / (self.grid_size - 1) as f64
    }

    fn validate(&self) -> Result<()> {
        validate_grid_size(self.grid_size)?;
        self.k_range.validate()
    }

    /// Scores every node and returns the lowest-misfit one.
    pub fn run(&self, observations: &[Observation]) -> Result<SearchResult> {
        Ok(self.search(observations, &SearchControl::default())?.best)
    }

    pub fn search(
        &self,
        observations: &[Observation],
        control: &SearchControl,
    ) -> Result<SearchOutcome> {
        self.validate()?;
        let model = MisfitModel::new(observations, self.pairing)?;
        let n = self.grid_size;

        let tracker = (0..n)
            .into_par_iter()
            .map(|i| {
                let k = self.k_at(i);
                let mut row = Tracker::default();
                for j in 0..n {
                    if control.is_aborted() {
                        break;
                    }
                    let theta = self.theta_at(j);
                    let (misfit, degenerate) = model.evaluate_at(theta, k);
                    row = row.record(SearchResult::new(theta, k, misfit, i * n + j), degenerate);
                }
                control.advance(n as u64);
                row
            })
            .reduce(Tracker::default, Tracker::merge);

        let aborted = tracker.evaluated() < self.samples();
        tracker.finish(aborted)
    }

    /// Misfit at every node of the grid.
    pub fn evaluate_surface(&self, observations: &[Observation]) -> Result<MisfitSurface> {
        self.evaluate_surface_with(observations, &SearchControl::default())
    }

    /// Like [`GridSearch::evaluate_surface`], but an abort yields
    /// [`InversionError::Aborted`] rather than a partial surface.
    pub fn evaluate_surface_with(
        &self,
        observations: &[Observation],
        control: &SearchControl,
    ) -> Result<MisfitSurface> {
        self.validate()?;
        let model = MisfitModel::new(observations, self.pairing)?;
        let n = self.grid_size;

        let rows: Option<Vec<Vec<f64>>> = (0..n)
            .into_par_iter()
            .map(|i| {
                if control.is_aborted() {
                    return None;
                }
                let k = self.k_at(i);
                let row: Vec<f64> = (0..n)
                    .map(|j| model.evaluate_at(self.theta_at(j), k).0)
                    .collect();
                control.advance(n as u64);
                Some(row)
            })
            .collect();
        let rows = rows.ok_or(InversionError::Aborted)?;

        let values = Array2::from_shape_vec((n, n), rows.concat())?;
        let k_axis = Array1::from_iter((0..n).map(|i| self.k_at(i)));
        let theta_axis = Array1::from_iter((0..n).map(|j| self.theta_at(j)));
        Ok(MisfitSurface::new(values, k_axis, theta_axis))
    }
}
