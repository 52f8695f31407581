//! Misfit over the full search grid, for plotting and for checking an optimum.

use ndarray::{Array1, Array2};
use ndarray_stats::QuantileExt;

use crate::result::SearchResult;

/// Average misfit at every node of a square grid.
///
/// `values[[i, j]]` holds the misfit at `(k_axis[i], theta_axis[j])`, so rows
/// run along the stress ratio and columns along the orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct MisfitSurface {
    values: Array2<f64>,
    k_axis: Array1<f64>,
    theta_axis: Array1<f64>,
}

impl MisfitSurface {
    pub(crate) fn new(values: Array2<f64>, k_axis: Array1<f64>, theta_axis: Array1<f64>) -> Self {
        debug_assert_eq!(values.dim(), (k_axis.len(), theta_axis.len()));
        Self {
            values,
            k_axis,
            theta_axis,
        }
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn k_axis(&self) -> &Array1<f64> {
        &self.k_axis
    }

    pub fn theta_axis(&self) -> &Array1<f64> {
        &self.theta_axis
    }

    /// `(k nodes, theta nodes)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, k_index: usize, theta_index: usize) -> Option<f64> {
        self.values.get((k_index, theta_index)).copied()
    }

    /// Lower end of the colour scale.
    pub fn min(&self) -> Option<f64> {
        self.values.min().ok().copied()
    }

    /// Upper end of the colour scale.
    pub fn max(&self) -> Option<f64> {
        self.values.max().ok().copied()
    }

    /// The first minimum in row-major order, as the grid search would report it.
    pub fn argmin(&self) -> Option<SearchResult> {
        let (i, j) = self.values.argmin().ok()?;
        let columns = self.theta_axis.len();
        Some(SearchResult::new(
            self.theta_axis[j],
            self.k_axis[i],
            self.values[[i, j]],
            i * columns + j,
        ))
    }
}
