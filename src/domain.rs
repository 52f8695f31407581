//! Bounds of the (theta, k) search domain.

use serde::{Deserialize, Serialize};

use crate::error::{InversionError, Result};
use crate::geom::lerp;

/// Orientation bounds in degrees. The ellipse axis is undirected, so 180 closes the range.
pub const THETA_MIN: f64 = 0.0;
pub const THETA_MAX: f64 = 180.0;

/// Interval of admissible stress ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KRange {
    pub min: f64,
    pub max: f64,
}

impl Default for KRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl KRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(InversionError::InvalidDomain(format!(
                "stress ratio bounds must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min >= self.max {
            return Err(InversionError::InvalidDomain(format!(
                "stress ratio range needs min < max, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Stress ratio at fraction `t` of the range.
    pub fn at(&self, t: f64) -> f64 {
        lerp(self.min, self.max, t)
    }
}

/// Orientation at fraction `t` of [`THETA_MIN`, `THETA_MAX`].
pub fn theta_at(t: f64) -> f64 {
    lerp(THETA_MIN, THETA_MAX, t)
}

pub fn validate_grid_size(grid_size: usize) -> Result<()> {
    if grid_size < 2 {
        return Err(InversionError::InvalidDomain(format!(
            "grid size must be at least 2, got {}",
            grid_size
        )));
    }
    Ok(())
}

pub fn validate_iterations(iterations: usize) -> Result<()> {
    if iterations == 0 {
        return Err(InversionError::InvalidDomain(
            "number of iterations must be positive".to_string(),
        ));
    }
    Ok(())
}
