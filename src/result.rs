use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Best stress state found by a search, with the sample that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchResult {
    pub best_theta: f64,
    pub best_k: f64,
    pub best_misfit: f64,
    pub sample_index: usize,
}

impl SearchResult {
    pub fn new(theta: f64, k: f64, misfit: f64, sample_index: usize) -> Self {
        Self {
            best_theta: theta,
            best_k: k,
            best_misfit: misfit,
            sample_index,
        }
    }

    /// Lower misfit wins; on a tie the earlier sample wins.
    pub fn ranks_before(&self, other: &SearchResult) -> bool {
        match self.best_misfit.partial_cmp(&other.best_misfit) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.sample_index < other.sample_index,
            _ => false,
        }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "theta = {:.3} deg, k = {:.4}, misfit = {:.6} (sample {})",
            self.best_theta, self.best_k, self.best_misfit, self.sample_index
        )
    }
}

/// Everything a search run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub best: SearchResult,
    /// Every sample that strictly beat all samples before it, in search order.
    /// The last entry is `best`.
    pub improvements: Vec<SearchResult>,
    pub evaluated: usize,
    /// Samples whose stress state hit a numeric degeneracy.
    pub degenerate: usize,
    pub aborted: bool,
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Best stress state:")?;
        writeln!(f, "  - Orientation: {:.3} deg", self.best.best_theta)?;
        writeln!(f, "  - Stress ratio: {:.4}", self.best.best_k)?;
        writeln!(f, "  - Misfit: {:.6}", self.best.best_misfit)?;
        writeln!(f, "  - Found at sample: {}", self.best.sample_index)?;
        writeln!(f, "  - Improvements: {}", self.improvements.len())?;
        write!(f, "  - Samples evaluated: {}", self.evaluated)?;
        if self.aborted {
            write!(f, " (aborted)")?;
        }
        Ok(())
    }
}
