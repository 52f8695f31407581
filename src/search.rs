//! Shared machinery for the search strategies.
//!
//! Both strategies score independent samples, so the running "best so far"
//! is expressed as a fold over samples in index order ([`Tracker::record`])
//! and a merge of adjacent partial folds ([`Tracker::merge`]). The merge is
//! associative, which lets rayon split the sample range anywhere and still
//! produce exactly the result and improvement sequence of a sequential scan.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use indicatif::ProgressBar;

use crate::error::{InversionError, Result};
use crate::result::{SearchOutcome, SearchResult};

/// Run-time hooks for a search: an abort flag and a progress bar.
#[derive(Clone, Default)]
pub struct SearchControl {
    abort: Option<Arc<AtomicBool>>,
    progress: Option<ProgressBar>,
}

impl SearchControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the search once `flag` is set. Samples already scored are kept.
    pub fn with_abort(mut self, flag: Arc<AtomicBool>) -> Self {
        self.abort = Some(flag);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn is_aborted(&self) -> bool {
        self.abort
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub(crate) fn advance(&self, samples: u64) {
        if let Some(progress) = &self.progress {
            progress.inc(samples);
        }
    }
}

/// Partial fold over a contiguous, ordered run of samples.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tracker {
    best: Option<SearchResult>,
    improvements: Vec<SearchResult>,
    evaluated: usize,
    degenerate: usize,
}

impl Tracker {
    pub(crate) fn record(mut self, candidate: SearchResult, degenerate: bool) -> Self {
        self.evaluated += 1;
        if degenerate {
            self.degenerate += 1;
        }
        self.offer(candidate);
        self
    }

    fn offer(&mut self, candidate: SearchResult) {
        let improves = self
            .best
            .as_ref()
            .map_or(true, |best| candidate.ranks_before(best));
        if improves {
            self.best = Some(candidate);
            self.improvements.push(candidate);
        }
    }

    /// Appends the samples folded into `later`, which must all come after ours.
    pub(crate) fn merge(mut self, later: Tracker) -> Self {
        // a global improvement inside `later` is necessarily a local one there
        for candidate in later.improvements {
            self.offer(candidate);
        }
        self.evaluated += later.evaluated;
        self.degenerate += later.degenerate;
        self
    }

    pub(crate) fn evaluated(&self) -> usize {
        self.evaluated
    }

    pub(crate) fn finish(self, aborted: bool) -> Result<SearchOutcome> {
        let best = self.best.ok_or(InversionError::Aborted)?;
        if self.degenerate > 0 {
            tracing::debug!(
                degenerate = self.degenerate,
                evaluated = self.evaluated,
                "degenerate stress states sampled"
            );
        }
        Ok(SearchOutcome {
            best,
            improvements: self.improvements,
            evaluated: self.evaluated,
            degenerate: self.degenerate,
            aborted,
        })
    }
}
