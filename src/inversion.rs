//! Single-run orchestration of a stress inversion.
//!
//! [`Inversion`] owns the observation set and the settings, runs the
//! configured search strategy and keeps what it produced:
//! - the search outcome (best state and improvement history)
//! - optionally the misfit surface over the grid
//!
//! Long runs show a progress bar, and the elapsed time is logged once the
//! search finishes. The search can be stopped from another thread through
//! [`Inversion::abort_handle`].

use std::sync::{atomic::AtomicBool, Arc};
use std::time::Instant;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{InversionError, Result};
use crate::loader;
use crate::observation::{Observation, StructuralType};
use crate::result::SearchOutcome;
use crate::search::SearchControl;
use crate::settings::{Settings, Strategy};
use crate::surface::MisfitSurface;

/// Observation set, settings and results of one inversion.
#[derive(Debug)]
pub struct Inversion {
    pub observations: Vec<Observation>,
    pub settings: Settings,
    pub outcome: Option<SearchOutcome>,
    pub surface: Option<MisfitSurface>,
    abort: Arc<AtomicBool>,
    show_progress: bool,
}

impl Inversion {
    /// Creates an inversion over `observations`, rejecting empty sets and invalid domains.
    pub fn new(observations: Vec<Observation>, settings: Settings) -> Result<Self> {
        settings.validate()?;
        if observations.is_empty() {
            return Err(InversionError::EmptyInput);
        }
        Ok(Self {
            observations,
            settings,
            outcome: None,
            surface: None,
            abort: Arc::new(AtomicBool::new(false)),
            show_progress: false,
        })
    }

    /// Loads every configured data source and creates the inversion.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let mut observations = Vec::new();
        for source in &settings.data {
            let loaded = loader::load_observations(&source.path, source.kind)
                .with_context(|| format!("reading {} data from {}", source.kind, source.path.display()))?;
            observations.extend(loaded);
        }
        Ok(Self::new(observations, settings)?)
    }

    /// Shows a progress bar during [`Inversion::solve`] and [`Inversion::evaluate_surface`].
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Setting the returned flag stops a running search after the samples in flight.
    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    pub fn count(&self, structural_type: StructuralType) -> usize {
        self.observations
            .iter()
            .filter(|o| o.structural_type() == structural_type)
            .count()
    }

    /// Runs the configured search strategy.
    pub fn solve(&mut self) -> Result<&SearchOutcome> {
        let start = Instant::now();
        let samples = self.settings.samples();
        tracing::info!(
            strategy = ?self.settings.strategy,
            samples,
            joints = self.count(StructuralType::Joint),
            stylolites = self.count(StructuralType::Stylolite),
            "solving inversion"
        );

        let pb = self.progress_bar(samples as u64, "samples");
        let control = self.control(&pb);
        let outcome = match self.settings.strategy {
            Strategy::MonteCarlo => self
                .settings
                .random_search()
                .search(&self.observations, &control),
            Strategy::Grid => self.settings.grid_search().search(&self.observations, &control),
        };
        pb.finish_and_clear();
        let outcome = outcome?;

        let duration = start.elapsed();
        let per_sample = duration / outcome.evaluated.max(1) as u32;
        tracing::info!(
            elapsed = ?duration,
            per_sample = ?per_sample,
            evaluated = outcome.evaluated,
            "search finished"
        );

        for improvement in &outcome.improvements {
            tracing::debug!(
                sample = improvement.sample_index,
                misfit = improvement.best_misfit,
                theta = improvement.best_theta,
                k = improvement.best_k,
                "improved"
            );
        }
        if outcome.degenerate > 0 {
            tracing::warn!(
                degenerate = outcome.degenerate,
                evaluated = outcome.evaluated,
                "some sampled stress states were degenerate and were scored with clamped directions"
            );
        }
        if outcome.aborted {
            tracing::warn!(evaluated = outcome.evaluated, "search aborted early");
        }

        Ok(&*self.outcome.insert(outcome))
    }

    /// Evaluates the misfit at every node of the configured grid.
    pub fn evaluate_surface(&mut self) -> Result<&MisfitSurface> {
        let start = Instant::now();
        let grid = self.settings.grid_search();

        let pb = self.progress_bar(grid.samples() as u64, "surface");
        let control = self.control(&pb);
        let surface = grid.evaluate_surface_with(&self.observations, &control);
        pb.finish_and_clear();
        let surface = surface?;

        tracing::info!(
            elapsed = ?start.elapsed(),
            shape = ?surface.shape(),
            min = ?surface.min(),
            max = ?surface.max(),
            "misfit surface evaluated"
        );
        Ok(&*self.surface.insert(surface))
    }

    fn control(&self, pb: &ProgressBar) -> SearchControl {
        SearchControl::new()
            .with_abort(self.abort_handle())
            .with_progress(pb.clone())
    }

    fn progress_bar(&self, len: u64, message: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        match ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {bar:40.green/blue} {pos:>7}/{len:7} {msg} ETA: {eta_precise}",
        ) {
            Ok(style) => pb.set_style(style.progress_chars("█▇▆▅▄▃▂▁")),
            Err(err) => tracing::debug!(%err, "falling back to the default progress style"),
        }
        pb.set_message(message.to_string());
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KRange;
    use std::sync::atomic::Ordering;

    fn observations() -> Vec<Observation> {
        vec![
            Observation::joint(0.0, 1.0),
            Observation::joint(0.1, 1.0),
            Observation::stylolite(1.0, 0.0),
        ]
    }

    #[test]
    fn rejects_empty_observations() {
        assert!(matches!(
            Inversion::new(Vec::new(), Settings::default()),
            Err(InversionError::EmptyInput)
        ));
    }

    #[test]
    fn rejects_invalid_domain_before_solving() {
        let settings = Settings {
            k_range: KRange { min: 1.0, max: 0.0 },
            ..Settings::default()
        };
        assert!(matches!(
            Inversion::new(observations(), settings),
            Err(InversionError::InvalidDomain(_))
        ));
    }

    #[test]
    fn solve_dispatches_on_strategy() {
        let settings = Settings {
            strategy: Strategy::Grid,
            grid_size: 19,
            ..Settings::default()
        };
        let mut inversion = Inversion::new(observations(), settings.clone()).unwrap();
        let best = inversion.solve().unwrap().best;
        assert_eq!(best, settings.grid_search().run(&observations()).unwrap());
        assert!(inversion.outcome.is_some());

        let settings = Settings {
            iterations: 500,
            seed: Some(5),
            ..Settings::default()
        };
        let mut inversion = Inversion::new(observations(), settings.clone()).unwrap();
        let best = inversion.solve().unwrap().best;
        assert_eq!(best, settings.random_search().run(&observations()).unwrap());
    }

    #[test]
    fn surface_matches_grid_solution() {
        let settings = Settings {
            strategy: Strategy::Grid,
            grid_size: 15,
            surface: true,
            ..Settings::default()
        };
        let mut inversion = Inversion::new(observations(), settings).unwrap();
        let best = inversion.solve().unwrap().best;
        let surface = inversion.evaluate_surface().unwrap();
        assert_eq!(surface.argmin(), Some(best));
    }

    #[test]
    fn raised_abort_flag_stops_the_run() {
        let mut inversion = Inversion::new(observations(), Settings::default()).unwrap();
        inversion.abort_handle().store(true, Ordering::Relaxed);
        assert!(matches!(inversion.solve(), Err(InversionError::Aborted)));
        assert!(inversion.outcome.is_none());
    }
}
