//! Remote stress inversion from fracture orientations.
//!
//! Joints open perpendicular to the least compressive principal stress and
//! stylolites form perpendicular to the most compressive one. Given a set of
//! measured fracture normals, this crate searches the two-parameter space of
//! reduced 2-D stress states (orientation `theta`, stress ratio `k`) for the
//! state that best predicts them.
//!
//! # Example
//! ```
//! use stressinv::{grid::GridSearch, observation::Observation};
//!
//! let observations = vec![Observation::joint(0.0, 1.0), Observation::stylolite(1.0, 0.1)];
//! let best = GridSearch::new(91).run(&observations).unwrap();
//! assert!((best.best_theta - 90.0).abs() < 10.0);
//! ```

pub mod domain;
pub mod error;
pub mod geom;
pub mod grid;
pub mod inversion;
pub mod loader;
pub mod misfit;
pub mod montecarlo;
pub mod observation;
pub mod result;
pub mod search;
pub mod settings;
pub mod stress;
pub mod surface;

pub use error::{InversionError, Result};
