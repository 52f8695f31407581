//! Error taxonomy for the inversion library.
//!
//! Contract violations (an empty observation set, an invalid search domain)
//! are raised before any sampling begins and terminate the run. Numeric
//! degeneracies at the domain boundaries are not errors; see
//! [`crate::stress::Degeneracy`].

use thiserror::Error;

/// Root error type for all inversion failures.
#[derive(Error, Debug)]
pub enum InversionError {
    /// Averaging over zero observations.
    #[error("cannot average misfit over an empty observation set")]
    EmptyInput,

    /// Grid size, iteration count or stress ratio range out of bounds.
    #[error("invalid search domain: {0}")]
    InvalidDomain(String),

    /// The abort signal was raised before a single sample was scored.
    #[error("search aborted before any sample was evaluated")]
    Aborted,

    /// A data source named a structural type with no cost rule.
    #[error("unknown structural type '{0}' (expected joint, dike, dyke or stylolite)")]
    UnknownStructuralType(String),

    /// A line of an observation file could not be read as a normal.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, InversionError>;
