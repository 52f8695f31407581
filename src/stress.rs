//! Reduced 2-D remote stress states and their principal directions.
//!
//! A candidate stress state is described by two parameters only:
//! - `theta`: orientation of the stress ellipse in degrees, in [0, 180]
//! - `k`: the stress ratio, usually in [0, 1]
//!
//! The reduced tensor built from `(theta, k)` is a symmetric 2x2 matrix, so its
//! eigenvectors are computed in closed form rather than through a general
//! eigensolver. The directions are returned ordered by decreasing eigenvalue:
//! `S1` (most compressive) first, then `S3` (least compressive).
//!
//! # Degenerate states
//!
//! At the domain boundaries one or both directions collapse to the zero
//! vector (k = 0, or a direction lying exactly on an axis). These states are
//! valid inputs. They are flagged through [`Degeneracy`] and never produce NaN.

use nalgebra::{Matrix2, Vector2};
use serde::Serialize;

use crate::geom::{deg_to_rad, normalize};

/// Non-fatal numeric conditions met while building a [`StressState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Degeneracy {
    /// The eigenvalue discriminant rounded below zero and was clamped.
    NegativeDiscriminant,
    /// `S1` or `S3` collapsed to the zero vector.
    CollapsedDirection,
}

/// Selects one of the two principal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrincipalAxis {
    S1,
    S3,
}

/// A synthetic stress state derived from `(theta, k)`.
#[derive(Debug, Clone, PartialEq)]
pub struct StressState {
    theta: f64,
    k: f64,
    tensor: Matrix2<f64>,
    eigenvalues: (f64, f64),
    s1: Vector2<f64>,
    s3: Vector2<f64>,
    degeneracy: Option<Degeneracy>,
}

impl StressState {
    /// Builds the reduced tensor for `(theta, k)` and its principal directions.
    pub fn new(theta: f64, k: f64) -> Self {
        let (s, c) = deg_to_rad(theta).sin_cos();
        let xx = k * s * s;
        let xy = k * c * s;
        let yy = k * c * c;
        let trace = xx + yy;

        let mut degeneracy = None;
        let radicand = trace * trace - 4.0 * (xx * yy - xy * xy);
        if radicand < 0.0 {
            degeneracy = Some(Degeneracy::NegativeDiscriminant);
        }
        let discriminant = radicand.max(0.0).sqrt();

        let lambda1 = (trace + discriminant) / 2.0;
        let lambda3 = (trace - discriminant) / 2.0;
        let s1 = normalize(Vector2::new(xy, lambda1 - xx));
        let s3 = normalize(Vector2::new(xy, lambda3 - xx));

        if degeneracy.is_none() && (s1 == Vector2::zeros() || s3 == Vector2::zeros()) {
            degeneracy = Some(Degeneracy::CollapsedDirection);
        }
        if let Some(kind) = degeneracy {
            tracing::trace!(theta, k, ?kind, "degenerate stress state");
        }

        Self {
            theta,
            k,
            tensor: Matrix2::new(xx, xy, xy, yy),
            eigenvalues: (lambda1, lambda3),
            s1,
            s3,
            degeneracy,
        }
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    /// Most compressive principal direction (larger eigenvalue).
    pub fn s1(&self) -> &Vector2<f64> {
        &self.s1
    }

    /// Least compressive principal direction (smaller eigenvalue).
    pub fn s3(&self) -> &Vector2<f64> {
        &self.s3
    }

    pub fn direction(&self, axis: PrincipalAxis) -> &Vector2<f64> {
        match axis {
            PrincipalAxis::S1 => &self.s1,
            PrincipalAxis::S3 => &self.s3,
        }
    }

    /// The reduced tensor `[[xx, xy], [xy, yy]]`.
    pub fn tensor(&self) -> &Matrix2<f64> {
        &self.tensor
    }

    /// Eigenvalues in decreasing order, matching `(S1, S3)`.
    pub fn eigenvalues(&self) -> (f64, f64) {
        self.eigenvalues
    }

    pub fn degeneracy(&self) -> Option<Degeneracy> {
        self.degeneracy
    }

    pub fn is_degenerate(&self) -> bool {
        self.degeneracy.is_some()
    }

    /// Normal and shear stress on a plane whose normal makes `plane_angle`
    /// degrees with the x axis.
    pub fn traction(&self, plane_angle: f64) -> (f64, f64) {
        let xx = self.tensor[(0, 0)];
        let xy = self.tensor[(0, 1)];
        let yy = self.tensor[(1, 1)];
        let (sin, cos) = (2.0 * deg_to_rad(plane_angle)).sin_cos();
        let normal = 0.5 * (xx + yy) + 0.5 * (xx - yy) * cos + xy * sin;
        let shear = 0.5 * (yy - xx) * sin + xy * cos;
        (normal, shear)
    }
}
