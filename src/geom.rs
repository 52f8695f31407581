//! Plane geometry helpers shared by the stress and cost models.

use nalgebra::Vector2;

/// Returns the unit vector along `v`, or the zero vector when `v` has no length.
pub fn normalize(v: Vector2<f64>) -> Vector2<f64> {
    v.try_normalize(0.0).unwrap_or_else(Vector2::zeros)
}

pub fn dot(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.dot(b)
}

pub fn deg_to_rad(angle: f64) -> f64 {
    angle.to_radians()
}

/// Linear interpolation between `v0` (at `t = 0`) and `v1` (at `t = 1`).
pub fn lerp(v0: f64, v1: f64, t: f64) -> f64 {
    (1.0 - t) * v0 + t * v1
}
