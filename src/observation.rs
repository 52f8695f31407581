//! Fracture observations and their cost against a stress state.
//!
//! Each structural type forms perpendicular to one principal direction:
//! - a joint opens perpendicular to the least compressive direction `S3`
//! - a stylolite forms perpendicular to the most compressive direction `S1`
//!
//! The misfit of one observation is `1 - |n . S|` where `S` is the direction
//! its type is paired with. The absolute value absorbs the sign ambiguity of a
//! plane normal, so the cost is 0 for a perfectly aligned normal and 1 for an
//! orthogonal one.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::InversionError;
use crate::geom::{dot, normalize};
use crate::stress::{PrincipalAxis, StressState};

/// Kind of fracture a normal was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralType {
    #[serde(alias = "dike", alias = "dyke")]
    Joint,
    #[serde(alias = "stylo")]
    Stylolite,
}

/// Which principal direction each structural type is scored against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pairing {
    /// Joints against `S3`, stylolites against `S1`.
    #[default]
    Standard,
    /// Joints against `S1`, stylolites against `S3`.
    Swapped,
}

impl StructuralType {
    /// The principal direction a fracture of this type is normal to.
    pub fn axis(self, pairing: Pairing) -> PrincipalAxis {
        match (self, pairing) {
            (StructuralType::Joint, Pairing::Standard) => PrincipalAxis::S3,
            (StructuralType::Stylolite, Pairing::Standard) => PrincipalAxis::S1,
            (StructuralType::Joint, Pairing::Swapped) => PrincipalAxis::S1,
            (StructuralType::Stylolite, Pairing::Swapped) => PrincipalAxis::S3,
        }
    }
}

impl FromStr for StructuralType {
    type Err = InversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "joint" | "dike" | "dyke" => Ok(StructuralType::Joint),
            "stylolite" | "stylo" => Ok(StructuralType::Stylolite),
            _ => Err(InversionError::UnknownStructuralType(s.to_string())),
        }
    }
}

impl fmt::Display for StructuralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralType::Joint => write!(f, "joint"),
            StructuralType::Stylolite => write!(f, "stylolite"),
        }
    }
}

/// One measured fracture-plane normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    normal: Vector2<f64>,
    structural_type: StructuralType,
}

impl Observation {
    /// Creates an observation, normalizing `normal`. A zero normal stays zero.
    pub fn new(normal: Vector2<f64>, structural_type: StructuralType) -> Self {
        Self {
            normal: normalize(normal),
            structural_type,
        }
    }

    pub fn joint(x: f64, y: f64) -> Self {
        Self::new(Vector2::new(x, y), StructuralType::Joint)
    }

    pub fn stylolite(x: f64, y: f64) -> Self {
        Self::new(Vector2::new(x, y), StructuralType::Stylolite)
    }

    pub fn normal(&self) -> &Vector2<f64> {
        &self.normal
    }

    pub fn structural_type(&self) -> StructuralType {
        self.structural_type
    }

    /// Misfit against `state` under the standard pairing.
    pub fn cost(&self, state: &StressState) -> f64 {
        self.cost_with(state, Pairing::Standard)
    }

    #[inline]
    pub fn cost_with(&self, state: &StressState, pairing: Pairing) -> f64 {
        let predicted = state.direction(self.structural_type.axis(pairing));
        // rounding can push |n . S| a hair above 1
        (1.0 - dot(&self.normal, predicted).abs()).max(0.0)
    }

    /// The normal this fracture would have if it had formed under `state`.
    pub fn predicted_normal(&self, state: &StressState, pairing: Pairing) -> Vector2<f64> {
        *state.direction(self.structural_type.axis(pairing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_aliases() {
        assert_eq!("joint".parse::<StructuralType>().unwrap(), StructuralType::Joint);
        assert_eq!("Dyke".parse::<StructuralType>().unwrap(), StructuralType::Joint);
        assert_eq!("dike".parse::<StructuralType>().unwrap(), StructuralType::Joint);
        assert_eq!(
            " stylolite ".parse::<StructuralType>().unwrap(),
            StructuralType::Stylolite
        );
        assert!(matches!(
            "fault".parse::<StructuralType>(),
            Err(InversionError::UnknownStructuralType(_))
        ));
    }

    #[test]
    fn normals_are_normalized() {
        let obs = Observation::joint(0.0, 5.0);
        assert_eq!(obs.normal(), &Vector2::new(0.0, 1.0));
    }

    #[test]
    fn vertical_joint_fits_horizontal_s3() {
        let state = StressState::new(90.0, 1.0);
        let joint = Observation::joint(0.0, 1.0);
        assert!(joint.cost(&state) < 1e-12);
        // swapping the pairing scores the same joint against S1
        assert!((joint.cost_with(&state, Pairing::Swapped) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn opposite_types_are_complementary_on_axes() {
        let joint = Observation::joint(0.0, 1.0);
        let stylo = Observation::stylolite(0.0, 1.0);
        for theta in [0.0, 90.0, 180.0] {
            let state = StressState::new(theta, 1.0);
            let sum = joint.cost(&state) + stylo.cost(&state);
            assert!((sum - 1.0).abs() < 1e-12, "theta {}: {}", theta, sum);
        }
    }

    #[test]
    fn predicted_normal_follows_pairing() {
        let state = StressState::new(30.0, 0.5);
        let stylo = Observation::stylolite(1.0, 0.0);
        assert_eq!(stylo.predicted_normal(&state, Pairing::Standard), *state.s1());
        assert_eq!(stylo.predicted_normal(&state, Pairing::Swapped), *state.s3());
    }

    proptest! {
        #[test]
        fn cost_is_bounded(
            angle in 0.0f64..360.0,
            theta in 0.0f64..180.0,
            k in 0.0f64..=1.0,
        ) {
            let (y, x) = angle.to_radians().sin_cos();
            let state = StressState::new(theta, k);
            for obs in [Observation::joint(x, y), Observation::stylolite(x, y)] {
                let c = obs.cost(&state);
                prop_assert!((0.0..=1.0).contains(&c), "cost {}", c);
            }
        }

        #[test]
        fn squared_projections_sum_to_one(
            angle in 0.0f64..360.0,
            theta in 0.0f64..180.0,
            k in 1e-3f64..=1.0,
        ) {
            prop_assume!((theta % 90.0).min(90.0 - theta % 90.0) > 1e-3);
            let (y, x) = angle.to_radians().sin_cos();
            let state = StressState::new(theta, k);
            prop_assume!(!state.is_degenerate());
            let pj = 1.0 - Observation::joint(x, y).cost(&state);
            let ps = 1.0 - Observation::stylolite(x, y).cost(&state);
            prop_assert!((pj * pj + ps * ps - 1.0).abs() < 1e-6);
        }
    }
}
