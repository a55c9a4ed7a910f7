//! Reflectance models and the trait the sweep driver runs against.
//!
//! Each submodule exposes a free function with the bare formula (scalar
//! arguments, validated on entry) and a small model struct that binds the
//! fixed parameters so the formula can be evaluated along one
//! [`SweepAxis`].
//!
//! | Model | Axis | Module |
//! |-------|------|--------|
//! | [`SingleLayer`] | phase δ | [`single`] |
//! | [`SingleLayerRatio`] | δ/λ ratio | [`single`] |
//! | [`DoubleLayer`] | wavelength | [`double`] |
//! | [`QuarterWaveFlat`] | any (constant) | [`flat`] |
//! | [`DoubleLayerOblique`] | wavelength | [`oblique`] |
//! | [`DoubleLayerObliqueAngle`] | angle of incidence | [`oblique`] |

pub mod double;
pub mod flat;
pub mod oblique;
pub mod single;

pub use double::{reflect_double, reflect_double_spectrum, reflect_double_with_policy, DoubleLayer};
pub use flat::{reflect_double_flat, QuarterWaveFlat};
pub use oblique::{
    reflect_double_oblique, reflect_double_oblique_with_policy, DoubleLayerOblique,
    DoubleLayerObliqueAngle,
};
pub use single::{reflect_single, SingleLayer, SingleLayerRatio};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SweepAxis;

/// Denominator magnitude below which a closed form is considered resonant.
pub const RESONANCE_EPSILON: f64 = 1e-9;

/// Reflectance (%) reported for a saturated sample.
pub const SATURATED_REFLECTANCE: f64 = 100.0;

/// Errors that can occur while evaluating a reflectance formula.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReflectanceError {
    #[error("Invalid input: {parameter} = {value} (must be {constraint})")]
    InvalidInput {
        parameter: &'static str,
        value: f64,
        constraint: &'static str,
    },

    #[error(
        "Numerical instability: denominator |D| = {denominator:.3e}, amplitude |r| = {amplitude:.3e}"
    )]
    NumericalInstability { denominator: f64, amplitude: f64 },

    #[error(
        "Closed form left the physical range: amplitude |r| = {amplitude:.3e} exceeds 1 (R > 100 %)"
    )]
    OutsidePhysicalRange { amplitude: f64 },
}

/// What to do when a closed form approaches its resonance or leaves its
/// physical range.
///
/// A denominator magnitude below [`RESONANCE_EPSILON`] is a resonance
/// ([`ReflectanceError::NumericalInstability`]). An amplitude ratio above one
/// with a well-conditioned denominator would put the reflectance above 100 %
/// ([`ReflectanceError::OutsidePhysicalRange`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResonancePolicy {
    /// Fail with the matching [`ReflectanceError`].
    #[default]
    Reject,
    /// Report [`SATURATED_REFLECTANCE`] instead.
    Saturate,
}

impl ResonancePolicy {
    /// Check an amplitude ratio given as magnitudes `|N| / |D|`.
    ///
    /// Returns `Ok(None)` when the ratio is safe to use and
    /// `Ok(Some(saturated))` when the policy replaces it.
    pub(crate) fn check(
        self,
        numerator: f64,
        denominator: f64,
    ) -> Result<Option<f64>, ReflectanceError> {
        let resonant = denominator < RESONANCE_EPSILON;
        if !resonant && numerator <= denominator {
            return Ok(None);
        }
        let amplitude = numerator / denominator;
        match self {
            ResonancePolicy::Reject if resonant => Err(ReflectanceError::NumericalInstability {
                denominator,
                amplitude,
            }),
            ResonancePolicy::Reject => Err(ReflectanceError::OutsidePhysicalRange { amplitude }),
            ResonancePolicy::Saturate => {
                log::warn!(
                    "Saturating reflectance: |D| = {:.3e}, |r| = {:.3e}",
                    denominator,
                    amplitude
                );
                Ok(Some(SATURATED_REFLECTANCE))
            }
        }
    }
}

/// A reflectance formula with all but one parameter fixed.
///
/// The sweep driver only sees this trait, so new formulas plug into
/// [`crate::sweep`] without changes there.
pub trait ReflectanceModel: Send + Sync {
    /// The quantity that [`reflectance_at`](Self::reflectance_at) expects.
    fn axis(&self) -> SweepAxis;

    /// Reflectance (%) at one sample of [`axis`](Self::axis).
    fn reflectance_at(&self, sample: f64) -> Result<f64, ReflectanceError>;

    /// Short human-readable identifier.
    fn model_name(&self) -> &str;
}

pub(crate) fn check_index(parameter: &'static str, value: f64) -> Result<f64, ReflectanceError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ReflectanceError::InvalidInput {
            parameter,
            value,
            constraint: "finite and > 0",
        })
    }
}

pub(crate) fn check_thickness(parameter: &'static str, value: f64) -> Result<f64, ReflectanceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ReflectanceError::InvalidInput {
            parameter,
            value,
            constraint: "finite and >= 0",
        })
    }
}

pub(crate) fn check_wavelength(value: f64) -> Result<f64, ReflectanceError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ReflectanceError::InvalidInput {
            parameter: "wavelength",
            value,
            constraint: "finite and > 0",
        })
    }
}

pub(crate) fn check_finite(parameter: &'static str, value: f64) -> Result<f64, ReflectanceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ReflectanceError::InvalidInput {
            parameter,
            value,
            constraint: "finite",
        })
    }
}

pub(crate) fn check_angle_deg(value: f64) -> Result<f64, ReflectanceError> {
    if value.is_finite() && (0.0..90.0).contains(&value) {
        Ok(value)
    } else {
        Err(ReflectanceError::InvalidInput {
            parameter: "angle_deg",
            value,
            constraint: "in [0, 90) degrees",
        })
    }
}
