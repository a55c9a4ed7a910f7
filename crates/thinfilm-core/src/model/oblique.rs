//! Real-valued two-layer approximation with an incidence-angle term.
//!
//! Uses a single shared thickness `t` and the film-1 round-trip phase
//! $\delta = 4\pi n_1 t \cos\theta / \lambda$:
//!
//! $$R = \left|\frac{(n_s^2 - n_2^2 + 2 n_1 n_s)\cos\delta + 2 n_1 (n_1 - n_2)\sin\delta}
//!                  {(n_s^2 + n_2^2 + 2 n_1 n_s)\cos\delta + 2 n_1 (n_1 - n_2)\sin\delta}\right|^2 \times 100$$
//!
//! This does not agree with [`super::double`]. The denominator crosses zero
//! wherever the cosine and sine terms cancel, so every sample is checked
//! against the [`ResonancePolicy`].

use std::f64::consts::PI;

use super::{
    check_angle_deg, check_index, check_thickness, check_wavelength, ReflectanceError,
    ReflectanceModel, ResonancePolicy,
};
use crate::types::{OpticalMedium, SweepAxis};

/// Reflectance (%) of the oblique approximation, rejecting unstable samples.
pub fn reflect_double_oblique(
    n_substrate: f64,
    n1: f64,
    n2: f64,
    thickness: f64,
    wavelength: f64,
    angle_deg: f64,
) -> Result<f64, ReflectanceError> {
    reflect_double_oblique_with_policy(
        n_substrate,
        n1,
        n2,
        thickness,
        wavelength,
        angle_deg,
        ResonancePolicy::Reject,
    )
}

/// [`reflect_double_oblique`] with an explicit resonance policy.
pub fn reflect_double_oblique_with_policy(
    n_substrate: f64,
    n1: f64,
    n2: f64,
    thickness: f64,
    wavelength: f64,
    angle_deg: f64,
    policy: ResonancePolicy,
) -> Result<f64, ReflectanceError> {
    let ns = check_index("n_substrate", n_substrate)?;
    let n1 = check_index("n1", n1)?;
    let n2 = check_index("n2", n2)?;
    let t = check_thickness("thickness", thickness)?;
    let wavelength = check_wavelength(wavelength)?;
    let theta = check_angle_deg(angle_deg)?.to_radians();

    let delta = 4.0 * PI * n1 * t / wavelength * theta.cos();
    let (sin_d, cos_d) = delta.sin_cos();
    let cross = 2.0 * n1 * (n1 - n2) * sin_d;

    let numerator = (ns * ns - n2 * n2 + 2.0 * n1 * ns) * cos_d + cross;
    let denominator = (ns * ns + n2 * n2 + 2.0 * n1 * ns) * cos_d + cross;

    if let Some(saturated) = policy.check(numerator.abs(), denominator.abs())? {
        return Ok(saturated);
    }

    let r = numerator / denominator;
    Ok(r * r * 100.0)
}

/// Oblique two-layer model evaluated across wavelength at a fixed angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleLayerOblique {
    pub substrate: OpticalMedium,
    pub n1: OpticalMedium,
    pub n2: OpticalMedium,
    /// Shared layer thickness (metres).
    pub thickness_m: f64,
    pub angle_deg: f64,
    pub policy: ResonancePolicy,
}

impl DoubleLayerOblique {
    pub fn new(
        substrate: OpticalMedium,
        n1: OpticalMedium,
        n2: OpticalMedium,
        thickness_m: f64,
        angle_deg: f64,
    ) -> Result<Self, ReflectanceError> {
        Ok(Self {
            substrate,
            n1,
            n2,
            thickness_m: check_thickness("thickness", thickness_m)?,
            angle_deg: check_angle_deg(angle_deg)?,
            policy: ResonancePolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: ResonancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The same stack swept over angle at a fixed wavelength.
    ///
    /// The angle this model was built with is not used by the result.
    pub fn at_wavelength(
        &self,
        wavelength_m: f64,
    ) -> Result<DoubleLayerObliqueAngle, ReflectanceError> {
        Ok(DoubleLayerObliqueAngle {
            substrate: self.substrate,
            n1: self.n1,
            n2: self.n2,
            thickness_m: self.thickness_m,
            wavelength_m: check_wavelength(wavelength_m)?,
            policy: self.policy,
        })
    }
}

/// Oblique two-layer model evaluated across angle of incidence (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleLayerObliqueAngle {
    pub substrate: OpticalMedium,
    pub n1: OpticalMedium,
    pub n2: OpticalMedium,
    pub thickness_m: f64,
    pub wavelength_m: f64,
    pub policy: ResonancePolicy,
}

impl ReflectanceModel for DoubleLayerObliqueAngle {
    fn axis(&self) -> SweepAxis {
        SweepAxis::IncidenceAngle
    }

    fn reflectance_at(&self, angle_deg: f64) -> Result<f64, ReflectanceError> {
        reflect_double_oblique_with_policy(
            self.substrate.index(),
            self.n1.index(),
            self.n2.index(),
            self.thickness_m,
            self.wavelength_m,
            angle_deg,
            self.policy,
        )
    }

    fn model_name(&self) -> &str {
        "double_oblique_angle"
    }
}

impl ReflectanceModel for DoubleLayerOblique {
    fn axis(&self) -> SweepAxis {
        SweepAxis::Wavelength
    }

    fn reflectance_at(&self, wavelength_m: f64) -> Result<f64, ReflectanceError> {
        reflect_double_oblique_with_policy(
            self.substrate.index(),
            self.n1.index(),
            self.n2.index(),
            self.thickness_m,
            wavelength_m,
            self.angle_deg,
            self.policy,
        )
    }

    fn model_name(&self) -> &str {
        "double_oblique"
    }
}
