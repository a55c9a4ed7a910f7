//! Two-layer film with phase accumulation across the interfaces.
//!
//! Interface coefficients $r_{01}, r_{12}, r_{2s}$ and one-way phase
//! thicknesses $\phi_j = 2\pi n_j d_j / \lambda$ combine as
//!
//! $$r = \frac{r_{01} + r_{12} e^{i\phi_1}}{1 + r_{12} r_{2s} e^{2i\phi_1}} e^{i\phi_2},
//! \qquad R = |r|^2 \times 100.$$
//!
//! The denominator vanishes when $r_{12} r_{2s} e^{2i\phi_1} \to -1$, and the
//! amplitude is not bounded by one for every index combination, so results
//! go through [`ResonancePolicy`].

use ndarray::Array1;
use num_complex::Complex64;
use std::f64::consts::PI;

use super::{
    check_index, check_thickness, check_wavelength, ReflectanceError, ReflectanceModel,
    ResonancePolicy,
};
use crate::fresnel::amplitude_coefficient;
use crate::types::{Layer, OpticalMedium, Stack, SweepAxis};

/// Reflectance (%) of a two-layer stack, rejecting resonant samples.
///
/// # Arguments
/// * `n0` - Incident medium index.
/// * `n_substrate` - Substrate index.
/// * `n1`, `n2` - Layer indices, layer 1 adjacent to the incident medium.
/// * `d1`, `d2` - Layer thicknesses (same unit as `wavelength`).
/// * `wavelength` - Vacuum wavelength.
pub fn reflect_double(
    n0: f64,
    n_substrate: f64,
    n1: f64,
    n2: f64,
    d1: f64,
    d2: f64,
    wavelength: f64,
) -> Result<f64, ReflectanceError> {
    reflect_double_with_policy(n0, n_substrate, n1, n2, d1, d2, wavelength, ResonancePolicy::Reject)
}

/// [`reflect_double`] with an explicit resonance policy.
#[allow(clippy::too_many_arguments)]
pub fn reflect_double_with_policy(
    n0: f64,
    n_substrate: f64,
    n1: f64,
    n2: f64,
    d1: f64,
    d2: f64,
    wavelength: f64,
    policy: ResonancePolicy,
) -> Result<f64, ReflectanceError> {
    let coefficients = Coefficients::new(n0, n_substrate, n1, n2)?;
    let d1 = check_thickness("d1", d1)?;
    let d2 = check_thickness("d2", d2)?;
    let wavelength = check_wavelength(wavelength)?;
    coefficients.reflectance(n1, n2, d1, d2, wavelength, policy)
}

/// Vectorised [`reflect_double`] over a wavelength array.
///
/// Fails on the first sample that is invalid or resonant.
pub fn reflect_double_spectrum(
    model: &DoubleLayer,
    wavelengths: &Array1<f64>,
) -> Result<Array1<f64>, ReflectanceError> {
    let mut out = Array1::zeros(wavelengths.len());
    for (slot, &wl) in out.iter_mut().zip(wavelengths.iter()) {
        *slot = model.reflectance_at(wl)?;
    }
    Ok(out)
}

/// Interface coefficients, fixed for a given set of indices.
#[derive(Debug, Clone, Copy)]
struct Coefficients {
    r01: f64,
    r12: f64,
    r2s: f64,
}

impl Coefficients {
    fn new(n0: f64, ns: f64, n1: f64, n2: f64) -> Result<Self, ReflectanceError> {
        let n0 = check_index("n0", n0)?;
        let ns = check_index("n_substrate", ns)?;
        let n1 = check_index("n1", n1)?;
        let n2 = check_index("n2", n2)?;
        Ok(Self {
            r01: amplitude_coefficient(n0, n1),
            r12: amplitude_coefficient(n1, n2),
            r2s: amplitude_coefficient(n2, ns),
        })
    }

    fn reflectance(
        &self,
        n1: f64,
        n2: f64,
        d1: f64,
        d2: f64,
        wavelength: f64,
        policy: ResonancePolicy,
    ) -> Result<f64, ReflectanceError> {
        let phi1 = 2.0 * PI * n1 * d1 / wavelength;
        let phi2 = 2.0 * PI * n2 * d2 / wavelength;

        let numerator = self.r01 + self.r12 * Complex64::new(0.0, phi1).exp();
        let denominator = 1.0 + self.r12 * self.r2s * Complex64::new(0.0, 2.0 * phi1).exp();

        if let Some(saturated) = policy.check(numerator.norm(), denominator.norm())? {
            return Ok(saturated);
        }

        let r_total = numerator / denominator * Complex64::new(0.0, phi2).exp();
        Ok(r_total.norm_sqr() * 100.0)
    }
}

/// A two-layer coating evaluated across wavelength.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleLayer {
    pub incident: OpticalMedium,
    pub substrate: OpticalMedium,
    /// Layer adjacent to the incident medium.
    pub outer: Layer,
    /// Layer adjacent to the substrate.
    pub inner: Layer,
    pub policy: ResonancePolicy,
}

impl DoubleLayer {
    pub fn new(
        incident: OpticalMedium,
        substrate: OpticalMedium,
        outer: Layer,
        inner: Layer,
    ) -> Self {
        Self {
            incident,
            substrate,
            outer,
            inner,
            policy: ResonancePolicy::default(),
        }
    }

    /// Build from a stack with exactly two layers.
    pub fn from_stack(stack: &Stack) -> Result<Self, ReflectanceError> {
        match stack.layers.as_slice() {
            [outer, inner] => Ok(Self::new(stack.incident, stack.substrate, *outer, *inner)),
            layers => Err(ReflectanceError::InvalidInput {
                parameter: "layer_count",
                value: layers.len() as f64,
                constraint: "exactly 2 for a double-layer model",
            }),
        }
    }

    pub fn with_policy(mut self, policy: ResonancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The stack this model describes.
    pub fn stack(&self) -> Stack {
        Stack::new(self.incident, vec![self.outer, self.inner], self.substrate)
    }
}

impl ReflectanceModel for DoubleLayer {
    fn axis(&self) -> SweepAxis {
        SweepAxis::Wavelength
    }

    fn reflectance_at(&self, wavelength_m: f64) -> Result<f64, ReflectanceError> {
        reflect_double_with_policy(
            self.incident.index(),
            self.substrate.index(),
            self.outer.medium.index(),
            self.inner.medium.index(),
            self.outer.thickness_m,
            self.inner.thickness_m,
            wavelength_m,
            self.policy,
        )
    }

    fn model_name(&self) -> &str {
        "double"
    }
}
