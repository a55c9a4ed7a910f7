//! Quarter-wave double layer with the phase pinned at π/2.
//!
//! Both layers are taken as quarter-wave at every wavelength, so only the
//! real reflection coefficients enter:
//!
//! $$R = \left|\frac{r_1 + r_2}{1 + r_1 r_2}\right|^2 \times 100,
//! \quad r_1 = \frac{n_0 - n_1}{n_0 + n_1},\ r_2 = \frac{n_1 - n_2}{n_1 + n_2},\ n_0 = 1.$$
//!
//! Thickness and wavelength drop out by construction, and the substrate
//! index never appears. The composition of two Fresnel coefficients
//! collapses to the bare coefficient between n0 and n2, so this is a flat
//! line at the reflectance of an uncoated n2 surface.

use super::{check_index, ReflectanceError, ReflectanceModel};
use crate::fresnel::amplitude_coefficient;
use crate::types::{OpticalMedium, SweepAxis};

/// Reflectance (%) of the flat quarter-wave approximation.
pub fn reflect_double_flat(n1: f64, n2: f64) -> Result<f64, ReflectanceError> {
    let n1 = check_index("n1", n1)?;
    let n2 = check_index("n2", n2)?;

    let r1 = amplitude_coefficient(1.0, n1);
    let r2 = amplitude_coefficient(n1, n2);
    let r = (r1 + r2) / (1.0 + r1 * r2);
    Ok(r * r * 100.0)
}

/// Constant-valued model for [`reflect_double_flat`], plotted on any axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuarterWaveFlat {
    pub n1: OpticalMedium,
    pub n2: OpticalMedium,
    axis: SweepAxis,
}

impl QuarterWaveFlat {
    /// Flat model reported against wavelength.
    pub fn new(n1: OpticalMedium, n2: OpticalMedium) -> Self {
        Self {
            n1,
            n2,
            axis: SweepAxis::Wavelength,
        }
    }

    /// Report against a different axis; the value is the same everywhere.
    pub fn on_axis(mut self, axis: SweepAxis) -> Self {
        self.axis = axis;
        self
    }
}

impl ReflectanceModel for QuarterWaveFlat {
    fn axis(&self) -> SweepAxis {
        self.axis
    }

    fn reflectance_at(&self, _sample: f64) -> Result<f64, ReflectanceError> {
        reflect_double_flat(self.n1.index(), self.n2.index())
    }

    fn model_name(&self) -> &str {
        "double_flat"
    }
}
