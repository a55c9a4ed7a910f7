//! Core value types shared across the thinfilm workspace.
//!
//! Everything here is a small immutable value: media, layers, stacks,
//! sweep definitions and the curves produced from them. Nothing outlives
//! a single computation except what the caller chooses to keep.

use serde::{Deserialize, Serialize};

use crate::model::{check_index, check_thickness, ReflectanceError};

/// A non-absorbing optical medium described by its real refractive index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct OpticalMedium {
    n: f64,
}

impl OpticalMedium {
    /// Vacuum / air, n = 1.
    pub const AIR: OpticalMedium = OpticalMedium { n: 1.0 };

    /// Create a medium, rejecting non-positive or non-finite indices.
    pub fn new(n: f64) -> Result<Self, ReflectanceError> {
        Ok(Self {
            n: check_index("refractive_index", n)?,
        })
    }

    /// Refractive index (dimensionless).
    pub fn index(&self) -> f64 {
        self.n
    }
}

impl TryFrom<f64> for OpticalMedium {
    type Error = ReflectanceError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<OpticalMedium> for f64 {
    fn from(medium: OpticalMedium) -> Self {
        medium.n
    }
}

/// A homogeneous film of given index and physical thickness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Film material.
    pub medium: OpticalMedium,
    /// Physical thickness (metres).
    pub thickness_m: f64,
}

impl Layer {
    /// Create a layer, rejecting negative or non-finite thickness.
    pub fn new(medium: OpticalMedium, thickness_m: f64) -> Result<Self, ReflectanceError> {
        Ok(Self {
            medium,
            thickness_m: check_thickness("thickness", thickness_m)?,
        })
    }

    /// Layer whose optical thickness `n·d` is a quarter of `design_wavelength_m`.
    pub fn quarter_wave(
        medium: OpticalMedium,
        design_wavelength_m: f64,
    ) -> Result<Self, ReflectanceError> {
        Self::new(medium, design_wavelength_m / (4.0 * medium.index()))
    }
}

/// Ordered sequence of layers between an incident medium and a substrate.
///
/// `layers[0]` touches the incident medium and the last layer touches the
/// substrate. Reversing the order describes a different physical coating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    pub incident: OpticalMedium,
    pub layers: Vec<Layer>,
    pub substrate: OpticalMedium,
}

impl Stack {
    pub fn new(incident: OpticalMedium, layers: Vec<Layer>, substrate: OpticalMedium) -> Self {
        Self {
            incident,
            layers,
            substrate,
        }
    }

    /// Stack in air on the given substrate.
    pub fn in_air(layers: Vec<Layer>, substrate: OpticalMedium) -> Self {
        Self::new(OpticalMedium::AIR, layers, substrate)
    }
}

/// The scalar varied across a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    /// Vacuum wavelength (metres).
    Wavelength,
    /// Dimensionless optical path difference ratio δ/λ.
    PathDifferenceRatio,
    /// Film phase thickness δ (radians).
    Phase,
    /// Angle of incidence (degrees).
    IncidenceAngle,
}

impl SweepAxis {
    /// Axis title used by plotting front-ends.
    pub fn title(&self) -> &'static str {
        match self {
            SweepAxis::Wavelength => "Wavelength (nm)",
            SweepAxis::PathDifferenceRatio => "Optical Path Difference Ratio (δ/λ)",
            SweepAxis::Phase => "Phase δ (rad)",
            SweepAxis::IncidenceAngle => "Angle of Incidence (°)",
        }
    }

    /// Factor converting a core sample value into the unit shown in [`title`](Self::title).
    ///
    /// Wavelengths are stored in metres but presented in nanometres.
    pub fn display_scale(&self) -> f64 {
        match self {
            SweepAxis::Wavelength => 1e9,
            _ => 1.0,
        }
    }
}

impl std::fmt::Display for SweepAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SweepAxis::Wavelength => "wavelength",
            SweepAxis::PathDifferenceRatio => "path_difference_ratio",
            SweepAxis::Phase => "phase",
            SweepAxis::IncidenceAngle => "incidence_angle",
        };
        f.write_str(name)
    }
}

/// One reflectance sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Sweep value in core units (metres for wavelength).
    pub sweep_value: f64,
    /// Reflectance (%), in [0, 100].
    pub reflectance_percent: f64,
}

/// Reflectance as a function of the swept parameter.
///
/// Always the same length and order as the sweep that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectanceCurve {
    pub axis: SweepAxis,
    pub points: Vec<CurvePoint>,
}

impl ReflectanceCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sweep values in core units.
    pub fn sweep_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.sweep_value).collect()
    }

    /// Reflectance values (%).
    pub fn reflectance(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.reflectance_percent).collect()
    }

    /// Sample with the highest reflectance, if any.
    pub fn peak(&self) -> Option<CurvePoint> {
        self.points
            .iter()
            .copied()
            .max_by(|a, b| a.reflectance_percent.total_cmp(&b.reflectance_percent))
    }

    /// Sample with the lowest reflectance, if any.
    pub fn minimum(&self) -> Option<CurvePoint> {
        self.points
            .iter()
            .copied()
            .min_by(|a, b| a.reflectance_percent.total_cmp(&b.reflectance_percent))
    }
}
