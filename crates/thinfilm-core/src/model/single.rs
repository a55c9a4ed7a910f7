//! Single-layer film on a substrate, incident medium air.
//!
//! Two-interface (Airy-type) closed form in terms of the film phase δ:
//!
//! $$R = \frac{n_1^2 (1 - n_s)^2 \cos^2\delta + (n_s - n_1^2)^2 \sin^2\delta}
//!            {n_1^2 (1 + n_s)^2 \cos^2\delta + (n_s + n_1^2)^2 \sin^2\delta}$$
//!
//! Every numerator term is bounded by its denominator counterpart, so the
//! result lies in [0, 100] % and the denominator is strictly positive for
//! positive indices. It is evaluated with n₁² divided out of both sides and
//! the sums of squares taken through `hypot`, so extreme indices neither
//! overflow nor underflow. A result that still cannot be represented is
//! reported as [`ReflectanceError::NumericalInstability`].

use super::{check_finite, check_index, ReflectanceError, ReflectanceModel};
use crate::types::{OpticalMedium, SweepAxis};

/// Reflectance (%) of a single film of index `n_film` on `n_substrate` at phase `phase` (rad).
///
/// The phase convention is the caller's; the formula is π-periodic in δ.
pub fn reflect_single(n_substrate: f64, n_film: f64, phase: f64) -> Result<f64, ReflectanceError> {
    let ns = check_index("n_substrate", n_substrate)?;
    let n1 = check_index("n_film", n_film)?;
    let delta = check_finite("phase", phase)?;

    let (sin_d, cos_d) = delta.sin_cos();
    let ratio = ns / n1;

    // Both sides divided by n1²: (ns - n1²)² / n1² = (ns/n1 - n1)².
    let numerator = ((1.0 - ns) * cos_d).hypot((ratio - n1) * sin_d);
    let denominator = ((1.0 + ns) * cos_d).hypot((ratio + n1) * sin_d);
    let amplitude = numerator / denominator;

    if !amplitude.is_finite() {
        return Err(ReflectanceError::NumericalInstability {
            denominator,
            amplitude,
        });
    }
    Ok(amplitude * amplitude * 100.0)
}

/// Single-layer film swept directly over the phase δ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleLayer {
    pub substrate: OpticalMedium,
    pub film: OpticalMedium,
}

impl SingleLayer {
    pub fn new(substrate: OpticalMedium, film: OpticalMedium) -> Self {
        Self { substrate, film }
    }

    /// The same substrate with no coating (film index equals substrate index).
    pub fn uncoated(substrate: OpticalMedium) -> Self {
        Self::new(substrate, substrate)
    }
}

impl ReflectanceModel for SingleLayer {
    fn axis(&self) -> SweepAxis {
        SweepAxis::Phase
    }

    fn reflectance_at(&self, phase: f64) -> Result<f64, ReflectanceError> {
        reflect_single(self.substrate.index(), self.film.index(), phase)
    }

    fn model_name(&self) -> &str {
        "single"
    }
}

/// Single-layer film swept over an optical path difference ratio.
///
/// The phase is formed as `δ = ratio × reference_wavelength_m`, with no 2π
/// factor and no angle term. Callers that want the textbook phase should
/// sweep [`SingleLayer`] over δ instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleLayerRatio {
    pub layer: SingleLayer,
    /// Wavelength multiplied into each ratio sample (metres).
    pub reference_wavelength_m: f64,
}

impl SingleLayerRatio {
    pub fn new(layer: SingleLayer, reference_wavelength_m: f64) -> Result<Self, ReflectanceError> {
        Ok(Self {
            layer,
            reference_wavelength_m: super::check_wavelength(reference_wavelength_m)?,
        })
    }
}

impl ReflectanceModel for SingleLayerRatio {
    fn axis(&self) -> SweepAxis {
        SweepAxis::PathDifferenceRatio
    }

    fn reflectance_at(&self, ratio: f64) -> Result<f64, ReflectanceError> {
        let ratio = check_finite("path_difference_ratio", ratio)?;
        self.layer.reflectance_at(ratio * self.reference_wavelength_m)
    }

    fn model_name(&self) -> &str {
        "single_ratio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fresnel::uncoated_reflectance;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_uncoated_glass_is_phase_independent() {
        for i in 0..50 {
            let delta = -3.0 + 0.37 * i as f64;
            let r = reflect_single(1.52, 1.52, delta).unwrap();
            assert_relative_eq!(r, 4.257999496094735, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_zero_phase_equals_bare_substrate() {
        // At δ = 0 the film is optically absent regardless of its index.
        let r = reflect_single(1.52, 1.38, 0.0).unwrap();
        assert_relative_eq!(r, uncoated_reflectance(1.52), max_relative = 1e-12);
    }

    #[test]
    fn test_quarter_wave_mgf2_on_crown_glass() {
        let r = reflect_single(1.52, 1.38, FRAC_PI_2).unwrap();
        assert_relative_eq!(r, 1.2600790214630286, max_relative = 1e-9);
    }

    #[test]
    fn test_ideal_antireflection_index_nulls_quarter_wave() {
        let n_ideal = crate::fresnel::ideal_antireflection_index(1.0, 1.52);
        let r = reflect_single(1.52, n_ideal, FRAC_PI_2).unwrap();
        assert!(r < 1e-12, "R = {r}");
    }

    #[test]
    fn test_periodic_in_pi() {
        for &n1 in &[1.2, 1.4, 1.6, 1.8, 2.0] {
            for i in 0..40 {
                let delta = 0.11 * i as f64 - 2.0;
                let a = reflect_single(1.52, n1, delta).unwrap();
                let b = reflect_single(1.52, n1, delta + PI).unwrap();
                assert_relative_eq!(a, b, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_bounded_for_valid_inputs() {
        for &ns in &[1.0, 1.33, 1.52, 2.4, 4.0] {
            for &n1 in &[0.5, 1.2, 1.38, 2.1, 2.4, 3.5] {
                for i in 0..64 {
                    let r = reflect_single(ns, n1, 0.1 * i as f64).unwrap();
                    assert!((0.0..=100.0).contains(&r), "R({ns}, {n1}) = {r}");
                }
            }
        }
    }

    #[test]
    fn test_extreme_indices_stay_finite() {
        // n1² would overflow or underflow if formed directly.
        let r = reflect_single(1.52, 1e160, 0.3).unwrap();
        assert_relative_eq!(r, 100.0, max_relative = 1e-12);

        let r = reflect_single(1.52, 1e-200, 0.0).unwrap();
        assert_relative_eq!(r, uncoated_reflectance(1.52), max_relative = 1e-12);

        let r = reflect_single(1e-200, 1e-200, 0.0).unwrap();
        assert_relative_eq!(r, 100.0, max_relative = 1e-12);

        for &n1 in &[1e-300, 1e-200, 1e-20, 1e20, 1e150, 1e300] {
            for i in 0..16 {
                let r = reflect_single(1.52, n1, 0.2 * i as f64).unwrap();
                assert!((0.0..=100.0).contains(&r), "R(1.52, {n1}) = {r}");
            }
        }
    }

    #[test]
    fn test_unrepresentable_result_is_an_error_not_nan() {
        // ns / n1 overflows to infinity.
        let result = reflect_single(1e300, 1e-10, 0.3);
        assert!(matches!(result, Err(ReflectanceError::NumericalInstability { .. })));
    }

    #[test]
    fn test_rejects_invalid_index_before_computing() {
        let err = reflect_single(1.52, -1.0, 0.3).unwrap_err();
        assert_eq!(
            err,
            ReflectanceError::InvalidInput {
                parameter: "n_film",
                value: -1.0,
                constraint: "finite and > 0",
            }
        );
        assert!(reflect_single(0.0, 1.38, 0.3).is_err());
        assert!(reflect_single(1.52, 1.38, f64::NAN).is_err());
    }

    #[test]
    fn test_ratio_model_uses_ratio_times_wavelength() {
        let layer = SingleLayer::new(
            OpticalMedium::new(1.52).unwrap(),
            OpticalMedium::new(1.6).unwrap(),
        );
        let ratio = SingleLayerRatio::new(layer, 500e-9).unwrap();
        let sample = 2.0e6;
        assert_eq!(
            ratio.reflectance_at(sample).unwrap(),
            layer.reflectance_at(sample * 500e-9).unwrap()
        );
        assert_eq!(ratio.axis(), SweepAxis::PathDifferenceRatio);
    }
}
