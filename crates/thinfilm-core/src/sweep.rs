//! Sweep driver: evaluate a model along one axis and collect a curve.
//!
//! Samples are independent, so the parallel driver only changes how the
//! work is scheduled. Output order always matches input order, and both
//! drivers report the lowest failing sample index.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ReflectanceError, ReflectanceModel};
use crate::types::{CurvePoint, ReflectanceCurve, SweepAxis};

/// Errors from building or running a sweep.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    #[error("Sweep has no sample points")]
    EmptySweep,

    #[error("Sweep sample {index} is not finite")]
    NonFiniteSample { index: usize },

    #[error("Model expects a {expected} sweep but was given a {found} sweep")]
    AxisMismatch { expected: SweepAxis, found: SweepAxis },

    #[error("Sample {index} ({value:.6e}) failed: {source}")]
    Sample {
        index: usize,
        value: f64,
        #[source]
        source: ReflectanceError,
    },
}

/// The ordered sample points of a sweep along one axis.
///
/// Always non-empty and finite, including when deserialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSweep")]
pub struct SweepParameter {
    axis: SweepAxis,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawSweep {
    axis: SweepAxis,
    values: Vec<f64>,
}

impl TryFrom<RawSweep> for SweepParameter {
    type Error = SweepError;

    fn try_from(raw: RawSweep) -> Result<Self, Self::Error> {
        Self::from_values(raw.axis, raw.values)
    }
}

impl SweepParameter {
    /// Sweep over explicit sample values, kept in the given order.
    pub fn from_values(axis: SweepAxis, values: Vec<f64>) -> Result<Self, SweepError> {
        if values.is_empty() {
            return Err(SweepError::EmptySweep);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SweepError::NonFiniteSample { index });
        }
        Ok(Self { axis, values })
    }

    /// `points` evenly spaced samples from `start` to `end` inclusive.
    pub fn linspace(
        axis: SweepAxis,
        start: f64,
        end: f64,
        points: usize,
    ) -> Result<Self, SweepError> {
        let denom = (points.max(2) - 1) as f64;
        let values = (0..points)
            .map(|i| start + (end - start) * i as f64 / denom)
            .collect();
        Self::from_values(axis, values)
    }

    pub fn axis(&self) -> SweepAxis {
        self.axis
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn check_axis<M: ReflectanceModel + ?Sized>(
    model: &M,
    sweep: &SweepParameter,
) -> Result<(), SweepError> {
    if model.axis() == sweep.axis() {
        Ok(())
    } else {
        Err(SweepError::AxisMismatch {
            expected: model.axis(),
            found: sweep.axis(),
        })
    }
}

fn sample_error(index: usize, value: f64, source: ReflectanceError) -> SweepError {
    SweepError::Sample {
        index,
        value,
        source,
    }
}

/// Evaluate `model` at every sample, in order.
pub fn sweep<M: ReflectanceModel + ?Sized>(
    model: &M,
    sweep: &SweepParameter,
) -> Result<ReflectanceCurve, SweepError> {
    check_axis(model, sweep)?;
    log::debug!(
        "Sweeping '{}' over {} {} samples",
        model.model_name(),
        sweep.len(),
        sweep.axis()
    );

    let points = sweep
        .values()
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            model
                .reflectance_at(value)
                .map(|reflectance_percent| CurvePoint {
                    sweep_value: value,
                    reflectance_percent,
                })
                .map_err(|e| sample_error(index, value, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReflectanceCurve {
        axis: sweep.axis(),
        points,
    })
}

/// Evaluate `model` at every sample across the Rayon thread pool.
///
/// Produces exactly what [`sweep`] produces, including which sample is
/// reported on failure.
#[cfg(feature = "parallel")]
pub fn sweep_parallel<M: ReflectanceModel + ?Sized>(
    model: &M,
    sweep: &SweepParameter,
) -> Result<ReflectanceCurve, SweepError> {
    use rayon::prelude::*;

    check_axis(model, sweep)?;
    log::debug!(
        "Sweeping '{}' over {} {} samples ({} threads)",
        model.model_name(),
        sweep.len(),
        sweep.axis(),
        rayon::current_num_threads()
    );

    let results: Vec<Result<f64, ReflectanceError>> = sweep
        .values()
        .par_iter()
        .map(|&value| model.reflectance_at(value))
        .collect();

    let points = sweep
        .values()
        .iter()
        .zip(results)
        .enumerate()
        .map(|(index, (&value, result))| {
            result
                .map(|reflectance_percent| CurvePoint {
                    sweep_value: value,
                    reflectance_percent,
                })
                .map_err(|e| sample_error(index, value, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReflectanceCurve {
        axis: sweep.axis(),
        points,
    })
}

/// Element-wise reflectance over an array of samples on the model's own axis.
pub fn evaluate_array<M: ReflectanceModel + ?Sized>(
    model: &M,
    samples: &Array1<f64>,
) -> Result<Array1<f64>, SweepError> {
    let mut out = Array1::zeros(samples.len());
    for (index, (slot, &value)) in out.iter_mut().zip(samples.iter()).enumerate() {
        *slot = model
            .reflectance_at(value)
            .map_err(|e| sample_error(index, value, e))?;
    }
    Ok(out)
}
