//! # Thinfilm Core
//!
//! Closed-form reflectance of thin-film coatings at normal (or near-normal)
//! incidence. The crate is purely numeric: formulas take refractive indices,
//! thicknesses and a sweep sample, and return reflectance in percent.
//! Rendering is left to whatever implements [`figure::FigureSink`].
//!
//! ## Architecture
//!
//! Every formula is wrapped in a model implementing
//! [`model::ReflectanceModel`], which fixes all parameters but one. The
//! [`sweep`] driver evaluates a model along a [`sweep::SweepParameter`] and
//! returns a [`types::ReflectanceCurve`].
//!
//! ## Modules
//!
//! - [`types`]: Media, layers, stacks, sweep axes and curves.
//! - [`fresnel`]: Single-interface Fresnel relations.
//! - [`model`]: Single-layer, double-layer, flat quarter-wave and oblique formulas.
//! - [`sweep`]: Serial and parallel sweep drivers.
//! - [`figure`]: Labelled figures and the output sink trait.

pub mod figure;
pub mod fresnel;
pub mod model;
pub mod sweep;
pub mod types;

pub use model::{
    reflect_double, reflect_double_flat, reflect_double_oblique, reflect_single,
    ReflectanceError, ReflectanceModel, ResonancePolicy,
};
pub use sweep::{SweepError, SweepParameter};
pub use types::{CurvePoint, Layer, OpticalMedium, ReflectanceCurve, Stack, SweepAxis};
