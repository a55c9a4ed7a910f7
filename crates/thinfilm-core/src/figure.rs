//! Presentation data handed to an external plotting or export sink.
//!
//! The core never renders anything. A [`Figure`] bundles labelled curves
//! that share one sweep axis, plus horizontal reference lines, and a
//! [`FigureSink`] decides what to do with it.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::types::{ReflectanceCurve, SweepAxis};

/// Y-axis title shared by every reflectance figure.
pub const REFLECTANCE_AXIS_TITLE: &str = "Reflectance (%)";

/// A curve with its legend label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCurve {
    pub label: String,
    pub curve: ReflectanceCurve,
}

/// A horizontal line at a fixed reflectance, e.g. the uncoated substrate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub label: String,
    pub reflectance_percent: f64,
}

/// One set of axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub axis: SweepAxis,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<LabeledCurve>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl Figure {
    /// Empty figure with axis titles derived from `axis`.
    pub fn new(title: impl Into<String>, axis: SweepAxis) -> Self {
        Self {
            title: title.into(),
            axis,
            x_title: axis.title().to_string(),
            y_title: REFLECTANCE_AXIS_TITLE.to_string(),
            series: Vec::new(),
            reference_lines: Vec::new(),
        }
    }

    /// Override the x-axis title, keeping the sample values unchanged.
    pub fn with_x_title(mut self, x_title: impl Into<String>) -> Self {
        self.x_title = x_title.into();
        self
    }

    pub fn push_series(&mut self, label: impl Into<String>, curve: ReflectanceCurve) {
        self.series.push(LabeledCurve {
            label: label.into(),
            curve,
        });
    }

    pub fn push_reference(&mut self, label: impl Into<String>, reflectance_percent: f64) {
        self.reference_lines.push(ReferenceLine {
            label: label.into(),
            reflectance_percent,
        });
    }

    /// True when every series was sampled at the same sweep values.
    pub fn shares_samples(&self) -> bool {
        match self.series.split_first() {
            Some((first, rest)) => {
                let xs = first.curve.sweep_values();
                rest.iter().all(|s| s.curve.sweep_values() == xs)
            }
            None => true,
        }
    }
}

/// Consumer of finished figures (plotting front-end, file exporter, test collector).
pub trait FigureSink {
    type Error;

    fn render(&mut self, figure: &Figure) -> Result<(), Self::Error>;
}

/// Collects figures in memory.
impl FigureSink for Vec<Figure> {
    type Error = Infallible;

    fn render(&mut self, figure: &Figure) -> Result<(), Self::Error> {
        self.push(figure.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CurvePoint;

    fn curve(xs: &[f64]) -> ReflectanceCurve {
        ReflectanceCurve {
            axis: SweepAxis::Wavelength,
            points: xs
                .iter()
                .map(|&x| CurvePoint { sweep_value: x, reflectance_percent: 1.0 })
                .collect(),
        }
    }

    #[test]
    fn test_axis_titles() {
        let fig = Figure::new("Two Layer Films", SweepAxis::Wavelength);
        assert_eq!(fig.x_title, "Wavelength (nm)");
        assert_eq!(fig.y_title, "Reflectance (%)");
        let fig = Figure::new("Single", SweepAxis::PathDifferenceRatio);
        assert_eq!(fig.x_title, "Optical Path Difference Ratio (δ/λ)");
    }

    #[test]
    fn test_shares_samples() {
        let mut fig = Figure::new("f", SweepAxis::Wavelength);
        assert!(fig.shares_samples());
        fig.push_series("a", curve(&[1.0, 2.0]));
        fig.push_series("b", curve(&[1.0, 2.0]));
        assert!(fig.shares_samples());
        fig.push_series("c", curve(&[1.0, 3.0]));
        assert!(!fig.shares_samples());
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<Figure> = Vec::new();
        let mut fig = Figure::new("f", SweepAxis::Phase);
        fig.push_reference("Uncoated Glass", 4.258);
        sink.render(&fig).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].reference_lines[0].label, "Uncoated Glass");
    }

    #[test]
    fn test_figure_json_round_trip() {
        let mut fig = Figure::new("f", SweepAxis::Wavelength);
        fig.push_series("a", curve(&[500e-9]));
        let json = serde_json::to_string(&fig).unwrap();
        let back: Figure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fig);
    }
}
