//! TOML configuration deserialisation for reflectance jobs.

use serde::Deserialize;
use thinfilm_core::{ResonancePolicy, SweepAxis};

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub output: OutputConfig,
    /// Explicit figures, each with its own series.
    #[serde(default)]
    pub figure: Vec<FigureConfig>,
    /// Generated figures: one per base material, paired with every other material.
    #[serde(default)]
    pub pairwise: Vec<PairwiseConfig>,
}

/// Sweep definition. Wavelength samples are given in nanometres.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    pub axis: SweepAxis,
    #[serde(flatten)]
    pub samples: SampleSpec,
}

/// Either an inclusive linear range or an explicit list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SampleSpec {
    Range { range: [f64; 2], points: usize },
    List { values: Vec<f64> },
}

/// A refractive index written as a number or a catalogue material name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IndexSpec {
    Value(f64),
    Material(String),
}

impl std::fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexSpec::Value(n) => write!(f, "{}", n),
            IndexSpec::Material(name) => f.write_str(name),
        }
    }
}

/// Which closed form a series uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Single layer swept over phase δ (rad).
    Single,
    /// Single layer swept over δ/λ with δ = ratio × `reference_wavelength_nm`.
    SingleRatio,
    /// Two layers, phase-accumulation formula, swept over wavelength.
    Double,
    /// Two quarter-wave layers with the phase pinned at π/2 (constant).
    DoubleFlat,
    /// Two layers, real-valued approximation with an angle term.
    DoubleOblique,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Single => "single",
            ModelKind::SingleRatio => "single_ratio",
            ModelKind::Double => "double",
            ModelKind::DoubleFlat => "double_flat",
            ModelKind::DoubleOblique => "double_oblique",
        }
    }
}

/// One film layer.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    pub n: IndexSpec,
    /// Physical thickness in nm.
    pub thickness_nm: Option<f64>,
    /// Alternative to `thickness_nm`: quarter-wave optical thickness at this wavelength (nm).
    pub quarter_wave_nm: Option<f64>,
}

/// One labelled series within a figure.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesConfig {
    pub label: String,
    pub model: ModelKind,
    #[serde(default = "default_incident")]
    pub incident: IndexSpec,
    pub substrate: Option<IndexSpec>,
    /// Film index for the single-layer models.
    pub film: Option<IndexSpec>,
    /// Layers for the double-layer models, outermost first.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
    /// Shared layer thickness for `double_oblique` (nm).
    pub thickness_nm: Option<f64>,
    /// Wavelength multiplied into δ/λ samples for `single_ratio` (nm).
    pub reference_wavelength_nm: Option<f64>,
    /// Fixed wavelength for `double_oblique` in an `incidence_angle` figure (nm).
    pub wavelength_nm: Option<f64>,
    #[serde(default)]
    pub angle_deg: f64,
    #[serde(default)]
    pub resonance: ResonancePolicy,
}

/// An explicit figure.
#[derive(Debug, Clone, Deserialize)]
pub struct FigureConfig {
    pub title: String,
    pub sweep: SweepConfig,
    /// Override for the x-axis title.
    pub x_title: Option<String>,
    /// Adds a reference line at the bare reflectance of this substrate.
    pub uncoated_substrate: Option<IndexSpec>,
    #[serde(default = "default_uncoated_label")]
    pub uncoated_label: String,
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
}

/// Pairwise two-layer figures over the material catalogue.
#[derive(Debug, Clone, Deserialize)]
pub struct PairwiseConfig {
    #[serde(default = "default_pairwise_title")]
    pub title_prefix: String,
    pub substrate: IndexSpec,
    /// Shared layer thickness (nm).
    pub thickness_nm: f64,
    #[serde(default)]
    pub angle_deg: f64,
    pub sweep: SweepConfig,
    /// Restrict to these materials (default: every coating in the catalogue).
    pub materials: Option<Vec<String>>,
    #[serde(default = "default_pairwise_resonance")]
    pub resonance: ResonancePolicy,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Write one CSV file per figure (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// Write all figures to `figures.json` (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_incident() -> IndexSpec {
    IndexSpec::Value(1.0)
}
fn default_uncoated_label() -> String {
    "Uncoated Glass".into()
}
fn default_pairwise_title() -> String {
    "Two Layer Films".into()
}
fn default_pairwise_resonance() -> ResonancePolicy {
    ResonancePolicy::Saturate
}
fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Parse a TOML job configuration from a string.
pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}
