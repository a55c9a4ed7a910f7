//! File sinks: one CSV per figure, optionally all figures as one JSON file.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use thinfilm_core::figure::{Figure, FigureSink};
use thinfilm_core::SweepAxis;

/// Writes each rendered figure to disk as it arrives.
pub struct FileSink {
    csv_dir: Option<PathBuf>,
    json_path: Option<PathBuf>,
    collected: Vec<Figure>,
    written: Vec<PathBuf>,
}

impl FileSink {
    pub fn new(directory: &Path, save_csv: bool, save_json: bool) -> Self {
        Self {
            csv_dir: save_csv.then(|| directory.to_path_buf()),
            json_path: save_json.then(|| directory.join("figures.json")),
            collected: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Flush the JSON file (if enabled) and return every path written.
    pub fn finish(mut self) -> Result<Vec<PathBuf>> {
        if let Some(path) = self.json_path.take() {
            write_figures_json(&self.collected, &path)?;
            self.written.push(path);
        }
        Ok(self.written)
    }
}

impl FigureSink for FileSink {
    type Error = anyhow::Error;

    fn render(&mut self, figure: &Figure) -> Result<()> {
        print_summary(figure);
        if let Some(dir) = &self.csv_dir {
            let name = format!("{:02}_{}.csv", self.written.len() + 1, slug(&figure.title));
            let path = dir.join(name);
            std::fs::create_dir_all(dir)?;
            let mut file = std::fs::File::create(&path)
                .with_context(|| format!("Creating {}", path.display()))?;
            write_figure_csv(figure, &mut file)?;
            log::info!("Figure '{}' written to {}", figure.title, path.display());
            self.written.push(path);
        }
        if self.json_path.is_some() {
            self.collected.push(figure.clone());
        }
        Ok(())
    }
}

fn print_summary(figure: &Figure) {
    let scale = figure.axis.display_scale();
    for s in &figure.series {
        if let (Some(min), Some(max)) = (s.curve.minimum(), s.curve.peak()) {
            println!(
                "      {:<40} min {:>7.3}% @ {:.4}, max {:>7.3}% @ {:.4}",
                s.label,
                min.reflectance_percent,
                min.sweep_value * scale,
                max.reflectance_percent,
                max.sweep_value * scale
            );
        }
    }
}

/// Column name for the sweep values, in display units.
pub fn sweep_column(axis: SweepAxis) -> &'static str {
    match axis {
        SweepAxis::Wavelength => "wavelength_nm",
        SweepAxis::PathDifferenceRatio => "path_difference_ratio",
        SweepAxis::Phase => "phase_rad",
        SweepAxis::IncidenceAngle => "angle_deg",
    }
}

/// Write a figure as CSV with a metadata header.
///
/// All series must share the same sweep samples.
pub fn write_figure_csv<W: Write>(figure: &Figure, out: &mut W) -> Result<()> {
    if !figure.shares_samples() {
        bail!("Figure '{}': series use different sweep samples", figure.title);
    }

    writeln!(out, "# Thinfilm reflectance export")?;
    writeln!(out, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "# title: {}", figure.title)?;
    writeln!(out, "# x: {}", figure.x_title)?;
    writeln!(out, "# y: {}", figure.y_title)?;
    for line in &figure.reference_lines {
        writeln!(out, "# reference '{}': {:.6}", line.label, line.reflectance_percent)?;
    }
    writeln!(out, "#")?;

    let mut header = vec![sweep_column(figure.axis).to_string()];
    header.extend(figure.series.iter().map(|s| csv_field(&s.label)));
    writeln!(out, "{}", header.join(","))?;

    let scale = figure.axis.display_scale();
    let rows = figure.series.first().map_or(0, |s| s.curve.len());
    for row in 0..rows {
        let x = figure.series[0].curve.points[row].sweep_value * scale;
        write!(out, "{:.6e}", x)?;
        for s in &figure.series {
            write!(out, ",{:.6}", s.curve.points[row].reflectance_percent)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write all figures to a pretty-printed JSON file.
pub fn write_figures_json(figures: &[Figure], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(figures)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;
    log::info!("{} figures written to {}", figures.len(), path.display());
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Lowercase ASCII file stem derived from a title.
fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        "figure".to_string()
    } else {
        trimmed.to_string()
    }
}
