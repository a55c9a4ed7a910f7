//! Job runner: resolves materials, builds models, sweeps them into figures.

use std::collections::HashSet;

use anyhow::{bail, Context, Result};

use thinfilm_core::figure::{Figure, FigureSink};
use thinfilm_core::model::{
    DoubleLayer, DoubleLayerOblique, QuarterWaveFlat, ReflectanceModel, SingleLayer,
    SingleLayerRatio,
};
use thinfilm_core::sweep::{sweep_parallel, SweepParameter};
use thinfilm_core::{Layer, OpticalMedium, Stack, SweepAxis};
use thinfilm_materials::MaterialCatalog;

use crate::config::{
    FigureConfig, IndexSpec, JobConfig, LayerConfig, ModelKind, PairwiseConfig, SampleSpec,
    SeriesConfig, SweepConfig,
};

const NM: f64 = 1e-9;

/// A figure ready to be swept: every parameter resolved and validated.
pub struct FigurePlan {
    pub title: String,
    pub x_title: Option<String>,
    pub sweep: SweepParameter,
    pub series: Vec<(String, Box<dyn ReflectanceModel>)>,
    /// (label, reflectance %) horizontal reference lines.
    pub references: Vec<(String, f64)>,
}

/// Resolve every figure in the job without sweeping anything.
pub fn plan_job(job: &JobConfig, catalog: &MaterialCatalog) -> Result<Vec<FigurePlan>> {
    let mut plans = Vec::new();
    for fig in &job.figure {
        plans.push(
            plan_figure(fig, catalog).with_context(|| format!("Figure '{}'", fig.title))?,
        );
    }
    for pw in &job.pairwise {
        plans.extend(
            plan_pairwise(pw, catalog)
                .with_context(|| format!("Pairwise figures '{}'", pw.title_prefix))?,
        );
    }
    if plans.is_empty() {
        bail!("Job defines no [[figure]] or [[pairwise]] sections");
    }
    Ok(plans)
}

/// Sweep every planned figure and hand the results to `sink`, in job order.
pub fn run_job<S>(plans: &[FigurePlan], sink: &mut S) -> Result<usize>
where
    S: FigureSink,
    S::Error: Into<anyhow::Error>,
{
    for (fi, plan) in plans.iter().enumerate() {
        let figure = run_plan(plan)?;
        println!(
            "  [{}/{}] '{}': {} series x {} samples",
            fi + 1,
            plans.len(),
            figure.title,
            figure.series.len(),
            plan.sweep.len()
        );
        sink.render(&figure)
            .map_err(Into::<anyhow::Error>::into)
            .with_context(|| format!("Writing figure '{}'", figure.title))?;
    }
    Ok(plans.len())
}

/// Sweep a single plan into a figure.
pub fn run_plan(plan: &FigurePlan) -> Result<Figure> {
    let mut figure = Figure::new(plan.title.clone(), plan.sweep.axis());
    if let Some(x_title) = &plan.x_title {
        figure = figure.with_x_title(x_title.clone());
    }
    for (label, model) in &plan.series {
        log::debug!("Figure '{}': sweeping series '{}'", plan.title, label);
        let curve = sweep_parallel(model.as_ref(), &plan.sweep)
            .with_context(|| format!("Figure '{}', series '{}'", plan.title, label))?;
        figure.push_series(label.clone(), curve);
    }
    for (label, value) in &plan.references {
        figure.push_reference(label.clone(), *value);
    }
    Ok(figure)
}

fn plan_figure(fig: &FigureConfig, catalog: &MaterialCatalog) -> Result<FigurePlan> {
    let sweep = build_sweep(&fig.sweep)?;
    if fig.series.is_empty() && fig.uncoated_substrate.is_none() {
        bail!("Figure has no series");
    }

    let mut series = Vec::with_capacity(fig.series.len());
    for s in &fig.series {
        let model = build_model(s, sweep.axis(), catalog)
            .with_context(|| format!("Series '{}' (model {})", s.label, s.model.as_str()))?;
        if model.axis() != sweep.axis() {
            bail!(
                "Series '{}': model {} is swept over {}, but the figure sweeps {}",
                s.label,
                s.model.as_str(),
                model.axis(),
                sweep.axis()
            );
        }
        series.push((s.label.clone(), model));
    }

    let mut references = Vec::new();
    if let Some(spec) = &fig.uncoated_substrate {
        let substrate = resolve_index(spec, catalog)?;
        let bare = SingleLayer::uncoated(substrate).reflectance_at(0.0)?;
        references.push((fig.uncoated_label.clone(), bare));
    }

    Ok(FigurePlan {
        title: fig.title.clone(),
        x_title: fig.x_title.clone(),
        sweep,
        series,
        references,
    })
}

fn plan_pairwise(pw: &PairwiseConfig, catalog: &MaterialCatalog) -> Result<Vec<FigurePlan>> {
    let sweep = build_sweep(&pw.sweep)?;
    if sweep.axis() != SweepAxis::Wavelength {
        bail!("Pairwise figures must sweep wavelength, not {}", sweep.axis());
    }
    let substrate = resolve_index(&pw.substrate, catalog)?;

    let mut materials = match &pw.materials {
        Some(names) => names
            .iter()
            .map(|name| catalog.get(name))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Valid identifiers: {}", catalog.identifiers()))?,
        None => catalog.coatings().collect(),
    };
    // Names resolve case-insensitively, so "MgF2" and "MgF₂" are one material.
    let mut seen = HashSet::new();
    materials.retain(|m| seen.insert(m.id.clone()));
    if materials.len() < 2 {
        bail!("Pairwise figures need at least two materials");
    }

    let mut plans = Vec::with_capacity(materials.len());
    for base in &materials {
        let mut series: Vec<(String, Box<dyn ReflectanceModel>)> = Vec::new();
        for other in &materials {
            if other.id == base.id {
                continue;
            }
            let model = DoubleLayerOblique::new(
                substrate,
                base.medium,
                other.medium,
                pw.thickness_nm * NM,
                pw.angle_deg,
            )?
            .with_policy(pw.resonance);
            let label = format!(
                "{} & {}={} & {}",
                base.display_name,
                other.display_name,
                base.medium.index(),
                other.medium.index()
            );
            series.push((label, Box::new(model) as Box<dyn ReflectanceModel>));
        }
        plans.push(FigurePlan {
            title: format!("{} - {}", pw.title_prefix, base.display_name),
            x_title: None,
            sweep: sweep.clone(),
            series,
            references: Vec::new(),
        });
    }
    Ok(plans)
}

/// Convert the config sweep into core units (wavelengths nm to m).
pub fn build_sweep(spec: &SweepConfig) -> Result<SweepParameter> {
    let scale = match spec.axis {
        SweepAxis::Wavelength => NM,
        _ => 1.0,
    };
    let sweep = match &spec.samples {
        SampleSpec::Range { range, points } => {
            SweepParameter::linspace(spec.axis, range[0] * scale, range[1] * scale, *points)
        }
        SampleSpec::List { values } => {
            SweepParameter::from_values(spec.axis, values.iter().map(|v| v * scale).collect())
        }
    }
    .context("Invalid sweep")?;
    Ok(sweep)
}

fn resolve_index(spec: &IndexSpec, catalog: &MaterialCatalog) -> Result<OpticalMedium> {
    match spec {
        IndexSpec::Value(n) => Ok(OpticalMedium::new(*n)?),
        IndexSpec::Material(name) => catalog
            .index_of(name)
            .with_context(|| format!("Valid identifiers: {}", catalog.identifiers())),
    }
}

fn required<'a, T>(value: &'a Option<T>, field: &str, model: ModelKind) -> Result<&'a T> {
    value
        .as_ref()
        .with_context(|| format!("model {} requires '{}'", model.as_str(), field))
}

fn two_layers(s: &SeriesConfig) -> Result<(&LayerConfig, &LayerConfig)> {
    match s.layers.as_slice() {
        [outer, inner] => Ok((outer, inner)),
        layers => bail!(
            "model {} requires exactly 2 layers, got {}",
            s.model.as_str(),
            layers.len()
        ),
    }
}

fn build_layer(cfg: &LayerConfig, catalog: &MaterialCatalog) -> Result<Layer> {
    let medium = resolve_index(&cfg.n, catalog)?;
    let layer = match (cfg.thickness_nm, cfg.quarter_wave_nm) {
        (Some(t), None) => Layer::new(medium, t * NM)?,
        (None, Some(wl)) => Layer::quarter_wave(medium, wl * NM)?,
        (Some(_), Some(_)) => {
            bail!("Layer {}: give thickness_nm or quarter_wave_nm, not both", cfg.n)
        }
        (None, None) => bail!("Layer {}: requires thickness_nm or quarter_wave_nm", cfg.n),
    };
    Ok(layer)
}

fn single_layer(s: &SeriesConfig, catalog: &MaterialCatalog) -> Result<SingleLayer> {
    let substrate = resolve_index(required(&s.substrate, "substrate", s.model)?, catalog)?;
    let film = resolve_index(required(&s.film, "film", s.model)?, catalog)?;
    Ok(SingleLayer::new(substrate, film))
}

/// Build the model a series describes.
///
/// `axis` is consulted by the constant flat model, which adopts the figure's
/// axis, and by `double_oblique`, which sweeps angle in an angle figure.
pub fn build_model(
    s: &SeriesConfig,
    axis: SweepAxis,
    catalog: &MaterialCatalog,
) -> Result<Box<dyn ReflectanceModel>> {
    let model: Box<dyn ReflectanceModel> = match s.model {
        ModelKind::Single => Box::new(single_layer(s, catalog)?),
        ModelKind::SingleRatio => {
            let wl = required(&s.reference_wavelength_nm, "reference_wavelength_nm", s.model)?;
            Box::new(SingleLayerRatio::new(single_layer(s, catalog)?, wl * NM)?)
        }
        ModelKind::Double => {
            let incident = resolve_index(&s.incident, catalog)?;
            let substrate = resolve_index(required(&s.substrate, "substrate", s.model)?, catalog)?;
            let (outer, inner) = two_layers(s)?;
            let stack = Stack::new(
                incident,
                vec![build_layer(outer, catalog)?, build_layer(inner, catalog)?],
                substrate,
            );
            Box::new(DoubleLayer::from_stack(&stack)?.with_policy(s.resonance))
        }
        ModelKind::DoubleFlat => {
            let (outer, inner) = two_layers(s)?;
            let n1 = resolve_index(&outer.n, catalog)?;
            let n2 = resolve_index(&inner.n, catalog)?;
            Box::new(QuarterWaveFlat::new(n1, n2).on_axis(axis))
        }
        ModelKind::DoubleOblique => {
            let substrate = resolve_index(required(&s.substrate, "substrate", s.model)?, catalog)?;
            let (outer, inner) = two_layers(s)?;
            let thickness = required(&s.thickness_nm, "thickness_nm", s.model)?;
            let model = DoubleLayerOblique::new(
                substrate,
                resolve_index(&outer.n, catalog)?,
                resolve_index(&inner.n, catalog)?,
                thickness * NM,
                s.angle_deg,
            )?
            .with_policy(s.resonance);
            if axis == SweepAxis::IncidenceAngle {
                let wl = required(&s.wavelength_nm, "wavelength_nm", s.model)?;
                Box::new(model.at_wavelength(wl * NM)?)
            } else {
                Box::new(model)
            }
        }
    };
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use approx::assert_relative_eq;

    fn plans(toml: &str) -> Result<Vec<FigurePlan>> {
        let job = parse_config(toml)?;
        plan_job(&job, &MaterialCatalog::standard())
    }

    #[test]
    fn test_double_layer_job_end_to_end() {
        let plans = plans(
            r#"
            [[figure]]
            title = "Double"
            sweep = { axis = "wavelength", values = [550.0] }
            uncoated_substrate = 1.52

            [[figure.series]]
            label = "Case (a)"
            model = "double"
            substrate = "CrownGlass"
            layers = [
                { n = "CeF3", thickness_nm = 137.5 },
                { n = "ZrO2", thickness_nm = 137.5 },
            ]
            "#,
        )
        .unwrap();

        let mut sink: Vec<Figure> = Vec::new();
        assert_eq!(run_job(&plans, &mut sink).unwrap(), 1);

        let fig = &sink[0];
        assert_eq!(fig.x_title, "Wavelength (nm)");
        let point = fig.series[0].curve.points[0];
        assert_relative_eq!(point.sweep_value, 550e-9, max_relative = 1e-15);
        assert_relative_eq!(point.reflectance_percent, 2.4794278583289113, max_relative = 1e-12);
        assert_eq!(fig.reference_lines[0].label, "Uncoated Glass");
        assert_relative_eq!(
            fig.reference_lines[0].reflectance_percent,
            4.257999496094735,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_pairwise_generates_one_figure_per_material() {
        let plans = plans(
            r#"
            [[pairwise]]
            substrate = 1.52
            thickness_nm = 137.5
            sweep = { axis = "wavelength", range = [350.0, 850.0], points = 20 }
            "#,
        )
        .unwrap();
        assert_eq!(plans.len(), 12);
        assert_eq!(plans[0].title, "Two Layer Films - Cryolite");
        assert_eq!(plans[0].series.len(), 11);
        assert_eq!(plans[0].series[0].0, "Cryolite & MgF₂=1.32 & 1.38");

        let mut sink: Vec<Figure> = Vec::new();
        run_job(&plans[..1], &mut sink).unwrap();
        for s in &sink[0].series {
            assert!(s.curve.reflectance().iter().all(|r| (0.0..=100.0).contains(r)));
        }
    }

    #[test]
    fn test_pairwise_subset() {
        let plans = plans(
            r#"
            [[pairwise]]
            substrate = "CrownGlass"
            thickness_nm = 137.5
            materials = ["MgF2", "TiO2", "ZnS"]
            sweep = { axis = "wavelength", range = [400.0, 700.0], points = 5 }
            "#,
        )
        .unwrap();
        assert_eq!(plans.len(), 3);
        assert!(plans.iter().all(|p| p.series.len() == 2));
    }

    #[test]
    fn test_pairwise_duplicate_materials_collapse() {
        let pairwise = |materials: &str| {
            plans(&format!(
                r#"
                [[pairwise]]
                substrate = 1.52
                thickness_nm = 137.5
                materials = {materials}
                sweep = {{ axis = "wavelength", range = [400.0, 700.0], points = 5 }}
                "#
            ))
        };

        let deduped = pairwise(r#"["MgF2", "mgf2", "MgF₂", "TiO2"]"#).unwrap();
        assert_eq!(deduped.len(), 2);
        assert!(deduped.iter().all(|p| p.series.len() == 1));

        let single = pairwise(r#"["MgF2", "MgF2"]"#);
        assert!(format!("{:#}", single.err().unwrap()).contains("at least two materials"));
    }

    #[test]
    fn test_axis_mismatch_is_caught_at_plan_time() {
        let err = plans(
            r#"
            [[figure]]
            title = "Wrong"
            sweep = { axis = "wavelength", range = [400.0, 700.0], points = 5 }

            [[figure.series]]
            label = "single"
            model = "single"
            substrate = 1.52
            film = 1.38
            "#,
        )
        .err()
        .unwrap();
        assert!(format!("{err:#}").contains("swept over phase"));
    }

    #[test]
    fn test_missing_fields_and_unknown_materials() {
        let missing = plans(
            r#"
            [[figure]]
            title = "Missing"
            sweep = { axis = "phase", values = [0.0] }
            [[figure.series]]
            label = "x"
            model = "single"
            substrate = 1.52
            "#,
        );
        assert!(format!("{:#}", missing.err().unwrap()).contains("requires 'film'"));

        let unknown = plans(
            r#"
            [[figure]]
            title = "Unknown"
            sweep = { axis = "phase", values = [0.0] }
            [[figure.series]]
            label = "x"
            model = "single"
            substrate = 1.52
            film = "Unobtainium"
            "#,
        );
        assert!(format!("{:#}", unknown.err().unwrap()).contains("Unobtainium"));
    }

    #[test]
    fn test_rejected_range_overflow_aborts_the_run() {
        let plans = plans(
            r#"
            [[figure]]
            title = "Resonant"
            sweep = { axis = "wavelength", values = [500.0, 550.0] }
            [[figure.series]]
            label = "sub-unity"
            model = "double"
            substrate = 1.52
            layers = [
                { n = 0.33, thickness_nm = 137.5 },
                { n = 0.11, thickness_nm = 137.5 },
            ]
            "#,
        )
        .unwrap();
        let mut sink: Vec<Figure> = Vec::new();
        let err = run_job(&plans, &mut sink).unwrap_err();
        assert!(format!("{err:#}").contains("left the physical range"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_bundled_jobs_plan() {
        let jobs = [
            (include_str!("../../../jobs/single_layer.toml"), 1, 5),
            (include_str!("../../../jobs/two_layer.toml"), 1, 3),
            (include_str!("../../../jobs/two_layer_flat.toml"), 1, 3),
            (include_str!("../../../jobs/multilayer_single.toml"), 1, 12),
            (include_str!("../../../jobs/multilayer_pairwise.toml"), 12, 11),
        ];
        for (toml, figures, series) in jobs {
            let plans = plans(toml).unwrap();
            assert_eq!(plans.len(), figures);
            assert!(plans.iter().all(|p| p.series.len() == series));
        }
    }

    #[test]
    fn test_catalogue_single_films_keep_relabelled_axis() {
        let plans = plans(include_str!("../../../jobs/multilayer_single.toml")).unwrap();
        let figure = run_plan(&plans[0]).unwrap();
        assert_eq!(figure.axis, SweepAxis::PathDifferenceRatio);
        assert_eq!(figure.x_title, "Wavelength (nm)");
        assert_eq!(figure.series[1].label, "MgF₂=1.38");
        assert_eq!(figure.reference_lines.len(), 1);
    }

    #[test]
    fn test_oblique_series_sweeps_incidence_angle() {
        let angle_plans = plans(
            r#"
            [[figure]]
            title = "Angle"
            sweep = { axis = "incidence_angle", values = [0.0, 60.0] }
            [[figure.series]]
            label = "MgF₂ over ZrO₂"
            model = "double_oblique"
            substrate = "CrownGlass"
            thickness_nm = 137.5
            wavelength_nm = 550.0
            layers = [{ n = "MgF2" }, { n = "ZrO2" }]
            "#,
        )
        .unwrap();
        let figure = run_plan(&angle_plans[0]).unwrap();
        assert_eq!(figure.x_title, "Angle of Incidence (°)");
        let r = figure.series[0].curve.reflectance();
        assert_relative_eq!(r[0], 24.581877142708315, max_relative = 1e-10);
        assert_relative_eq!(r[1], 13.155262746960917, max_relative = 1e-9);

        let missing = plans(
            r#"
            [[figure]]
            title = "Angle"
            sweep = { axis = "incidence_angle", values = [0.0] }
            [[figure.series]]
            label = "x"
            model = "double_oblique"
            substrate = 1.52
            thickness_nm = 137.5
            layers = [{ n = 1.38 }, { n = 2.1 }]
            "#,
        );
        assert!(format!("{:#}", missing.err().unwrap()).contains("requires 'wavelength_nm'"));
    }

    #[test]
    fn test_flat_model_adopts_figure_axis() {
        let plans = plans(
            r#"
            [[figure]]
            title = "Flat"
            sweep = { axis = "wavelength", range = [400.0, 700.0], points = 3 }
            [[figure.series]]
            label = "Case (a)"
            model = "double_flat"
            layers = [{ n = 1.65 }, { n = 2.1 }]
            "#,
        )
        .unwrap();
        let figure = run_plan(&plans[0]).unwrap();
        let r = figure.series[0].curve.reflectance();
        assert_eq!(r.len(), 3);
        assert!(r.iter().all(|&v| v == r[0]));
    }
}
