//! The report pipeline: load, extract, plan, render, index.

use std::fs;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::chart::build_chart;
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::index::{write_index, IndexContext};
use crate::manifest::{plan, ArtifactSpec, Manifest};
use crate::metrics::{extract, MetricTable};
use crate::render::ChartRenderer;
use crate::schema::{load_document, RunMeta, RunSummary};

pub const SUMMARY_FILENAME: &str = "summary.json";

/// Render every artifact of `manifest` into the output directory.
///
/// Returns the manifest of written files. Any failure aborts the run, so on
/// success it equals the input manifest.
pub fn render_artifacts(
    manifest: &Manifest,
    table: &MetricTable,
    cfg: &ReportConfig,
    renderer: &dyn ChartRenderer,
) -> Result<Manifest> {
    let artifacts = manifest
        .artifacts
        .par_iter()
        .map(|spec| render_one(spec, table, cfg, renderer).map(|()| spec.clone()))
        .collect::<Result<Vec<_>>>()?;
    Ok(Manifest { artifacts })
}

fn render_one(
    spec: &ArtifactSpec,
    table: &MetricTable,
    cfg: &ReportConfig,
    renderer: &dyn ChartRenderer,
) -> Result<()> {
    let chart = build_chart(spec, table, cfg).ok_or_else(|| ReportError::Render {
        artifact: spec.filename.clone(),
        message: "no data for chart".to_string(),
    })?;
    renderer.render(&chart, &cfg.output_dir.join(&spec.filename))?;
    info!("Generated: {}", spec.filename);
    Ok(())
}

/// Run the whole pipeline once.
pub fn run(cfg: &ReportConfig, renderer: &dyn ChartRenderer) -> Result<RunSummary> {
    if !cfg.input.exists() {
        return Err(ReportError::InputNotFound(cfg.input.clone()));
    }
    fs::create_dir_all(&cfg.output_dir).map_err(|e| ReportError::io(&cfg.output_dir, e))?;

    info!("Reading benchmark results from: {}", cfg.input.display());
    info!("Output directory: {}", cfg.output_dir.display());

    let doc = load_document(&cfg.input)?;
    let table = extract(&doc);
    info!("Found {} benchmark families", table.len());
    for (family, records) in table.iter() {
        info!("  - {family}: {} data points", records.len());
    }

    let planned = plan(&table, cfg);
    debug!(artifacts = planned.len(), "planned artifacts");
    let produced = render_artifacts(&planned, &table, cfg, renderer)?;

    let families = table.summaries();
    let summary_file = cfg.write_summary.then_some(SUMMARY_FILENAME);
    write_index(
        &cfg.output_dir,
        &produced,
        &IndexContext {
            labels: &cfg.families,
            baseline_order: cfg.baseline_order,
            families: &families,
            summary_file,
        },
    )?;

    let summary = RunSummary {
        run: RunMeta::for_source(&cfg.input),
        families,
        artifacts: produced.filenames().map(str::to_string).collect(),
    };

    if cfg.write_summary {
        let path = cfg.output_dir.join(SUMMARY_FILENAME);
        let json = serde_json::to_string_pretty(&summary).map_err(ReportError::Summary)?;
        fs::write(&path, json).map_err(|e| ReportError::io(&path, e))?;
    }

    Ok(summary)
}
