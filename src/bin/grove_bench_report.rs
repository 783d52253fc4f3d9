use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use grove_bench_report::{ChartStyle, FamilyLabels, PlottersRenderer, ReportConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "ttf")]
const CHART_TEXT_NOTE: &str = "Charts carry titles, axes and legends.";
#[cfg(not(feature = "ttf"))]
const CHART_TEXT_NOTE: &str = "Chart text is off in this build: PNGs show data series and reference \
lines only, and titles appear in index.html. Rebuild with `--features ttf` for titles, \
axes and legends.";

#[derive(Parser, Debug)]
#[command(name = "grove-bench-report")]
#[command(about = "Render grove benchmark results into comparison charts and an HTML index")]
#[command(after_help = CHART_TEXT_NOTE)]
struct Args {
    /// Google Benchmark JSON result file.
    #[arg(value_name = "BENCHMARK_JSON")]
    input: PathBuf,

    /// Directory for charts and index.html; created if missing.
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Order that speedup factors are relative to.
    #[arg(long, default_value_t = 2)]
    baseline_order: u32,

    /// Family label of sorted insertion runs (after the prefix).
    #[arg(long, default_value = "sorted")]
    sorted_family: String,

    /// Family label of unsorted insertion runs (after the prefix).
    #[arg(long, default_value = "unsorted")]
    unsorted_family: String,

    /// Benchmark name prefix stripped from family names.
    #[arg(long, default_value = "BM_grove_creation_")]
    family_prefix: String,

    /// Chart width in pixels.
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Chart height in pixels.
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Skip writing summary.json.
    #[arg(long, default_value_t = false)]
    no_summary: bool,
}

fn run(args: Args) -> anyhow::Result<()> {
    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let mut cfg = ReportConfig::new(args.input, output_dir);
    cfg.baseline_order = args.baseline_order;
    cfg.families = FamilyLabels {
        sorted: args.sorted_family,
        unsorted: args.unsorted_family,
        prefix: args.family_prefix,
    };
    cfg.style = ChartStyle {
        width: args.width,
        height: args.height,
        ..ChartStyle::default()
    };
    cfg.write_summary = !args.no_summary;

    let renderer = PlottersRenderer::new(cfg.style.clone());
    let summary = grove_bench_report::run(&cfg, &renderer)
        .with_context(|| format!("report for {} failed", cfg.input.display()))?;

    info!(
        "All visualizations generated successfully ({} charts)",
        summary.artifacts.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("grove_bench_report=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
