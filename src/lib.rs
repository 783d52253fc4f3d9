//! Chart reports for grove construction benchmarks.
//!
//! Reads a Google Benchmark JSON document whose entries are named
//! `{family}/{size}/{order}`, derives throughput and speedup metrics, and
//! writes a fixed set of PNG charts plus an `index.html` linking them.

pub mod chart;
pub mod config;
pub mod error;
pub mod index;
pub mod manifest;
pub mod metrics;
pub mod record;
pub mod render;
pub mod report;
pub mod schema;
pub mod views;

pub use config::{ChartStyle, FamilyLabels, ReportConfig};
pub use error::{ReportError, Result};
pub use manifest::{artifact_filename, plan, ArtifactKind, ArtifactSpec, Manifest, ViewKind};
pub use metrics::{extract, MetricTable};
pub use record::{parse_entry, BenchmarkRecord};
pub use render::{ChartRenderer, PlottersRenderer};
pub use report::run;
