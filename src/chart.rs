//! Renderer-independent description of each chart.

use crate::config::ReportConfig;
use crate::manifest::{ArtifactKind, ArtifactSpec, ViewKind};
use crate::metrics::MetricTable;
use crate::record::BenchmarkRecord;
use crate::views::{
    group_by_order, group_by_size, size_comparison, sorted_vs_unsorted_speedup,
    speedup_vs_baseline, Metric,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesColor {
    /// Index into the style palette.
    Palette(usize),
    Sorted,
    Unsorted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Cross,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub color: SeriesColor,
    pub marker: Marker,
}

/// Horizontal line drawn across the plot.
#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    pub y: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub log_y: bool,
    pub series: Vec<Series>,
    pub reference: Option<Reference>,
}

impl Chart {
    fn new(title: String, x_label: &str, y_label: String, log_y: bool) -> Self {
        Chart {
            title,
            x_label: x_label.to_string(),
            y_label,
            log_y,
            series: Vec::new(),
            reference: None,
        }
    }

    fn push<X: Into<f64> + Copy>(
        &mut self,
        label: String,
        points: &[(X, f64)],
        color: SeriesColor,
        marker: Marker,
    ) {
        let log_y = self.log_y;
        let points: Vec<(f64, f64)> = points
            .iter()
            .map(|&(x, y)| (Into::<f64>::into(x), y))
            // Log axes cannot place zero or negative values.
            .filter(|&(_, y)| !log_y || y > 0.0)
            .collect();
        self.series.push(Series {
            label,
            points,
            color,
            marker,
        });
    }

    /// Every y value plotted, reference line included.
    pub fn y_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(_, y)| y))
            .chain(self.reference.iter().map(|r| r.y))
    }

    pub fn x_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series.iter().flat_map(|s| s.points.iter().map(|&(x, _)| x))
    }
}

const ORDER_AXIS: &str = "Order (k)";
const TIME_AXIS: &str = "Time (μs, log scale)";

/// Build the chart for `spec`, or `None` if the table lacks the families
/// it refers to.
pub fn build_chart(spec: &ArtifactSpec, table: &MetricTable, cfg: &ReportConfig) -> Option<Chart> {
    match &spec.kind {
        ArtifactKind::Family { family, view } => {
            let records = table.get(family)?;
            let name = cfg.families.display_name(family);
            let chart = match view {
                ViewKind::TimeVsOrder => {
                    let mut chart = Chart::new(
                        format!("Grove Creation Time vs Order - {name}"),
                        ORDER_AXIS,
                        TIME_AXIS.to_string(),
                        true,
                    );
                    for (idx, (size, points)) in group_by_size(records, Metric::TimeUs).iter().enumerate() {
                        chart.push(format!("{size} intervals"), &points[..], SeriesColor::Palette(idx), Marker::Circle);
                    }
                    chart
                }
                ViewKind::TimeVsSize => {
                    let mut chart = Chart::new(
                        format!("Grove Creation Time vs Size - {name}"),
                        "Dataset Size (# intervals)",
                        TIME_AXIS.to_string(),
                        true,
                    );
                    for (idx, (order, points)) in group_by_order(records, Metric::TimeUs).iter().enumerate() {
                        let points: Vec<(f64, f64)> = points.iter().map(|&(s, y)| (s as f64, y)).collect();
                        chart.push(format!("order={order}"), &points[..], SeriesColor::Palette(idx), Marker::Circle);
                    }
                    chart
                }
                ViewKind::Throughput => {
                    let mut chart = Chart::new(
                        format!("Throughput vs Order - {name}"),
                        ORDER_AXIS,
                        "Throughput (intervals/sec)".to_string(),
                        false,
                    );
                    for (idx, (size, points)) in group_by_size(records, Metric::Throughput).iter().enumerate() {
                        chart.push(format!("{size} intervals"), &points[..], SeriesColor::Palette(idx), Marker::Circle);
                    }
                    chart
                }
                ViewKind::Speedup => {
                    let baseline = cfg.baseline_order;
                    let mut chart = Chart::new(
                        format!("Speedup Factor vs Order - {name}"),
                        ORDER_AXIS,
                        format!("Speedup Factor (relative to order={baseline})"),
                        false,
                    );
                    for (idx, (size, points)) in speedup_vs_baseline(records, baseline).iter().enumerate() {
                        chart.push(format!("{size} intervals"), &points[..], SeriesColor::Palette(idx), Marker::Circle);
                    }
                    chart.reference = Some(Reference {
                        y: 1.0,
                        label: format!("Baseline (order={baseline})"),
                    });
                    chart
                }
            };
            Some(chart)
        }
        ArtifactKind::SortedSpeedup => {
            let (sorted, unsorted) = family_pair(table, cfg)?;
            let mut chart = Chart::new(
                "Sorted Insertion Speedup vs Unsorted".into(),
                ORDER_AXIS,
                "Speedup Factor (Sorted vs Unsorted)".into(),
                false,
            );
            for (idx, (size, points)) in sorted_vs_unsorted_speedup(sorted, unsorted).iter().enumerate() {
                chart.push(format!("{size} intervals"), &points[..], SeriesColor::Palette(idx), Marker::Circle);
            }
            chart.reference = Some(Reference {
                y: 1.0,
                label: "No speedup (equal performance)".into(),
            });
            Some(chart)
        }
        ArtifactKind::SortedVsUnsorted { size } => {
            let (sorted, unsorted) = family_pair(table, cfg)?;
            let (sorted_pts, unsorted_pts) = size_comparison(sorted, unsorted, *size);
            let mut chart = Chart::new(
                format!("Sorted vs Unsorted Insertion - {size} intervals"),
                ORDER_AXIS,
                TIME_AXIS.to_string(),
                true,
            );
            chart.push("Sorted insertion".into(), &sorted_pts[..], SeriesColor::Sorted, Marker::Circle);
            chart.push("Unsorted insertion".into(), &unsorted_pts[..], SeriesColor::Unsorted, Marker::Cross);
            Some(chart)
        }
    }
}

fn family_pair<'t>(
    table: &'t MetricTable,
    cfg: &ReportConfig,
) -> Option<(&'t [BenchmarkRecord], &'t [BenchmarkRecord])> {
    let (sorted, unsorted) = cfg.families.resolve(table);
    Some((table.get(sorted?)?, table.get(unsorted?)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::plan;

    fn table() -> MetricTable {
        [
            BenchmarkRecord::new("BM_grove_creation_sorted", 100, 2, 80.0),
            BenchmarkRecord::new("BM_grove_creation_sorted", 100, 5, 40.0),
            BenchmarkRecord::new("BM_grove_creation_unsorted", 100, 2, 120.0),
            BenchmarkRecord::new("BM_grove_creation_unsorted", 100, 5, 0.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_every_planned_artifact_has_a_chart() {
        let cfg = ReportConfig::new("in.json", "out");
        let table = table();
        for spec in plan(&table, &cfg).artifacts {
            assert!(build_chart(&spec, &table, &cfg).is_some(), "{}", spec.filename);
        }
    }

    #[test]
    fn test_log_charts_drop_zero_times() {
        let cfg = ReportConfig::new("in.json", "out");
        let spec = ArtifactSpec::new(ArtifactKind::SortedVsUnsorted { size: 100 });
        let chart = build_chart(&spec, &table(), &cfg).unwrap();
        assert!(chart.log_y);
        assert_eq!(chart.series[0].points, vec![(2.0, 80.0), (5.0, 40.0)]);
        assert_eq!(chart.series[1].points, vec![(2.0, 120.0)]);
    }

    #[test]
    fn test_speedup_chart_title_and_reference() {
        let cfg = ReportConfig::new("in.json", "out");
        let spec = ArtifactSpec::new(ArtifactKind::Family {
            family: "BM_grove_creation_sorted".into(),
            view: ViewKind::Speedup,
        });
        let chart = build_chart(&spec, &table(), &cfg).unwrap();
        assert_eq!(chart.title, "Speedup Factor vs Order - Sorted");
        assert_eq!(chart.reference.as_ref().map(|r| r.y), Some(1.0));
        assert_eq!(chart.series[0].points, vec![(2.0, 1.0), (5.0, 2.0)]);
    }

    #[test]
    fn test_unknown_family_has_no_chart() {
        let cfg = ReportConfig::new("in.json", "out");
        let spec = ArtifactSpec::new(ArtifactKind::Family {
            family: "missing".into(),
            view: ViewKind::Throughput,
        });
        assert!(build_chart(&spec, &table(), &cfg).is_none());
    }
}
