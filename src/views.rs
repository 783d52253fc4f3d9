//! Aggregation views over a family's records.
//!
//! Two flavors:
//! - sequence views (`group_by_size`, `group_by_order`) keep every record,
//!   so duplicate keys show up as overlapping points;
//! - point-map views (`speedup_vs_baseline`, `sorted_vs_unsorted_speedup`,
//!   `size_comparison`) key on `(size, order)` and the record that comes
//!   last in document order wins.

use std::collections::{BTreeMap, BTreeSet};

use crate::record::BenchmarkRecord;

/// Size → points ordered by ascending order.
pub type BySize = BTreeMap<u64, Vec<(u32, f64)>>;

/// Order → points ordered by ascending size.
pub type ByOrder = BTreeMap<u32, Vec<(u64, f64)>>;

/// Which measured quantity a view projects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    TimeUs,
    Throughput,
}

impl Metric {
    pub fn of(&self, record: &BenchmarkRecord) -> f64 {
        match self {
            Metric::TimeUs => record.time_us,
            Metric::Throughput => record.throughput,
        }
    }
}

pub fn group_by_size(records: &[BenchmarkRecord], metric: Metric) -> BySize {
    let mut out = BySize::new();
    for r in records {
        out.entry(r.size).or_default().push((r.order, metric.of(r)));
    }
    for points in out.values_mut() {
        // Stable: equal orders stay in document order.
        points.sort_by_key(|(order, _)| *order);
    }
    out
}

pub fn group_by_order(records: &[BenchmarkRecord], metric: Metric) -> ByOrder {
    let mut out = ByOrder::new();
    for r in records {
        out.entry(r.order).or_default().push((r.size, metric.of(r)));
    }
    for points in out.values_mut() {
        points.sort_by_key(|(size, _)| *size);
    }
    out
}

/// `(size, order) → time_us`, last record wins.
fn time_map(records: &[BenchmarkRecord]) -> BTreeMap<(u64, u32), f64> {
    records
        .iter()
        .map(|r| ((r.size, r.order), r.time_us))
        .collect()
}

/// Speedup of every order relative to `baseline_order`, per size.
///
/// Sizes without a positive baseline time are left out entirely, as are
/// orders measured at zero time.
pub fn speedup_vs_baseline(records: &[BenchmarkRecord], baseline_order: u32) -> BySize {
    let times = time_map(records);
    let mut out = BySize::new();
    for size in times.keys().map(|(size, _)| *size).collect::<BTreeSet<_>>() {
        let baseline = match times.get(&(size, baseline_order)) {
            Some(&t) if t > 0.0 => t,
            _ => continue,
        };
        let points: Vec<(u32, f64)> = times
            .range((size, u32::MIN)..=(size, u32::MAX))
            .filter(|(_, t)| **t > 0.0)
            .map(|(&(_, order), &t)| (order, baseline / t))
            .collect();
        out.insert(size, points);
    }
    out
}

/// `unsorted.time_us / sorted.time_us` for every `(size, order)` measured
/// in both families.
///
/// Keys missing from either side contribute nothing; an empty side yields
/// an empty map.
pub fn sorted_vs_unsorted_speedup(
    sorted: &[BenchmarkRecord],
    unsorted: &[BenchmarkRecord],
) -> BySize {
    let sorted_times = time_map(sorted);
    let mut out = BySize::new();
    for ((size, order), unsorted_time) in time_map(unsorted) {
        match sorted_times.get(&(size, order)) {
            Some(&sorted_time) if sorted_time > 0.0 => {
                out.entry(size)
                    .or_default()
                    .push((order, unsorted_time / sorted_time));
            }
            _ => {}
        }
    }
    out
}

/// Ascending sizes measured by both families.
pub fn shared_sizes(sorted: &[BenchmarkRecord], unsorted: &[BenchmarkRecord]) -> Vec<u64> {
    let a: BTreeSet<u64> = sorted.iter().map(|r| r.size).collect();
    let b: BTreeSet<u64> = unsorted.iter().map(|r| r.size).collect();
    a.intersection(&b).copied().collect()
}

/// Time-vs-order series of both families at one size, for a side by side
/// chart.
pub fn size_comparison(
    sorted: &[BenchmarkRecord],
    unsorted: &[BenchmarkRecord],
    size: u64,
) -> (Vec<(u32, f64)>, Vec<(u32, f64)>) {
    let at_size = |records: &[BenchmarkRecord]| -> Vec<(u32, f64)> {
        time_map(records)
            .range((size, u32::MIN)..=(size, u32::MAX))
            .map(|(&(_, order), &t)| (order, t))
            .collect()
    };
    (at_size(sorted), at_size(unsorted))
}
