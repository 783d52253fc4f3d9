//! Record parser: one raw benchmark entry to one typed measurement.
//!
//! Entry names follow the `{family}/{size}/{order}` convention used by the
//! grove creation benchmarks. Anything that does not fit is dropped without
//! error, since result documents also carry aggregate and auxiliary rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// Separator between the family, size and order segments of a name.
pub const NAME_DELIMITER: char = '/';

/// One measured data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub family: String,
    /// Number of items inserted.
    pub size: u64,
    /// Branching parameter of the tree, always >= 1.
    pub order: u32,
    /// Wall time in microseconds.
    pub time_us: f64,
    /// Items per second; 0 when `time_us` is 0.
    pub throughput: f64,
}

impl BenchmarkRecord {
    pub fn new(family: impl Into<String>, size: u64, order: u32, time_us: f64) -> Self {
        BenchmarkRecord {
            family: family.into(),
            size,
            order,
            time_us,
            throughput: throughput(size, time_us),
        }
    }
}

/// Items per second for `size` items processed in `time_us` microseconds.
pub fn throughput(size: u64, time_us: f64) -> f64 {
    if time_us > 0.0 {
        size as f64 * 1e6 / time_us
    } else {
        0.0
    }
}

/// Split a benchmark name into `(family, size, order)`.
pub fn parse_name(name: &str) -> Option<(&str, u64, u32)> {
    let mut parts = name.split(NAME_DELIMITER);
    let family = parts.next()?;
    let size = parse_strict(parts.next()?)?;
    let order: u32 = parse_strict(parts.next()?)?;
    if parts.next().is_some() || order == 0 {
        return None;
    }
    Some((family, size, order))
}

// `str::parse` accepts a leading `+`; only bare ASCII digits count here.
fn parse_strict<T: std::str::FromStr>(segment: &str) -> Option<T> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Microseconds per unit for Google Benchmark's `time_unit` values.
fn unit_scale(unit: &str) -> Option<f64> {
    match unit {
        "ns" => Some(1e-3),
        "us" => Some(1.0),
        "ms" => Some(1e3),
        "s" => Some(1e6),
        _ => None,
    }
}

/// Parse one raw entry, or `None` if it is not a grove measurement.
pub fn parse_entry(entry: &Value) -> Option<BenchmarkRecord> {
    let Some(name) = entry.get("name").and_then(Value::as_str) else {
        trace!("dropping entry without a string name");
        return None;
    };
    let Some((family, size, order)) = parse_name(name) else {
        trace!(benchmark = name, "dropping entry with unrecognized name");
        return None;
    };

    let scale = match entry.get("time_unit") {
        None => 1.0,
        Some(unit) => match unit.as_str().and_then(unit_scale) {
            Some(scale) => scale,
            None => {
                trace!(benchmark = name, ?unit, "dropping entry with unknown time unit");
                return None;
            }
        },
    };

    let raw_time = match entry.get("real_time") {
        None => 0.0,
        Some(v) => v.as_f64()?,
    };
    let time_us = raw_time * scale;
    if !time_us.is_finite() || time_us < 0.0 {
        trace!(benchmark = name, time_us, "dropping entry with invalid time");
        return None;
    }

    Some(BenchmarkRecord::new(family, size, order, time_us))
}
