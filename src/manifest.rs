//! Artifact manifest: the list of files a run commits to writing.
//!
//! `artifact_filename` is the only place output names are formed. The
//! renderer writes to it and the index links to it, so both always agree.

use serde::Serialize;
use tracing::warn;

use crate::config::ReportConfig;
use crate::metrics::MetricTable;
use crate::views::shared_sizes;

pub const SORTED_SPEEDUP_FILENAME: &str = "sorted_insertion_speedup.png";
const SIZE_COMPARISON_PREFIX: &str = "sorted_vs_unsorted_size_";

/// Per-family chart kinds, in manifest order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ViewKind {
    TimeVsOrder,
    TimeVsSize,
    Throughput,
    Speedup,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::TimeVsOrder,
        ViewKind::TimeVsSize,
        ViewKind::Throughput,
        ViewKind::Speedup,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            ViewKind::TimeVsOrder => "time_vs_order",
            ViewKind::TimeVsSize => "time_vs_size",
            ViewKind::Throughput => "throughput",
            ViewKind::Speedup => "speedup",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::TimeVsOrder => "Time vs Order",
            ViewKind::TimeVsSize => "Time vs Size",
            ViewKind::Throughput => "Throughput Comparison",
            ViewKind::Speedup => "Speedup Factor",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ArtifactKind {
    Family { family: String, view: ViewKind },
    /// Sorted-over-unsorted speedup across all shared sizes.
    SortedSpeedup,
    /// Both insertion modes side by side at one size.
    SortedVsUnsorted { size: u64 },
}

pub fn artifact_filename(kind: &ArtifactKind) -> String {
    match kind {
        ArtifactKind::Family { family, view } => {
            let name = format!("{family}_{}.png", view.suffix());
            if is_cross_family_filename(&name) {
                format!("{family}_{}_family.png", view.suffix())
            } else {
                name
            }
        }
        ArtifactKind::SortedSpeedup => SORTED_SPEEDUP_FILENAME.to_string(),
        ArtifactKind::SortedVsUnsorted { size } => format!("{SIZE_COMPARISON_PREFIX}{size}.png"),
    }
}

/// Whether `name` is reserved for a cross-family artifact.
fn is_cross_family_filename(name: &str) -> bool {
    if name == SORTED_SPEEDUP_FILENAME {
        return true;
    }
    name.strip_prefix(SIZE_COMPARISON_PREFIX)
        .and_then(|rest| rest.strip_suffix(".png"))
        .is_some_and(|size| !size.is_empty() && size.bytes().all(|b| b.is_ascii_digit()))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    pub filename: String,
}

impl ArtifactSpec {
    pub fn new(kind: ArtifactKind) -> Self {
        let filename = artifact_filename(&kind);
        Self { kind, filename }
    }

    pub fn is_cross_family(&self) -> bool {
        !matches!(self.kind, ArtifactKind::Family { .. })
    }
}

/// Ordered artifact list for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub artifacts: Vec<ArtifactSpec>,
}

impl Manifest {
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(|a| a.filename.as_str())
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Per-family artifacts of `family`, in view order.
    pub fn for_family<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a ArtifactSpec> {
        self.artifacts.iter().filter(move |a| {
            matches!(&a.kind, ArtifactKind::Family { family: f, .. } if f == family)
        })
    }

    pub fn cross_family(&self) -> impl Iterator<Item = &ArtifactSpec> {
        self.artifacts.iter().filter(|a| a.is_cross_family())
    }
}

/// Decide which charts a table produces.
pub fn plan(table: &MetricTable, cfg: &ReportConfig) -> Manifest {
    let mut artifacts = Vec::with_capacity(table.len() * ViewKind::ALL.len());

    for family in table.families() {
        for view in ViewKind::ALL {
            let spec = ArtifactSpec::new(ArtifactKind::Family {
                family: family.to_string(),
                view,
            });
            if is_cross_family_filename(&format!("{family}_{}.png", view.suffix())) {
                warn!(
                    family,
                    renamed = %spec.filename,
                    "family chart name is reserved for a comparison chart"
                );
            }
            artifacts.push(spec);
        }
    }

    match cfg.families.resolve(table) {
        (Some(sorted), Some(unsorted)) => {
            artifacts.push(ArtifactSpec::new(ArtifactKind::SortedSpeedup));
            let sorted = table.get(sorted).unwrap_or_default();
            let unsorted = table.get(unsorted).unwrap_or_default();
            for size in shared_sizes(sorted, unsorted) {
                artifacts.push(ArtifactSpec::new(ArtifactKind::SortedVsUnsorted { size }));
            }
        }
        _ => warn!(
            sorted = %cfg.families.sorted,
            unsorted = %cfg.families.unsorted,
            "missing sorted or unsorted data, skipping sorted vs unsorted comparison"
        ),
    }

    Manifest { artifacts }
}
