use std::path::PathBuf;

use plotters::style::RGBColor;
use tracing::warn;

use crate::metrics::MetricTable;

/// Labels identifying the two insertion modes compared across families.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FamilyLabels {
    pub sorted: String,
    pub unsorted: String,
    /// Common benchmark prefix, stripped for role matching and titles.
    pub prefix: String,
}

impl Default for FamilyLabels {
    fn default() -> Self {
        Self {
            sorted: "sorted".to_string(),
            unsorted: "unsorted".to_string(),
            prefix: "BM_grove_creation_".to_string(),
        }
    }
}

impl FamilyLabels {
    /// Family name without the benchmark prefix.
    pub fn short_name<'a>(&self, family: &'a str) -> &'a str {
        family.strip_prefix(self.prefix.as_str()).unwrap_or(family)
    }

    /// Human readable family title: `BM_grove_creation_un_sorted` → `Un Sorted`.
    pub fn display_name(&self, family: &str) -> String {
        self.short_name(family)
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The family playing `label`'s role. A verbatim name beats a prefixed one.
    fn find<'t>(&self, table: &'t MetricTable, label: &str) -> Option<&'t str> {
        let exact = table.families().find(|f| *f == label);
        let prefixed = table
            .families()
            .find(|f| f.strip_prefix(self.prefix.as_str()) == Some(label));
        match (exact, prefixed) {
            (Some(exact), Some(ignored)) if exact != ignored => {
                warn!(label, chosen = exact, ignored, "two families match one role");
                Some(exact)
            }
            (exact, prefixed) => exact.or(prefixed),
        }
    }

    /// The sorted and unsorted family names present in `table`.
    pub fn resolve<'t>(&self, table: &'t MetricTable) -> (Option<&'t str>, Option<&'t str>) {
        (self.find(table, &self.sorted), self.find(table, &self.unsorted))
    }
}

/// Presentation settings handed to the renderer.
#[derive(Clone, Debug)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub palette: Vec<RGBColor>,
    pub sorted_color: RGBColor,
    pub unsorted_color: RGBColor,
    pub reference_color: RGBColor,
    pub line_width: u32,
    pub marker_size: u32,
    pub title_font_size: u32,
    pub label_font_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            palette: vec![
                RGBColor(31, 119, 180),
                RGBColor(255, 127, 14),
                RGBColor(44, 160, 44),
                RGBColor(214, 39, 40),
                RGBColor(148, 103, 189),
                RGBColor(140, 86, 75),
                RGBColor(227, 119, 194),
                RGBColor(127, 127, 127),
                RGBColor(188, 189, 34),
                RGBColor(23, 190, 207),
            ],
            sorted_color: RGBColor(46, 204, 113),
            unsorted_color: RGBColor(231, 76, 60),
            reference_color: RGBColor(128, 128, 128),
            line_width: 2,
            marker_size: 5,
            title_font_size: 28,
            label_font_size: 18,
        }
    }
}

impl ChartStyle {
    pub fn series_color(&self, idx: usize) -> RGBColor {
        if self.palette.is_empty() {
            return RGBColor(0, 0, 0);
        }
        self.palette[idx % self.palette.len()]
    }
}

#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Order every speedup-vs-baseline chart is relative to.
    pub baseline_order: u32,
    pub families: FamilyLabels,
    pub style: ChartStyle,
    /// Also write `summary.json`.
    pub write_summary: bool,
}

impl ReportConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            baseline_order: 2,
            families: FamilyLabels::default(),
            style: ChartStyle::default(),
            write_summary: true,
        }
    }
}
