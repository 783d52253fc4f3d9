//! `index.html`: one page linking every chart of a run.
//!
//! The page is generated from the manifest of artifacts that were actually
//! written, so it cannot reference a missing file.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::FamilyLabels;
use crate::error::{ReportError, Result};
use crate::manifest::{ArtifactKind, Manifest};
use crate::schema::FamilySummary;

pub const INDEX_FILENAME: &str = "index.html";

/// Everything besides the manifest that the page shows.
#[derive(Clone, Copy, Debug)]
pub struct IndexContext<'a> {
    pub labels: &'a FamilyLabels,
    pub baseline_order: u32,
    pub families: &'a [FamilySummary],
    /// Link to the JSON run summary, when one was written.
    pub summary_file: Option<&'a str>,
}

const STYLE: &str = r#"
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; color: #333;
               max-width: 1400px; margin: 0 auto; padding: 20px; background: #f5f5f5; }
        h1 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; }
        h2 { color: #34495e; margin-top: 40px; border-bottom: 2px solid #95a5a6; }
        .plot-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(600px, 1fr)); gap: 30px; }
        .plot { background: white; border-radius: 8px; padding: 20px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); }
        .plot img { width: 100%; height: auto; }
        .plot h3 { margin-top: 0; color: #2c3e50; }
        .description { background: white; padding: 20px; border-left: 4px solid #3498db; }
        footer { margin-top: 50px; border-top: 1px solid #ddd; text-align: center; color: #7f8c8d; }
"#;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn join<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn plot(html: &mut String, title: &str, filename: &str) {
    let title = escape_html(title);
    let _ = write!(
        html,
        r#"        <div class="plot">
            <h3>{title}</h3>
            <img src="{src}" alt="{title}">
        </div>
"#,
        src = escape_html(filename),
    );
}

pub fn render_index(manifest: &Manifest, ctx: &IndexContext<'_>) -> String {
    let sizes: BTreeSet<u64> = ctx.families.iter().flat_map(|f| f.sizes.iter().copied()).collect();
    let orders: BTreeSet<u32> = ctx.families.iter().flat_map(|f| f.orders.iter().copied()).collect();

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Grove Benchmark Visualizations</title>
    <style>{STYLE}    </style>
</head>
<body>
    <h1>Grove Benchmark Visualizations</h1>
    <div class="description">
        <p>Grove construction time across tree orders (node capacity), for sorted and
        unsorted insertion.</p>
        <ul>
            <li><strong>Orders:</strong> {orders}</li>
            <li><strong>Dataset sizes:</strong> {sizes} intervals</li>
            <li><strong>Speedup baseline:</strong> order={baseline}</li>
        </ul>
    </div>
"#,
        orders = join(&orders),
        sizes = join(&sizes),
        baseline = ctx.baseline_order,
    );

    let mut families: Vec<&str> = Vec::new();
    for spec in &manifest.artifacts {
        if let ArtifactKind::Family { family, .. } = &spec.kind {
            if !families.contains(&family.as_str()) {
                families.push(family);
            }
        }
    }

    for family in families {
        let _ = writeln!(
            html,
            "\n    <h2>{} Insertion</h2>\n    <div class=\"plot-grid\">",
            escape_html(&ctx.labels.display_name(family))
        );
        for spec in manifest.for_family(family) {
            if let ArtifactKind::Family { view, .. } = &spec.kind {
                plot(&mut html, view.title(), &spec.filename);
            }
        }
        html.push_str("    </div>\n");
    }

    let mut cross = manifest.cross_family().peekable();
    if cross.peek().is_some() {
        html.push_str("\n    <h2>Sorted vs Unsorted Comparison</h2>\n    <div class=\"plot-grid\">\n");
        for spec in cross {
            let title = match &spec.kind {
                ArtifactKind::SortedVsUnsorted { size } => format!("Direct Comparison - {size} intervals"),
                _ => "Sorted Insertion Speedup".to_string(),
            };
            plot(&mut html, &title, &spec.filename);
        }
        html.push_str("    </div>\n");
    }

    html.push_str("\n    <footer>\n        <p>Generated by grove-bench-report");
    if let Some(summary) = ctx.summary_file {
        let _ = write!(html, " &bull; <a href=\"{}\">Run summary (JSON)</a>", escape_html(summary));
    }
    html.push_str("</p>\n    </footer>\n</body>\n</html>\n");
    html
}

/// Write `index.html` into `dir` and return its path.
pub fn write_index(dir: &Path, manifest: &Manifest, ctx: &IndexContext<'_>) -> Result<PathBuf> {
    let path = dir.join(INDEX_FILENAME);
    fs::write(&path, render_index(manifest, ctx)).map_err(|e| ReportError::io(&path, e))?;
    info!("Generated HTML index: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::manifest::plan;
    use crate::metrics::MetricTable;
    use crate::record::BenchmarkRecord;

    fn image_sources(html: &str) -> Vec<String> {
        html.split("<img src=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_index_links_exactly_the_manifest() {
        let table: MetricTable = [
            BenchmarkRecord::new("sorted", 100, 2, 1.0),
            BenchmarkRecord::new("unsorted", 100, 2, 2.0),
            BenchmarkRecord::new("unsorted", 500, 2, 2.0),
        ]
        .into_iter()
        .collect();
        let cfg = ReportConfig::new("in.json", "out");
        let manifest = plan(&table, &cfg);
        let summaries = table.summaries();
        let html = render_index(
            &manifest,
            &IndexContext {
                labels: &cfg.families,
                baseline_order: 2,
                families: &summaries,
                summary_file: None,
            },
        );

        let expected: Vec<String> = manifest.filenames().map(str::to_string).collect();
        assert_eq!(image_sources(&html), expected);
        assert!(html.contains("<h2>Sorted vs Unsorted Comparison</h2>"));
        assert!(!html.contains("sorted_vs_unsorted_size_500.png"));
    }

    #[test]
    fn test_index_without_comparison_section() {
        let table: MetricTable = [BenchmarkRecord::new("only", 10, 3, 1.0)].into_iter().collect();
        let cfg = ReportConfig::new("in.json", "out");
        let summaries = table.summaries();
        let html = render_index(
            &plan(&table, &cfg),
            &IndexContext {
                labels: &cfg.families,
                baseline_order: 2,
                families: &summaries,
                summary_file: Some("summary.json"),
            },
        );
        assert!(!html.contains("Sorted vs Unsorted"));
        assert_eq!(image_sources(&html).len(), 4);
        assert!(html.contains("href=\"summary.json\""));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
    }
}
