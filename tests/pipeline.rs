//! End-to-end runs of the report pipeline with the real PNG renderer.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use grove_bench_report::schema::BenchmarkDocument;
use grove_bench_report::views::sorted_vs_unsorted_speedup;
use grove_bench_report::{extract, plan, run, PlottersRenderer, ReportConfig};
use serde_json::json;
use tempfile::tempdir;

fn write_input(dir: &Path, doc: serde_json::Value) -> std::path::PathBuf {
    let path = dir.join("results.json");
    fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    path
}

fn files_with_extension(dir: &Path, ext: &str) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(ext))
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn image_sources(html: &str) -> BTreeSet<String> {
    html.split("<img src=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}

#[test]
fn end_to_end_sorted_vs_unsorted_speedup() {
    let doc: BenchmarkDocument = serde_json::from_value(json!({
        "benchmarks": [
            {"name": "sorted/100/2", "real_time": 80},
            {"name": "sorted/100/5", "real_time": 40},
            {"name": "unsorted/100/2", "real_time": 120},
            {"name": "unsorted/100/5", "real_time": 90},
        ]
    }))
    .unwrap();

    let table = extract(&doc);
    let speedup = sorted_vs_unsorted_speedup(
        table.get("sorted").unwrap(),
        table.get("unsorted").unwrap(),
    );
    assert_eq!(speedup.len(), 1);
    assert_eq!(speedup[&100], vec![(2, 1.5), (5, 2.25)]);
}

#[test]
fn manifest_matches_written_files() {
    let dir = tempdir().unwrap();
    let mut entries = vec![json!({"name": "context_only", "real_time": 1})];
    for family in ["BM_grove_creation_sorted", "BM_grove_creation_unsorted"] {
        for size in [100u64, 500, 1000] {
            for order in [2u32, 10] {
                let base = if family.ends_with("unsorted") { 3.0 } else { 1.0 };
                entries.push(json!({
                    "name": format!("{family}/{size}/{order}"),
                    "real_time": base * size as f64 / order as f64,
                    "time_unit": "us",
                }));
            }
        }
    }
    let input = write_input(dir.path(), json!({ "context": {}, "benchmarks": entries }));
    let out = dir.path().join("charts");
    let cfg = ReportConfig::new(&input, &out);

    let summary = run(&cfg, &PlottersRenderer::new(cfg.style.clone())).unwrap();

    // 2 families x 4 views, the speedup overview, and one chart per size.
    assert_eq!(summary.artifacts.len(), 8 + 1 + 3);

    let planned: BTreeSet<String> = summary.artifacts.iter().cloned().collect();
    let written = files_with_extension(&out, "png");
    assert_eq!(planned, written);

    let html = fs::read_to_string(out.join("index.html")).unwrap();
    assert_eq!(image_sources(&html), written);

    for name in [
        "BM_grove_creation_sorted_time_vs_order.png",
        "BM_grove_creation_unsorted_speedup.png",
        "sorted_insertion_speedup.png",
        "sorted_vs_unsorted_size_500.png",
    ] {
        assert!(written.contains(name), "{name} missing");
    }
}

#[test]
fn missing_family_skips_comparison_but_still_indexes() {
    let dir = tempdir().unwrap();
    let input = write_input(
        dir.path(),
        json!({"benchmarks": [
            {"name": "sorted/100/2", "real_time": 10},
            {"name": "sorted/100/5", "real_time": 0},
            {"name": "sorted/500/2", "real_time": 30},
        ]}),
    );
    let out = dir.path().join("out");
    let cfg = ReportConfig::new(&input, &out);

    let table = extract(&grove_bench_report::schema::load_document(&input).unwrap());
    assert_eq!(plan(&table, &cfg).len(), 4);

    run(&cfg, &PlottersRenderer::default()).unwrap();
    let written = files_with_extension(&out, "png");
    assert_eq!(written.len(), 4);
    assert!(!written.contains("sorted_insertion_speedup.png"));

    let html = fs::read_to_string(out.join("index.html")).unwrap();
    assert_eq!(image_sources(&html), written);
    assert!(!html.contains("Sorted vs Unsorted Comparison"));
}

#[test]
fn document_without_benchmarks_is_fatal() {
    let dir = tempdir().unwrap();
    let input = write_input(dir.path(), json!({"context": {"date": "today"}}));
    let cfg = ReportConfig::new(&input, dir.path().join("out"));
    let err = run(&cfg, &PlottersRenderer::default()).unwrap_err();
    assert!(matches!(err, grove_bench_report::ReportError::Json { .. }));
}
