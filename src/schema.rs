use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Version of the `summary.json` layout.
pub const SUMMARY_SCHEMA_VERSION: u32 = 1;

/// CI variables consulted, in order, for the commit under test.
const COMMIT_ENV_VARS: [&str; 2] = ["GIT_SHA", "GITHUB_SHA"];
const SHORT_SHA_LEN: usize = 12;

/// Benchmark result document as written by Google Benchmark's JSON reporter.
///
/// Entries stay untyped so that one odd entry (a non-string name, an
/// aggregate row) is dropped by the record parser instead of failing the
/// whole document. `context` and any other top-level fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkDocument {
    pub benchmarks: Vec<serde_json::Value>,
}

impl BenchmarkDocument {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Read and deserialize a result document.
pub fn load_document(path: &Path) -> Result<BenchmarkDocument> {
    if !path.exists() {
        return Err(ReportError::InputNotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    BenchmarkDocument::from_json(&raw).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub tool_version: String,
    pub source: String,
    /// Generation time, serialized as RFC 3339.
    pub timestamp_utc: DateTime<Utc>,
    pub git_sha: Option<String>,
}

impl RunMeta {
    pub fn for_source(source: &Path) -> Self {
        RunMeta {
            schema_version: SUMMARY_SCHEMA_VERSION,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            source: source.display().to_string(),
            timestamp_utc: Utc::now(),
            git_sha: commit_from_env(),
        }
    }
}

/// Per-family shape of the normalized metric table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilySummary {
    pub family: String,
    pub records: usize,
    pub sizes: Vec<u64>,
    pub orders: Vec<u32>,
}

/// Contents of `summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run: RunMeta,
    pub families: Vec<FamilySummary>,
    /// Chart files written, in manifest order.
    pub artifacts: Vec<String>,
}

fn commit_from_env() -> Option<String> {
    COMMIT_ENV_VARS
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find_map(|sha| short_sha(&sha))
}

/// Abbreviated commit id, or `None` for a blank value.
fn short_sha(raw: &str) -> Option<String> {
    let sha = raw.trim();
    (!sha.is_empty()).then(|| sha.chars().take(SHORT_SHA_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_document_ignores_extra_fields() {
        let doc = BenchmarkDocument::from_json(
            r#"{"context": {"host_name": "ci"}, "benchmarks": [{"name": "a/1/2", "real_time": 3}]}"#,
        )
        .unwrap();
        assert_eq!(doc.benchmarks.len(), 1);
    }

    #[test]
    fn test_document_requires_benchmarks_field() {
        assert!(BenchmarkDocument::from_json(r#"{"context": {}}"#).is_err());
    }

    #[test]
    fn test_run_meta_timestamp_is_rfc3339() {
        let before = Utc::now();
        let meta = RunMeta::for_source(Path::new("results.json"));
        assert!(meta.timestamp_utc >= before);

        let json = serde_json::to_value(&meta).unwrap();
        let stamp = json["timestamp_utc"].as_str().unwrap();
        assert_eq!(DateTime::parse_from_rfc3339(stamp).unwrap(), meta.timestamp_utc);
    }

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("0123456789abcdef0123").as_deref(), Some("0123456789ab"));
        assert_eq!(short_sha(" abc1234\n").as_deref(), Some("abc1234"));
        assert_eq!(short_sha("  "), None);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_document(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ReportError::InputNotFound(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, ReportError::Json { .. }));
    }
}
