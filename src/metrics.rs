use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::record::{parse_entry, BenchmarkRecord};
use crate::schema::{BenchmarkDocument, FamilySummary};

/// Records grouped by benchmark family.
///
/// Families iterate in name order; records inside a family keep document
/// order, duplicates included. A family is only present if it has at least
/// one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    families: BTreeMap<String, Vec<BenchmarkRecord>>,
}

impl MetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: BenchmarkRecord) {
        self.families
            .entry(record.family.clone())
            .or_default()
            .push(record);
    }

    pub fn get(&self, family: &str) -> Option<&[BenchmarkRecord]> {
        self.families.get(family).map(Vec::as_slice)
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<BenchmarkRecord>> {
        self.families.iter()
    }

    /// Number of families.
    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.families.values().map(Vec::len).sum()
    }

    pub fn summaries(&self) -> Vec<FamilySummary> {
        self.iter()
            .map(|(family, records)| FamilySummary {
                family: family.clone(),
                records: records.len(),
                sizes: distinct_sizes(records),
                orders: distinct_orders(records),
            })
            .collect()
    }
}

impl FromIterator<BenchmarkRecord> for MetricTable {
    fn from_iter<I: IntoIterator<Item = BenchmarkRecord>>(iter: I) -> Self {
        let mut table = MetricTable::new();
        for record in iter {
            table.push(record);
        }
        table
    }
}

/// Parse every entry of `doc`, skipping the ones that are not measurements.
pub fn extract(doc: &BenchmarkDocument) -> MetricTable {
    let table: MetricTable = doc.benchmarks.iter().filter_map(parse_entry).collect();
    debug!(
        entries = doc.benchmarks.len(),
        records = table.total_records(),
        families = table.len(),
        "extracted metrics"
    );
    table
}

/// Ascending distinct sizes.
pub fn distinct_sizes(records: &[BenchmarkRecord]) -> Vec<u64> {
    let set: BTreeSet<u64> = records.iter().map(|r| r.size).collect();
    set.into_iter().collect()
}

/// Ascending distinct orders.
pub fn distinct_orders(records: &[BenchmarkRecord]) -> Vec<u32> {
    let set: BTreeSet<u32> = records.iter().map(|r| r.order).collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(entries: Vec<serde_json::Value>) -> BenchmarkDocument {
        BenchmarkDocument { benchmarks: entries }
    }

    #[test]
    fn test_extract_groups_by_family_in_document_order() {
        let table = extract(&doc(vec![
            json!({"name": "unsorted/500/2", "real_time": 9.0}),
            json!({"name": "sorted/100/2", "real_time": 1.0}),
            json!({"name": "unsorted/100/2", "real_time": 3.0}),
        ]));

        assert_eq!(table.families().collect::<Vec<_>>(), vec!["sorted", "unsorted"]);
        let unsorted = table.get("unsorted").unwrap();
        assert_eq!(unsorted.len(), 2);
        assert_eq!(unsorted[0].size, 500);
        assert_eq!(unsorted[1].size, 100);
    }

    #[test]
    fn test_extract_skips_malformed_without_creating_families() {
        let table = extract(&doc(vec![
            json!({"name": "meta", "real_time": 1.0}),
            json!({"name": "ghost/abc/2", "real_time": 1.0}),
            json!({"name": "sorted/100/2_mean", "real_time": 1.0}),
            json!({"name": "sorted/100/2", "real_time": 1.0}),
        ]));

        assert_eq!(table.len(), 1);
        assert!(table.get("ghost").is_none());
        assert!(table.get("meta").is_none());
        assert_eq!(table.total_records(), 1);
    }

    #[test]
    fn test_extract_keeps_duplicates() {
        let table = extract(&doc(vec![
            json!({"name": "f/100/2", "real_time": 1.0}),
            json!({"name": "f/100/2", "real_time": 2.0}),
        ]));
        assert_eq!(table.get("f").unwrap().len(), 2);
    }

    #[test]
    fn test_empty_document() {
        let table = extract(&BenchmarkDocument::default());
        assert!(table.is_empty());
        assert!(table.summaries().is_empty());
    }

    #[test]
    fn test_summaries() {
        let table: MetricTable = [
            BenchmarkRecord::new("f", 500, 5, 1.0),
            BenchmarkRecord::new("f", 100, 2, 1.0),
            BenchmarkRecord::new("f", 100, 5, 1.0),
        ]
        .into_iter()
        .collect();

        let summary = &table.summaries()[0];
        assert_eq!(summary.records, 3);
        assert_eq!(summary.sizes, vec![100, 500]);
        assert_eq!(summary.orders, vec![2, 5]);
    }
}
