//! The aggregate submission output, shared across parallel subject tasks.

use dashmap::DashMap;
use serde_json::{Map, Value, json};

use fhirsub_core::ReportOutcome;

/// Mapping from specimen composite key (`{system}_{value}`) to the outcome
/// of its derived diagnostic report. Append-only and safe to share.
#[derive(Debug, Default)]
pub struct ResultGraph {
    entries: DashMap<String, ReportOutcome>,
}

impl ResultGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: String, outcome: ReportOutcome) {
        self.entries.insert(key, outcome);
    }

    pub fn get(&self, key: &str) -> Option<ReportOutcome> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot as a JSON object, one member per specimen key.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for entry in self.entries.iter() {
            let outcome = json!({
                "status": entry.value().status.to_string(),
                "result": entry.value().result,
            });
            map.insert(entry.key().clone(), outcome);
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhirsub_core::ReportStatus;

    #[test]
    fn test_insert_and_get() {
        let graph = ResultGraph::new();
        assert!(graph.is_empty());

        graph.insert("sys_s1".into(), ReportOutcome::complete(Some("url".into())));
        graph.insert("sys_s2".into(), ReportOutcome::error());

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get("sys_s1").unwrap().status, ReportStatus::Complete);
        assert_eq!(graph.get("sys_s2").unwrap().status, ReportStatus::Error);
        assert!(graph.get("sys_s3").is_none());
    }

    #[test]
    fn test_to_json() {
        let graph = ResultGraph::new();
        graph.insert(
            "sys_s1".into(),
            ReportOutcome::complete(Some("http://example.org/DiagnosticReport/1".into())),
        );
        let json = graph.to_json();
        assert_eq!(json["sys_s1"]["status"], "COMPLETE");
        assert_eq!(json["sys_s1"]["result"], "http://example.org/DiagnosticReport/1");
    }

    #[test]
    fn test_error_entry_has_null_result() {
        let graph = ResultGraph::new();
        graph.insert("sys_s1".into(), ReportOutcome::error());
        let json = graph.to_json();
        assert_eq!(json["sys_s1"]["status"], "ERROR");
        assert!(json["sys_s1"]["result"].is_null());
    }
}
