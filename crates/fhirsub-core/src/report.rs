//! Per-specimen submission outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome status of a specimen's derived diagnostic report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    #[serde(rename = "COMPLETE")]
    Complete,
    #[serde(rename = "ERROR")]
    Error,
}

impl ReportStatus {
    /// Maps a transport status code to an outcome: 200/201 are complete,
    /// anything else is an error.
    pub fn from_status_code(status: u16) -> Self {
        match status {
            200 | 201 => Self::Complete,
            _ => Self::Error,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "COMPLETE"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// One result-graph entry: the report's status and, when extractable, the
/// display URL of the accepted report resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOutcome {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl ReportOutcome {
    pub fn complete(result: Option<String>) -> Self {
        Self {
            status: ReportStatus::Complete,
            result,
        }
    }

    pub fn error() -> Self {
        Self {
            status: ReportStatus::Error,
            result: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(ReportStatus::from_status_code(200), ReportStatus::Complete);
        assert_eq!(ReportStatus::from_status_code(201), ReportStatus::Complete);
        assert_eq!(ReportStatus::from_status_code(204), ReportStatus::Error);
        assert_eq!(ReportStatus::from_status_code(404), ReportStatus::Error);
        assert_eq!(ReportStatus::from_status_code(500), ReportStatus::Error);
    }

    #[test]
    fn test_display() {
        assert_eq!(ReportStatus::Complete.to_string(), "COMPLETE");
        assert_eq!(ReportStatus::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_serialized_form() {
        let outcome = ReportOutcome::complete(Some("http://example.org/DiagnosticReport/1".into()));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "COMPLETE");
        assert_eq!(json["result"], "http://example.org/DiagnosticReport/1");
    }

    #[test]
    fn test_error_omits_result() {
        let json = serde_json::to_value(ReportOutcome::error()).unwrap();
        assert_eq!(json["status"], "ERROR");
        assert!(json.get("result").is_none());
    }
}
