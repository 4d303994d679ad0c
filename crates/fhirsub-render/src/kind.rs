use std::fmt;
use std::str::FromStr;

use fhirsub_core::CoreError;

/// The resource kinds this pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Patient,
    Specimen,
    Observation,
    DiagnosticReport,
    Bundle,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Specimen => "Specimen",
            Self::Observation => "Observation",
            Self::DiagnosticReport => "DiagnosticReport",
            Self::Bundle => "Bundle",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(Self::Patient),
            "Specimen" => Ok(Self::Specimen),
            "Observation" => Ok(Self::Observation),
            "DiagnosticReport" => Ok(Self::DiagnosticReport),
            "Bundle" => Ok(Self::Bundle),
            other => Err(CoreError::invalid_input(format!(
                "unknown resource kind: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        for kind in [
            ResourceKind::Patient,
            ResourceKind::Specimen,
            ResourceKind::Observation,
            ResourceKind::DiagnosticReport,
            ResourceKind::Bundle,
        ] {
            assert_eq!(kind.to_string().parse::<ResourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        assert!("MedicationRequest".parse::<ResourceKind>().is_err());
    }
}
