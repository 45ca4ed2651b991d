use super::{ProbeStatus, StepKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub index: usize,
    pub step: StepKind,
    pub status: ProbeStatus,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: ProbeStatus,
    pub summary: String,
}

impl Verdict {
    pub fn new(status: ProbeStatus, summary: impl Into<String>) -> Self {
        Self {
            status,
            summary: summary.into(),
        }
    }

    pub fn ok(summary: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Ok, summary)
    }

    pub fn warning(summary: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Warning, summary)
    }

    pub fn critical(summary: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Critical, summary)
    }
}
