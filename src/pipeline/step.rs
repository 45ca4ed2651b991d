use super::PipelineError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    LsDir,
    Put,
    Ls,
    Get,
    Del,
}

impl StepKind {
    pub fn metric_name(self) -> &'static str {
        match self {
            Self::LsDir => "LsDir",
            Self::Put => "Put",
            Self::Ls => "Ls",
            Self::Get => "Get",
            Self::Del => "Del",
        }
    }

    /// Storage operation named in "problem invoking ..." summaries.
    pub fn operation(self) -> &'static str {
        match self {
            Self::LsDir => "listdir()",
            Self::Put | Self::Get => "filecopy()",
            Self::Ls => "stat()",
            Self::Del => "unlink()",
        }
    }

    pub fn mutates_storage(self) -> bool {
        matches!(self, Self::Put | Self::Get | Self::Del)
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.metric_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub kind: StepKind,
    pub predecessor: Option<StepKind>,
}

impl StepDefinition {
    pub const fn new(kind: StepKind, predecessor: Option<StepKind>) -> Self {
        Self { kind, predecessor }
    }
}

/// Probe order. Del waits on the upload only, so a failed round-trip
/// comparison still cleans up the remote artifact.
pub const STANDARD_STEPS: [StepDefinition; 5] = [
    StepDefinition::new(StepKind::LsDir, None),
    StepDefinition::new(StepKind::Put, Some(StepKind::LsDir)),
    StepDefinition::new(StepKind::Ls, Some(StepKind::Put)),
    StepDefinition::new(StepKind::Get, Some(StepKind::Ls)),
    StepDefinition::new(StepKind::Del, Some(StepKind::Put)),
];

/// A step with its ledger position and its predecessor's ledger position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStep {
    pub index: usize,
    pub kind: StepKind,
    pub predecessor: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDefinition {
    steps: Vec<ResolvedStep>,
}

impl PipelineDefinition {
    pub fn new(steps: &[StepDefinition]) -> Result<Self, PipelineError> {
        let mut resolved: Vec<ResolvedStep> = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            if resolved.iter().any(|prior| prior.kind == step.kind) {
                return Err(PipelineError::InvalidDefinition(format!(
                    "step `{}` is declared more than once",
                    step.kind
                )));
            }
            let predecessor = match step.predecessor {
                None => None,
                Some(kind) if kind == step.kind => {
                    return Err(PipelineError::InvalidDefinition(format!(
                        "step `{}` cannot depend on itself",
                        step.kind
                    )));
                }
                Some(kind) => {
                    let position = resolved
                        .iter()
                        .find(|prior| prior.kind == kind)
                        .map(|prior| prior.index)
                        .ok_or_else(|| {
                            PipelineError::InvalidDefinition(format!(
                                "step `{}` depends on `{kind}`, which does not run before it",
                                step.kind
                            ))
                        })?;
                    Some(position)
                }
            };
            resolved.push(ResolvedStep {
                index,
                kind: step.kind,
                predecessor,
            });
        }
        Ok(Self { steps: resolved })
    }

    pub fn standard() -> Self {
        Self {
            steps: vec![
                ResolvedStep {
                    index: 0,
                    kind: StepKind::LsDir,
                    predecessor: None,
                },
                ResolvedStep {
                    index: 1,
                    kind: StepKind::Put,
                    predecessor: Some(0),
                },
                ResolvedStep {
                    index: 2,
                    kind: StepKind::Ls,
                    predecessor: Some(1),
                },
                ResolvedStep {
                    index: 3,
                    kind: StepKind::Get,
                    predecessor: Some(2),
                },
                ResolvedStep {
                    index: 4,
                    kind: StepKind::Del,
                    predecessor: Some(1),
                },
            ],
        }
    }

    pub fn steps(&self) -> &[ResolvedStep] {
        &self.steps
    }
}

impl Default for PipelineDefinition {
    fn default() -> Self {
        Self::standard()
    }
}
