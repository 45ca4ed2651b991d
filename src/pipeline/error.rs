use super::workspace::WorkspaceError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("step ledger has no entry at index {index} (recorded {recorded})")]
    LedgerEntryNotFound { index: usize, recorded: usize },
    #[error("step outcome for index {actual} recorded out of order; expected index {expected}")]
    LedgerOutOfOrder { expected: usize, actual: usize },
    #[error("invalid pipeline definition: {0}")]
    InvalidDefinition(String),
    #[error("Unable to prepare local workspace: {0}")]
    Workspace(#[from] WorkspaceError),
}
