use super::{ArtifactRegistry, Endpoint, RunWorkspace, StepLedger};
use crate::storage::{StorageClient, DEFAULT_TIMEOUT_SECONDS};
use std::time::Duration;

/// Per-run knobs supplied by the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub timeout: Duration,
    pub read_only: bool,
    pub skip_ls_dir: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            read_only: false,
            skip_ls_dir: false,
        }
    }
}

/// Read-only inputs shared by every step of one run.
pub struct StepExecutionContext<'a> {
    pub endpoint: &'a Endpoint,
    pub settings: &'a RunSettings,
    pub client: &'a dyn StorageClient,
    pub workspace: &'a RunWorkspace,
}

/// State the steps of one run hand to each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    pub ledger: StepLedger,
    pub registry: ArtifactRegistry,
}
