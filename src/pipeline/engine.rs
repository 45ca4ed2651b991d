use super::aggregate::{finalize_run, release_workspace};
use super::context::{RunSettings, RunState, StepExecutionContext};
use super::step_execution::execute_gated_step;
use super::{Endpoint, PipelineDefinition, PipelineError, RunWorkspace, StepOutcome, Verdict};
use crate::shared::ProbeLog;
use crate::storage::StorageClient;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub endpoint: Endpoint,
    pub steps: Vec<StepOutcome>,
    pub overall: Verdict,
    #[serde(skip)]
    pub workspace: PathBuf,
    #[serde(skip)]
    pub workspace_released: bool,
}

/// Drives the gated checks for one endpoint at a time against a storage
/// client that was configured up front.
pub struct ProbeEngine<'a> {
    client: &'a dyn StorageClient,
    settings: RunSettings,
    definition: PipelineDefinition,
    workspace_parent: PathBuf,
    log: ProbeLog,
}

impl<'a> ProbeEngine<'a> {
    pub fn new(client: &'a dyn StorageClient, settings: RunSettings) -> Self {
        Self {
            client,
            settings,
            definition: PipelineDefinition::standard(),
            workspace_parent: std::env::temp_dir(),
            log: ProbeLog::disabled(),
        }
    }

    pub fn with_definition(mut self, definition: PipelineDefinition) -> Self {
        self.definition = definition;
        self
    }

    pub fn with_workspace_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.workspace_parent = parent.into();
        self
    }

    pub fn with_log(mut self, log: ProbeLog) -> Self {
        self.log = log;
        self
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Provisions a workspace, runs every step in order, aggregates, and
    /// releases the workspace. Only a workspace that cannot be provisioned,
    /// or a broken step ordering, ends the run early.
    pub fn run(&self, endpoint: &Endpoint) -> Result<RunReport, PipelineError> {
        let workspace = match RunWorkspace::provision_in(&self.workspace_parent) {
            Ok(workspace) => workspace,
            Err(err) => {
                self.log.error(
                    "workspace.provision_failed",
                    &format!("endpoint={endpoint} error={err}"),
                );
                return Err(err.into());
            }
        };
        self.log.info(
            "run.started",
            &format!(
                "endpoint={endpoint} read_only={} skip_ls_dir={} timeout_seconds={} workspace={}",
                self.settings.read_only,
                self.settings.skip_ls_dir,
                self.settings.timeout.as_secs(),
                workspace.root().display()
            ),
        );

        let context = StepExecutionContext {
            endpoint,
            settings: &self.settings,
            client: self.client,
            workspace: &workspace,
        };
        let mut state = RunState::default();
        for step in self.definition.steps() {
            match execute_gated_step(&context, &mut state, step) {
                Ok(outcome) => self.log.info(
                    "step.finished",
                    &format!(
                        "endpoint={endpoint} step={} status={} summary={}",
                        outcome.step, outcome.status, outcome.summary
                    ),
                ),
                Err(err) => {
                    release_workspace(&workspace, &self.log);
                    self.log.error(
                        "run.aborted",
                        &format!("endpoint={endpoint} error={err}"),
                    );
                    return Err(err);
                }
            }
        }

        let overall = finalize_run(&state.ledger, &workspace, &self.log);
        self.log.info(
            "run.finished",
            &format!(
                "endpoint={endpoint} status={} summary={}",
                overall.status, overall.summary
            ),
        );
        Ok(RunReport {
            endpoint: endpoint.clone(),
            steps: state.ledger.into_outcomes(),
            overall,
            workspace_released: !workspace.root().exists(),
            workspace: workspace.root().to_path_buf(),
        })
    }
}
