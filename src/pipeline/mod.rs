pub mod aggregate;
pub mod artifact;
pub mod context;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod outcome;
pub mod registry;
pub mod status;
pub mod step;
pub mod step_execution;
pub mod workspace;

pub use aggregate::{aggregate, aggregate_statuses, finalize_run, release_workspace};
pub use artifact::{Endpoint, TestArtifact, ARTIFACT_NAME_PREFIX};
pub use context::{RunSettings, RunState, StepExecutionContext};
pub use engine::{ProbeEngine, RunReport};
pub use error::PipelineError;
pub use ledger::StepLedger;
pub use outcome::{StepOutcome, Verdict};
pub use registry::ArtifactRegistry;
pub use status::ProbeStatus;
pub use step::{PipelineDefinition, ResolvedStep, StepDefinition, StepKind, STANDARD_STEPS};
pub use step_execution::{execute_gated_step, StepFailure};
pub use workspace::{RunWorkspace, WorkspaceError, REFERENCE_CONTENT};
