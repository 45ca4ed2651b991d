use super::context::{RunState, StepExecutionContext};
use super::{PipelineError, ProbeStatus, ResolvedStep, StepKind, StepOutcome, TestArtifact, Verdict};
use crate::storage::{StorageError, TransferLocation, TransferOptions};
use std::time::{Duration, Instant};

pub const READ_ONLY_SUMMARY: &str = "read-only endpoint";
pub const NO_TARGET_SUMMARY: &str = "No endpoints found to test";
pub const LS_DIR_SKIPPED_SUMMARY: &str = "LsDir test skipped";
pub const FILES_DIFFER_SUMMARY: &str = "Files differ!";

/// Why a step that did run ended CRITICAL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepFailure {
    Storage {
        address: String,
        message: Option<String>,
    },
    ContentMismatch,
    Unclassified {
        operation: &'static str,
        reason: String,
    },
}

impl StepFailure {
    pub fn from_storage(step: StepKind, address: &str, err: StorageError) -> Self {
        match err {
            StorageError::Storage { message } => Self::Storage {
                address: address.to_string(),
                message,
            },
            StorageError::Unclassified(reason) => Self::Unclassified {
                operation: step.operation(),
                reason,
            },
        }
    }

    pub fn summary(&self, step: StepKind) -> String {
        match self {
            Self::Storage { address, message } => match (step, message.as_deref()) {
                (StepKind::Put, Some(message)) => {
                    format!("Error copying to {address}, [Err:{message}]")
                }
                (StepKind::Put, None) => format!("Error copying to {address}"),
                (StepKind::Ls, Some(message)) => {
                    format!("Error listing file: {address},[Err:{message}];")
                }
                (StepKind::Ls, None) => format!("Error listing file: {address}"),
                (_, Some(message)) => format!("[Err:{message}]"),
                (_, None) => "Error".to_string(),
            },
            Self::ContentMismatch => FILES_DIFFER_SUMMARY.to_string(),
            Self::Unclassified { operation, reason } => {
                format!("problem invoking {operation}: {reason}")
            }
        }
    }
}

struct StepResult {
    verdict: Verdict,
    created: Option<TestArtifact>,
}

impl From<Verdict> for StepResult {
    fn from(verdict: Verdict) -> Self {
        Self {
            verdict,
            created: None,
        }
    }
}

fn failed(step: StepKind, failure: StepFailure) -> StepResult {
    Verdict::critical(failure.summary(step)).into()
}

/// Runs one gated check and appends exactly one outcome to the ledger.
///
/// Errors are ledger contract violations only; every storage or local failure
/// is folded into the recorded outcome.
pub fn execute_gated_step<'s>(
    context: &StepExecutionContext<'_>,
    state: &'s mut RunState,
    step: &ResolvedStep,
) -> Result<&'s StepOutcome, PipelineError> {
    let result: StepResult = match gate_status(state, step)? {
        Some(status) if !status.is_ok() => {
            Verdict::warning(format!("{} skipped", step.kind)).into()
        }
        _ => run_check(context, state, step.kind),
    };

    if result.verdict.status.is_ok() {
        if let Some(artifact) = result.created {
            state.registry.put(artifact);
        }
    }
    state.ledger.record(StepOutcome {
        index: step.index,
        step: step.kind,
        status: result.verdict.status,
        summary: result.verdict.summary,
    })
}

fn gate_status(state: &RunState, step: &ResolvedStep) -> Result<Option<ProbeStatus>, PipelineError> {
    match step.predecessor {
        Some(index) => Ok(Some(state.ledger.get(index)?.status)),
        None => Ok(None),
    }
}

fn run_check(context: &StepExecutionContext<'_>, state: &RunState, kind: StepKind) -> StepResult {
    match kind {
        StepKind::LsDir => check_list_directory(context),
        StepKind::Put => check_put(context),
        StepKind::Ls => check_stat(context, state),
        StepKind::Get => check_get(context, state),
        StepKind::Del => check_delete(context, state),
    }
}

fn check_list_directory(context: &StepExecutionContext<'_>) -> StepResult {
    if context.settings.skip_ls_dir {
        return Verdict::ok(LS_DIR_SKIPPED_SUMMARY).into();
    }
    let endpoint = context.endpoint.as_str();
    match context.client.list_directory(endpoint) {
        Ok(_) => Verdict::ok(format!(
            "Storage Path[{endpoint}] Directory successfully listed"
        ))
        .into(),
        Err(err) => failed(
            StepKind::LsDir,
            StepFailure::from_storage(StepKind::LsDir, endpoint, err),
        ),
    }
}

/// Read-only runs register no artifact, so Get and Del then stop at their
/// no-target guard without touching storage.
fn check_put(context: &StepExecutionContext<'_>) -> StepResult {
    if context.settings.read_only {
        return Verdict::ok(READ_ONLY_SUMMARY).into();
    }

    let artifact = TestArtifact::generate(context.endpoint, chrono::Utc::now().timestamp());
    let source = match context.workspace.stage_upload_source(artifact.name()) {
        Ok(path) => path,
        Err(err) => {
            return failed(
                StepKind::Put,
                StepFailure::Unclassified {
                    operation: StepKind::Put.operation(),
                    reason: format!("Error creating source file: {err}"),
                },
            );
        }
    };

    let started = Instant::now();
    match context.client.copy(
        &TransferLocation::Local(source),
        &TransferLocation::remote(artifact.address()),
        &TransferOptions::upload(context.settings.timeout),
    ) {
        Ok(()) => StepResult {
            verdict: Verdict::ok(format!(
                "File was copied to the Storage endpoint: Transfer time: {}",
                format_transfer_time(started.elapsed())
            )),
            created: Some(artifact),
        },
        Err(err) => failed(
            StepKind::Put,
            StepFailure::from_storage(StepKind::Put, artifact.address(), err),
        ),
    }
}

fn check_stat(context: &StepExecutionContext<'_>, state: &RunState) -> StepResult {
    let Some(artifact) = state.registry.get(context.endpoint) else {
        return Verdict::warning(NO_TARGET_SUMMARY).into();
    };
    match context.client.stat(artifact.address()) {
        Ok(()) => Verdict::ok("File successfully listed").into(),
        Err(err) => failed(
            StepKind::Ls,
            StepFailure::from_storage(StepKind::Ls, artifact.address(), err),
        ),
    }
}

fn check_get(context: &StepExecutionContext<'_>, state: &RunState) -> StepResult {
    let Some(artifact) = state.registry.get(context.endpoint) else {
        return Verdict::warning(NO_TARGET_SUMMARY).into();
    };

    let target = context.workspace.download_path();
    let started = Instant::now();
    if let Err(err) = context.client.copy(
        &TransferLocation::remote(artifact.address()),
        &TransferLocation::local(target),
        &TransferOptions::download(context.settings.timeout),
    ) {
        return failed(
            StepKind::Get,
            StepFailure::from_storage(StepKind::Get, artifact.address(), err),
        );
    }
    let elapsed = started.elapsed();

    match context.workspace.matches_reference(target) {
        Ok(true) => Verdict::ok(format!(
            "File was copied from the storage: Diff successful. Transfer time: {}",
            format_transfer_time(elapsed)
        ))
        .into(),
        Ok(false) => failed(StepKind::Get, StepFailure::ContentMismatch),
        Err(err) => failed(
            StepKind::Get,
            StepFailure::Unclassified {
                operation: StepKind::Get.operation(),
                reason: format!("failed to compare {}: {err}", target.display()),
            },
        ),
    }
}

fn check_delete(context: &StepExecutionContext<'_>, state: &RunState) -> StepResult {
    let Some(artifact) = state.registry.get(context.endpoint) else {
        return Verdict::critical(NO_TARGET_SUMMARY).into();
    };
    match context.client.remove(artifact.address()) {
        Ok(()) => Verdict::ok("File was deleted from the storage endpoint.").into(),
        Err(err) => failed(
            StepKind::Del,
            StepFailure::from_storage(StepKind::Del, artifact.address(), err),
        ),
    }
}

pub fn format_transfer_time(elapsed: Duration) -> String {
    format!("{:.3}s", elapsed.as_secs_f64())
}
