use super::{ProbeStatus, RunWorkspace, StepLedger, Verdict};
use crate::shared::ProbeLog;

pub const ALL_FINE_SUMMARY: &str = "All fine";
pub const CRITICAL_SUMMARY: &str = "Critical error executing tests";
pub const WARNING_SUMMARY: &str = "Some of the tests returned a warning";

/// Folds step statuses into the overall verdict: any CRITICAL wins, then any
/// WARNING, otherwise OK. Only membership matters, never order.
pub fn aggregate_statuses<I>(statuses: I) -> Verdict
where
    I: IntoIterator<Item = ProbeStatus>,
{
    let mut seen_warning = false;
    for status in statuses {
        match status {
            ProbeStatus::Critical => return Verdict::critical(CRITICAL_SUMMARY),
            ProbeStatus::Warning => seen_warning = true,
            ProbeStatus::Ok => {}
        }
    }
    if seen_warning {
        Verdict::warning(WARNING_SUMMARY)
    } else {
        Verdict::ok(ALL_FINE_SUMMARY)
    }
}

pub fn aggregate(ledger: &StepLedger) -> Verdict {
    aggregate_statuses(ledger.statuses())
}

/// Computes the overall verdict and releases the run workspace. A failed
/// release is logged and never changes the verdict.
pub fn finalize_run(ledger: &StepLedger, workspace: &RunWorkspace, log: &ProbeLog) -> Verdict {
    let verdict = aggregate(ledger);
    release_workspace(workspace, log);
    verdict
}

/// Releases `workspace`, logging `workspace.release_failed` on error.
pub fn release_workspace(workspace: &RunWorkspace, log: &ProbeLog) -> bool {
    match workspace.release() {
        Ok(()) => true,
        Err(err) => {
            log.warn("workspace.release_failed", &err.to_string());
            false
        }
    }
}
