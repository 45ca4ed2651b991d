use crate::pipeline::{aggregate_statuses, Endpoint, ProbeStatus, RunReport, Verdict};
use serde::Serialize;

/// Outcome of probing one endpoint. `Aborted` covers everything that stops
/// a run before or outside the gated steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EndpointReport {
    Completed(RunReport),
    Aborted { endpoint: Endpoint, verdict: Verdict },
}

impl EndpointReport {
    pub fn endpoint(&self) -> &Endpoint {
        match self {
            Self::Completed(report) => &report.endpoint,
            Self::Aborted { endpoint, .. } => endpoint,
        }
    }

    pub fn verdict(&self) -> &Verdict {
        match self {
            Self::Completed(report) => &report.overall,
            Self::Aborted { verdict, .. } => verdict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub overall: Verdict,
    pub endpoints: Vec<EndpointReport>,
}

impl ProbeReport {
    /// A single endpoint keeps its own verdict; several are folded like steps.
    pub fn from_endpoints(endpoints: Vec<EndpointReport>) -> Self {
        let overall = match endpoints.as_slice() {
            [single] => single.verdict().clone(),
            _ => aggregate_statuses(endpoints.iter().map(|report| report.verdict().status)),
        };
        Self { overall, endpoints }
    }

    /// Report for a run that never reached an endpoint.
    pub fn rejected(verdict: Verdict) -> Self {
        Self {
            overall: verdict,
            endpoints: Vec::new(),
        }
    }

    pub fn status(&self) -> ProbeStatus {
        self.overall.status
    }

    pub fn exit_code(&self) -> i32 {
        self.overall.status.exit_code()
    }
}

pub fn render_text(report: &ProbeReport) -> String {
    let mut lines = vec![format!(
        "{} - {}",
        report.overall.status, report.overall.summary
    )];
    for endpoint_report in &report.endpoints {
        let endpoint = endpoint_report.endpoint();
        if let EndpointReport::Completed(run) = endpoint_report {
            for outcome in &run.steps {
                lines.push(format!(
                    "[{endpoint}] {} {}: {}",
                    outcome.step, outcome.status, outcome.summary
                ));
            }
        }
        let verdict = endpoint_report.verdict();
        lines.push(format!(
            "[{endpoint}] All {}: {}",
            verdict.status, verdict.summary
        ));
    }
    lines.join("\n")
}

pub fn render_json(report: &ProbeReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|err| format!("failed to encode report: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{StepKind, StepOutcome};

    fn endpoint(raw: &str) -> Endpoint {
        Endpoint::parse(raw).expect("endpoint")
    }

    fn completed(raw: &str, status: ProbeStatus, summary: &str) -> EndpointReport {
        EndpointReport::Completed(RunReport {
            endpoint: endpoint(raw),
            steps: vec![StepOutcome {
                index: 0,
                step: StepKind::LsDir,
                status,
                summary: summary.to_string(),
            }],
            overall: Verdict::new(status, "overall"),
            workspace: std::env::temp_dir(),
            workspace_released: true,
        })
    }

    #[test]
    fn single_endpoint_keeps_its_verdict() {
        let report = ProbeReport::from_endpoints(vec![completed(
            "file:///data",
            ProbeStatus::Warning,
            "LsDir test skipped",
        )]);
        assert_eq!(report.overall, Verdict::warning("overall"));
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn worst_endpoint_sets_the_exit_code() {
        let report = ProbeReport::from_endpoints(vec![
            completed("file:///a", ProbeStatus::Ok, "fine"),
            EndpointReport::Aborted {
                endpoint: endpoint("file:///b"),
                verdict: Verdict::critical("Unable to prepare local workspace: denied"),
            },
        ]);
        assert_eq!(report.status(), ProbeStatus::Critical);
        assert_eq!(report.exit_code(), 2);
        assert_eq!(report.overall.summary, "Critical error executing tests");
    }

    #[test]
    fn text_report_lists_steps_per_endpoint() {
        let report = ProbeReport::from_endpoints(vec![completed(
            "file:///data",
            ProbeStatus::Ok,
            "Storage Path[file:///data] Directory successfully listed",
        )]);
        let text = render_text(&report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "OK - overall");
        assert_eq!(
            lines[1],
            "[file:///data] LsDir OK: Storage Path[file:///data] Directory successfully listed"
        );
        assert_eq!(lines[2], "[file:///data] All OK: overall");
    }

    #[test]
    fn json_report_tags_each_endpoint() {
        let report = ProbeReport::from_endpoints(vec![EndpointReport::Aborted {
            endpoint: endpoint("file:///b"),
            verdict: Verdict::critical("boom"),
        }]);
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&report).expect("json")).expect("parse");
        assert_eq!(json["overall"]["status"], "CRITICAL");
        assert_eq!(json["endpoints"][0]["outcome"], "aborted");
        assert_eq!(json["endpoints"][0]["verdict"]["summary"], "boom");
    }
}
