use super::cli::{help_text, parse_cli_args, version_text, CliCommand, CliOptions, OutputFormat};
use super::report::{render_json, render_text, EndpointReport, ProbeReport};
use crate::config::{ConfigError, ProbeSettings};
use crate::pipeline::{Endpoint, ProbeEngine, Verdict};
use crate::storage::{client_for_endpoint, ClientContext};

/// Exit code for invocations that never produced a verdict.
pub const UNKNOWN_EXIT_CODE: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    pub text: String,
    pub exit_code: i32,
}

impl CliOutput {
    fn info(text: String) -> Self {
        Self { text, exit_code: 0 }
    }
}

pub fn run_cli(args: Vec<String>) -> Result<CliOutput, String> {
    match parse_cli_args(&args)? {
        CliCommand::Help => Ok(CliOutput::info(help_text())),
        CliCommand::Version => Ok(CliOutput::info(version_text())),
        CliCommand::Probe(options) => run_probe(options),
    }
}

fn run_probe(options: CliOptions) -> Result<CliOutput, String> {
    let output = options.output;
    let settings = options.into_settings().map_err(|err| err.to_string())?;
    let report = match settings.validate() {
        Ok(()) => probe_endpoints(&settings).map_err(|err| err.to_string())?,
        Err(ConfigError::MissingEndpoint) => {
            ProbeReport::rejected(Verdict::critical(ConfigError::MissingEndpoint.to_string()))
        }
        Err(err) => return Err(err.to_string()),
    };
    let text = match output {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => render_json(&report)?,
    };
    Ok(CliOutput {
        text,
        exit_code: report.exit_code(),
    })
}

/// Probes every configured endpoint in order with one shared client context.
pub fn probe_endpoints(settings: &ProbeSettings) -> Result<ProbeReport, ConfigError> {
    let endpoints = settings.endpoints()?;
    let context = settings.client_context();
    let reports = endpoints
        .iter()
        .map(|endpoint| probe_endpoint(settings, &context, endpoint))
        .collect();
    Ok(ProbeReport::from_endpoints(reports))
}

fn probe_endpoint(
    settings: &ProbeSettings,
    context: &ClientContext,
    endpoint: &Endpoint,
) -> EndpointReport {
    let log = settings.probe_log();
    let client = match client_for_endpoint(endpoint.as_str(), context) {
        Ok(client) => client,
        Err(err) => {
            log.error(
                "client.unavailable",
                &format!("endpoint={endpoint} error={err}"),
            );
            return EndpointReport::Aborted {
                endpoint: endpoint.clone(),
                verdict: Verdict::critical(format!("Unable to create storage client: {err}")),
            };
        }
    };
    let engine = ProbeEngine::new(client.as_ref(), settings.run_settings())
        .with_workspace_parent(settings.workspace_parent())
        .with_log(log);
    match engine.run(endpoint) {
        Ok(report) => EndpointReport::Completed(report),
        Err(err) => EndpointReport::Aborted {
            endpoint: endpoint.clone(),
            verdict: Verdict::critical(err.to_string()),
        },
    }
}
