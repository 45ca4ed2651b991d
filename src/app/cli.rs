use crate::config::{ConfigError, ProbeSettings};
use std::path::PathBuf;

pub const PROBE_NAME: &str = "storage-probe";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("output must be one of: text, json (got `{raw}`)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub endpoints: Vec<String>,
    pub x509: Option<PathBuf>,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub skip_ls_dir: bool,
    pub read_only: bool,
    pub config: Option<PathBuf>,
    pub ca_bundle: Option<PathBuf>,
    pub workdir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub output: OutputFormat,
}

impl CliOptions {
    /// Loads the settings file, if any, and lets flags override it.
    pub fn into_settings(self) -> Result<ProbeSettings, ConfigError> {
        let mut settings = match &self.config {
            Some(path) => ProbeSettings::from_path(path)?,
            None => ProbeSettings::default(),
        };
        if !self.endpoints.is_empty() {
            settings.endpoints = self.endpoints;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            settings.timeout_seconds = timeout_seconds;
        }
        settings.read_only |= self.read_only;
        settings.skip_ls_dir |= self.skip_ls_dir;
        if self.x509.is_some() {
            settings.x509 = self.x509;
        }
        if self.token.is_some() {
            settings.token = self.token;
        }
        if self.ca_bundle.is_some() {
            settings.ca_bundle = self.ca_bundle;
        }
        if self.workdir.is_some() {
            settings.workdir = self.workdir;
        }
        if self.log_file.is_some() {
            settings.log_file = self.log_file;
        }
        Ok(settings)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Help,
    Version,
    Probe(CliOptions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliFlag {
    Endpoint,
    X509,
    Token,
    Timeout,
    SkipLsDir,
    ReadOnly,
    Config,
    CaBundle,
    Workdir,
    LogFile,
    Output,
    Help,
    Version,
    Unknown,
}

impl CliFlag {
    fn takes_value(self) -> bool {
        !matches!(
            self,
            Self::SkipLsDir | Self::ReadOnly | Self::Help | Self::Version | Self::Unknown
        )
    }
}

fn parse_cli_flag(input: &str) -> CliFlag {
    match input {
        "-E" | "--endpoint" => CliFlag::Endpoint,
        "-X" | "--x509" => CliFlag::X509,
        "-to" | "--token" => CliFlag::Token,
        "--se-timeout" => CliFlag::Timeout,
        "-S" | "--skip-ls-dir" => CliFlag::SkipLsDir,
        "-RO" | "--read-only" => CliFlag::ReadOnly,
        "-c" | "--config" => CliFlag::Config,
        "--ca-bundle" => CliFlag::CaBundle,
        "--workdir" => CliFlag::Workdir,
        "--log-file" => CliFlag::LogFile,
        "-o" | "--output" => CliFlag::Output,
        "-h" | "--help" => CliFlag::Help,
        "-V" | "--version" => CliFlag::Version,
        _ => CliFlag::Unknown,
    }
}

pub fn parse_cli_args(args: &[String]) -> Result<CliCommand, String> {
    let mut options = CliOptions::default();
    let mut index = 0;
    while index < args.len() {
        let arg = args[index].as_str();
        let (name, inline_value) = match arg.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value.to_string())),
            _ => (arg, None),
        };
        let flag = parse_cli_flag(name);
        if flag == CliFlag::Unknown {
            return Err(format!("unknown argument `{arg}`"));
        }

        let value = if flag.takes_value() {
            match inline_value {
                Some(value) => Some(value),
                None => {
                    index += 1;
                    Some(
                        args.get(index)
                            .cloned()
                            .ok_or_else(|| format!("missing value for `{name}`"))?,
                    )
                }
            }
        } else {
            if inline_value.is_some() {
                return Err(format!("`{name}` does not take a value"));
            }
            None
        };
        let value = value.unwrap_or_default();

        match flag {
            CliFlag::Endpoint => options.endpoints.push(value),
            CliFlag::X509 => options.x509 = Some(PathBuf::from(value)),
            CliFlag::Token => options.token = Some(value),
            CliFlag::Timeout => {
                let seconds = value.parse::<u64>().map_err(|_| {
                    format!("`--se-timeout` expects a whole number of seconds, got `{value}`")
                })?;
                options.timeout_seconds = Some(seconds);
            }
            CliFlag::SkipLsDir => options.skip_ls_dir = true,
            CliFlag::ReadOnly => options.read_only = true,
            CliFlag::Config => options.config = Some(PathBuf::from(value)),
            CliFlag::CaBundle => options.ca_bundle = Some(PathBuf::from(value)),
            CliFlag::Workdir => options.workdir = Some(PathBuf::from(value)),
            CliFlag::LogFile => options.log_file = Some(PathBuf::from(value)),
            CliFlag::Output => options.output = OutputFormat::parse(&value)?,
            CliFlag::Help => return Ok(CliCommand::Help),
            CliFlag::Version => return Ok(CliCommand::Version),
            CliFlag::Unknown => return Err(format!("unknown argument `{arg}`")),
        }
        index += 1;
    }
    Ok(CliCommand::Probe(options))
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        format!("Usage: {PROBE_NAME} -E <url> [options]"),
        String::new(),
        "Options:".to_string(),
        "  -E, --endpoint <url>     Base URL to test (repeatable)".to_string(),
        "  -X, --x509 <path>        Location of x509 certificate proxy file".to_string(),
        "  -to, --token <token>     Bearer token to be used".to_string(),
        "  --se-timeout <secs>      Storage operations timeout (default 60)".to_string(),
        "  -S, --skip-ls-dir        Skip LsDir tests, needed for object storage backends"
            .to_string(),
        "  -RO, --read-only         Enable read-only tests".to_string(),
        "  -c, --config <path>      YAML settings file; flags override its values".to_string(),
        "  --ca-bundle <path>       Extra PEM trust anchors for https endpoints".to_string(),
        "  --workdir <path>         Parent directory for run workspaces".to_string(),
        "  --log-file <path>        Append JSON-lines run events to this file".to_string(),
        "  -o, --output <format>    Report format: text (default) or json".to_string(),
        "  -h, --help               Show this help".to_string(),
        "  -V, --version            Show the probe version".to_string(),
    ]
}

pub fn help_text() -> String {
    cli_help_lines().join("\n")
}

pub fn version_text() -> String {
    format!("{PROBE_NAME} v{}", env!("CARGO_PKG_VERSION"))
}
