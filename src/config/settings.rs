use super::ConfigError;
use crate::pipeline::{Endpoint, RunSettings};
use crate::shared::ProbeLog;
use crate::storage::{ClientContext, Credential, DEFAULT_TIMEOUT_SECONDS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProbeSettings {
    #[serde(default)]
    pub endpoints: Vec<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub skip_ls_dir: bool,
    #[serde(default)]
    pub x509: Option<PathBuf>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub ca_bundle: Option<PathBuf>,
    #[serde(default)]
    pub workdir: Option<PathBuf>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Upper bound for `timeout_seconds`, one day.
pub const MAX_TIMEOUT_SECONDS: u64 = 86_400;

fn parse_endpoint(raw: &str) -> Result<Endpoint, ConfigError> {
    Endpoint::parse(raw).map_err(|reason| ConfigError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason,
    })
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            timeout_seconds: default_timeout_seconds(),
            read_only: false,
            skip_ls_dir: false,
            x509: None,
            token: None,
            ca_bundle: None,
            workdir: None,
            log_file: None,
        }
    }
}

impl ProbeSettings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.iter().all(|endpoint| endpoint.trim().is_empty()) {
            return Err(ConfigError::MissingEndpoint);
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::Settings(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(ConfigError::Settings(format!(
                "timeout_seconds must be at most {MAX_TIMEOUT_SECONDS}"
            )));
        }
        for raw in self.endpoints.iter().filter(|raw| !raw.trim().is_empty()) {
            parse_endpoint(raw)?;
        }
        if let Some(token) = &self.token {
            if token.trim().is_empty() {
                return Err(ConfigError::Settings(
                    "bearer token must be non-empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn endpoints(&self) -> Result<Vec<Endpoint>, ConfigError> {
        let endpoints = self
            .endpoints
            .iter()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_endpoint(raw))
            .collect::<Result<Vec<_>, _>>()?;
        if endpoints.is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        Ok(endpoints)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            timeout: self.timeout(),
            read_only: self.read_only,
            skip_ls_dir: self.skip_ls_dir,
        }
    }

    /// Client context with every configured credential attached.
    pub fn client_context(&self) -> ClientContext {
        let mut context = ClientContext::new(self.timeout());
        if let Some(bundle) = &self.ca_bundle {
            context = context.with_ca_bundle(bundle.clone());
        }
        if let Some(path) = &self.x509 {
            context = context.with_credential(Credential::X509Proxy(path.clone()));
        }
        if let Some(token) = &self.token {
            context = context.with_credential(Credential::BearerToken(token.clone()));
        }
        context
    }

    pub fn probe_log(&self) -> ProbeLog {
        match &self.log_file {
            Some(path) => ProbeLog::to_file(path.clone()),
            None => ProbeLog::disabled(),
        }
    }

    pub fn workspace_parent(&self) -> PathBuf {
        self.workdir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
