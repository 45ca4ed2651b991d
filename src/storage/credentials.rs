use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Schemes a credential is attached to unless the caller names others.
pub const DEFAULT_CREDENTIAL_SCHEMES: [&str; 4] = ["https://", "davs://", "root://", "xroot://"];

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// PEM file holding the client certificate chain and its private key.
    X509Proxy(PathBuf),
    BearerToken(String),
}

impl Credential {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::X509Proxy(_) => "x509",
            Self::BearerToken(_) => "bearer",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X509Proxy(path) => f.debug_tuple("X509Proxy").field(path).finish(),
            Self::BearerToken(_) => f.debug_tuple("BearerToken").field(&"<redacted>").finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialBinding {
    pub schemes: Vec<String>,
    pub credential: Credential,
}

impl CredentialBinding {
    pub fn applies_to(&self, address: &str) -> bool {
        self.schemes.iter().any(|scheme| {
            address
                .get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        })
    }
}

/// Process-wide storage client configuration. Built once before the first
/// step runs and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    timeout: Duration,
    ca_bundle: Option<PathBuf>,
    bindings: Vec<CredentialBinding>,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl ClientContext {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ca_bundle: None,
            bindings: Vec::new(),
        }
    }

    pub fn with_ca_bundle(mut self, ca_bundle: impl Into<PathBuf>) -> Self {
        self.ca_bundle = Some(ca_bundle.into());
        self
    }

    /// Attaches `credential` to the default grid schemes.
    pub fn with_credential(self, credential: Credential) -> Self {
        self.with_credential_for(credential, &DEFAULT_CREDENTIAL_SCHEMES)
    }

    pub fn with_credential_for(mut self, credential: Credential, schemes: &[&str]) -> Self {
        self.bindings.push(CredentialBinding {
            schemes: schemes.iter().map(|scheme| scheme.to_string()).collect(),
            credential,
        });
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn ca_bundle(&self) -> Option<&Path> {
        self.ca_bundle.as_deref()
    }

    pub fn bindings(&self) -> &[CredentialBinding] {
        &self.bindings
    }

    /// Every credential bound to the scheme of `address`, in binding order.
    pub fn credentials_for(&self, address: &str) -> Vec<&Credential> {
        self.bindings
            .iter()
            .filter(|binding| binding.applies_to(address))
            .map(|binding| &binding.credential)
            .collect()
    }

    /// The most recently bound bearer token for `address`, if any.
    pub fn bearer_token_for(&self, address: &str) -> Option<&str> {
        self.credentials_for(address)
            .into_iter()
            .filter_map(|credential| match credential {
                Credential::BearerToken(token) => Some(token.as_str()),
                Credential::X509Proxy(_) => None,
            })
            .last()
    }

    pub fn x509_proxy_for(&self, address: &str) -> Option<&Path> {
        self.credentials_for(address)
            .into_iter()
            .filter_map(|credential| match credential {
                Credential::X509Proxy(path) => Some(path.as_path()),
                Credential::BearerToken(_) => None,
            })
            .last()
    }
}
