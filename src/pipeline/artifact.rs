use serde::Serialize;

pub const ARTIFACT_NAME_PREFIX: &str = "testfile-put-";

const SLASH_TRIMMED_SCHEMES: [&str; 4] = ["https://", "http://", "davs://", "dav://"];

/// Base location under test.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("endpoint must be non-empty".to_string());
        }
        let Some((scheme, rest)) = trimmed.split_once("://") else {
            return Err("endpoint must include a scheme such as https:// or file://".to_string());
        };
        if scheme.is_empty() || rest.is_empty() {
            return Err("endpoint must include a scheme and a location".to_string());
        }

        let scheme = scheme.to_ascii_lowercase();
        let address = format!("{scheme}://{rest}");
        let address = if SLASH_TRIMMED_SCHEMES
            .iter()
            .any(|prefix| address.starts_with(prefix))
        {
            address.trim_end_matches('/').to_string()
        } else {
            address
        };
        Ok(Self(address))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Remote address of `name` directly below this endpoint.
    pub fn address_for(&self, name: &str) -> String {
        format!("{}/{}", self.0, name)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The object uploaded by the Put check and consumed by Ls, Get and Del.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestArtifact {
    name: String,
    endpoint: Endpoint,
    address: String,
}

impl TestArtifact {
    /// The random component keeps names distinct across runs started in the
    /// same second.
    pub fn generate(endpoint: &Endpoint, unix_seconds: i64) -> Self {
        let name = format!(
            "{ARTIFACT_NAME_PREFIX}{unix_seconds}-{}.txt",
            uuid::Uuid::new_v4()
        );
        Self::with_name(endpoint, name)
    }

    pub fn with_name(endpoint: &Endpoint, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            address: endpoint.address_for(&name),
            endpoint: endpoint.clone(),
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}
