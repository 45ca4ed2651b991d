#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Argument Endpoint (-E, --endpoint) is missing")]
    MissingEndpoint,
    #[error("endpoint `{endpoint}` is invalid: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("settings validation failed: {0}")]
    Settings(String),
}
