pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{ProbeSettings, MAX_TIMEOUT_SECONDS};
