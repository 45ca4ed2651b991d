use super::StorageError;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferLocation {
    Local(PathBuf),
    Remote(String),
}

impl TransferLocation {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local(path.into())
    }

    pub fn remote(address: impl Into<String>) -> Self {
        Self::Remote(address.into())
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Local(path) => format!("file://{}", path.display()),
            Self::Remote(address) => address.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    pub timeout: Duration,
    pub create_parent_dirs: bool,
    pub overwrite: bool,
}

impl TransferOptions {
    pub fn upload(timeout: Duration) -> Self {
        Self {
            timeout,
            create_parent_dirs: true,
            overwrite: false,
        }
    }

    pub fn download(timeout: Duration) -> Self {
        Self {
            timeout,
            create_parent_dirs: false,
            overwrite: true,
        }
    }
}

/// Blocking access to one storage namespace.
///
/// Implementations must be usable through a shared reference for the whole
/// run; none of the calls may change client-wide configuration.
pub trait StorageClient {
    /// Lists the entries directly below `address`.
    fn list_directory(&self, address: &str) -> Result<Vec<String>, StorageError>;

    fn stat(&self, address: &str) -> Result<(), StorageError>;

    /// Copies between a local path and a remote address in either direction.
    fn copy(
        &self,
        source: &TransferLocation,
        destination: &TransferLocation,
        options: &TransferOptions,
    ) -> Result<(), StorageError>;

    fn remove(&self, address: &str) -> Result<(), StorageError>;
}

pub(crate) fn unsupported_direction(
    source: &TransferLocation,
    destination: &TransferLocation,
) -> StorageError {
    StorageError::unclassified(format!(
        "unsupported transfer from {} to {}",
        source.describe(),
        destination.describe()
    ))
}

pub(crate) fn ensure_local_destination_writable(
    path: &Path,
    options: &TransferOptions,
) -> Result<(), StorageError> {
    if !options.overwrite && path.exists() {
        return Err(StorageError::storage(format!(
            "destination {} already exists",
            path.display()
        )));
    }
    Ok(())
}
