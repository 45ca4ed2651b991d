use super::client::{ensure_local_destination_writable, unsupported_direction};
use super::{StorageClient, StorageError, TransferLocation, TransferOptions};
use std::fs;
use std::path::{Path, PathBuf};

pub const FILE_SCHEME: &str = "file://";

/// Storage client for `file://` endpoints, e.g. a locally mounted namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFsClient;

impl LocalFsClient {
    pub fn new() -> Self {
        Self
    }
}

pub fn local_path_for(address: &str) -> Result<PathBuf, StorageError> {
    let Some(path) = address.strip_prefix(FILE_SCHEME) else {
        return Err(StorageError::unclassified(format!(
            "`{address}` is not a {FILE_SCHEME} address"
        )));
    };
    if path.is_empty() {
        return Err(StorageError::unclassified(format!(
            "`{address}` has an empty path"
        )));
    }
    Ok(PathBuf::from(path))
}

fn io_storage_error(path: &Path, err: std::io::Error) -> StorageError {
    StorageError::storage(format!("{}: {err}", path.display()))
}

impl StorageClient for LocalFsClient {
    fn list_directory(&self, address: &str) -> Result<Vec<String>, StorageError> {
        let path = local_path_for(address)?;
        let entries = fs::read_dir(&path).map_err(|err| io_storage_error(&path, err))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| io_storage_error(&path, err))?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    fn stat(&self, address: &str) -> Result<(), StorageError> {
        let path = local_path_for(address)?;
        fs::metadata(&path)
            .map(|_| ())
            .map_err(|err| io_storage_error(&path, err))
    }

    fn copy(
        &self,
        source: &TransferLocation,
        destination: &TransferLocation,
        options: &TransferOptions,
    ) -> Result<(), StorageError> {
        let (from, to) = match (source, destination) {
            (TransferLocation::Local(from), TransferLocation::Remote(to)) => {
                (from.clone(), local_path_for(to)?)
            }
            (TransferLocation::Remote(from), TransferLocation::Local(to)) => {
                (local_path_for(from)?, to.clone())
            }
            _ => return Err(unsupported_direction(source, destination)),
        };

        ensure_local_destination_writable(&to, options)?;
        if options.create_parent_dirs {
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent).map_err(|err| io_storage_error(parent, err))?;
            }
        }
        fs::copy(&from, &to)
            .map(|_| ())
            .map_err(|err| io_storage_error(&from, err))
    }

    fn remove(&self, address: &str) -> Result<(), StorageError> {
        let path = local_path_for(address)?;
        fs::remove_file(&path).map_err(|err| io_storage_error(&path, err))
    }
}
