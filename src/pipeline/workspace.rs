use crate::shared::atomic_write_file;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Ten newline-terminated digits; uploaded by Put and expected back by Get.
pub const REFERENCE_CONTENT: &[u8] = b"1\n2\n3\n4\n5\n6\n7\n8\n9\n0\n";
pub const REFERENCE_FILE_NAME: &str = "testFile.txt";
pub const DOWNLOAD_FILE_NAME: &str = "testFileIn.txt";

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write reference file {path}: {source}")]
    WriteReference {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove workspace {path}: {source}")]
    Release {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Run-scoped local scratch directory holding the reference file and the
/// downloaded copy.
#[derive(Debug)]
pub struct RunWorkspace {
    root: PathBuf,
    reference_path: PathBuf,
    download_path: PathBuf,
}

impl RunWorkspace {
    pub fn provision() -> Result<Self, WorkspaceError> {
        Self::provision_in(&std::env::temp_dir())
    }

    pub fn provision_in(parent: &Path) -> Result<Self, WorkspaceError> {
        let root = parent.join(format!(
            "storage-probe-{}",
            uuid::Uuid::new_v4().simple()
        ));
        fs::create_dir_all(parent).map_err(|source| WorkspaceError::Create {
            path: parent.display().to_string(),
            source,
        })?;
        fs::create_dir(&root).map_err(|source| WorkspaceError::Create {
            path: root.display().to_string(),
            source,
        })?;

        let workspace = Self {
            reference_path: root.join(REFERENCE_FILE_NAME),
            download_path: root.join(DOWNLOAD_FILE_NAME),
            root,
        };
        if let Err(source) = atomic_write_file(&workspace.reference_path, REFERENCE_CONTENT) {
            let _ = workspace.release();
            return Err(WorkspaceError::WriteReference {
                path: workspace.reference_path.display().to_string(),
                source,
            });
        }
        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn reference_path(&self) -> &Path {
        &self.reference_path
    }

    pub fn download_path(&self) -> &Path {
        &self.download_path
    }

    /// Writes a fresh copy of the reference content to upload as `name`.
    pub fn stage_upload_source(&self, name: &str) -> std::io::Result<PathBuf> {
        let path = self.root.join(name);
        atomic_write_file(&path, REFERENCE_CONTENT)?;
        Ok(path)
    }

    /// Byte-exact comparison of `candidate` against the reference file.
    pub fn matches_reference(&self, candidate: &Path) -> std::io::Result<bool> {
        let expected = fs::read(&self.reference_path)?;
        let actual = fs::read(candidate)?;
        Ok(expected == actual)
    }

    /// Removes the directory tree. Safe to call more than once.
    pub fn release(&self) -> Result<(), WorkspaceError> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(WorkspaceError::Release {
                path: self.root.display().to_string(),
                source,
            }),
        }
    }
}
