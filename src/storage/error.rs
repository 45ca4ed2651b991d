/// Failure reported across the storage-client boundary.
///
/// `Storage` is a structured failure raised by the storage layer itself
/// (remote refused, timed out, object missing); `Unclassified` is anything
/// else that went wrong while trying to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("{}", .message.as_deref().unwrap_or("storage operation failed"))]
    Storage { message: Option<String> },
    #[error("{0}")]
    Unclassified(String),
}

impl StorageError {
    pub fn storage(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self::Storage { message: None };
        }
        Self::Storage {
            message: Some(message),
        }
    }

    pub fn storage_without_message() -> Self {
        Self::Storage { message: None }
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::Unclassified(message.into())
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Storage { message } => message.as_deref(),
            Self::Unclassified(message) => Some(message.as_str()),
        }
    }

    pub fn is_storage_layer(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}
