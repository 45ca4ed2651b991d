pub mod client;
pub mod credentials;
pub mod error;
pub mod local;
pub mod webdav;

pub use client::{StorageClient, TransferLocation, TransferOptions};
pub use credentials::{
    ClientContext, Credential, CredentialBinding, DEFAULT_CREDENTIAL_SCHEMES,
    DEFAULT_TIMEOUT_SECONDS,
};
pub use error::StorageError;
pub use local::LocalFsClient;
pub use webdav::WebDavClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProtocol {
    File,
    Http,
    XRootD,
}

impl StorageProtocol {
    pub fn for_address(address: &str) -> Option<Self> {
        let scheme = address.split_once("://")?.0.to_ascii_lowercase();
        match scheme.as_str() {
            "file" => Some(Self::File),
            "http" | "https" | "dav" | "davs" => Some(Self::Http),
            "root" | "xroot" => Some(Self::XRootD),
            _ => None,
        }
    }
}

/// Builds the client that serves `endpoint`, once, before any step runs.
pub fn client_for_endpoint(
    endpoint: &str,
    context: &ClientContext,
) -> Result<Box<dyn StorageClient>, StorageError> {
    match StorageProtocol::for_address(endpoint) {
        Some(StorageProtocol::File) => Ok(Box::new(LocalFsClient::new())),
        Some(StorageProtocol::Http) => Ok(Box::new(WebDavClient::new(context)?)),
        Some(StorageProtocol::XRootD) => Err(StorageError::storage(format!(
            "protocol of `{endpoint}` (xrootd) is not supported"
        ))),
        None => Err(StorageError::storage(format!(
            "unsupported protocol for endpoint `{endpoint}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_is_resolved_from_the_scheme() {
        assert_eq!(
            StorageProtocol::for_address("DAVS://se.example.org/"),
            Some(StorageProtocol::Http)
        );
        assert_eq!(
            StorageProtocol::for_address("file:///tmp"),
            Some(StorageProtocol::File)
        );
        assert_eq!(
            StorageProtocol::for_address("root://xrootd.example.org//store"),
            Some(StorageProtocol::XRootD)
        );
        assert_eq!(StorageProtocol::for_address("/tmp/plain"), None);
    }

    #[test]
    fn xrootd_endpoints_are_rejected_with_a_storage_error() {
        let err = client_for_endpoint("root://xrootd.example.org//store", &ClientContext::default())
            .err()
            .expect("xrootd rejected");
        assert!(err.is_storage_layer());
    }
}
