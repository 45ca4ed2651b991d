use super::client::{ensure_local_destination_writable, unsupported_direction};
use super::{ClientContext, StorageClient, StorageError, TransferLocation, TransferOptions};
use crate::shared::atomic_write_file;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const PROPFIND_BODY: &str = concat!(
    r#"<?xml version="1.0" encoding="utf-8"?>"#,
    r#"<D:propfind xmlns:D="DAV:"><D:prop><D:resourcetype/><D:getcontentlength/></D:prop></D:propfind>"#
);

/// WebDAV client for `http(s)://` and `dav(s)://` endpoints.
#[derive(Clone)]
pub struct WebDavClient {
    agent: ureq::Agent,
    context: ClientContext,
}

impl std::fmt::Debug for WebDavClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDavClient")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl WebDavClient {
    pub fn new(context: &ClientContext) -> Result<Self, StorageError> {
        let mut builder = ureq::AgentBuilder::new()
            .timeout(context.timeout())
            .user_agent(concat!("storage-probe/", env!("CARGO_PKG_VERSION")));

        let identity = context
            .x509_proxy_for("https://")
            .or_else(|| context.x509_proxy_for("davs://"));
        if identity.is_some() || context.ca_bundle().is_some() {
            let tls = build_tls_config(identity, context.ca_bundle())?;
            builder = builder.tls_config(Arc::new(tls));
        }

        Ok(Self {
            agent: builder.build(),
            context: context.clone(),
        })
    }

    fn request(&self, method: &str, address: &str, timeout: Duration) -> ureq::Request {
        let mut request = self
            .agent
            .request(method, &wire_url(address))
            .timeout(timeout);
        if let Some(token) = self.context.bearer_token_for(address) {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        request
    }

    fn propfind(
        &self,
        address: &str,
        depth: &str,
        timeout: Duration,
    ) -> Result<ureq::Response, StorageError> {
        self.request("PROPFIND", address, timeout)
            .set("Depth", depth)
            .set("Content-Type", "application/xml; charset=utf-8")
            .send_string(PROPFIND_BODY)
            .map_err(map_ureq_error)
    }

    fn make_collection(&self, address: &str, timeout: Duration) -> Result<(), StorageError> {
        match self.request("MKCOL", address, timeout).call() {
            Ok(_) => Ok(()),
            // 405: the collection already exists.
            Err(ureq::Error::Status(405, _)) => Ok(()),
            Err(err) => Err(map_ureq_error(err)),
        }
    }

    fn ensure_parent_collections(
        &self,
        address: &str,
        timeout: Duration,
    ) -> Result<(), StorageError> {
        let Some((origin, path)) = split_address(address) else {
            return Err(StorageError::unclassified(format!(
                "`{address}` is not a valid url"
            )));
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() <= 1 {
            return Ok(());
        }
        let parents = &segments[..segments.len() - 1];
        if self
            .propfind(&format!("{origin}/{}/", parents.join("/")), "0", timeout)
            .is_ok()
        {
            return Ok(());
        }

        let mut result = Ok(());
        for depth in 1..=parents.len() {
            let collection = format!("{origin}/{}/", parents[..depth].join("/"));
            result = self.make_collection(&collection, timeout);
        }
        result
    }

    fn upload(
        &self,
        source: &Path,
        address: &str,
        options: &TransferOptions,
    ) -> Result<(), StorageError> {
        let payload = fs::read(source).map_err(|err| {
            StorageError::unclassified(format!("failed to read {}: {err}", source.display()))
        })?;
        if options.create_parent_dirs {
            self.ensure_parent_collections(address, options.timeout)?;
        }
        if !options.overwrite && self.propfind(address, "0", options.timeout).is_ok() {
            return Err(StorageError::storage(format!("{address} already exists")));
        }
        self.request("PUT", address, options.timeout)
            .set("Content-Type", "application/octet-stream")
            .send_bytes(&payload)
            .map(|_| ())
            .map_err(map_ureq_error)
    }

    fn download(
        &self,
        address: &str,
        destination: &Path,
        options: &TransferOptions,
    ) -> Result<(), StorageError> {
        ensure_local_destination_writable(destination, options)?;
        let response = self
            .request("GET", address, options.timeout)
            .call()
            .map_err(map_ureq_error)?;
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|err| StorageError::storage(format!("failed to read {address}: {err}")))?;

        if options.create_parent_dirs {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).map_err(|err| {
                    StorageError::unclassified(format!(
                        "failed to create {}: {err}",
                        parent.display()
                    ))
                })?;
            }
        }
        atomic_write_file(destination, &body).map_err(|err| {
            StorageError::unclassified(format!(
                "failed to write {}: {err}",
                destination.display()
            ))
        })
    }
}

impl StorageClient for WebDavClient {
    fn list_directory(&self, address: &str) -> Result<Vec<String>, StorageError> {
        let body = self
            .propfind(address, "1", self.context.timeout())?
            .into_string()
            .map_err(|err| {
                StorageError::storage(format!("failed to read listing of {address}: {err}"))
            })?;
        Ok(listing_entries(address, &body))
    }

    fn stat(&self, address: &str) -> Result<(), StorageError> {
        self.propfind(address, "0", self.context.timeout())
            .map(|_| ())
    }

    fn copy(
        &self,
        source: &TransferLocation,
        destination: &TransferLocation,
        options: &TransferOptions,
    ) -> Result<(), StorageError> {
        match (source, destination) {
            (TransferLocation::Local(path), TransferLocation::Remote(address)) => {
                self.upload(path, address, options)
            }
            (TransferLocation::Remote(address), TransferLocation::Local(path)) => {
                self.download(address, path, options)
            }
            _ => Err(unsupported_direction(source, destination)),
        }
    }

    fn remove(&self, address: &str) -> Result<(), StorageError> {
        self.request("DELETE", address, self.context.timeout())
            .call()
            .map(|_| ())
            .map_err(map_ureq_error)
    }
}

fn map_ureq_error(err: ureq::Error) -> StorageError {
    match err {
        ureq::Error::Status(code, response) => {
            StorageError::storage(format!("HTTP {code} {}", response.status_text()))
        }
        ureq::Error::Transport(transport) => StorageError::storage(transport.to_string()),
    }
}

/// Maps the WebDAV scheme aliases onto the HTTP scheme spoken on the wire.
pub fn wire_url(address: &str) -> String {
    let Some((scheme, rest)) = address.split_once("://") else {
        return address.to_string();
    };
    match scheme.to_ascii_lowercase().as_str() {
        "davs" => format!("https://{rest}"),
        "dav" => format!("http://{rest}"),
        scheme => format!("{scheme}://{rest}"),
    }
}

/// Splits `scheme://authority/path` into (`scheme://authority`, `/path`).
pub fn split_address(address: &str) -> Option<(&str, &str)> {
    let scheme_end = address.find("://")? + 3;
    let rest = &address[scheme_end..];
    if rest.is_empty() {
        return None;
    }
    match rest.find('/') {
        Some(idx) => Some((&address[..scheme_end + idx], &rest[idx..])),
        None => Some((address, "")),
    }
}

fn extract_hrefs(body: &str) -> Vec<String> {
    let mut hrefs = Vec::new();
    let mut cursor = 0;
    while let Some(found) = body[cursor..].find("href>") {
        let tag_end = cursor + found;
        cursor = tag_end + "href>".len();
        let Some(tag_start) = body[..tag_end].rfind('<') else {
            continue;
        };
        if body[tag_start + 1..].starts_with('/') {
            continue;
        }
        let value_end = body[cursor..]
            .find('<')
            .map(|idx| cursor + idx)
            .unwrap_or(body.len());
        let value = body[cursor..value_end].trim();
        if !value.is_empty() {
            hrefs.push(value.to_string());
        }
    }
    hrefs
}

fn listing_entries(address: &str, body: &str) -> Vec<String> {
    let collection = split_address(address)
        .map(|(_, path)| path)
        .unwrap_or_default()
        .trim_matches('/')
        .to_string();

    extract_hrefs(body)
        .into_iter()
        .filter_map(|href| {
            let decoded = urlencoding::decode(&href)
                .map(|value| value.into_owned())
                .unwrap_or(href);
            let path = split_address(&decoded)
                .map(|(_, path)| path.to_string())
                .unwrap_or(decoded);
            let path = path.trim_matches('/');
            if path == collection {
                return None;
            }
            path.rsplit('/').next().map(str::to_string)
        })
        .filter(|name| !name.is_empty())
        .collect()
}

fn build_tls_config(
    identity: Option<&Path>,
    ca_bundle: Option<&Path>,
) -> Result<rustls::ClientConfig, StorageError> {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    if let Some(bundle) = ca_bundle {
        let certs = CertificateDer::pem_file_iter(bundle).map_err(|err| {
            StorageError::unclassified(format!("failed to read {}: {err}", bundle.display()))
        })?;
        for cert in certs {
            let cert = cert.map_err(|err| {
                StorageError::unclassified(format!("invalid certificate in {}: {err}", bundle.display()))
            })?;
            roots.add(cert).map_err(|err| {
                StorageError::unclassified(format!("rejected certificate in {}: {err}", bundle.display()))
            })?;
        }
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|err| StorageError::unclassified(format!("tls setup failed: {err}")))?
        .with_root_certificates(roots);

    let Some(identity) = identity else {
        return Ok(builder.with_no_client_auth());
    };
    let chain = CertificateDer::pem_file_iter(identity)
        .and_then(|certs| certs.collect::<Result<Vec<_>, _>>())
        .map_err(|err| {
            StorageError::unclassified(format!(
                "failed to load certificates from {}: {err}",
                identity.display()
            ))
        })?;
    let key = PrivateKeyDer::from_pem_file(identity).map_err(|err| {
        StorageError::unclassified(format!(
            "failed to load private key from {}: {err}",
            identity.display()
        ))
    })?;
    builder
        .with_client_auth_cert(chain, key)
        .map_err(|err| StorageError::unclassified(format!("invalid x509 proxy: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dav_schemes_map_onto_http() {
        assert_eq!(wire_url("davs://se.example.org/dpm"), "https://se.example.org/dpm");
        assert_eq!(wire_url("dav://se.example.org/dpm"), "http://se.example.org/dpm");
        assert_eq!(wire_url("https://se.example.org/dpm"), "https://se.example.org/dpm");
        assert_eq!(wire_url("DAVS://se.example.org/DPM"), "https://se.example.org/DPM");
        assert_eq!(wire_url("HTTP://se.example.org/dpm"), "http://se.example.org/dpm");
    }

    #[test]
    fn split_address_separates_origin_and_path() {
        assert_eq!(
            split_address("https://se.example.org:8443/dpm/home"),
            Some(("https://se.example.org:8443", "/dpm/home"))
        );
        assert_eq!(
            split_address("https://se.example.org"),
            Some(("https://se.example.org", ""))
        );
        assert_eq!(split_address("not-a-url"), None);
    }

    #[test]
    fn listing_skips_the_collection_itself_and_decodes_names() {
        let body = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:">
  <d:response><d:href>/dpm/home/</d:href></d:response>
  <d:response><d:href>/dpm/home/a%20file.txt</d:href></d:response>
  <d:response><d:href>https://se.example.org/dpm/home/sub/</d:href></d:response>
</d:multistatus>"#;

        let entries = listing_entries("https://se.example.org/dpm/home", body);
        assert_eq!(entries, vec!["a file.txt".to_string(), "sub".to_string()]);
    }
}
