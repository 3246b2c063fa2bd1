//! IPFS gateway and pinning-service client
//!
//! Content is fetched from a public gateway as `{gateway}/ipfs/{cid}[/{path}]`
//! and uploaded to a pinning service as a multipart form. CIDs of local data
//! are computed with [`build_cid_v1`] on the blocking pool.

use crate::cid::{build_cid_v1, Cid};
use crate::config::{Config, ConfigError, DebugModes, GatewayConfig, PinningServiceConfig};
use crate::http::multipart::{build_headers, MultipartForm};
use crate::http::{send_get, send_post, CorrelationIds, HttpResponse};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// IPFS client errors
#[derive(Debug, Error)]
pub enum IpfsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}")]
    Status { status: u16, response: HttpResponse },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("file already exists: {}", .0.display())]
    FileExists(PathBuf),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("response body is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("content hashes to {actual}, expected {expected}")]
    ContentMismatch { expected: String, actual: String },

    #[error("no CID in response from pinning service")]
    MissingCid(HttpResponse),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Content address on the IPFS network: a CID and an optional path below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpfsAddress {
    pub cid: String,
    pub path: Option<String>,
}

impl IpfsAddress {
    pub fn new(cid: impl Into<String>) -> Self {
        Self {
            cid: cid.into(),
            path: None,
        }
    }

    pub fn with_path(cid: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = path.trim_matches('/');
        Self {
            cid: cid.into(),
            path: (!path.is_empty()).then(|| path.to_string()),
        }
    }
}

impl From<&Cid> for IpfsAddress {
    fn from(cid: &Cid) -> Self {
        Self::new(cid.to_string())
    }
}

/// Accepts `ipfs://{cid}/{path}`, `/ipfs/{cid}/{path}` or `{cid}/{path}`
impl FromStr for IpfsAddress {
    type Err = IpfsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let rest = s
            .strip_prefix("ipfs://")
            .or_else(|| s.strip_prefix("/ipfs/"))
            .unwrap_or(s);

        let (cid, path) = match rest.split_once('/') {
            Some((cid, path)) => (cid, path),
            None => (rest, ""),
        };
        if cid.is_empty() {
            return Err(IpfsError::InvalidUrl(format!("missing CID in '{}'", s)));
        }
        Ok(Self::with_path(cid, path))
    }
}

impl fmt::Display for IpfsAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}/{}", self.cid, path),
            None => write!(f, "{}", self.cid),
        }
    }
}

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// CID assigned by the pinning service
    pub cid: String,
    pub response: HttpResponse,
}

/// Client for one gateway and one pinning service
#[derive(Debug, Clone)]
pub struct IpfsClient {
    http: reqwest::Client,
    gateway: GatewayConfig,
    pinning_service: PinningServiceConfig,
    debug: DebugModes,
    ids: Arc<CorrelationIds>,
}

impl IpfsClient {
    pub fn new(
        gateway: GatewayConfig,
        pinning_service: PinningServiceConfig,
        timeout: Duration,
        debug: DebugModes,
    ) -> Result<Self, IpfsError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            gateway,
            pinning_service,
            debug,
            ids: Arc::new(CorrelationIds::new()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, IpfsError> {
        Self::new(
            config.gateway()?,
            config.pinning_service()?,
            config.timeout(),
            config.debug,
        )
    }

    pub fn gateway(&self) -> &GatewayConfig {
        &self.gateway
    }

    pub fn pinning_service(&self) -> &PinningServiceConfig {
        &self.pinning_service
    }

    /// Fetch content from the gateway
    pub async fn get_data(&self, address: &IpfsAddress) -> Result<Vec<u8>, IpfsError> {
        let url = gateway_url(&self.gateway, address)?;
        let id = self.ids.next_id();
        let response = send_get(&self.http, &url, id, self.debug.download).await?;

        if !response.is_success() {
            log::warn!("[{}] GET {} returned {}", id, url, response.status);
            return Err(IpfsError::Status {
                status: response.status,
                response,
            });
        }

        log::debug!("[{}] Fetched {} byte(s) for {}", id, response.body.len(), address);
        Ok(response.body)
    }

    /// Fetch content from the gateway as UTF-8 text
    pub async fn get_data_as_string(&self, address: &IpfsAddress) -> Result<String, IpfsError> {
        let body = self.get_data(address).await?;
        Ok(String::from_utf8(body)?)
    }

    /// Fetch content and check that it hashes to `cid`
    pub async fn get_data_verified(&self, cid: &Cid) -> Result<Vec<u8>, IpfsError> {
        let body = self.get_data(&IpfsAddress::from(cid)).await?;
        if !cid.verify(&body) {
            return Err(IpfsError::ContentMismatch {
                expected: cid.to_string(),
                actual: build_cid_v1(&body),
            });
        }
        Ok(body)
    }

    /// Download content to `path`, returning the number of bytes written
    ///
    /// An existing file is refused before any request is sent unless
    /// `overwrite` is set. Missing parent directories are created only when
    /// `create_dirs` is set.
    pub async fn download_file(
        &self,
        address: &IpfsAddress,
        path: impl AsRef<Path>,
        create_dirs: bool,
        overwrite: bool,
    ) -> Result<u64, IpfsError> {
        let path = path.as_ref();
        if !overwrite && tokio::fs::try_exists(path).await? {
            return Err(IpfsError::FileExists(path.to_path_buf()));
        }

        let body = self.get_data(address).await?;

        if create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, &body).await?;

        log::info!("Downloaded {} to {} ({} bytes)", address, path.display(), body.len());
        Ok(body.len() as u64)
    }

    /// Upload `data` to the pinning service under the name `save_as`
    pub async fn upload_data(
        &self,
        bearer_token: &str,
        data: &[u8],
        save_as: &str,
    ) -> Result<UploadOutcome, IpfsError> {
        let id = self.ids.next_id();
        let debug = self.debug.upload;

        let mut form = MultipartForm::new().debug(debug);
        form.add_file(save_as, data);
        let headers = build_headers(form.boundary(), bearer_token);
        let body = form.finish();

        let url = format!("{}/upload", self.pinning_service.url);
        let response = send_post(&self.http, &url, &headers, body, id, debug).await?;

        if !response.is_success() {
            log::warn!("[{}] Upload to {} returned {}", id, self.pinning_service, response.status);
            return Err(IpfsError::Status {
                status: response.status,
                response,
            });
        }

        let Some(cid) = extract_cid_from_response(&response.body) else {
            return Err(IpfsError::MissingCid(response));
        };

        log::info!(
            "[{}] Uploaded {} ({} bytes) to {}: {}",
            id,
            save_as.trim(),
            data.len(),
            self.pinning_service.name,
            cid
        );
        Ok(UploadOutcome { cid, response })
    }

    /// Upload a local file, named `save_as` or the file's own name
    pub async fn upload_file(
        &self,
        bearer_token: &str,
        path: impl AsRef<Path>,
        save_as: Option<&str>,
    ) -> Result<UploadOutcome, IpfsError> {
        let path = path.as_ref();
        let data = read_existing_file(path).await?;

        let name = match save_as.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        self.upload_data(bearer_token, &data, &name).await
    }
}

/// Gateway URL for an address, each path segment percent-encoded
pub fn gateway_url(gateway: &GatewayConfig, address: &IpfsAddress) -> Result<String, IpfsError> {
    let mut url = reqwest::Url::parse(&gateway.url)
        .map_err(|e| IpfsError::InvalidUrl(format!("{}: {}", gateway.url, e)))?;

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| IpfsError::InvalidUrl(gateway.url.clone()))?;
        segments.pop_if_empty().push("ipfs").push(&address.cid);
        if let Some(path) = &address.path {
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }
    }

    Ok(url.to_string())
}

/// CID from a pinning-service JSON response
///
/// Accepts `{"cid": ...}` and `{"value": {"cid": ...}}`.
pub fn extract_cid_from_response(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("cid")
        .or_else(|| value.get("value").and_then(|v| v.get("cid")))
        .and_then(|cid| cid.as_str())
        .map(str::to_string)
}

/// Compute the CIDv1 of `data` on the blocking pool
pub async fn calculate_cid_from_data(data: Vec<u8>) -> Result<String, IpfsError> {
    Ok(tokio::task::spawn_blocking(move || build_cid_v1(&data)).await?)
}

/// Compute the CIDv1 of a file's contents
pub async fn calculate_cid_from_file(path: impl AsRef<Path>) -> Result<String, IpfsError> {
    let data = read_existing_file(path.as_ref()).await?;
    calculate_cid_from_data(data).await
}

async fn read_existing_file(path: &Path) -> Result<Vec<u8>, IpfsError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => Ok(tokio::fs::read(path).await?),
        Ok(_) => Err(IpfsError::FileNotFound(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(IpfsError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}
