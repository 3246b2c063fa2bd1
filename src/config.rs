//! Configuration file parsing
//!
//! Parses TOML configuration files for the IPFS client: which gateway and
//! pinning service to talk to, the request timeout, the log level and the
//! per-operation debug switches.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Client configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Endpoint and transport settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Verbose request/response logging switches
    #[serde(default)]
    pub debug: DebugModes,
}

/// Endpoint and transport settings
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Gateway preset name or http(s) URL
    #[serde(default = "default_gateway")]
    pub gateway: String,

    /// Pinning service preset name or http(s) URL
    #[serde(default = "default_pinning_service")]
    pub pinning_service: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error, off)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_gateway() -> String {
    Gateway::DwebLink.name().to_string()
}

fn default_pinning_service() -> String {
    PinningService::Web3Storage.name().to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway: default_gateway(),
            pinning_service: default_pinning_service(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Map the configured log level onto a `log` filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        parse_log_level(&self.log_level)
    }
}

/// Which operations dump request and response details at debug level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DebugModes {
    /// Gateway fetches and file downloads
    #[serde(default)]
    pub download: bool,

    /// Pinning-service uploads
    #[serde(default)]
    pub upload: bool,
}

impl DebugModes {
    /// Everything enabled
    pub fn all() -> Self {
        Self {
            download: true,
            upload: true,
        }
    }
}

/// Well-known IPFS HTTP gateways
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gateway {
    Localhost,
    IpfsIo,
    GatewayIpfsIo,
    CloudflareIpfsCom,
    NftstorageLink,
    DwebLink,
    GatewayPinataCloud,
    IpfsInfuraIo,
    InfuraIpfsIo,
    IpfsGatewayCloud,
    W3sLink,
}

impl Gateway {
    pub const ALL: [Gateway; 11] = [
        Gateway::Localhost,
        Gateway::IpfsIo,
        Gateway::GatewayIpfsIo,
        Gateway::CloudflareIpfsCom,
        Gateway::NftstorageLink,
        Gateway::DwebLink,
        Gateway::GatewayPinataCloud,
        Gateway::IpfsInfuraIo,
        Gateway::InfuraIpfsIo,
        Gateway::IpfsGatewayCloud,
        Gateway::W3sLink,
    ];

    /// Preset name used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            Gateway::Localhost => "localhost",
            Gateway::IpfsIo => "ipfs-io",
            Gateway::GatewayIpfsIo => "gateway-ipfs-io",
            Gateway::CloudflareIpfsCom => "cloudflare-ipfs-com",
            Gateway::NftstorageLink => "nftstorage-link",
            Gateway::DwebLink => "dweb-link",
            Gateway::GatewayPinataCloud => "gateway-pinata-cloud",
            Gateway::IpfsInfuraIo => "ipfs-infura-io",
            Gateway::InfuraIpfsIo => "infura-ipfs-io",
            Gateway::IpfsGatewayCloud => "ipfs-gateway-cloud",
            Gateway::W3sLink => "w3s-link",
        }
    }

    /// Base URL of the gateway
    pub fn url(self) -> &'static str {
        match self {
            Gateway::Localhost => "http://127.0.0.1:8080",
            Gateway::IpfsIo => "https://ipfs.io",
            Gateway::GatewayIpfsIo => "https://gateway.ipfs.io",
            Gateway::CloudflareIpfsCom => "https://cloudflare-ipfs.com",
            Gateway::NftstorageLink => "https://nftstorage.link",
            Gateway::DwebLink => "https://dweb.link",
            Gateway::GatewayPinataCloud => "https://gateway.pinata.cloud",
            Gateway::IpfsInfuraIo => "https://ipfs.infura.io",
            Gateway::InfuraIpfsIo => "https://infura-ipfs.io",
            Gateway::IpfsGatewayCloud => "https://ipfs-gateway.cloud",
            Gateway::W3sLink => "https://w3s.link",
        }
    }

    /// Look up a preset by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.name() == name)
    }
}

/// Well-known pinning services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinningService {
    Web3Storage,
    NftStorage,
}

impl PinningService {
    pub const ALL: [PinningService; 2] = [PinningService::Web3Storage, PinningService::NftStorage];

    /// Preset name used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            PinningService::Web3Storage => "web3-storage",
            PinningService::NftStorage => "nft-storage",
        }
    }

    /// Human readable provider name
    pub fn display_name(self) -> &'static str {
        match self {
            PinningService::Web3Storage => "Web3.storage",
            PinningService::NftStorage => "NFT.storage",
        }
    }

    /// API endpoint URL
    pub fn url(self) -> &'static str {
        match self {
            PinningService::Web3Storage => "https://api.web3.storage",
            PinningService::NftStorage => "https://api.nft.storage",
        }
    }

    /// Look up a preset by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// Resolved gateway endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Gateway URL without trailing slash
    pub url: String,
}

impl GatewayConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl From<Gateway> for GatewayConfig {
    fn from(gateway: Gateway) -> Self {
        Self::new(gateway.url())
    }
}

impl fmt::Display for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Resolved pinning-service endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinningServiceConfig {
    /// Provider name
    pub name: String,
    /// API endpoint URL without trailing slash
    pub url: String,
}

impl PinningServiceConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl From<PinningService> for PinningServiceConfig {
    fn from(service: PinningService) -> Self {
        Self::new(service.display_name(), service.url())
    }
}

impl fmt::Display for PinningServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configured gateway
    pub fn gateway(&self) -> Result<GatewayConfig, ConfigError> {
        resolve_gateway(&self.client.gateway)
    }

    /// Resolve the configured pinning service
    pub fn pinning_service(&self) -> Result<PinningServiceConfig, ConfigError> {
        resolve_pinning_service(&self.client.pinning_service)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout_secs)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        self.gateway()?;
        self.pinning_service()?;

        if self.client.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "client.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Resolve a gateway preset name or URL
pub fn resolve_gateway(value: &str) -> Result<GatewayConfig, ConfigError> {
    let value = value.trim();
    if is_http_url(value) {
        return Ok(GatewayConfig::new(value));
    }
    Gateway::from_name(value)
        .map(GatewayConfig::from)
        .ok_or_else(|| ConfigError::Invalid(format!("unknown gateway: {}", value)))
}

/// Resolve a pinning-service preset name or URL
pub fn resolve_pinning_service(value: &str) -> Result<PinningServiceConfig, ConfigError> {
    let value = value.trim();
    if is_http_url(value) {
        return Ok(PinningServiceConfig::new("custom", value));
    }
    PinningService::from_name(value)
        .map(PinningServiceConfig::from)
        .ok_or_else(|| ConfigError::Invalid(format!("unknown pinning service: {}", value)))
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Parse log level string
///
/// Called before the logger is set up, so an unknown level is reported on
/// stderr.
pub fn parse_log_level(level: &str) -> log::LevelFilter {
    known_log_level(level).unwrap_or_else(|| {
        eprintln!("Unknown log level '{}', defaulting to 'info'", level);
        log::LevelFilter::Info
    })
}

fn known_log_level(level: &str) -> Option<log::LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some(log::LevelFilter::Trace),
        "debug" => Some(log::LevelFilter::Debug),
        "info" => Some(log::LevelFilter::Info),
        "warn" | "warning" => Some(log::LevelFilter::Warn),
        "error" => Some(log::LevelFilter::Error),
        "off" => Some(log::LevelFilter::Off),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.gateway().unwrap().url, "https://dweb.link");
        assert_eq!(
            config.pinning_service().unwrap(),
            PinningServiceConfig::new("Web3.storage", "https://api.web3.storage")
        );
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.debug, DebugModes::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
[client]
gateway = "localhost"
pinning_service = "nft-storage"
timeout_secs = 5
log_level = "debug"

[debug]
download = true
"#;

        let config = Config::parse(config_str).unwrap();
        assert_eq!(config.gateway().unwrap().url, "http://127.0.0.1:8080");
        assert_eq!(config.pinning_service().unwrap().url, "https://api.nft.storage");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.client.log_level_filter(), log::LevelFilter::Debug);
        assert!(config.debug.download);
        assert!(!config.debug.upload);
    }

    #[test]
    fn test_custom_urls() {
        let config_str = r#"
[client]
gateway = "http://10.0.0.5:8080/"
pinning_service = "https://pin.example.com"
"#;

        let config = Config::parse(config_str).unwrap();
        assert_eq!(config.gateway().unwrap().url, "http://10.0.0.5:8080");
        let service = config.pinning_service().unwrap();
        assert_eq!(service.name, "custom");
        assert_eq!(service.url, "https://pin.example.com");
    }

    #[test]
    fn test_unknown_gateway_error() {
        let config_str = r#"
[client]
gateway = "ftp-gateway"
"#;

        let result = Config::parse(config_str);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_timeout_error() {
        let config_str = r#"
[client]
timeout_secs = 0
"#;

        let result = Config::parse(config_str);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_preset_names_roundtrip() {
        for gateway in Gateway::ALL {
            assert_eq!(Gateway::from_name(gateway.name()), Some(gateway));
        }
        for service in PinningService::ALL {
            assert_eq!(PinningService::from_name(service.name()), Some(service));
        }
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("WARNING"), log::LevelFilter::Warn);
        assert_eq!(parse_log_level("off"), log::LevelFilter::Off);
        assert_eq!(parse_log_level("loud"), log::LevelFilter::Info);
    }

    #[test]
    fn test_unknown_log_level_detected_without_logger() {
        assert_eq!(known_log_level(" Debug "), Some(log::LevelFilter::Debug));
        assert_eq!(known_log_level("loud"), None);
        assert_eq!(known_log_level(""), None);
        assert!(!log::log_enabled!(log::Level::Warn));
        assert_eq!(parse_log_level("loud"), log::LevelFilter::Info);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cidkit.toml");
        std::fs::write(&path, "[client]\ngateway = \"ipfs-io\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.gateway().unwrap(), GatewayConfig::from(Gateway::IpfsIo));

        let missing = Config::load(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
