//! Resolution of run settings.
//!
//! Every setting goes through the same chain: the command line flag wins,
//! then the environment variable, then a built in default. Environment values
//! are passed in rather than read here so each chain can be exercised on its
//! own. Empty or whitespace-only environment values count as unset.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::pinner::{PinError, PinnerType, RemotePinner};
use crate::validate::{parse_url, ValidationError};

pub const IPFS_GATEWAYS: &str = "IPFS_GATEWAYS";
pub const IPFS_REMOTE_PINNER_URL: &str = "IPFS_REMOTE_PINNER_URL";
pub const IPFS_REMOTE_PINNER: &str = "IPFS_REMOTE_PINNER";
pub const IPFS_REMOTE_PINNER_TYPE: &str = "IPFS_REMOTE_PINNER_TYPE";
pub const IPFS_REMOTE_PINNER_TIMEOUT: &str = "IPFS_REMOTE_PINNER_TIMEOUT";
pub const IPFS_BINARY: &str = "IPFS_BINARY";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

pub const DEFAULT_GATEWAYS: [&str; 2] = ["https://cloudflare-ipfs.com", "https://ipfs.xirion.net"];
pub const DEFAULT_IPFS_BINARY: &str = "ipfs";
pub const DEFAULT_LOG_LEVEL: tracing::Level = tracing::Level::WARN;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `--gateway` (repeatable) > `IPFS_GATEWAYS` (whitespace separated) > defaults
pub fn resolve_gateways(flag: &[Url], env: Option<String>) -> Result<Vec<Url>, ConfigError> {
    if !flag.is_empty() {
        return Ok(flag.to_vec());
    }
    let gateways = match non_empty(env) {
        Some(list) => list
            .split_whitespace()
            .map(parse_url)
            .collect::<Result<Vec<_>, _>>()?,
        None => DEFAULT_GATEWAYS
            .iter()
            .map(|g| parse_url(g))
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(gateways)
}

/// `--remote-pinner-url` > `IPFS_REMOTE_PINNER_URL` > `IPFS_REMOTE_PINNER` > none
pub fn resolve_pinner_url(
    flag: Option<&Url>,
    env_url: Option<String>,
    env_legacy: Option<String>,
) -> Result<Option<Url>, ConfigError> {
    if let Some(url) = flag {
        return Ok(Some(url.clone()));
    }
    match non_empty(env_url).or_else(|| non_empty(env_legacy)) {
        Some(raw) => Ok(Some(parse_url(raw.trim())?)),
        None => Ok(None),
    }
}

/// `--pinner-type` > `IPFS_REMOTE_PINNER_TYPE` > node
pub fn resolve_pinner_type(
    flag: Option<PinnerType>,
    env: Option<String>,
) -> Result<PinnerType, ConfigError> {
    match (flag, non_empty(env)) {
        (Some(kind), _) => Ok(kind),
        (None, Some(raw)) => {
            PinnerType::from_str(raw.trim()).map_err(|_| ConfigError::InvalidPinnerType(raw))
        }
        (None, None) => Ok(PinnerType::default()),
    }
}

/// `--pin-timeout` > `IPFS_REMOTE_PINNER_TIMEOUT` > unbounded. Zero is
/// rejected, a zero deadline would fail every pin before it is sent.
pub fn resolve_pin_timeout(
    flag: Option<u64>,
    env: Option<String>,
) -> Result<Option<Duration>, ConfigError> {
    let secs = match (flag, non_empty(env)) {
        (Some(secs), _) => secs,
        (None, Some(raw)) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidTimeout(raw))?,
        (None, None) => return Ok(None),
    };
    if secs == 0 {
        return Err(ConfigError::InvalidTimeout(secs.to_string()));
    }
    Ok(Some(Duration::from_secs(secs)))
}

/// `--ipfs-binary` > `IPFS_BINARY` > `ipfs` on the PATH
pub fn resolve_ipfs_binary(flag: Option<&Path>, env: Option<String>) -> PathBuf {
    match (flag, non_empty(env)) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(raw)) => PathBuf::from(raw.trim()),
        (None, None) => PathBuf::from(DEFAULT_IPFS_BINARY),
    }
}

/// Build the pinner, if there is an address for one. Pinning without an
/// address is an error, and is reported before anything gets uploaded.
pub fn resolve_pinner(
    pin: bool,
    kind: PinnerType,
    url: Option<Url>,
    timeout: Option<Duration>,
) -> Result<Option<RemotePinner>, ConfigError> {
    match url {
        Some(url) => Ok(Some(RemotePinner::from_type(kind, url, timeout)?)),
        None if pin => Err(ConfigError::MissingConfiguration),
        None => Ok(None),
    }
}

/// `LOG_LEVEL` > warn
pub fn resolve_log_level(env: Option<String>) -> Result<tracing::Level, ConfigError> {
    match non_empty(env) {
        Some(raw) => {
            tracing::Level::from_str(raw.trim()).map_err(|_| ConfigError::InvalidLogLevel(raw))
        }
        None => Ok(DEFAULT_LOG_LEVEL),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("can't pin without a remote pinner url (--remote-pinner-url or IPFS_REMOTE_PINNER_URL)")]
    MissingConfiguration,
    #[error("invalid remote pinner type: {0} (expected 'node' or 'cluster')")]
    InvalidPinnerType(String),
    #[error("invalid pin timeout: {0}")]
    InvalidTimeout(String),
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
    #[error("pinner setup error: {0}")]
    Pinner(#[from] PinError),
}
