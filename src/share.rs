use std::fmt::{self, Display};
use std::path::PathBuf;

use cid::Cid;
use url::Url;

use crate::clipboard::Clipboard;
use crate::config::ConfigError;
use crate::gateway::{clipboard_target, format_urls, GatewayError};
use crate::ipfs::{IpfsBin, IpfsError};
use crate::pinner::{Pin, PinError, RemotePinner};

/// Everything a single share needs, resolved up front
#[derive(Debug, Clone)]
pub struct ShareOptions {
    /// File or directory to share
    pub target: PathBuf,
    pub enable_clipboard: bool,
    /// Gateways to build links for, in output order
    pub gateways: Vec<Url>,
    pub pin: bool,
    pub pinner: Option<RemotePinner>,
    /// Ask the node to reference the file in place
    pub no_copy: bool,
    /// Program name or path of the ipfs executable
    pub ipfs_binary: PathBuf,
}

/// What gets printed after a successful share
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareReport {
    pub folder_cid: Cid,
    pub urls: Vec<Url>,
}

impl Display for ShareReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CID: {}", self.folder_cid)?;
        for url in &self.urls {
            write!(f, "\n{}", url)?;
        }
        Ok(())
    }
}

/// Upload, optionally pin, and build links for `options.target`.
///
/// Stops at the first failure. A failed pin does not undo the upload; the
/// content stays in the local node.
pub async fn share(
    options: &ShareOptions,
    clipboard: Option<Clipboard>,
) -> Result<ShareReport, ShareError> {
    let pinner = match (options.pin, options.pinner.as_ref()) {
        (true, None) => return Err(ConfigError::MissingConfiguration.into()),
        (true, Some(pinner)) => Some(pinner),
        (false, _) => None,
    };
    let ipfs = IpfsBin::locate(&options.ipfs_binary)?;

    tracing::info!(path = %options.target.display(), "adding to ipfs");
    let uploaded = ipfs.add(&options.target, options.no_copy).await?;
    tracing::info!(cid = %uploaded.folder_cid, "added");

    if let Some(pinner) = pinner {
        pinner.pin(&uploaded.folder_cid).await?;
        tracing::info!(
            cid = %uploaded.folder_cid,
            kind = %pinner.kind(),
            remote = %pinner.url(),
            "pinned"
        );
    }

    let urls = format_urls(&uploaded.file_cid, &options.gateways)?;

    if options.enable_clipboard {
        if let (Some(mut clipboard), Some(url)) = (clipboard, clipboard_target(&urls)) {
            clipboard.copy(url.as_str());
        }
    }

    Ok(ShareReport {
        folder_cid: uploaded.folder_cid,
        urls,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Ipfs(#[from] IpfsError),
    #[error("pin error: {0}")]
    Pin(#[from] PinError),
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

impl ShareError {
    /// Process exit code, one per error category
    pub fn exit_code(&self) -> i32 {
        match self {
            ShareError::Config(_) | ShareError::Gateway(_) => 2,
            ShareError::Ipfs(IpfsError::InvalidTarget(_)) => 2,
            ShareError::Ipfs(IpfsError::NodeUnavailable(_)) => 3,
            ShareError::Ipfs(_) => 4,
            ShareError::Pin(PinError::NotImplemented(_)) => 6,
            ShareError::Pin(PinError::Client(_)) => 2,
            ShareError::Pin(_) => 5,
        }
    }
}
