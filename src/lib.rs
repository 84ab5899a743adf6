mod clipboard;
mod config;
mod gateway;
mod ipfs;
mod pinner;
mod share;
mod validate;

pub mod prelude {
    pub use crate::clipboard::Clipboard;
    pub use crate::config::{
        resolve_gateways, resolve_ipfs_binary, resolve_log_level, resolve_pin_timeout,
        resolve_pinner, resolve_pinner_type, resolve_pinner_url, DEFAULT_LOG_LEVEL, IPFS_BINARY,
        IPFS_GATEWAYS, IPFS_REMOTE_PINNER, IPFS_REMOTE_PINNER_TIMEOUT, IPFS_REMOTE_PINNER_TYPE,
        IPFS_REMOTE_PINNER_URL, LOG_LEVEL,
    };
    pub use crate::gateway::{clipboard_target, format_urls, IpfsGateway};
    pub use crate::ipfs::{IpfsBin, Uploaded};
    pub use crate::pinner::{ClusterPinner, NodePinner, Pin, PinnerType, RemotePinner};
    pub use crate::share::{share, ShareOptions, ShareReport};
    pub use crate::validate::{parse_path, parse_url};
    pub use cid::Cid;
}

pub mod error {
    pub use crate::config::ConfigError;
    pub use crate::gateway::GatewayError;
    pub use crate::ipfs::IpfsError;
    pub use crate::pinner::PinError;
    pub use crate::share::ShareError;
    pub use crate::validate::ValidationError;
}
