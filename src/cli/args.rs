use std::path::PathBuf;

use url::Url;

use ipfs_share::error::ConfigError;
use ipfs_share::prelude::*;

pub use clap::Parser;

const ENV_HELP: &str = "\
Environment:
  IPFS_GATEWAYS                 Whitespace separated IPFS gateway URLs used for generating links
  IPFS_REMOTE_PINNER_TYPE       Either 'node' or 'cluster' depending on what remote pinner you want to use
  IPFS_REMOTE_PINNER_URL        The URL for a remote pinner (IPFS_REMOTE_PINNER is also accepted)
  IPFS_REMOTE_PINNER_TIMEOUT    Seconds to wait for the remote pinner before giving up
  IPFS_BINARY                   Path to the ipfs executable
  LOG_LEVEL                     Log verbosity on stderr (error, warn, info, debug, trace)";

#[derive(Parser, Debug)]
#[command(author, version, about = "Share a file using IPFS", long_about = None, after_help = ENV_HELP)]
pub struct Cli {
    /// The file or folder to share
    #[clap(value_parser = parse_path)]
    pub path: PathBuf,

    /// Pin target to a remote node or cluster
    #[clap(long, short)]
    pub pin: bool,

    /// Disable clipboard support
    #[clap(long)]
    pub no_clipboard: bool,

    /// Reference the file in place instead of copying it into the node's store
    #[clap(long = "nocopy")]
    pub no_copy: bool,

    /// Gateway URL to generate a link for, may be repeated
    #[clap(long = "gateway", short = 'g', value_name = "URL", value_parser = parse_url)]
    pub gateways: Vec<Url>,

    /// The URL for a remote pinner
    #[clap(long, short = 'r', value_name = "URL", value_parser = parse_url)]
    pub remote_pinner_url: Option<Url>,

    /// What kind of remote pinner to use
    #[clap(long, short = 't', value_enum)]
    pub pinner_type: Option<PinnerType>,

    /// Path to the ipfs executable
    #[clap(long, value_name = "PATH")]
    pub ipfs_binary: Option<PathBuf>,

    /// Seconds to wait for the remote pinner
    #[clap(long, value_name = "SECS")]
    pub pin_timeout: Option<u64>,
}

impl Cli {
    /// Combine the parsed flags with whatever `env` provides
    pub fn share_options<F>(&self, env: F) -> Result<ShareOptions, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gateways = resolve_gateways(&self.gateways, env(IPFS_GATEWAYS))?;
        let pinner_type = resolve_pinner_type(self.pinner_type, env(IPFS_REMOTE_PINNER_TYPE))?;
        let pinner_url = resolve_pinner_url(
            self.remote_pinner_url.as_ref(),
            env(IPFS_REMOTE_PINNER_URL),
            env(IPFS_REMOTE_PINNER),
        )?;
        let pin_timeout = resolve_pin_timeout(self.pin_timeout, env(IPFS_REMOTE_PINNER_TIMEOUT))?;
        let pinner = resolve_pinner(self.pin, pinner_type, pinner_url, pin_timeout)?;
        let ipfs_binary = resolve_ipfs_binary(self.ipfs_binary.as_deref(), env(IPFS_BINARY));

        Ok(ShareOptions {
            target: self.path.clone(),
            enable_clipboard: !self.no_clipboard,
            gateways,
            pin: self.pin,
            pinner,
            no_copy: self.no_copy,
            ipfs_binary,
        })
    }
}
