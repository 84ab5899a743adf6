use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use cid::Cid;
use reqwest::{Client, StatusCode};
use url::Url;

/// Kubo RPC endpoint for pinning, relative to the node's root
const PIN_ADD_PATH: &str = "/api/v0/pin/add";

/// Which kind of remote service we pin against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PinnerType {
    #[default]
    Node,
    Cluster,
}

impl FromStr for PinnerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as clap::ValueEnum>::from_str(s, true)
    }
}

impl Display for PinnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinnerType::Node => write!(f, "node"),
            PinnerType::Cluster => write!(f, "cluster"),
        }
    }
}

/// Something that can keep a cid alive remotely
#[async_trait]
pub trait Pin {
    async fn pin(&self, cid: &Cid) -> Result<(), PinError>;
}

/// Pins through the rpc api of a remote ipfs node
#[derive(Debug, Clone)]
pub struct NodePinner {
    url: Url,
    client: Client,
}

impl NodePinner {
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, PinError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(PinError::Client)?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn pin_add_url(&self, cid: &Cid) -> Result<Url, PinError> {
        let mut url = self.url.join(PIN_ADD_PATH)?;
        url.query_pairs_mut().append_pair("arg", &cid.to_string());
        Ok(url)
    }
}

#[async_trait]
impl Pin for NodePinner {
    async fn pin(&self, cid: &Cid) -> Result<(), PinError> {
        let url = self.pin_add_url(cid)?;
        tracing::info!(%cid, remote = %self.url, "pinning on remote node");

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(PinError::PinUnreachable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(PinError::PinUnreachable)?;
            return Err(PinError::PinFailed { status, body });
        }
        Ok(())
    }
}

/// Placeholder for ipfs-cluster pinning
#[derive(Debug, Clone)]
pub struct ClusterPinner {
    url: Url,
}

impl ClusterPinner {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Pin for ClusterPinner {
    async fn pin(&self, _cid: &Cid) -> Result<(), PinError> {
        Err(PinError::NotImplemented(PinnerType::Cluster))
    }
}

/// The pinner selected for a run
#[derive(Debug, Clone)]
pub enum RemotePinner {
    Node(NodePinner),
    Cluster(ClusterPinner),
}

impl RemotePinner {
    pub fn from_type(
        kind: PinnerType,
        url: Url,
        timeout: Option<Duration>,
    ) -> Result<Self, PinError> {
        Ok(match kind {
            PinnerType::Node => Self::Node(NodePinner::new(url, timeout)?),
            PinnerType::Cluster => Self::Cluster(ClusterPinner::new(url)),
        })
    }

    pub fn kind(&self) -> PinnerType {
        match self {
            Self::Node(_) => PinnerType::Node,
            Self::Cluster(_) => PinnerType::Cluster,
        }
    }

    pub fn url(&self) -> &Url {
        match self {
            Self::Node(pinner) => pinner.url(),
            Self::Cluster(pinner) => pinner.url(),
        }
    }
}

#[async_trait]
impl Pin for RemotePinner {
    async fn pin(&self, cid: &Cid) -> Result<(), PinError> {
        match self {
            Self::Node(pinner) => pinner.pin(cid).await,
            Self::Cluster(pinner) => pinner.pin(cid).await,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PinError {
    #[error("failed remote pin ({status}): {body}")]
    PinFailed { status: StatusCode, body: String },
    #[error("remote pinner unreachable: {0}")]
    PinUnreachable(reqwest::Error),
    #[error("{0} pinning is not implemented")]
    NotImplemented(PinnerType),
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}
