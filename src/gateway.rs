use url::Url;

/// A wrapper around a gateway url
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpfsGateway(Url);

impl From<Url> for IpfsGateway {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl IpfsGateway {
    /// Link to `cid_path` on this gateway. `cid_path` is a cid, optionally
    /// followed by `/`-separated path segments within it.
    ///
    /// `ipfs/` is resolved against the gateway url the way a relative link
    /// would be, so `https://gw.example` and `https://gw.example/` both give
    /// `https://gw.example/ipfs/...`. Segments are percent-encoded, so file
    /// names containing `#` or `?` stay part of the path.
    pub fn url(&self, cid_path: &str) -> Result<Url, GatewayError> {
        let mut url = self.0.join("ipfs/")?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::NotABase(self.0.clone()))?
            .pop_if_empty()
            .extend(cid_path.split('/'));
        Ok(url)
    }
}

/// Build a link per gateway for `cid_path`, keeping the gateways' order
pub fn format_urls(cid_path: &str, gateways: &[Url]) -> Result<Vec<Url>, GatewayError> {
    gateways
        .iter()
        .map(|gateway| IpfsGateway::from(gateway.clone()).url(cid_path))
        .collect()
}

/// The url that ends up on the clipboard: always the last one
pub fn clipboard_target(urls: &[Url]) -> Option<&Url> {
    urls.last()
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("gateway url cannot be a base: {0}")]
    NotABase(Url),
}
