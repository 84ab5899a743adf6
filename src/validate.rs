use std::path::{Path, PathBuf};

use url::Url;

/// Check that `value` names an existing file or directory
pub fn parse_path(value: &str) -> Result<PathBuf, ValidationError> {
    let path = Path::new(value);
    if path.is_dir() || path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(ValidationError::InvalidPath(value.to_string()))
    }
}

/// Parse `value` as an absolute url. Both a scheme and a host are required,
/// so things like `mailto:` or `file:///` links are rejected.
pub fn parse_url(value: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(value).map_err(|_| ValidationError::InvalidUrl(value.to_string()))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ValidationError::InvalidUrl(value.to_string())),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is not a valid path to a file or dir")]
    InvalidPath(String),
    #[error("{0} is not a valid url")]
    InvalidUrl(String),
}
