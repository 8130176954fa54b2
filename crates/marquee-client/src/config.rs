//! Client configuration.

use marquee_proto::{StreamId, routes};
use thiserror::Error;
use url::Url;

/// Server used when none is configured.
pub const DEFAULT_SERVER: &str = "http://localhost:5000";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The server address does not parse as a URL.
    #[error("invalid server URL {input:?}: {source}")]
    InvalidUrl {
        /// Address as given.
        input: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The server address is not an HTTP(S) URL.
    #[error("server URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),
}

/// An id that cannot stand as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0:?} cannot be used as a path segment")]
pub struct InvalidSegment(pub String);

/// Where the authority lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
}

impl ClientConfig {
    /// Parse the authority's base address.
    ///
    /// A trailing slash is added when missing so endpoint paths resolve below
    /// the base rather than replacing its last segment.
    pub fn new(server: &str) -> Result<Self, ConfigError> {
        let mut base_url = Url::parse(server.trim())
            .map_err(|source| ConfigError::InvalidUrl { input: server.to_string(), source })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.scheme().to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { base_url })
    }

    /// Base address, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of a fixed endpoint path.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    /// Absolute URL of `collection/segment`.
    ///
    /// `segment` is percent-encoded as exactly one path segment, so `/`, `?`,
    /// `#` and `%` inside it cannot reach another resource. Empty and dot
    /// segments are rejected.
    pub fn resource(&self, collection: &str, segment: &str) -> Result<Url, InvalidSegment> {
        if matches!(segment, "" | "." | "..") {
            return Err(InvalidSegment(segment.to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| InvalidSegment(segment.to_string()))?
            .pop_if_empty()
            .push(collection)
            .push(segment);
        Ok(url)
    }

    /// Absolute URL of a stream's playback manifest.
    pub fn manifest_url(&self, stream_id: &StreamId) -> Result<Url, InvalidSegment> {
        self.resource(routes::HLS, &routes::manifest_file(stream_id))
    }
}
