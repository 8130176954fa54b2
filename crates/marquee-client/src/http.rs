//! HTTP authority client.
//!
//! Any non-2xx status is a remote error carrying the authority's `error`
//! message (or the status reason when the body has none). A request that never
//! produced a response is a network error. A 2xx body that fails to decode is
//! reported as a remote error, since the call itself did complete. Ids are
//! sent as single escaped path segments.

use async_trait::async_trait;
use marquee_core::{OverlayError, ValidationError};
use marquee_proto::{
    CreateOverlayResponse, ErrorBody, NewOverlay, Overlay, OverlayId, OverlayPatch,
    StartStreamRequest, StartStreamResponse, StreamId, routes,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{authority::Authority, config::ClientConfig};

const USER_AGENT: &str = concat!("marquee/", env!("CARGO_PKG_VERSION"));

/// Authority reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthority {
    client: Client,
    config: ClientConfig,
}

impl HttpAuthority {
    /// Build a client for the configured authority.
    pub fn new(config: ClientConfig) -> Result<Self, OverlayError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| OverlayError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<Url, OverlayError> {
        self.config
            .endpoint(path)
            .map_err(|e| OverlayError::Network(format!("invalid endpoint {path:?}: {e}")))
    }

    /// URL of one resource below `collection`. Ids that cannot be addressed
    /// are rejected before anything is sent.
    fn resource(&self, collection: &str, id: &str) -> Result<Url, OverlayError> {
        self.config
            .resource(collection, id)
            .map_err(|e| OverlayError::Validation(ValidationError::InvalidId(e.0)))
    }

    /// Send and reject non-success statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Response, OverlayError> {
        let response = request.send().await.map_err(|e| OverlayError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unexpected status").to_string(),
        };
        tracing::debug!(status = status.as_u16(), %message, "authority rejected request");
        Err(OverlayError::Remote { status: status.as_u16(), message })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, OverlayError> {
        let response = self.send(request).await?;
        let status = response.status();
        response.json::<T>().await.map_err(|e| decode_error(status, &e))
    }
}

fn decode_error(status: StatusCode, error: &reqwest::Error) -> OverlayError {
    if error.is_decode() {
        OverlayError::Remote { status: status.as_u16(), message: format!("malformed response: {error}") }
    } else {
        OverlayError::Network(error.to_string())
    }
}

#[async_trait]
impl Authority for HttpAuthority {
    async fn start_stream(&self, rtsp_url: &str) -> Result<StreamId, OverlayError> {
        let url = self.url(routes::START_STREAM)?;
        let body = StartStreamRequest { rtsp_url: rtsp_url.to_string() };
        let response: StartStreamResponse = self.send_json(self.client.post(url).json(&body)).await?;
        Ok(response.stream_id)
    }

    async fn list_overlays(&self, stream_id: &StreamId) -> Result<Vec<Overlay>, OverlayError> {
        let url = self.resource(routes::OVERLAYS, stream_id.as_str())?;
        self.send_json(self.client.get(url)).await
    }

    async fn create_overlay(&self, overlay: &NewOverlay) -> Result<OverlayId, OverlayError> {
        let url = self.url(routes::OVERLAYS)?;
        let response: CreateOverlayResponse =
            self.send_json(self.client.post(url).json(overlay)).await?;
        Ok(response.overlay_id)
    }

    async fn update_overlay(&self, id: &OverlayId, patch: &OverlayPatch) -> Result<(), OverlayError> {
        let url = self.resource(routes::OVERLAYS, id.as_str())?;
        self.send(self.client.put(url).json(patch)).await.map(drop)
    }

    async fn delete_overlay(&self, id: &OverlayId) -> Result<(), OverlayError> {
        let url = self.resource(routes::OVERLAYS, id.as_str())?;
        self.send(self.client.delete(url)).await.map(drop)
    }
}
