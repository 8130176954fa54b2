//! Abstraction over the overlay authority.
//!
//! Production talks HTTP ([`crate::HttpAuthority`]); tests and simulation use
//! an in-memory authority. Every method is one remote call: it either
//! completes with the authority's answer or fails with a remote or network
//! error. There are no retries and no timeouts at this layer.

use std::sync::Arc;

use async_trait::async_trait;
use marquee_core::OverlayError;
use marquee_proto::{NewOverlay, Overlay, OverlayId, OverlayPatch, StreamId};

/// Remote store of streams and overlays.
#[async_trait]
pub trait Authority: Send + Sync {
    /// Ask the ingestion pipeline to start a stream from `rtsp_url`.
    async fn start_stream(&self, rtsp_url: &str) -> Result<StreamId, OverlayError>;

    /// List the overlays of a stream, in authority order.
    async fn list_overlays(&self, stream_id: &StreamId) -> Result<Vec<Overlay>, OverlayError>;

    /// Create an overlay and return the id assigned to it.
    async fn create_overlay(&self, overlay: &NewOverlay) -> Result<OverlayId, OverlayError>;

    /// Apply a partial update.
    async fn update_overlay(&self, id: &OverlayId, patch: &OverlayPatch) -> Result<(), OverlayError>;

    /// Delete an overlay.
    async fn delete_overlay(&self, id: &OverlayId) -> Result<(), OverlayError>;
}

#[async_trait]
impl<T: Authority + ?Sized> Authority for Arc<T> {
    async fn start_stream(&self, rtsp_url: &str) -> Result<StreamId, OverlayError> {
        (**self).start_stream(rtsp_url).await
    }

    async fn list_overlays(&self, stream_id: &StreamId) -> Result<Vec<Overlay>, OverlayError> {
        (**self).list_overlays(stream_id).await
    }

    async fn create_overlay(&self, overlay: &NewOverlay) -> Result<OverlayId, OverlayError> {
        (**self).create_overlay(overlay).await
    }

    async fn update_overlay(&self, id: &OverlayId, patch: &OverlayPatch) -> Result<(), OverlayError> {
        (**self).update_overlay(id, patch).await
    }

    async fn delete_overlay(&self, id: &OverlayId) -> Result<(), OverlayError> {
        (**self).delete_overlay(id).await
    }
}
