//! Latency injection.
//!
//! [`Delayed`] holds each call for the next queued delay before forwarding
//! it, so responses can be made to arrive in a different order than their
//! requests were sent. Pair it with a paused tokio clock to keep runs
//! deterministic.

use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use marquee_client::Authority;
use marquee_core::OverlayError;
use marquee_proto::{NewOverlay, Overlay, OverlayId, OverlayPatch, StreamId};

/// Authority wrapper that delays calls by queued amounts.
///
/// Calls beyond the queue are forwarded immediately.
#[derive(Debug)]
pub struct Delayed<A> {
    inner: A,
    delays: Mutex<VecDeque<Duration>>,
}

impl<A> Delayed<A> {
    /// Wrap `inner` with an empty delay queue.
    pub fn new(inner: A) -> Self {
        Self { inner, delays: Mutex::new(VecDeque::new()) }
    }

    /// Queue delays for the next calls, in call order.
    #[must_use]
    pub fn with_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
        self.delays.lock().unwrap_or_else(PoisonError::into_inner).extend(delays);
        self
    }

    /// Wrapped authority.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    async fn pause(&self) {
        let delay = self.delays.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
        if let Some(delay) = delay.filter(|d| !d.is_zero()) {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl<A: Authority> Authority for Delayed<A> {
    async fn start_stream(&self, rtsp_url: &str) -> Result<StreamId, OverlayError> {
        self.pause().await;
        self.inner.start_stream(rtsp_url).await
    }

    async fn list_overlays(&self, stream_id: &StreamId) -> Result<Vec<Overlay>, OverlayError> {
        self.pause().await;
        self.inner.list_overlays(stream_id).await
    }

    async fn create_overlay(&self, overlay: &NewOverlay) -> Result<OverlayId, OverlayError> {
        self.pause().await;
        self.inner.create_overlay(overlay).await
    }

    async fn update_overlay(&self, id: &OverlayId, patch: &OverlayPatch) -> Result<(), OverlayError> {
        self.pause().await;
        self.inner.update_overlay(id, patch).await
    }

    async fn delete_overlay(&self, id: &OverlayId) -> Result<(), OverlayError> {
        self.pause().await;
        self.inner.delete_overlay(id).await
    }
}
