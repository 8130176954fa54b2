//! In-memory overlay authority.
//!
//! Behaves like the HTTP authority as seen through [`Authority`]: the same
//! success shapes, the same rejections for missing streams, unknown ids and
//! empty updates. Ids are handed out sequentially (`s1`, `s2`, ... and `o1`,
//! `o2`, ...) so every run is reproducible.
//!
//! Failures can be scripted per call kind with [`MemoryAuthority::fail_next`],
//! or injected at random from a seeded RNG with
//! [`MemoryAuthority::with_faults`]. A failed call is still recorded but never
//! mutates anything.

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use marquee_client::Authority;
use marquee_core::OverlayError;
use marquee_proto::{NewOverlay, Overlay, OverlayId, OverlayPatch, StreamId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Kind of authority call, for scripting and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `start_stream`.
    StartStream,
    /// `list_overlays`.
    ListOverlays,
    /// `create_overlay`.
    CreateOverlay,
    /// `update_overlay`.
    UpdateOverlay,
    /// `delete_overlay`.
    DeleteOverlay,
}

/// One recorded authority call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Stream start request.
    StartStream {
        /// Source address as received.
        rtsp_url: String,
    },
    /// Listing request.
    ListOverlays {
        /// Stream listed.
        stream_id: StreamId,
    },
    /// Create request.
    CreateOverlay(NewOverlay),
    /// Update request.
    UpdateOverlay {
        /// Overlay changed.
        id: OverlayId,
        /// Fields sent.
        patch: OverlayPatch,
    },
    /// Delete request.
    DeleteOverlay {
        /// Overlay removed.
        id: OverlayId,
    },
}

impl Call {
    /// Kind of this call.
    pub fn kind(&self) -> CallKind {
        match self {
            Self::StartStream { .. } => CallKind::StartStream,
            Self::ListOverlays { .. } => CallKind::ListOverlays,
            Self::CreateOverlay(_) => CallKind::CreateOverlay,
            Self::UpdateOverlay { .. } => CallKind::UpdateOverlay,
            Self::DeleteOverlay { .. } => CallKind::DeleteOverlay,
        }
    }
}

#[derive(Debug)]
struct Faults {
    rng: ChaCha8Rng,
    rate: f64,
}

#[derive(Debug, Default)]
struct State {
    next_stream: u64,
    next_overlay: u64,
    streams: Vec<(StreamId, String)>,
    overlays: Vec<Overlay>,
    calls: Vec<Call>,
    scripted: VecDeque<(CallKind, OverlayError)>,
    faults: Option<Faults>,
}

impl State {
    /// Record the call, then decide whether it fails before touching state.
    fn admit(&mut self, call: Call) -> Result<(), OverlayError> {
        let kind = call.kind();
        self.calls.push(call);

        if let Some(index) = self.scripted.iter().position(|(k, _)| *k == kind)
            && let Some((_, error)) = self.scripted.remove(index)
        {
            tracing::debug!(?kind, %error, "scripted failure");
            return Err(error);
        }

        if let Some(faults) = &mut self.faults
            && faults.rng.gen_bool(faults.rate)
        {
            tracing::debug!(?kind, "injected failure");
            return Err(OverlayError::Network(format!("injected {kind:?} failure")));
        }

        Ok(())
    }

    fn position(&self, id: &OverlayId) -> Result<usize, OverlayError> {
        self.overlays.iter().position(|o| &o.id == id).ok_or_else(|| remote(404, "Overlay not found"))
    }

    fn create(&mut self, request: NewOverlay) -> OverlayId {
        self.next_overlay += 1;
        let id = OverlayId::new(format!("o{}", self.next_overlay));
        self.overlays.push(Overlay::from_created(id.clone(), request));
        id
    }
}

fn remote(status: u16, message: &str) -> OverlayError {
    OverlayError::Remote { status, message: message.to_string() }
}

/// Authority that keeps every stream and overlay in memory.
#[derive(Debug, Default)]
pub struct MemoryAuthority {
    state: Mutex<State>,
}

impl MemoryAuthority {
    /// Empty authority that never fails unless told to.
    pub fn new() -> Self {
        Self::default()
    }

    /// Authority that fails each call with probability `rate`, drawn from a
    /// RNG seeded with `seed`.
    pub fn with_faults(seed: u64, rate: f64) -> Self {
        let faults = Faults { rng: ChaCha8Rng::seed_from_u64(seed), rate: rate.clamp(0.0, 1.0) };
        Self { state: Mutex::new(State { faults: Some(faults), ..State::default() }) }
    }

    /// Fail the next call of `kind` with `error`.
    pub fn fail_next(&self, kind: CallKind, error: OverlayError) {
        self.lock().scripted.push_back((kind, error));
    }

    /// Store an overlay directly, as if another operator had created it.
    pub fn seed_overlay(&self, overlay: NewOverlay) -> OverlayId {
        self.lock().create(overlay)
    }

    /// Every call received so far, failed ones included.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of calls of `kind` received so far.
    pub fn call_count(&self, kind: CallKind) -> usize {
        self.lock().calls.iter().filter(|call| call.kind() == kind).count()
    }

    /// Streams started, oldest first.
    pub fn streams(&self) -> Vec<StreamId> {
        self.lock().streams.iter().map(|(id, _)| id.clone()).collect()
    }

    /// Source address a stream was started from.
    pub fn source_of(&self, stream_id: &StreamId) -> Option<String> {
        self.lock().streams.iter().find(|(id, _)| id == stream_id).map(|(_, url)| url.clone())
    }

    /// Stored overlays of one stream, in creation order.
    pub fn overlays(&self, stream_id: &StreamId) -> Vec<Overlay> {
        self.lock().overlays.iter().filter(|o| &o.stream_id == stream_id).cloned().collect()
    }

    /// One stored overlay.
    pub fn overlay(&self, id: &OverlayId) -> Option<Overlay> {
        self.lock().overlays.iter().find(|o| &o.id == id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Authority for MemoryAuthority {
    async fn start_stream(&self, rtsp_url: &str) -> Result<StreamId, OverlayError> {
        let mut state = self.lock();
        state.admit(Call::StartStream { rtsp_url: rtsp_url.to_string() })?;
        if rtsp_url.trim().is_empty() {
            return Err(remote(400, "No RTSP URL provided"));
        }

        state.next_stream += 1;
        let stream_id = StreamId::new(format!("s{}", state.next_stream));
        state.streams.push((stream_id.clone(), rtsp_url.to_string()));
        Ok(stream_id)
    }

    async fn list_overlays(&self, stream_id: &StreamId) -> Result<Vec<Overlay>, OverlayError> {
        let mut state = self.lock();
        state.admit(Call::ListOverlays { stream_id: stream_id.clone() })?;
        Ok(state.overlays.iter().filter(|o| &o.stream_id == stream_id).cloned().collect())
    }

    async fn create_overlay(&self, overlay: &NewOverlay) -> Result<OverlayId, OverlayError> {
        let mut state = self.lock();
        state.admit(Call::CreateOverlay(overlay.clone()))?;
        if overlay.stream_id.as_str().is_empty() || overlay.text.is_empty() {
            return Err(remote(400, "Missing required fields"));
        }
        Ok(state.create(overlay.clone()))
    }

    async fn update_overlay(&self, id: &OverlayId, patch: &OverlayPatch) -> Result<(), OverlayError> {
        let mut state = self.lock();
        state.admit(Call::UpdateOverlay { id: id.clone(), patch: patch.clone() })?;
        if patch.is_empty() {
            return Err(remote(400, "No fields to update"));
        }
        let index = state.position(id)?;
        patch.apply_to(&mut state.overlays[index]);
        Ok(())
    }

    async fn delete_overlay(&self, id: &OverlayId) -> Result<(), OverlayError> {
        let mut state = self.lock();
        state.admit(Call::DeleteOverlay { id: id.clone() })?;
        let index = state.position(id)?;
        state.overlays.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use marquee_proto::{Position, Size};

    use super::*;

    fn request(stream: &str, text: &str) -> NewOverlay {
        NewOverlay {
            stream_id: StreamId::new(stream),
            text: text.into(),
            position: Position::new(10, 10),
            size: Size::new(100, 50),
        }
    }

    #[test]
    fn ids_are_sequential() {
        let authority = MemoryAuthority::new();
        assert_eq!(block_on(authority.start_stream("rtsp://a")).unwrap(), StreamId::new("s1"));
        assert_eq!(block_on(authority.start_stream("rtsp://b")).unwrap(), StreamId::new("s2"));
        assert_eq!(block_on(authority.create_overlay(&request("s1", "x"))).unwrap(), OverlayId::new("o1"));
        assert_eq!(authority.source_of(&StreamId::new("s2")).as_deref(), Some("rtsp://b"));
    }

    #[test]
    fn listing_is_scoped_to_stream() {
        let authority = MemoryAuthority::new();
        authority.seed_overlay(request("s1", "one"));
        authority.seed_overlay(request("s2", "two"));

        let listed = block_on(authority.list_overlays(&StreamId::new("s2"))).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].text, "two");
        assert!(listed[0].visible);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let authority = MemoryAuthority::new();
        let err = block_on(authority.delete_overlay(&OverlayId::new("o9"))).unwrap_err();
        assert_eq!(err, remote(404, "Overlay not found"));

        let err = block_on(authority.update_overlay(&OverlayId::new("o9"), &OverlayPatch::visibility(false)))
            .unwrap_err();
        assert_eq!(err, remote(404, "Overlay not found"));
    }

    #[test]
    fn scripted_failure_hits_only_its_kind() {
        let authority = MemoryAuthority::new();
        authority.fail_next(CallKind::CreateOverlay, OverlayError::Network("down".into()));

        block_on(authority.start_stream("rtsp://a")).unwrap();
        assert!(block_on(authority.create_overlay(&request("s1", "x"))).is_err());
        assert!(block_on(authority.create_overlay(&request("s1", "x"))).is_ok());

        assert_eq!(authority.call_count(CallKind::CreateOverlay), 2);
        assert_eq!(authority.overlays(&StreamId::new("s1")).len(), 1);
    }

    #[test]
    fn same_seed_same_faults() {
        let run = |seed| {
            let authority = MemoryAuthority::with_faults(seed, 0.5);
            (0..32).map(|_| block_on(authority.start_stream("rtsp://a")).is_ok()).collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
        assert!(run(7).contains(&false));
    }
}
