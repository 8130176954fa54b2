//! Stream session state machine.
//!
//! Tracks the single active stream: which source it was started from, the id
//! the ingestion pipeline assigned, and where playback stands.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐  begin   ┌────────────┐  complete  ┌─────────┐
//! │ Idle │────────>│ Connecting │──────────>│ Playing │
//! └──────┘          └────────────┘            └─────────┘
//!                         │                        │
//!                         │ fail                   │ begin (new source)
//!                         ↓                        ↓
//!                    ┌────────┐   begin      ┌────────────┐
//!                    │ Failed │────────────>│ Connecting │
//!                    └────────┘              └────────────┘
//! ```
//!
//! Every `begin` opens a new attempt. Outcomes are matched against the attempt
//! number, so the answer to a superseded start is ignored instead of clobbering
//! the newer session.

use marquee_proto::StreamId;

use crate::error::ValidationError;

/// Playback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing started yet.
    #[default]
    Idle,
    /// Start requested, waiting for a stream id.
    Connecting,
    /// Stream id assigned, playback running.
    Playing,
    /// Start rejected.
    Failed,
}

/// The one active stream session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSession {
    state: PlaybackState,
    stream_id: Option<StreamId>,
    source_url: Option<String>,
    attempt: u64,
}

impl StreamSession {
    /// Idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Assigned stream id. Unset until a start succeeds.
    pub fn stream_id(&self) -> Option<&StreamId> {
        self.stream_id.as_ref()
    }

    /// Stream id, but only while playing.
    pub fn playing_stream(&self) -> Option<&StreamId> {
        match self.state {
            PlaybackState::Playing => self.stream_id.as_ref(),
            _ => None,
        }
    }

    /// Source URL of the latest attempt.
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Number of the latest attempt. Zero before the first start.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Open a new start attempt for `url`, invalidating any previous one.
    ///
    /// # Errors
    ///
    /// Returns `EmptyUrl` for a blank URL; the session is left untouched.
    pub fn begin(&mut self, url: &str) -> Result<u64, ValidationError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }

        self.attempt += 1;
        self.state = PlaybackState::Connecting;
        self.stream_id = None;
        self.source_url = Some(url.to_string());
        tracing::debug!(attempt = self.attempt, url, "stream start requested");
        Ok(self.attempt)
    }

    /// Record the id assigned to `attempt`. Returns false, changing nothing,
    /// when the attempt has been superseded.
    pub fn complete(&mut self, attempt: u64, stream_id: StreamId) -> bool {
        if !self.is_current(attempt) {
            tracing::debug!(attempt, latest = self.attempt, "ignoring superseded stream start");
            return false;
        }

        tracing::debug!(attempt, %stream_id, "stream playing");
        self.state = PlaybackState::Playing;
        self.stream_id = Some(stream_id);
        true
    }

    /// Record that `attempt` was rejected. Returns false when superseded.
    pub fn fail(&mut self, attempt: u64) -> bool {
        if !self.is_current(attempt) {
            tracing::debug!(attempt, latest = self.attempt, "ignoring superseded stream failure");
            return false;
        }

        self.state = PlaybackState::Failed;
        self.stream_id = None;
        true
    }

    fn is_current(&self, attempt: u64) -> bool {
        attempt == self.attempt && self.state == PlaybackState::Connecting
    }
}
