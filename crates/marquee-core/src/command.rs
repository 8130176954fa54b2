//! Commands, completions and effects.
//!
//! Planning an operator intent yields a [`Command`]: a remote call that has
//! passed validation but not been made. Whoever executes it answers with a
//! [`Completion`], either the acknowledged outcome or the failure. The console
//! reduces completions one at a time and returns [`Effect`]s for the runtime
//! to carry out.
//!
//! Completions are applied in the order they arrive, not the order their
//! commands were issued. Two overlapping updates of the same overlay therefore
//! resolve to whichever response came back last.

use marquee_proto::{NewOverlay, Overlay, OverlayId, OverlayPatch, StreamId};

use crate::error::OverlayError;

/// A validated remote call, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask the ingestion pipeline for a new stream.
    StartStream {
        /// Session attempt this start belongs to.
        attempt: u64,
        /// Source feed.
        rtsp_url: String,
    },

    /// Fetch the overlay listing of a stream.
    ListOverlays {
        /// Stream to list.
        stream_id: StreamId,
    },

    /// Create an overlay.
    CreateOverlay {
        /// Validated create request.
        overlay: NewOverlay,
    },

    /// Apply a partial update.
    UpdateOverlay {
        /// Overlay to update.
        id: OverlayId,
        /// Validated fields.
        patch: OverlayPatch,
        /// Draft generation when issued by an editor commit.
        draft: Option<u64>,
    },

    /// Delete an overlay.
    DeleteOverlay {
        /// Overlay to delete.
        id: OverlayId,
    },
}

impl Command {
    /// Short name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartStream { .. } => "start_stream",
            Self::ListOverlays { .. } => "list_overlays",
            Self::CreateOverlay { .. } => "create_overlay",
            Self::UpdateOverlay { .. } => "update_overlay",
            Self::DeleteOverlay { .. } => "delete_overlay",
        }
    }
}

/// Outcome of an executed [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Stream start acknowledged.
    StreamStarted {
        /// Attempt from the command.
        attempt: u64,
        /// Assigned stream id.
        stream_id: StreamId,
    },

    /// Listing received.
    OverlaysListed {
        /// Stream that was listed.
        stream_id: StreamId,
        /// Overlays in authority order.
        overlays: Vec<Overlay>,
    },

    /// Create acknowledged.
    OverlayCreated {
        /// New overlay with its assigned id.
        overlay: Overlay,
    },

    /// Update acknowledged.
    OverlayUpdated {
        /// Updated overlay.
        id: OverlayId,
        /// Fields the authority accepted.
        patch: OverlayPatch,
        /// Draft generation from the command.
        draft: Option<u64>,
    },

    /// Delete acknowledged.
    OverlayDeleted {
        /// Deleted overlay.
        id: OverlayId,
    },

    /// The call was rejected or never completed.
    Failed {
        /// Command that failed.
        command: Command,
        /// Why it failed.
        error: OverlayError,
    },
}

impl Completion {
    /// Acknowledged completion for a command whose response carried no data.
    ///
    /// Returns `None` for commands whose success carries data from the
    /// authority (start, list and create).
    pub fn acknowledged(command: Command) -> Option<Self> {
        match command {
            Command::UpdateOverlay { id, patch, draft } => {
                Some(Self::OverlayUpdated { id, patch, draft })
            },
            Command::DeleteOverlay { id } => Some(Self::OverlayDeleted { id }),
            Command::StartStream { .. }
            | Command::ListOverlays { .. }
            | Command::CreateOverlay { .. } => None,
        }
    }
}

/// Follow-up work requested by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Execute another command.
    Dispatch(Command),

    /// Point the playback surface at a stream's manifest.
    AttachPlayback {
        /// Stream to play.
        stream_id: StreamId,
    },

    /// Tell the operator about a failure.
    Report(OverlayError),
}
