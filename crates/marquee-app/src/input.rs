//! Operator input
//!
//! Inputs produced by a [`crate::Driver`] for the runtime to plan.

use marquee_core::{Affordance, DraftField, OverlayForm};
use marquee_proto::{OverlayId, OverlayPatch};

/// One operator intent or surface event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Start streaming from a source feed.
    StartStream {
        /// Source feed address.
        rtsp_url: String,
    },

    /// Reload the overlays of the playing stream.
    Refresh,

    /// Create an overlay from raw form fields.
    Create(OverlayForm),

    /// Apply a partial update to an overlay.
    Update {
        /// Overlay to change.
        id: OverlayId,
        /// Fields to change.
        patch: OverlayPatch,
    },

    /// Flip an overlay's visibility.
    ToggleVisibility(OverlayId),

    /// Remove an overlay.
    Delete(OverlayId),

    /// Trigger a control on a rendered overlay.
    Activate {
        /// Overlay the control belongs to.
        id: OverlayId,
        /// Control triggered.
        affordance: Affordance,
    },

    /// Open an overlay in the editor.
    OpenEditor(OverlayId),

    /// Change one field of the open draft.
    SetField {
        /// Field to change.
        field: DraftField,
        /// Raw input.
        value: String,
    },

    /// Commit the open draft.
    CommitEdit,

    /// Discard the open draft.
    CancelEdit,

    /// Ask which rendered overlays cover a point.
    Inspect {
        /// Horizontal offset from the surface's left edge.
        x: u32,
        /// Vertical offset from the surface's top edge.
        y: u32,
    },

    /// Redraw without changing anything.
    Redraw,

    /// The playback surface failed after attachment.
    PlaybackFailed(String),

    /// Leave the runtime loop.
    Quit,
}
