//! Command execution.
//!
//! Turns a planned [`Command`] into exactly one authority call and wraps the
//! result as a [`Completion`]. Execution never touches console state, so any
//! number of commands can be in flight while the console keeps reducing.

use marquee_core::{Command, Completion};
use marquee_proto::Overlay;

use crate::authority::Authority;

/// Execute `command` against `authority`.
pub async fn execute<A: Authority + ?Sized>(authority: &A, command: Command) -> Completion {
    tracing::debug!(command = command.name(), "executing");

    let result = match &command {
        Command::StartStream { attempt, rtsp_url } => authority
            .start_stream(rtsp_url)
            .await
            .map(|stream_id| Completion::StreamStarted { attempt: *attempt, stream_id }),

        Command::ListOverlays { stream_id } => {
            authority.list_overlays(stream_id).await.map(|overlays| Completion::OverlaysListed {
                stream_id: stream_id.clone(),
                overlays,
            })
        },

        Command::CreateOverlay { overlay } => {
            authority.create_overlay(overlay).await.map(|id| Completion::OverlayCreated {
                overlay: Overlay::from_created(id, overlay.clone()),
            })
        },

        Command::UpdateOverlay { id, patch, draft } => {
            authority.update_overlay(id, patch).await.map(|()| Completion::OverlayUpdated {
                id: id.clone(),
                patch: patch.clone(),
                draft: *draft,
            })
        },

        Command::DeleteOverlay { id } => authority
            .delete_overlay(id)
            .await
            .map(|()| Completion::OverlayDeleted { id: id.clone() }),
    };

    result.unwrap_or_else(|error| Completion::Failed { command, error })
}
