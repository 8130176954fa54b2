//! Overlay command layer.
//!
//! Planning functions validate operator input and produce the [`Command`] to
//! execute; they never touch the store. [`apply`] is the only place an
//! acknowledged overlay completion reaches the store, which keeps the local set
//! write-through: a failure never mutates it.

use marquee_proto::{NewOverlay, Overlay, OverlayId, OverlayPatch, Position, Size, StreamId};

use crate::{
    command::{Command, Completion},
    error::ValidationError,
    store::OverlayStore,
    validation::{self, OverlayForm},
};

/// Plan creation of an overlay on `stream_id`.
pub fn create(
    stream_id: &StreamId,
    text: &str,
    position: Position,
    size: Size,
) -> Result<Command, ValidationError> {
    let text = validation::validate_text(text)?;
    let size = validation::validate_size(size)?;
    Ok(Command::CreateOverlay {
        overlay: NewOverlay { stream_id: stream_id.clone(), text, position, size },
    })
}

/// Plan creation from raw form input.
pub fn create_from_form(stream_id: &StreamId, form: &OverlayForm) -> Result<Command, ValidationError> {
    let fields = form.parse()?;
    create(stream_id, &fields.text, fields.position, fields.size)
}

/// Plan a partial update of `id`.
pub fn update(id: &OverlayId, patch: OverlayPatch) -> Result<Command, ValidationError> {
    validation::validate_patch(&patch)?;
    Ok(Command::UpdateOverlay { id: id.clone(), patch, draft: None })
}

/// Plan flipping the visibility of `overlay`.
pub fn toggle_visibility(overlay: &Overlay) -> Command {
    Command::UpdateOverlay {
        id: overlay.id.clone(),
        patch: OverlayPatch::visibility(!overlay.visible),
        draft: None,
    }
}

/// Plan deletion of `id`.
pub fn delete(id: &OverlayId) -> Command {
    Command::DeleteOverlay { id: id.clone() }
}

/// Apply an acknowledged create, update or delete to `store`.
///
/// Returns true if the store changed. Start, list and failure completions are
/// not overlay writes and leave the store alone.
pub fn apply(store: &mut OverlayStore, completion: &Completion) -> bool {
    match completion {
        Completion::OverlayCreated { overlay } => {
            tracing::debug!(id = %overlay.id, "overlay created");
            store.insert(overlay.clone());
            true
        },
        Completion::OverlayUpdated { id, patch, .. } => {
            let updated = store.update_by_id(id, patch);
            if !updated {
                tracing::debug!(%id, "update acknowledged for overlay not held locally");
            }
            updated
        },
        Completion::OverlayDeleted { id } => {
            let removed = store.remove_by_id(id).is_some();
            if !removed {
                tracing::debug!(%id, "delete acknowledged for overlay not held locally");
            }
            removed
        },
        Completion::StreamStarted { .. }
        | Completion::OverlaysListed { .. }
        | Completion::Failed { .. } => false,
    }
}
