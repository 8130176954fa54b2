//! Reference model for model-based testing.
//!
//! [`ModelWorld`] is the simplest possible statement of what one operator's
//! console should hold after a sequence of [`Operation`]s against a healthy
//! authority: no reducer, no commands, just a list of overlays for the active
//! stream and the id counters the authority would use.
//!
//! Operations address overlays by slot (an index into the current list,
//! wrapped) so generated sequences mostly hit overlays that exist. An empty
//! list turns a slot into an unknown id.

use marquee_proto::{OverlayId, Position, Size, StreamId};

/// Operator action applied to both the model and the real console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Start streaming from camera `camera`.
    StartStream {
        /// Camera number, becomes `rtsp://cam{camera}`.
        camera: u8,
    },
    /// Reload the active stream's overlays.
    Refresh,
    /// Create an overlay.
    Create {
        /// Label text; may be blank.
        text: String,
        /// Top-left corner.
        position: Position,
        /// Dimensions.
        size: Size,
    },
    /// Flip visibility of the overlay in `slot`.
    Toggle {
        /// Index into the current list.
        slot: u8,
    },
    /// Delete the overlay in `slot`.
    Delete {
        /// Index into the current list.
        slot: u8,
    },
    /// Edit the text of the overlay in `slot` and commit.
    EditText {
        /// Index into the current list.
        slot: u8,
        /// Replacement text; may be blank.
        text: String,
    },
}

impl Operation {
    /// Source address for a camera number.
    pub fn camera_url(camera: u8) -> String {
        format!("rtsp://cam{camera}")
    }
}

/// Why a model operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// Needs a playing stream.
    NoActiveStream,
    /// Text was blank.
    EmptyText,
    /// Slot did not name an overlay.
    UnknownOverlay,
}

/// Outcome of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
    /// Applied.
    Ok,
    /// Refused.
    Error(OperationError),
}

impl OperationResult {
    /// Whether the operation was applied.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Overlay as the model tracks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOverlay {
    /// Id the authority would assign.
    pub id: OverlayId,
    /// Label text.
    pub text: String,
    /// Top-left corner.
    pub position: Position,
    /// Dimensions.
    pub size: Size,
    /// Drawn or hidden.
    pub visible: bool,
}

/// Reference state for one operator.
#[derive(Debug, Clone, Default)]
pub struct ModelWorld {
    streams_started: u64,
    overlays_created: u64,
    active: Option<StreamId>,
    overlays: Vec<ModelOverlay>,
}

impl ModelWorld {
    /// Nothing started yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Playing stream.
    pub fn active(&self) -> Option<&StreamId> {
        self.active.as_ref()
    }

    /// Overlays of the playing stream, in creation order.
    pub fn overlays(&self) -> &[ModelOverlay] {
        &self.overlays
    }

    /// Ids the compositor should draw, in order.
    pub fn rendered(&self) -> Vec<&OverlayId> {
        self.overlays.iter().filter(|o| o.visible).map(|o| &o.id).collect()
    }

    /// Id in `slot`, if the list is not empty.
    pub fn slot(&self, slot: u8) -> Option<&OverlayId> {
        if self.overlays.is_empty() {
            return None;
        }
        self.overlays.get(usize::from(slot) % self.overlays.len()).map(|o| &o.id)
    }

    /// Apply one operation.
    pub fn apply(&mut self, operation: &Operation) -> OperationResult {
        match self.try_apply(operation) {
            Ok(()) => OperationResult::Ok,
            Err(error) => OperationResult::Error(error),
        }
    }

    fn try_apply(&mut self, operation: &Operation) -> Result<(), OperationError> {
        match operation {
            Operation::StartStream { .. } => {
                self.streams_started += 1;
                self.active = Some(StreamId::new(format!("s{}", self.streams_started)));
                self.overlays.clear();
            },
            Operation::Refresh => {
                self.active.as_ref().ok_or(OperationError::NoActiveStream)?;
            },
            Operation::Create { text, position, size } => {
                self.active.as_ref().ok_or(OperationError::NoActiveStream)?;
                if text.trim().is_empty() {
                    return Err(OperationError::EmptyText);
                }
                self.overlays_created += 1;
                self.overlays.push(ModelOverlay {
                    id: OverlayId::new(format!("o{}", self.overlays_created)),
                    text: text.clone(),
                    position: *position,
                    size: *size,
                    visible: true,
                });
            },
            Operation::Toggle { slot } => {
                let overlay = self.slot_mut(*slot)?;
                overlay.visible = !overlay.visible;
            },
            Operation::Delete { slot } => {
                let index = self.slot_index(*slot)?;
                self.overlays.remove(index);
            },
            Operation::EditText { slot, text } => {
                let index = self.slot_index(*slot)?;
                if text.trim().is_empty() {
                    return Err(OperationError::EmptyText);
                }
                self.overlays[index].text.clone_from(text);
            },
        }
        Ok(())
    }

    fn slot_index(&self, slot: u8) -> Result<usize, OperationError> {
        if self.overlays.is_empty() {
            return Err(OperationError::UnknownOverlay);
        }
        Ok(usize::from(slot) % self.overlays.len())
    }

    fn slot_mut(&mut self, slot: u8) -> Result<&mut ModelOverlay, OperationError> {
        let index = self.slot_index(slot)?;
        Ok(&mut self.overlays[index])
    }
}
