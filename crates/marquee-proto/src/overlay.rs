//! Overlay descriptors.
//!
//! An overlay is a text label pinned to a pixel rectangle of the displayed
//! video surface. Coordinates are already in surface pixels; nothing here
//! scales against the stream's intrinsic resolution.

use serde::{Deserialize, Serialize};

use crate::ids::{OverlayId, StreamId};

/// Offset of the overlay's top-left corner, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Distance from the top edge.
    pub top: u32,
    /// Distance from the left edge.
    pub left: u32,
}

impl Position {
    /// Build a position from its two offsets.
    pub const fn new(top: u32, left: u32) -> Self {
        Self { top, left }
    }
}

/// Overlay dimensions in surface pixels. Both sides are positive once
/// validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: u32,
    /// Vertical extent.
    pub height: u32,
}

impl Size {
    /// Build a size from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

fn visible_by_default() -> bool {
    true
}

/// Overlay as stored by the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    /// Authority-assigned identifier.
    #[serde(rename = "_id")]
    pub id: OverlayId,
    /// Stream this overlay annotates.
    pub stream_id: StreamId,
    /// Label text. Never empty.
    pub text: String,
    /// Top-left corner.
    pub position: Position,
    /// Rectangle dimensions.
    pub size: Size,
    /// Whether the compositor draws this overlay.
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

impl Overlay {
    /// Materialize a created overlay from its request and the id the authority
    /// assigned to it. New overlays start visible.
    pub fn from_created(id: OverlayId, request: NewOverlay) -> Self {
        Self {
            id,
            stream_id: request.stream_id,
            text: request.text,
            position: request.position,
            size: request.size,
            visible: true,
        }
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOverlay {
    /// Owning stream.
    pub stream_id: StreamId,
    /// Label text.
    pub text: String,
    /// Top-left corner.
    pub position: Position,
    /// Rectangle dimensions.
    pub size: Size,
}

/// Partial update. Absent fields are left untouched by the authority and by
/// the local merge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverlayPatch {
    /// Replacement text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Replacement position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Replacement size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Replacement visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl OverlayPatch {
    /// Patch that only flips visibility.
    pub fn visibility(visible: bool) -> Self {
        Self { visible: Some(visible), ..Self::default() }
    }

    /// True when no field is set. The authority rejects such updates.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.position.is_none() && self.size.is_none() && self.visible.is_none()
    }

    /// Merge the present fields into `overlay`.
    pub fn apply_to(&self, overlay: &mut Overlay) {
        if let Some(text) = &self.text {
            overlay.text.clone_from(text);
        }
        if let Some(position) = self.position {
            overlay.position = position;
        }
        if let Some(size) = self.size {
            overlay.size = size;
        }
        if let Some(visible) = self.visible {
            overlay.visible = visible;
        }
    }
}
