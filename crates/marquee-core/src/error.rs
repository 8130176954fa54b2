//! Error taxonomy.
//!
//! Validation failures are detected before any remote call and never reach the
//! authority. Remote and network failures come back from an executed command.
//! Playback failures come from the streaming client and are independent of
//! overlay state. None of them leave a partially applied mutation behind.

use marquee_proto::OverlayId;
use thiserror::Error;

/// Which numeric field of an overlay form failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Top offset.
    Top,
    /// Left offset.
    Left,
    /// Rectangle width.
    Width,
    /// Rectangle height.
    Height,
}

impl Field {
    /// Name used in operator-facing messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Left => "left",
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Client-side rejection. Blocks the remote call entirely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Start requested without a source URL.
    #[error("stream URL is empty")]
    EmptyUrl,

    /// Overlay text is empty or whitespace.
    #[error("overlay text is empty")]
    EmptyText,

    /// A numeric field is not an integer.
    #[error("{field} is not a whole number: {input:?}")]
    NotANumber {
        /// Offending field.
        field: Field,
        /// Raw input as typed.
        input: String,
    },

    /// A position offset is below zero.
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Offending field.
        field: Field,
        /// Parsed value.
        value: i64,
    },

    /// A dimension is zero or below.
    #[error("{field} must be positive (got {value})")]
    NotPositive {
        /// Offending field.
        field: Field,
        /// Parsed value.
        value: i64,
    },

    /// A value does not fit in a pixel coordinate.
    #[error("{field} is out of range (got {value})")]
    OutOfRange {
        /// Offending field.
        field: Field,
        /// Parsed value.
        value: i64,
    },

    /// Update without any field to change.
    #[error("no fields to update")]
    EmptyPatch,

    /// Overlay work attempted before a stream is playing.
    #[error("no stream is playing")]
    NoActiveStream,

    /// The overlay is not in the local set.
    #[error("unknown overlay {0}")]
    UnknownOverlay(OverlayId),

    /// An id that cannot be addressed in a request path.
    #[error("{0:?} is not a usable id")]
    InvalidId(String),

    /// Draft operation without an open edit session.
    #[error("no overlay is being edited")]
    NoDraft,
}

/// Every failure the console surfaces to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// Rejected before the call.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Authority answered with a non-success status.
    #[error("authority rejected request ({status}): {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Reason reported by the authority.
        message: String,
    },

    /// Call failed to complete.
    #[error("network failure: {0}")]
    Network(String),

    /// Reported by the streaming client.
    #[error("playback failure: {0}")]
    Playback(String),
}

impl OverlayError {
    /// Short tag used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Remote { .. } => "remote",
            Self::Network(_) => "network",
            Self::Playback(_) => "playback",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = ValidationError::NotANumber { field: Field::Width, input: "abc".into() };
        assert_eq!(err.to_string(), "width is not a whole number: \"abc\"");
    }

    #[test]
    fn validation_converts_into_overlay_error() {
        let err: OverlayError = ValidationError::EmptyText.into();
        assert_eq!(err.kind(), "validation");
        assert_eq!(err.to_string(), "invalid input: overlay text is empty");
    }
}
