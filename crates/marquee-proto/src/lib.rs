//! Wire format for the Marquee overlay authority.
//!
//! The authority speaks JSON over HTTP. This crate holds the request and
//! response bodies, the identifier newtypes, and the overlay descriptor as it
//! appears on the wire. Nothing here performs I/O; the HTTP client lives in
//! `marquee-client`.
//!
//! Overlay identifiers travel under the `_id` key, and descriptors listed by the
//! authority may omit `visible`, in which case the overlay is visible.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod ids;
pub mod overlay;
pub mod wire;

pub use ids::{OverlayId, StreamId};
pub use overlay::{NewOverlay, Overlay, OverlayPatch, Position, Size};
pub use wire::{
    CreateOverlayResponse, ErrorBody, HLS_MIME_TYPE, MessageBody, StartStreamRequest,
    StartStreamResponse, routes,
};
