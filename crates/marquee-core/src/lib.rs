//! Marquee core logic
//!
//! Pure state machines for keeping a client-held overlay set consistent with
//! the overlay authority, and for deriving what is drawn over the video.
//!
//! # Architecture
//!
//! Nothing in this crate performs I/O. Operator intents are validated and
//! planned into [`Command`]s; executing a command is someone else's job, and
//! its outcome comes back as a [`Completion`]. The [`Console`] reduces
//! completions one at a time, in arrival order, and answers with [`Effect`]s
//! describing follow-up work. The store only changes on acknowledged writes,
//! so a failed call leaves it exactly as it was.
//!
//! The same reducer runs under the sequential controller in
//! `marquee-client`, the concurrent runtime in `marquee-app`, and the
//! deterministic harness.
//!
//! # Components
//!
//! - [`session`]: stream lifecycle (idle, connecting, playing, failed)
//! - [`store`]: write-through overlay set for the active stream
//! - [`actions`]: validation and planning of overlay writes
//! - [`edit`]: single-slot draft buffer
//! - [`compositor`]: visible overlays as screen rectangles
//! - [`console`]: top-level controller state and reducer
//! - [`validation`]: typed parsing of raw operator input
//! - [`error`]: validation and failure taxonomy

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod actions;
pub mod command;
pub mod compositor;
pub mod console;
pub mod edit;
pub mod error;
pub mod session;
pub mod store;
pub mod validation;

pub use command::{Command, Completion, Effect};
pub use compositor::{Affordance, Compositor, Rect, RenderedOverlay};
pub use console::Console;
pub use edit::{Draft, DraftField, EditSession};
pub use error::{Field, OverlayError, ValidationError};
pub use session::{PlaybackState, StreamSession};
pub use store::OverlayStore;
pub use validation::{OverlayFields, OverlayForm};
