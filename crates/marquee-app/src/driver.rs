//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the runtime from a concrete frontend. Each
//! frontend supplies operator input, draws the console, shows errors and owns
//! the video surface, while the generic [`crate::Runtime`] handles planning,
//! request execution and reduction.

use std::future::Future;

use marquee_core::{Console, OverlayError};
use marquee_proto::OverlayId;
use url::Url;

use crate::{Input, PlaybackMode};

/// Abstracts operator-facing I/O for the runtime.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next operator input.
    ///
    /// Returns `None` once input is exhausted. Must be cancel-safe: the runtime
    /// drops the future whenever a completion arrives first.
    fn poll_input(&mut self) -> impl Future<Output = Result<Option<Input>, Self::Error>> + Send;

    /// Draw the console. [`Console::scene`] is up to date when this is called.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, console: &Console) -> Result<(), Self::Error>;

    /// Show a failure to the operator.
    fn notify(&mut self, error: &OverlayError) -> Result<(), Self::Error>;

    /// Show which overlays cover a point.
    fn show_hits(&mut self, x: u32, y: u32, hits: &[OverlayId]) -> Result<(), Self::Error>;

    /// Attach a stream's manifest to the video surface.
    ///
    /// The inner result is the playback outcome; the runtime logs a playback
    /// failure and carries on. The outer error is a driver failure and stops
    /// the runtime like any other.
    fn attach_playback(
        &mut self,
        manifest: &Url,
    ) -> Result<Result<PlaybackMode, OverlayError>, Self::Error>;

    /// Release the surface and any terminal state.
    fn stop(&mut self);
}
