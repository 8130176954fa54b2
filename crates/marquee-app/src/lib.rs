//! Application layer for Marquee
//!
//! Generic runtime and platform seams for the overlay console, so the same
//! orchestration runs behind the terminal frontend and in simulation.
//!
//! # Components
//!
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Input`]: Operator intents and surface events fed to the runtime
//! - [`Runtime`]: Single-task loop that keeps requests in flight concurrently
//! - [`playback`]: Manifest attachment with native fallback

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod error;
mod input;
pub mod playback;
mod runtime;

pub use driver::Driver;
pub use error::RuntimeError;
pub use input::Input;
pub use playback::{MediaSurface, PlaybackMode, StreamingClient};
pub use runtime::Runtime;
