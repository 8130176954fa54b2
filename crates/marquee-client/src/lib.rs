//! Marquee client
//!
//! Connects the pure console in `marquee-core` to an overlay authority.
//!
//! # Components
//!
//! - [`Authority`]: one method per remote call
//! - [`HttpAuthority`]: reqwest-backed authority speaking the JSON API
//! - [`execute`]: runs one command and wraps the result as a completion
//! - [`Controller`]: sequential plan, execute, reduce loop for one operator

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod authority;
mod config;
mod controller;
mod executor;
mod http;

pub use authority::Authority;
pub use config::{ClientConfig, ConfigError, DEFAULT_SERVER, InvalidSegment};
pub use controller::Controller;
pub use executor::execute;
pub use http::HttpAuthority;
pub use marquee_core::{OverlayError, ValidationError};
