//! Marquee terminal console
//!
//! Line-oriented frontend for the overlay console: commands are read from
//! stdin, the console is printed to stdout after every change, and logs go to
//! stderr.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod error;
pub mod logging;
pub mod terminal;
pub mod view;

pub use error::CliError;
pub use terminal::{ExternalPlayer, TerminalDriver, TerminalError};
