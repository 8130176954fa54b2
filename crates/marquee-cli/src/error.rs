//! Top-level CLI errors.

use marquee_app::RuntimeError;
use marquee_client::{ConfigError, OverlayError};
use thiserror::Error;

use crate::terminal::TerminalError;

/// Anything that stops the console before the operator quits.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad server address.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("cannot build authority client: {0}")]
    Client(#[from] OverlayError),

    /// The runtime stopped on a terminal failure.
    #[error(transparent)]
    Runtime(#[from] RuntimeError<TerminalError>),

    /// The log subscriber could not be installed.
    #[error("cannot initialize logging: {0}")]
    Logging(String),
}
