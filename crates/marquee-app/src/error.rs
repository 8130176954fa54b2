//! Runtime errors.

use thiserror::Error;

/// Errors that stop the runtime loop.
///
/// Operator-facing failures are not errors here; they are handed to the
/// driver and the loop continues.
#[derive(Debug, Error)]
pub enum RuntimeError<E>
where
    E: std::error::Error + 'static,
{
    /// The driver failed to read input or draw.
    #[error("driver failure: {0}")]
    Driver(#[source] E),
}
