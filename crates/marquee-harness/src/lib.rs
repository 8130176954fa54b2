//! Deterministic test harness for Marquee.
//!
//! In-memory implementations of the authority seam plus the scenario and
//! model tooling used to check the console end to end without a network.
//!
//! # Components
//!
//! - [`MemoryAuthority`]: sequential ids, call log, scripted and seeded faults
//! - [`Delayed`]: per-call latency for out-of-order delivery
//! - [`scenario`]: step scripts verified by mandatory oracles
//! - [`ModelWorld`]: reference model for model-based property tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod latency;
mod memory;
mod model;
pub mod scenario;

pub use latency::Delayed;
pub use memory::{Call, CallKind, MemoryAuthority};
pub use model::{ModelOverlay, ModelWorld, Operation, OperationError, OperationResult};
