//! Scenario testing with mandatory oracles.
//!
//! A scenario is a script of operator steps run through the sequential
//! [`marquee_client::Controller`] against a [`crate::MemoryAuthority`]. The
//! final [`World`] is handed to an oracle; a scenario without one cannot run.
//!
//! ```text
//! Scenario::new(..).start(..).create(..).toggle(..)
//!           │
//!           ▼ .oracle(..)
//!   RunnableScenario::run()
//!           │ steps → Controller → MemoryAuthority
//!           ▼
//!        World ──► oracle(&World) ──► Ok / Err(reason)
//! ```

mod builder;
mod world;

pub use builder::{RunnableScenario, Scenario};
pub use world::{StepOutcome, World};

/// Verification run against the final world.
pub type OracleFn = Box<dyn Fn(&World) -> Result<(), String>>;

/// Reusable oracles.
pub mod oracle {
    use std::collections::HashSet;

    use super::{OracleFn, World};

    /// Passes when every oracle passes; reports the first failure.
    pub fn all_of(oracles: Vec<OracleFn>) -> OracleFn {
        Box::new(move |world| oracles.iter().try_for_each(|oracle| oracle(world)))
    }

    /// Every step returned `Ok`.
    pub fn all_steps_succeeded() -> OracleFn {
        Box::new(|world| match world.outcomes().iter().find(|o| o.result.is_err()) {
            Some(outcome) => Err(format!("step {} failed: {:?}", outcome.step, outcome.result)),
            None => Ok(()),
        })
    }

    /// The client's overlays equal the authority's overlays for the playing
    /// stream, in the same order. With no stream playing the store is empty.
    pub fn store_matches_authority() -> OracleFn {
        Box::new(|world| {
            let local = world.console().store().overlays();
            let remote = match world.console().session().playing_stream() {
                Some(stream_id) => world.authority().overlays(stream_id),
                None => Vec::new(),
            };
            if local == remote.as_slice() {
                Ok(())
            } else {
                Err(format!("store diverged from authority\n local: {local:?}\nremote: {remote:?}"))
            }
        })
    }

    /// The scene holds exactly the visible overlays of the store.
    pub fn render_matches_visibility() -> OracleFn {
        Box::new(|world| {
            let rendered: HashSet<_> = world.scene().iter().map(|r| &r.id).collect();
            for overlay in world.console().store().overlays() {
                if overlay.visible != rendered.contains(&overlay.id) {
                    return Err(format!(
                        "overlay {} visible={} but rendered={}",
                        overlay.id,
                        overlay.visible,
                        rendered.contains(&overlay.id)
                    ));
                }
            }
            if rendered.len() > world.console().store().len() {
                return Err("scene renders overlays missing from the store".to_string());
            }
            Ok(())
        })
    }

    /// The store holds exactly `expected` overlays.
    pub fn overlay_count(expected: usize) -> OracleFn {
        Box::new(move |world| {
            let actual = world.console().store().len();
            if actual == expected {
                Ok(())
            } else {
                Err(format!("expected {expected} overlays, found {actual}"))
            }
        })
    }
}
