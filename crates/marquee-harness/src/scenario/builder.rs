//! Scenario builder API.
//!
//! Provides a declarative API for scripting operator sessions that enforces
//! the Oracle Pattern.

use std::{fmt, sync::Arc};

use futures::executor::block_on;
use marquee_client::Controller;
use marquee_core::{DraftField, OverlayError};
use marquee_proto::{OverlayId, Position, Size};

use crate::{
    CallKind, MemoryAuthority,
    scenario::{OracleFn, World},
};

/// One scripted operator step.
#[derive(Debug, Clone)]
enum Step {
    Start(String),
    Refresh,
    Create { label: String, text: String, position: Position, size: Size },
    Toggle(String),
    Delete(String),
    Edit { label: String, field: DraftField, value: String },
    FailNext(CallKind, OverlayError),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start(url) => write!(f, "start {url}"),
            Self::Refresh => write!(f, "refresh"),
            Self::Create { label, text, .. } => write!(f, "create {label} {text:?}"),
            Self::Toggle(label) => write!(f, "toggle {label}"),
            Self::Delete(label) => write!(f, "delete {label}"),
            Self::Edit { label, field, value } => write!(f, "edit {label} {field:?}={value:?}"),
            Self::FailNext(kind, _) => write!(f, "fail next {kind:?}"),
        }
    }
}

/// Scenario builder.
///
/// Script the operator's steps, then call `.oracle()` to get a
/// [`RunnableScenario`]. Overlays are referred to by labels given at
/// creation.
pub struct Scenario {
    name: String,
    authority: MemoryAuthority,
    steps: Vec<Step>,
}

impl Scenario {
    /// Create a new scenario with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), authority: MemoryAuthority::new(), steps: Vec::new() }
    }

    /// Run against a preconfigured authority, for example one with faults.
    pub fn with_authority(mut self, authority: MemoryAuthority) -> Self {
        self.authority = authority;
        self
    }

    /// Start a stream.
    pub fn start(mut self, url: impl Into<String>) -> Self {
        self.steps.push(Step::Start(url.into()));
        self
    }

    /// Reload the playing stream's overlays.
    pub fn refresh(mut self) -> Self {
        self.steps.push(Step::Refresh);
        self
    }

    /// Create an overlay and remember its id under `label`.
    pub fn create(
        mut self,
        label: impl Into<String>,
        text: impl Into<String>,
        position: Position,
        size: Size,
    ) -> Self {
        self.steps.push(Step::Create { label: label.into(), text: text.into(), position, size });
        self
    }

    /// Flip a labelled overlay's visibility.
    pub fn toggle(mut self, label: impl Into<String>) -> Self {
        self.steps.push(Step::Toggle(label.into()));
        self
    }

    /// Delete a labelled overlay.
    pub fn delete(mut self, label: impl Into<String>) -> Self {
        self.steps.push(Step::Delete(label.into()));
        self
    }

    /// Open a labelled overlay, change one field and commit.
    pub fn edit(mut self, label: impl Into<String>, field: DraftField, value: impl Into<String>) -> Self {
        self.steps.push(Step::Edit { label: label.into(), field, value: value.into() });
        self
    }

    /// Make the next authority call of `kind` fail with `error`.
    pub fn fail_next(mut self, kind: CallKind, error: OverlayError) -> Self {
        self.steps.push(Step::FailNext(kind, error));
        self
    }

    /// Set the oracle function and return a runnable scenario.
    ///
    /// The oracle is mandatory - you cannot run a scenario without
    /// verification.
    pub fn oracle(self, oracle: OracleFn) -> RunnableScenario {
        RunnableScenario { scenario: self, oracle }
    }
}

/// A scenario with an oracle function that can be executed.
pub struct RunnableScenario {
    scenario: Scenario,
    oracle: OracleFn,
}

impl RunnableScenario {
    /// Execute every step in order, then run the oracle on the final world.
    ///
    /// A failing step is recorded in the world, not returned: oracles decide
    /// whether a failure was expected. Referring to a label that was never
    /// created is a scripting error and aborts the run.
    pub fn run(self) -> Result<(), String> {
        let Self { scenario, oracle } = self;
        let world = block_on(execute(scenario))?;
        oracle(&world)
    }
}

async fn execute(scenario: Scenario) -> Result<World, String> {
    let Scenario { name, authority, steps } = scenario;
    let authority = Arc::new(authority);
    let mut controller = Controller::new(Arc::clone(&authority));
    let mut world = World::new(authority);

    for step in steps {
        let description = step.to_string();
        let lookup = |world: &World, label: &str| -> Result<OverlayId, String> {
            world
                .id(label)
                .cloned()
                .ok_or_else(|| format!("Scenario '{name}': step '{description}' uses unknown label {label}"))
        };

        let result = match &step {
            Step::Start(url) => controller.start_stream(url).await.map(drop),
            Step::Refresh => controller.refresh().await,
            Step::Create { label, text, position, size } => {
                match controller.create(text, *position, *size).await {
                    Ok(id) => {
                        world.label(label.clone(), id);
                        Ok(())
                    },
                    Err(error) => Err(error),
                }
            },
            Step::Toggle(label) => {
                let id = lookup(&world, label)?;
                controller.toggle_visibility(&id).await.map(drop)
            },
            Step::Delete(label) => {
                let id = lookup(&world, label)?;
                controller.delete(&id).await
            },
            Step::Edit { label, field, value } => {
                let id = lookup(&world, label)?;
                match controller.open_editor(&id).and_then(|()| controller.edit(*field, value.clone())) {
                    Ok(()) => controller.commit_edit().await,
                    Err(error) => Err(error),
                }
            },
            Step::FailNext(kind, error) => {
                world.authority().fail_next(*kind, error.clone());
                Ok(())
            },
        };

        tracing::debug!(scenario = %name, step = %description, ok = result.is_ok(), "step");
        world.record(description, result);
    }

    let reports = controller.take_reports();
    let playback = controller.playback().cloned();
    world.finish(controller.console().clone(), reports, playback);
    Ok(world)
}
