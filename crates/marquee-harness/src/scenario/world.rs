//! World state after scenario execution.
//!
//! Holds the console as the operator left it, the authority it talked to,
//! the outcome of every step and the labels given to created overlays.

use std::{collections::HashMap, sync::Arc};

use marquee_core::{Console, OverlayError, RenderedOverlay};
use marquee_proto::{Overlay, OverlayId, StreamId};

use crate::MemoryAuthority;

/// Result of one scripted step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Step as written in the scenario.
    pub step: String,
    /// What the controller returned.
    pub result: Result<(), OverlayError>,
}

/// Final state of a scenario run.
pub struct World {
    authority: Arc<MemoryAuthority>,
    console: Console,
    scene: Vec<RenderedOverlay>,
    labels: HashMap<String, OverlayId>,
    outcomes: Vec<StepOutcome>,
    reports: Vec<OverlayError>,
    playback: Option<StreamId>,
}

impl World {
    pub(crate) fn new(authority: Arc<MemoryAuthority>) -> Self {
        Self {
            authority,
            console: Console::new(),
            scene: Vec::new(),
            labels: HashMap::new(),
            outcomes: Vec::new(),
            reports: Vec::new(),
            playback: None,
        }
    }

    pub(crate) fn label(&mut self, label: String, id: OverlayId) {
        self.labels.insert(label, id);
    }

    pub(crate) fn record(&mut self, step: String, result: Result<(), OverlayError>) {
        self.outcomes.push(StepOutcome { step, result });
    }

    pub(crate) fn finish(
        &mut self,
        mut console: Console,
        reports: Vec<OverlayError>,
        playback: Option<StreamId>,
    ) {
        self.scene = console.compose().to_vec();
        self.console = console;
        self.reports = reports;
        self.playback = playback;
    }

    /// Console as the operator left it.
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Authority the scenario ran against.
    pub fn authority(&self) -> &MemoryAuthority {
        &self.authority
    }

    /// Final compositor output.
    pub fn scene(&self) -> &[RenderedOverlay] {
        &self.scene
    }

    /// Id assigned to a labelled overlay.
    pub fn id(&self, label: &str) -> Option<&OverlayId> {
        self.labels.get(label)
    }

    /// Client-side copy of a labelled overlay.
    pub fn overlay(&self, label: &str) -> Option<&Overlay> {
        self.id(label).and_then(|id| self.console.store().get(id))
    }

    /// Every step with its outcome, in order.
    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }

    /// Errors returned by steps.
    pub fn failures(&self) -> Vec<&OverlayError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err()).collect()
    }

    /// Failures of follow-up requests the controller issued on its own.
    pub fn reports(&self) -> &[OverlayError] {
        &self.reports
    }

    /// Stream the playback surface was pointed at.
    pub fn playback(&self) -> Option<&StreamId> {
        self.playback.as_ref()
    }
}
