//! Sequential controller.
//!
//! Owns the [`Console`] and an [`Authority`] and runs one operator action to
//! completion before the next: plan, execute, reduce, then execute whatever
//! follow-up commands the reducer asked for. Every method returns the outcome
//! of the action itself; failures of follow-ups (such as the listing issued
//! after a stream starts) are queued in [`Controller::take_reports`].

use std::collections::VecDeque;

use marquee_core::{
    Command, Completion, Console, DraftField, Effect, OverlayError, OverlayForm, RenderedOverlay,
};
use marquee_proto::{OverlayId, OverlayPatch, Position, Size, StreamId};

use crate::{authority::Authority, executor::execute};

/// Console driven by sequential authority calls.
#[derive(Debug)]
pub struct Controller<A> {
    authority: A,
    console: Console,
    playback: Option<StreamId>,
    reports: Vec<OverlayError>,
}

impl<A: Authority> Controller<A> {
    /// Controller with an idle console.
    pub fn new(authority: A) -> Self {
        Self { authority, console: Console::new(), playback: None, reports: Vec::new() }
    }

    /// Console state.
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Authority in use.
    pub fn authority(&self) -> &A {
        &self.authority
    }

    /// Stream the playback surface was last pointed at.
    pub fn playback(&self) -> Option<&StreamId> {
        self.playback.as_ref()
    }

    /// Drain failures of follow-up commands.
    pub fn take_reports(&mut self) -> Vec<OverlayError> {
        std::mem::take(&mut self.reports)
    }

    /// Overlays currently drawn over the video.
    pub fn render(&mut self) -> &[RenderedOverlay] {
        self.console.compose()
    }

    /// Start a stream and load its overlays.
    pub async fn start_stream(&mut self, url: &str) -> Result<StreamId, OverlayError> {
        let command = self.console.start_stream(url)?;
        match self.dispatch(command).await? {
            Completion::StreamStarted { stream_id, .. } => Ok(stream_id),
            other => Err(unexpected(&other)),
        }
    }

    /// Reload the overlays of the playing stream.
    pub async fn refresh(&mut self) -> Result<(), OverlayError> {
        let command = self.console.refresh()?;
        self.dispatch(command).await.map(drop)
    }

    /// Create an overlay from typed fields.
    pub async fn create(
        &mut self,
        text: &str,
        position: Position,
        size: Size,
    ) -> Result<OverlayId, OverlayError> {
        let command = self.console.create_with(text, position, size)?;
        self.dispatch_create(command).await
    }

    /// Create an overlay from raw form input.
    pub async fn create_from_form(&mut self, form: &OverlayForm) -> Result<OverlayId, OverlayError> {
        let command = self.console.create(form)?;
        self.dispatch_create(command).await
    }

    /// Apply a partial update.
    pub async fn update(&mut self, id: &OverlayId, patch: OverlayPatch) -> Result<(), OverlayError> {
        let command = self.console.update(id, patch)?;
        self.dispatch(command).await.map(drop)
    }

    /// Flip an overlay's visibility. Returns the new visibility.
    pub async fn toggle_visibility(&mut self, id: &OverlayId) -> Result<bool, OverlayError> {
        let command = self.console.toggle_visibility(id)?;
        match self.dispatch(command).await? {
            Completion::OverlayUpdated { patch, .. } => Ok(patch.visible.unwrap_or_default()),
            other => Err(unexpected(&other)),
        }
    }

    /// Delete an overlay.
    pub async fn delete(&mut self, id: &OverlayId) -> Result<(), OverlayError> {
        let command = self.console.delete(id);
        self.dispatch(command).await.map(drop)
    }

    /// Open an overlay in the editor.
    pub fn open_editor(&mut self, id: &OverlayId) -> Result<(), OverlayError> {
        Ok(self.console.open_editor(id)?)
    }

    /// Change a field of the open draft.
    pub fn edit(&mut self, field: DraftField, value: impl Into<String>) -> Result<(), OverlayError> {
        Ok(self.console.set_draft_field(field, value)?)
    }

    /// Discard the open draft.
    pub fn cancel_edit(&mut self) -> bool {
        self.console.cancel_edit()
    }

    /// Commit the open draft. The editor closes only if the authority accepts.
    pub async fn commit_edit(&mut self) -> Result<(), OverlayError> {
        let command = self.console.commit_edit()?;
        self.dispatch(command).await.map(drop)
    }

    /// Execute a planned command, reduce its completion and run follow-ups.
    ///
    /// Returns the completion of `command` itself, or its error.
    pub async fn dispatch(&mut self, command: Command) -> Result<Completion, OverlayError> {
        let completion = execute(&self.authority, command).await;
        let outcome = match &completion {
            Completion::Failed { error, .. } => Err(error.clone()),
            done => Ok(done.clone()),
        };

        let mut queue: VecDeque<Command> = self.absorb(completion, false).into();
        while let Some(next) = queue.pop_front() {
            let completion = execute(&self.authority, next).await;
            queue.extend(self.absorb(completion, true));
        }

        outcome
    }

    async fn dispatch_create(&mut self, command: Command) -> Result<OverlayId, OverlayError> {
        match self.dispatch(command).await? {
            Completion::OverlayCreated { overlay } => Ok(overlay.id),
            other => Err(unexpected(&other)),
        }
    }

    fn absorb(&mut self, completion: Completion, follow_up: bool) -> Vec<Command> {
        let mut commands = Vec::new();
        for effect in self.console.apply(completion) {
            match effect {
                Effect::Dispatch(command) => commands.push(command),
                Effect::AttachPlayback { stream_id } => self.playback = Some(stream_id),
                Effect::Report(error) if follow_up => self.reports.push(error),
                Effect::Report(_) => {},
            }
        }
        commands
    }
}

/// A completion that does not answer the command it came from. The executor
/// never produces one; if it did, the call went through but its answer is
/// unusable, which is how a malformed success body is reported too.
fn unexpected(completion: &Completion) -> OverlayError {
    tracing::error!(?completion, "completion does not answer its command");
    OverlayError::Remote {
        status: 200,
        message: format!("mismatched answer from authority: {completion:?}"),
    }
}
