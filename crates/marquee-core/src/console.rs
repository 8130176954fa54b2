//! Top-level controller state.
//!
//! The [`Console`] owns the stream session, the overlay store, the edit slot
//! and the compositor cache. Operator intents are planned through it into
//! [`Command`]s, and every [`Completion`] is reduced by [`Console::apply`],
//! the single place where state transitions happen. Nothing in here performs
//! I/O; `marquee-client` and `marquee-app` execute the commands.

use marquee_proto::{OverlayId, OverlayPatch, Position, Size, StreamId};

use crate::{
    actions,
    command::{Command, Completion, Effect},
    compositor::{Affordance, Compositor, RenderedOverlay},
    edit::{DraftField, EditSession},
    error::ValidationError,
    session::StreamSession,
    store::OverlayStore,
    validation::OverlayForm,
};

/// Session, overlays, editor and compositor for one operator.
#[derive(Debug, Clone, Default)]
pub struct Console {
    session: StreamSession,
    store: OverlayStore,
    editor: EditSession,
    compositor: Compositor,
}

impl Console {
    /// Idle console with no stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream session.
    pub fn session(&self) -> &StreamSession {
        &self.session
    }

    /// Overlays of the active stream.
    pub fn store(&self) -> &OverlayStore {
        &self.store
    }

    /// Edit slot.
    pub fn editor(&self) -> &EditSession {
        &self.editor
    }

    /// Compositor output for the current overlay set.
    pub fn compose(&mut self) -> &[RenderedOverlay] {
        self.compositor.compose(&self.store)
    }

    /// Last composed output. Call [`Console::compose`] first to bring it up to
    /// date with the store.
    pub fn scene(&self) -> &[RenderedOverlay] {
        self.compositor.scene()
    }

    /// Ids of rendered overlays under a point, topmost first.
    pub fn hit_test(&mut self, x: u32, y: u32) -> Vec<OverlayId> {
        self.compositor.compose(&self.store);
        self.compositor.hit_test(x, y).into_iter().cloned().collect()
    }

    /// Start a new stream from `url`.
    ///
    /// The previous stream's overlays and any open draft are discarded locally
    /// right away; nothing is deleted remotely.
    pub fn start_stream(&mut self, url: &str) -> Result<Command, ValidationError> {
        let attempt = self.session.begin(url)?;
        self.store.clear();
        self.editor.cancel();
        Ok(Command::StartStream { attempt, rtsp_url: url.trim().to_string() })
    }

    /// Re-list the overlays of the playing stream.
    pub fn refresh(&self) -> Result<Command, ValidationError> {
        let stream_id = self.playing()?;
        Ok(Command::ListOverlays { stream_id: stream_id.clone() })
    }

    /// Plan creating an overlay from raw form input on the playing stream.
    pub fn create(&self, form: &OverlayForm) -> Result<Command, ValidationError> {
        actions::create_from_form(self.playing()?, form)
    }

    /// Plan creating an overlay from typed fields on the playing stream.
    pub fn create_with(
        &self,
        text: &str,
        position: Position,
        size: Size,
    ) -> Result<Command, ValidationError> {
        actions::create(self.playing()?, text, position, size)
    }

    /// Plan a partial update.
    pub fn update(&self, id: &OverlayId, patch: OverlayPatch) -> Result<Command, ValidationError> {
        actions::update(id, patch)
    }

    /// Plan flipping the visibility of a held overlay.
    pub fn toggle_visibility(&self, id: &OverlayId) -> Result<Command, ValidationError> {
        let overlay = self.store.get(id).ok_or_else(|| ValidationError::UnknownOverlay(id.clone()))?;
        Ok(actions::toggle_visibility(overlay))
    }

    /// Plan deleting an overlay.
    pub fn delete(&self, id: &OverlayId) -> Command {
        actions::delete(id)
    }

    /// Open a held overlay in the editor, replacing any open draft.
    pub fn open_editor(&mut self, id: &OverlayId) -> Result<(), ValidationError> {
        let overlay = self.store.get(id).ok_or_else(|| ValidationError::UnknownOverlay(id.clone()))?;
        self.editor.open(overlay);
        Ok(())
    }

    /// Change a field of the open draft.
    pub fn set_draft_field(
        &mut self,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.editor.set(field, value)
    }

    /// Discard the open draft. Returns false if none was open.
    pub fn cancel_edit(&mut self) -> bool {
        self.editor.cancel().is_some()
    }

    /// Plan committing the open draft. The draft stays open until the update
    /// is acknowledged.
    pub fn commit_edit(&self) -> Result<Command, ValidationError> {
        let commit = self.editor.prepare_commit()?;
        Ok(Command::UpdateOverlay {
            id: commit.id,
            patch: commit.patch,
            draft: Some(commit.generation),
        })
    }

    /// Trigger a rendered overlay's control. Delete plans a command; edit
    /// opens the editor and needs no remote call.
    pub fn activate(
        &mut self,
        id: &OverlayId,
        affordance: Affordance,
    ) -> Result<Option<Command>, ValidationError> {
        match affordance {
            Affordance::Delete => Ok(Some(self.delete(id))),
            Affordance::Edit => self.open_editor(id).map(|()| None),
        }
    }

    /// Reduce one completion. This is the only state transition entry point
    /// for remote outcomes.
    pub fn apply(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::StreamStarted { attempt, stream_id } => {
                if !self.session.complete(attempt, stream_id.clone()) {
                    return Vec::new();
                }
                vec![
                    Effect::AttachPlayback { stream_id: stream_id.clone() },
                    Effect::Dispatch(Command::ListOverlays { stream_id }),
                ]
            },

            Completion::OverlaysListed { stream_id, overlays } => {
                if self.session.playing_stream() != Some(&stream_id) {
                    tracing::warn!(%stream_id, "dropping listing for inactive stream");
                    return Vec::new();
                }
                self.store.refresh(stream_id, overlays);
                Vec::new()
            },

            Completion::OverlayCreated { ref overlay } => {
                if self.session.playing_stream() != Some(&overlay.stream_id) {
                    tracing::warn!(
                        id = %overlay.id,
                        stream_id = %overlay.stream_id,
                        "dropping overlay created on inactive stream"
                    );
                    return Vec::new();
                }
                actions::apply(&mut self.store, &completion);
                Vec::new()
            },

            Completion::OverlayUpdated { draft, .. } => {
                actions::apply(&mut self.store, &completion);
                if let Some(generation) = draft
                    && self.editor.close_if(generation)
                {
                    tracing::debug!(generation, "draft committed");
                }
                Vec::new()
            },

            Completion::OverlayDeleted { .. } => {
                actions::apply(&mut self.store, &completion);
                Vec::new()
            },

            Completion::Failed { command, error } => {
                if let Command::StartStream { attempt, .. } = command
                    && !self.session.fail(attempt)
                {
                    return Vec::new();
                }
                tracing::warn!(command = command.name(), kind = error.kind(), %error, "command failed");
                vec![Effect::Report(error)]
            },
        }
    }

    fn playing(&self) -> Result<&StreamId, ValidationError> {
        self.session.playing_stream().ok_or(ValidationError::NoActiveStream)
    }
}

#[cfg(test)]
mod tests {
    use marquee_proto::Overlay;

    use super::*;
    use crate::{error::OverlayError, session::PlaybackState};

    fn playing_console() -> Console {
        let mut console = Console::new();
        let Command::StartStream { attempt, .. } = console.start_stream("rtsp://cam1").unwrap()
        else {
            unreachable!("start plans StartStream");
        };
        console.apply(Completion::StreamStarted { attempt, stream_id: StreamId::new("s1") });
        console.apply(Completion::OverlaysListed {
            stream_id: StreamId::new("s1"),
            overlays: Vec::new(),
        });
        console
    }

    fn created(console: &mut Console, id: &str) {
        let Command::CreateOverlay { overlay } = console.create(&OverlayForm::with_text(id)).unwrap()
        else {
            unreachable!("create plans CreateOverlay");
        };
        console.apply(Completion::OverlayCreated {
            overlay: Overlay::from_created(OverlayId::new(id), overlay),
        });
    }

    #[test]
    fn stream_start_attaches_playback_and_lists() {
        let mut console = Console::new();
        let command = console.start_stream(" rtsp://cam1 ").unwrap();
        assert_eq!(command, Command::StartStream { attempt: 1, rtsp_url: "rtsp://cam1".into() });

        let effects =
            console.apply(Completion::StreamStarted { attempt: 1, stream_id: StreamId::new("s1") });
        assert_eq!(
            effects,
            vec![
                Effect::AttachPlayback { stream_id: StreamId::new("s1") },
                Effect::Dispatch(Command::ListOverlays { stream_id: StreamId::new("s1") }),
            ]
        );
        assert_eq!(console.session().state(), PlaybackState::Playing);
    }

    #[test]
    fn stream_start_failure_is_reported() {
        let mut console = Console::new();
        let command = console.start_stream("rtsp://cam1").unwrap();
        let error = OverlayError::Remote { status: 500, message: "ffmpeg missing".into() };

        let effects = console.apply(Completion::Failed { command, error: error.clone() });
        assert_eq!(effects, vec![Effect::Report(error)]);
        assert_eq!(console.session().state(), PlaybackState::Failed);
        assert_eq!(console.session().stream_id(), None);
    }

    #[test]
    fn overlay_work_needs_a_playing_stream() {
        let console = Console::new();
        assert_eq!(console.create(&OverlayForm::with_text("a")), Err(ValidationError::NoActiveStream));
        assert_eq!(console.refresh(), Err(ValidationError::NoActiveStream));
    }

    #[test]
    fn restart_discards_overlays_and_draft() {
        let mut console = playing_console();
        created(&mut console, "o1");
        console.open_editor(&OverlayId::new("o1")).unwrap();

        console.start_stream("rtsp://cam2").unwrap();
        assert!(console.store().is_empty());
        assert!(!console.editor().is_open());
        assert_eq!(console.session().state(), PlaybackState::Connecting);
    }

    #[test]
    fn stale_listing_and_creates_are_dropped() {
        let mut console = playing_console();
        let stale = Overlay {
            id: OverlayId::new("old"),
            stream_id: StreamId::new("s0"),
            text: "old".into(),
            position: Position::new(0, 0),
            size: Size::new(1, 1),
            visible: true,
        };

        console.apply(Completion::OverlaysListed {
            stream_id: StreamId::new("s0"),
            overlays: vec![stale.clone()],
        });
        console.apply(Completion::OverlayCreated { overlay: stale });
        assert!(console.store().is_empty());
    }

    #[test]
    fn toggle_requires_known_overlay() {
        let console = playing_console();
        assert_eq!(
            console.toggle_visibility(&OverlayId::new("nope")),
            Err(ValidationError::UnknownOverlay(OverlayId::new("nope")))
        );
    }

    #[test]
    fn commit_closes_only_on_success() {
        let mut console = playing_console();
        created(&mut console, "o1");
        console.open_editor(&OverlayId::new("o1")).unwrap();
        console.set_draft_field(DraftField::Text, "CLEAR").unwrap();

        let command = console.commit_edit().unwrap();
        let effects = console.apply(Completion::Failed {
            command: command.clone(),
            error: OverlayError::Network("down".into()),
        });
        assert_eq!(effects.len(), 1);
        assert!(console.editor().is_open());
        assert_eq!(console.store().overlays()[0].text, "o1");

        let Some(done) = Completion::acknowledged(command) else {
            unreachable!("updates acknowledge without data");
        };
        console.apply(done);
        assert!(!console.editor().is_open());
        assert_eq!(console.store().overlays()[0].text, "CLEAR");
    }

    #[test]
    fn invalid_commit_keeps_draft() {
        let mut console = playing_console();
        created(&mut console, "o1");
        console.open_editor(&OverlayId::new("o1")).unwrap();
        console.set_draft_field(DraftField::Top, "-3").unwrap();

        assert!(matches!(console.commit_edit(), Err(ValidationError::Negative { .. })));
        assert!(console.editor().is_open());
    }

    #[test]
    fn affordances_route_to_delete_and_edit() {
        let mut console = playing_console();
        created(&mut console, "o1");
        let id = console.compose()[0].id.clone();

        assert_eq!(console.activate(&id, Affordance::Edit), Ok(None));
        assert!(console.editor().is_open());

        assert_eq!(
            console.activate(&id, Affordance::Delete),
            Ok(Some(Command::DeleteOverlay { id }))
        );
    }

    #[test]
    fn last_response_wins() {
        let mut console = playing_console();
        created(&mut console, "o1");
        let id = OverlayId::new("o1");

        let hide = console.update(&id, OverlayPatch::visibility(false)).unwrap();
        let show = console.update(&id, OverlayPatch::visibility(true)).unwrap();

        // Issued hide then show; responses arrive show then hide.
        for command in [show, hide] {
            if let Some(done) = Completion::acknowledged(command) {
                console.apply(done);
            }
        }
        assert!(!console.store().overlays()[0].visible);
        assert!(console.compose().is_empty());
    }
}
