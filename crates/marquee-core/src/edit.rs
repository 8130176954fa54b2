//! Single-slot edit buffer.
//!
//! Opening an overlay copies its mutable fields into a draft. The draft is
//! edited as raw text, detached from the committed overlay, and only turns
//! into a remote update on commit. The session closes once that update is
//! acknowledged; a rejected commit keeps the draft for another try.

use marquee_proto::{Overlay, OverlayId, OverlayPatch};

use crate::{error::ValidationError, validation::OverlayForm};

/// Editable field of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    /// Label text.
    Text,
    /// Top offset.
    Top,
    /// Left offset.
    Left,
    /// Rectangle width.
    Width,
    /// Rectangle height.
    Height,
}

impl DraftField {
    /// Look a field up by its operator-facing name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "top" => Some(Self::Top),
            "left" => Some(Self::Left),
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            _ => None,
        }
    }
}

/// In-progress edit of one overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    id: OverlayId,
    generation: u64,
    form: OverlayForm,
}

impl Draft {
    /// Overlay being edited.
    pub fn id(&self) -> &OverlayId {
        &self.id
    }

    /// Identifies this particular opening of the editor.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current field values, as typed.
    pub fn form(&self) -> &OverlayForm {
        &self.form
    }
}

/// Validated draft content, ready to become an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCommit {
    /// Overlay to update.
    pub id: OverlayId,
    /// Text, position and size from the draft.
    pub patch: OverlayPatch,
    /// Draft generation the commit was taken from.
    pub generation: u64,
}

/// At most one open draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    draft: Option<Draft>,
    opened: u64,
}

impl EditSession {
    /// Session with no open draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open draft, if any.
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// True while a draft is open.
    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Start editing `overlay`, discarding any other open draft.
    pub fn open(&mut self, overlay: &Overlay) -> u64 {
        self.opened += 1;
        if let Some(previous) = &self.draft {
            tracing::debug!(previous = %previous.id, next = %overlay.id, "replacing open draft");
        }

        self.draft = Some(Draft {
            id: overlay.id.clone(),
            generation: self.opened,
            form: OverlayForm {
                text: overlay.text.clone(),
                top: overlay.position.top.to_string(),
                left: overlay.position.left.to_string(),
                width: overlay.size.width.to_string(),
                height: overlay.size.height.to_string(),
            },
        });
        self.opened
    }

    /// Change one draft field. The committed overlay is not affected.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) -> Result<(), ValidationError> {
        let draft = self.draft.as_mut().ok_or(ValidationError::NoDraft)?;
        let slot = match field {
            DraftField::Text => &mut draft.form.text,
            DraftField::Top => &mut draft.form.top,
            DraftField::Left => &mut draft.form.left,
            DraftField::Width => &mut draft.form.width,
            DraftField::Height => &mut draft.form.height,
        };
        *slot = value.into();
        Ok(())
    }

    /// Discard the draft without touching the authority.
    pub fn cancel(&mut self) -> Option<Draft> {
        self.draft.take()
    }

    /// Validate the draft the same way an update is validated. The draft stays
    /// open either way.
    pub fn prepare_commit(&self) -> Result<PreparedCommit, ValidationError> {
        let draft = self.draft.as_ref().ok_or(ValidationError::NoDraft)?;
        let fields = draft.form.parse()?;
        Ok(PreparedCommit {
            id: draft.id.clone(),
            patch: OverlayPatch {
                text: Some(fields.text),
                position: Some(fields.position),
                size: Some(fields.size),
                visible: None,
            },
            generation: draft.generation,
        })
    }

    /// Close the draft if it is still the one opened as `generation`.
    pub fn close_if(&mut self, generation: u64) -> bool {
        match &self.draft {
            Some(draft) if draft.generation == generation => {
                self.draft = None;
                true
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use marquee_proto::{Position, Size, StreamId};

    use super::*;
    use crate::error::Field;

    fn alert() -> Overlay {
        Overlay {
            id: OverlayId::new("o1"),
            stream_id: StreamId::new("s1"),
            text: "ALERT".into(),
            position: Position::new(10, 10),
            size: Size::new(100, 50),
            visible: false,
        }
    }

    #[test]
    fn open_copies_mutable_fields() {
        let mut session = EditSession::new();
        session.open(&alert());

        let draft = session.draft().unwrap();
        assert_eq!(draft.id(), &OverlayId::new("o1"));
        assert_eq!(draft.form().text, "ALERT");
        assert_eq!(draft.form().top, "10");
        assert_eq!(draft.form().width, "100");
    }

    #[test]
    fn commit_carries_text_position_size_only() {
        let mut session = EditSession::new();
        let generation = session.open(&alert());
        session.set(DraftField::Text, "CLEAR").unwrap();
        session.set(DraftField::Left, "25").unwrap();

        let commit = session.prepare_commit().unwrap();
        assert_eq!(commit.generation, generation);
        assert_eq!(commit.patch.text.as_deref(), Some("CLEAR"));
        assert_eq!(commit.patch.position, Some(Position::new(10, 25)));
        assert_eq!(commit.patch.size, Some(Size::new(100, 50)));
        assert_eq!(commit.patch.visible, None);
        assert!(session.is_open());
    }

    #[test]
    fn invalid_draft_stays_open() {
        let mut session = EditSession::new();
        session.open(&alert());
        session.set(DraftField::Height, "tall").unwrap();

        let err = session.prepare_commit().unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { field: Field::Height, .. }));
        assert!(session.is_open());
    }

    #[test]
    fn reopening_replaces_draft() {
        let mut session = EditSession::new();
        let first = session.open(&alert());

        let mut other = alert();
        other.id = OverlayId::new("o2");
        let second = session.open(&other);

        assert_ne!(first, second);
        assert_eq!(session.draft().unwrap().id(), &OverlayId::new("o2"));
        assert!(!session.close_if(first));
        assert!(session.close_if(second));
        assert!(!session.is_open());
    }

    #[test]
    fn setters_require_open_draft() {
        let mut session = EditSession::new();
        assert_eq!(session.set(DraftField::Text, "x"), Err(ValidationError::NoDraft));
        assert_eq!(session.prepare_commit(), Err(ValidationError::NoDraft));
        assert!(session.cancel().is_none());
    }

    #[test]
    fn field_names() {
        assert_eq!(DraftField::from_name("width"), Some(DraftField::Width));
        assert_eq!(DraftField::from_name("depth"), None);
    }
}
