//! Client-held overlay set for the active stream.
//!
//! The store is write-through: it only changes after the authority has
//! acknowledged a write, or when a full listing replaces it. It never holds an
//! uncommitted intent. Every mutation bumps [`OverlayStore::revision`] so the
//! compositor can tell when to recompute.

use marquee_proto::{Overlay, OverlayId, OverlayPatch, StreamId};

/// Ordered overlays of one stream, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayStore {
    stream_id: Option<StreamId>,
    overlays: Vec<Overlay>,
    revision: u64,
}

impl OverlayStore {
    /// Empty store bound to no stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream whose overlays are held, if any.
    pub fn stream_id(&self) -> Option<&StreamId> {
        self.stream_id.as_ref()
    }

    /// Overlays in authority order.
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Number of overlays held.
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    /// True when no overlay is held.
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Look up one overlay.
    pub fn get(&self, id: &OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|overlay| &overlay.id == id)
    }

    /// True if an overlay with `id` is held.
    pub fn contains(&self, id: &OverlayId) -> bool {
        self.get(id).is_some()
    }

    /// Drop every overlay and unbind the stream.
    pub fn clear(&mut self) {
        self.stream_id = None;
        self.overlays.clear();
        self.bump();
    }

    /// Replace the whole set with the authority's listing for `stream_id`.
    ///
    /// Duplicate ids in the listing keep their first occurrence.
    pub fn refresh(&mut self, stream_id: StreamId, overlays: Vec<Overlay>) {
        let mut unique: Vec<Overlay> = Vec::with_capacity(overlays.len());
        for overlay in overlays {
            if unique.iter().any(|held| held.id == overlay.id) {
                tracing::warn!(id = %overlay.id, "duplicate overlay id in listing");
                continue;
            }
            unique.push(overlay);
        }

        tracing::debug!(%stream_id, count = unique.len(), "overlay set replaced");
        self.stream_id = Some(stream_id);
        self.overlays = unique;
        self.bump();
    }

    /// Append an acknowledged overlay. An entry with the same id is replaced in
    /// place instead.
    pub fn insert(&mut self, overlay: Overlay) {
        match self.overlays.iter_mut().find(|held| held.id == overlay.id) {
            Some(held) => *held = overlay,
            None => self.overlays.push(overlay),
        }
        self.bump();
    }

    /// Remove the overlay with `id`, returning it if it was held.
    pub fn remove_by_id(&mut self, id: &OverlayId) -> Option<Overlay> {
        let index = self.overlays.iter().position(|overlay| &overlay.id == id)?;
        let removed = self.overlays.remove(index);
        self.bump();
        Some(removed)
    }

    /// Merge `patch` into the overlay with `id`. Returns false if no such
    /// overlay is held; other entries are never touched.
    pub fn update_by_id(&mut self, id: &OverlayId, patch: &OverlayPatch) -> bool {
        let Some(overlay) = self.overlays.iter_mut().find(|overlay| &overlay.id == id) else {
            return false;
        };
        patch.apply_to(overlay);
        self.bump();
        true
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use marquee_proto::{Position, Size};

    use super::*;

    fn overlay(id: &str, stream: &str) -> Overlay {
        Overlay {
            id: OverlayId::new(id),
            stream_id: StreamId::new(stream),
            text: format!("label {id}"),
            position: Position::new(0, 0),
            size: Size::new(10, 10),
            visible: true,
        }
    }

    #[test]
    fn refresh_replaces_everything() {
        let mut store = OverlayStore::new();
        store.refresh(StreamId::new("s1"), vec![overlay("a", "s1"), overlay("b", "s1")]);
        store.refresh(StreamId::new("s2"), vec![overlay("c", "s2")]);

        assert_eq!(store.stream_id(), Some(&StreamId::new("s2")));
        assert_eq!(store.len(), 1);
        assert!(store.overlays().iter().all(|o| o.stream_id == StreamId::new("s2")));
    }

    #[test]
    fn refresh_drops_duplicate_ids() {
        let mut store = OverlayStore::new();
        let mut second = overlay("a", "s1");
        second.text = "shadow".into();
        store.refresh(StreamId::new("s1"), vec![overlay("a", "s1"), second]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.overlays()[0].text, "label a");
    }

    #[test]
    fn insert_keeps_ids_unique() {
        let mut store = OverlayStore::new();
        store.insert(overlay("a", "s1"));
        store.insert(overlay("b", "s1"));

        let mut replacement = overlay("a", "s1");
        replacement.text = "new".into();
        store.insert(replacement);

        assert_eq!(store.len(), 2);
        assert_eq!(store.overlays()[0].text, "new");
    }

    #[test]
    fn remove_leaves_others_alone() {
        let mut store = OverlayStore::new();
        store.refresh(StreamId::new("s1"), vec![overlay("a", "s1"), overlay("b", "s1")]);

        let removed = store.remove_by_id(&OverlayId::new("a"));
        assert_eq!(removed.map(|o| o.id), Some(OverlayId::new("a")));
        assert_eq!(store.overlays(), &[overlay("b", "s1")]);

        assert!(store.remove_by_id(&OverlayId::new("missing")).is_none());
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut store = OverlayStore::new();
        store.insert(overlay("a", "s1"));
        let before = store.revision();

        assert!(!store.update_by_id(&OverlayId::new("zzz"), &OverlayPatch::visibility(false)));
        assert_eq!(store.revision(), before);
        assert!(store.overlays()[0].visible);
    }

    #[test]
    fn every_mutation_bumps_revision() {
        let mut store = OverlayStore::new();
        let r0 = store.revision();
        store.insert(overlay("a", "s1"));
        let r1 = store.revision();
        store.update_by_id(&OverlayId::new("a"), &OverlayPatch::visibility(false));
        let r2 = store.revision();
        store.remove_by_id(&OverlayId::new("a"));
        let r3 = store.revision();
        store.clear();
        let r4 = store.revision();

        assert!(r0 < r1 && r1 < r2 && r2 < r3 && r3 < r4);
        assert!(store.stream_id().is_none());
    }
}
