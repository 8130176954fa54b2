//! Derivation of what is drawn over the video surface.
//!
//! [`render`] is a pure function of the overlay set: every visible overlay
//! becomes a rectangle at its stored pixel coordinates, hidden ones are
//! skipped. Overlays carry no stacking attribute, so draw order is simply store
//! order. [`Compositor`] memoizes the last render against the store revision.

use marquee_proto::{Overlay, OverlayId};

use crate::store::OverlayStore;

/// Screen rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Horizontal extent.
    pub width: u32,
    /// Vertical extent.
    pub height: u32,
}

impl Rect {
    /// True if the point lies inside (left/top edges inclusive).
    pub fn contains(&self, x: u32, y: u32) -> bool {
        let (x, y) = (u64::from(x), u64::from(y));
        let (left, top) = (u64::from(self.x), u64::from(self.y));
        x >= left
            && y >= top
            && x < left + u64::from(self.width)
            && y < top + u64::from(self.height)
    }
}

/// Control attached to every rendered overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Remove the overlay.
    Delete,
    /// Open the overlay in the editor.
    Edit,
}

/// One element drawn over the video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOverlay {
    /// Source overlay.
    pub id: OverlayId,
    /// Label text.
    pub text: String,
    /// Where to draw.
    pub rect: Rect,
}

impl RenderedOverlay {
    /// Controls exposed by this element.
    pub const fn affordances(&self) -> [Affordance; 2] {
        [Affordance::Delete, Affordance::Edit]
    }
}

impl From<&Overlay> for RenderedOverlay {
    fn from(overlay: &Overlay) -> Self {
        Self {
            id: overlay.id.clone(),
            text: overlay.text.clone(),
            rect: Rect {
                x: overlay.position.left,
                y: overlay.position.top,
                width: overlay.size.width,
                height: overlay.size.height,
            },
        }
    }
}

/// Visible overlays, in store order.
pub fn render(overlays: &[Overlay]) -> Vec<RenderedOverlay> {
    overlays.iter().filter(|overlay| overlay.visible).map(RenderedOverlay::from).collect()
}

/// Render cache keyed by store revision.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    revision: Option<u64>,
    scene: Vec<RenderedOverlay>,
}

impl Compositor {
    /// Compositor that has not rendered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scene for `store`, recomputed only if the store changed since
    /// the last call.
    pub fn compose(&mut self, store: &OverlayStore) -> &[RenderedOverlay] {
        if self.revision != Some(store.revision()) {
            self.scene = render(store.overlays());
            self.revision = Some(store.revision());
        }
        &self.scene
    }

    /// Last composed scene.
    pub fn scene(&self) -> &[RenderedOverlay] {
        &self.scene
    }

    /// Elements of the last scene under a point, topmost first.
    pub fn hit_test(&self, x: u32, y: u32) -> Vec<&OverlayId> {
        self.scene.iter().rev().filter(|item| item.rect.contains(x, y)).map(|item| &item.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use marquee_proto::{OverlayPatch, Position, Size, StreamId};
    use proptest::prelude::*;

    use super::*;

    fn overlay(id: &str, top: u32, left: u32, visible: bool) -> Overlay {
        Overlay {
            id: OverlayId::new(id),
            stream_id: StreamId::new("s1"),
            text: id.to_uppercase(),
            position: Position::new(top, left),
            size: Size::new(100, 50),
            visible,
        }
    }

    #[test]
    fn maps_position_and_size_directly() {
        let scene = render(&[overlay("a", 10, 20, true)]);
        assert_eq!(scene[0].rect, Rect { x: 20, y: 10, width: 100, height: 50 });
        assert_eq!(scene[0].text, "A");
        assert_eq!(scene[0].affordances(), [Affordance::Delete, Affordance::Edit]);
    }

    #[test]
    fn skips_hidden_overlays() {
        let scene = render(&[overlay("a", 0, 0, false), overlay("b", 0, 0, true)]);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene[0].id, OverlayId::new("b"));
    }

    #[test]
    fn compose_tracks_store_changes() {
        let mut store = OverlayStore::new();
        store.refresh(StreamId::new("s1"), vec![overlay("a", 0, 0, true)]);

        let mut compositor = Compositor::new();
        assert_eq!(compositor.compose(&store).len(), 1);

        store.update_by_id(&OverlayId::new("a"), &OverlayPatch::visibility(false));
        assert!(compositor.compose(&store).is_empty());
    }

    #[test]
    fn hit_test_returns_topmost_first() {
        let mut store = OverlayStore::new();
        store.refresh(
            StreamId::new("s1"),
            vec![overlay("under", 0, 0, true), overlay("over", 10, 10, true), overlay("off", 0, 0, false)],
        );
        let mut compositor = Compositor::new();
        compositor.compose(&store);

        let hits = compositor.hit_test(20, 20);
        assert_eq!(hits, vec![&OverlayId::new("over"), &OverlayId::new("under")]);
        assert!(compositor.hit_test(500, 500).is_empty());
    }

    #[test]
    fn rect_edges() {
        let rect = Rect { x: 10, y: 10, width: 5, height: 5 };
        assert!(rect.contains(10, 10));
        assert!(rect.contains(14, 14));
        assert!(!rect.contains(15, 10));
        assert!(!rect.contains(9, 12));

        let huge = Rect { x: u32::MAX, y: u32::MAX, width: u32::MAX, height: u32::MAX };
        assert!(huge.contains(u32::MAX, u32::MAX));
    }

    proptest! {
        #[test]
        fn never_renders_hidden(flags in prop::collection::vec(any::<bool>(), 0..20)) {
            let overlays: Vec<Overlay> = flags
                .iter()
                .enumerate()
                .map(|(i, visible)| overlay(&format!("o{i}"), 0, 0, *visible))
                .collect();

            let scene = render(&overlays);
            prop_assert_eq!(scene.len(), flags.iter().filter(|v| **v).count());
            for item in &scene {
                let source = overlays.iter().find(|o| o.id == item.id);
                prop_assert!(source.is_some_and(|o| o.visible));
            }
        }
    }
}
