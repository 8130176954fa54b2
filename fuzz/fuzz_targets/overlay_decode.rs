//! Fuzz decoding of overlay listings and feed the result through the store
//! and compositor.
//!
//! Decoding must never panic, and whatever decodes must survive a listing
//! refresh and a composition pass with at most one entry per id.

#![no_main]

use libfuzzer_sys::fuzz_target;
use marquee_core::{Compositor, OverlayStore};
use marquee_proto::{Overlay, StreamId};

fuzz_target!(|data: &[u8]| {
    let Ok(overlays) = serde_json::from_slice::<Vec<Overlay>>(data) else {
        return;
    };

    let mut store = OverlayStore::new();
    store.refresh(StreamId::new("fuzz"), overlays.clone());

    let mut ids: Vec<_> = store.overlays().iter().map(|o| o.id.clone()).collect();
    ids.sort();
    let total = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), total, "store holds duplicate ids");

    let mut compositor = Compositor::new();
    let visible = store.overlays().iter().filter(|o| o.visible).count();
    assert_eq!(compositor.compose(&store).len(), visible);

    for overlay in &overlays {
        let _ = compositor.hit_test(overlay.position.left, overlay.position.top);
    }
});
