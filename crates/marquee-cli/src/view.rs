//! Text rendering of the console.
//!
//! Pure functions from console state to the lines the terminal prints.

use marquee_app::PlaybackMode;
use marquee_core::{Console, Draft, OverlayError, PlaybackState, StreamSession};
use marquee_proto::{Overlay, OverlayId};
use url::Url;

/// Stream line, compositor output, overlay list and open draft.
pub fn console(console: &Console) -> String {
    let mut lines = vec![stream(console.session())];

    let scene = console.scene();
    if scene.is_empty() {
        lines.push("scene    (nothing drawn)".to_string());
    } else {
        let ids: Vec<&str> = scene.iter().map(|r| r.id.as_str()).collect();
        lines.push(format!("scene    {}", ids.join(" ")));
    }

    let overlays = console.store().overlays();
    lines.push(format!("overlays ({})", overlays.len()));
    lines.extend(overlays.iter().map(overlay));

    if let Some(draft) = console.editor().draft() {
        lines.push(self::draft(draft));
    }

    lines.join("\n")
}

fn stream(session: &StreamSession) -> String {
    let state = match session.state() {
        PlaybackState::Idle => "idle",
        PlaybackState::Connecting => "connecting",
        PlaybackState::Playing => "playing",
        PlaybackState::Failed => "failed",
    };
    let id = session.stream_id().map_or("-", |id| id.as_str());
    match session.source_url() {
        Some(url) => format!("stream   {id} [{state}] {url}"),
        None => format!("stream   {id} [{state}]"),
    }
}

fn overlay(overlay: &Overlay) -> String {
    format!(
        "  {:<5}{:<7}top={} left={} {}x{} {:?}",
        overlay.id.as_str(),
        if overlay.visible { "shown" } else { "hidden" },
        overlay.position.top,
        overlay.position.left,
        overlay.size.width,
        overlay.size.height,
        overlay.text,
    )
}

fn draft(draft: &Draft) -> String {
    let form = draft.form();
    format!(
        "editing  {} text={:?} top={} left={} width={} height={}",
        draft.id(),
        form.text,
        form.top,
        form.left,
        form.width,
        form.height,
    )
}

/// Failure line.
pub fn error(error: &OverlayError) -> String {
    format!("error: {error}")
}

/// Hit-test answer, topmost first.
pub fn hits(x: u32, y: u32, hits: &[OverlayId]) -> String {
    if hits.is_empty() {
        return format!("at {x},{y}: nothing");
    }
    let ids: Vec<&str> = hits.iter().map(OverlayId::as_str).collect();
    format!("at {x},{y}: {}", ids.join(" "))
}

/// Playback attachment line.
pub fn playback(manifest: &Url, mode: PlaybackMode) -> String {
    let mode = match mode {
        PlaybackMode::Adaptive => "adaptive",
        PlaybackMode::Native => "native",
        PlaybackMode::Unsupported => "unsupported",
    };
    format!("video    {manifest} ({mode})")
}
