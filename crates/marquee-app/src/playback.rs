//! Playback attachment.
//!
//! A stream's manifest is attached to the video surface through an adaptive
//! streaming client when one is available and supported. Otherwise the surface
//! is asked whether it plays the manifest type natively. When neither works
//! playback is reported unsupported and overlay work carries on regardless.
//!
//! Playback failures never reach the console: they are logged and dropped.

use marquee_core::OverlayError;
use marquee_proto::HLS_MIME_TYPE;
use url::Url;

/// Video element the stream is rendered into.
pub trait MediaSurface {
    /// Whether the surface can play `mime` without help.
    fn can_play_type(&self, mime: &str) -> bool;

    /// Point the surface at a source.
    fn set_source(&mut self, url: &Url);
}

/// Adaptive streaming client that feeds a [`MediaSurface`].
pub trait StreamingClient {
    /// Whether the client works on this platform.
    fn is_supported(&self) -> bool;

    /// Start loading a manifest.
    fn load_source(&mut self, url: &Url) -> Result<(), OverlayError>;

    /// Bind the client's output to a surface.
    fn attach_media(&mut self, surface: &mut dyn MediaSurface) -> Result<(), OverlayError>;
}

/// How a manifest ended up attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Through the adaptive streaming client.
    Adaptive,
    /// Natively by the surface.
    Native,
    /// Not playable here.
    Unsupported,
}

/// Attach `manifest` to `surface`, preferring `client` when it is supported.
///
/// # Errors
///
/// Returns [`OverlayError::Playback`] when the streaming client rejects the
/// source or the surface.
pub fn attach<S: MediaSurface>(
    client: Option<&mut dyn StreamingClient>,
    surface: &mut S,
    manifest: &Url,
) -> Result<PlaybackMode, OverlayError> {
    if let Some(client) = client
        && client.is_supported()
    {
        client.load_source(manifest)?;
        client.attach_media(surface)?;
        tracing::debug!(%manifest, "attached adaptive playback");
        return Ok(PlaybackMode::Adaptive);
    }

    if surface.can_play_type(HLS_MIME_TYPE) {
        surface.set_source(manifest);
        tracing::debug!(%manifest, "attached native playback");
        return Ok(PlaybackMode::Native);
    }

    tracing::warn!(%manifest, "playback unsupported on this surface");
    Ok(PlaybackMode::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Surface {
        native: bool,
        source: Option<Url>,
    }

    impl MediaSurface for Surface {
        fn can_play_type(&self, mime: &str) -> bool {
            self.native && mime == HLS_MIME_TYPE
        }

        fn set_source(&mut self, url: &Url) {
            self.source = Some(url.clone());
        }
    }

    struct Client {
        supported: bool,
        fail_load: bool,
        loaded: Option<Url>,
        attached: bool,
    }

    impl Client {
        fn new(supported: bool) -> Self {
            Self { supported, fail_load: false, loaded: None, attached: false }
        }
    }

    impl StreamingClient for Client {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn load_source(&mut self, url: &Url) -> Result<(), OverlayError> {
            if self.fail_load {
                return Err(OverlayError::Playback("manifest unreachable".into()));
            }
            self.loaded = Some(url.clone());
            Ok(())
        }

        fn attach_media(&mut self, _surface: &mut dyn MediaSurface) -> Result<(), OverlayError> {
            self.attached = true;
            Ok(())
        }
    }

    fn manifest() -> Url {
        Url::parse("http://localhost:5000/hls/s1.m3u8").unwrap()
    }

    #[test]
    fn supported_client_wins() {
        let mut client = Client::new(true);
        let mut surface = Surface { native: true, source: None };

        let mode = attach(Some(&mut client), &mut surface, &manifest()).unwrap();

        assert_eq!(mode, PlaybackMode::Adaptive);
        assert_eq!(client.loaded, Some(manifest()));
        assert!(client.attached);
        assert!(surface.source.is_none());
    }

    #[test]
    fn unsupported_client_falls_back_to_native() {
        let mut client = Client::new(false);
        let mut surface = Surface { native: true, source: None };

        let mode = attach(Some(&mut client), &mut surface, &manifest()).unwrap();

        assert_eq!(mode, PlaybackMode::Native);
        assert_eq!(surface.source, Some(manifest()));
        assert!(client.loaded.is_none());
    }

    #[test]
    fn nothing_plays_reports_unsupported() {
        let mut surface = Surface::default();
        let mode = attach(None, &mut surface, &manifest()).unwrap();
        assert_eq!(mode, PlaybackMode::Unsupported);
    }

    #[test]
    fn client_failure_is_a_playback_error() {
        let mut client = Client::new(true);
        client.fail_load = true;
        let mut surface = Surface::default();

        let err = attach(Some(&mut client), &mut surface, &manifest()).unwrap_err();
        assert_eq!(err.kind(), "playback");
    }
}
