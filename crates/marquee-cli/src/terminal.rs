//! Line-based terminal driver.
//!
//! Reads commands line by line and writes the console after every change.
//! Lines that only concern the terminal (help, typos, blank lines) are
//! answered here and never reach the runtime. Frames identical to the last
//! one printed are skipped unless the operator asked for `list`.

use std::io::Write;

use marquee_app::{Driver, Input, MediaSurface, PlaybackMode, playback};
use marquee_core::{Console, OverlayError};
use marquee_proto::{HLS_MIME_TYPE, OverlayId};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use url::Url;

use crate::{
    commands::{self, Command, HELP},
    view,
};

/// Terminal I/O failures.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Reading input or writing output failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Video surface backed by an external player.
///
/// The terminal cannot show video; it announces the manifest so a player
/// such as `ffplay` or `mpv` can be pointed at it. Those play HLS natively.
#[derive(Debug, Default)]
pub struct ExternalPlayer {
    source: Option<Url>,
}

impl ExternalPlayer {
    /// Manifest the player was last pointed at.
    pub fn source(&self) -> Option<&Url> {
        self.source.as_ref()
    }
}

impl MediaSurface for ExternalPlayer {
    fn can_play_type(&self, mime: &str) -> bool {
        mime == HLS_MIME_TYPE
    }

    fn set_source(&mut self, url: &Url) {
        self.source = Some(url.clone());
    }
}

/// Driver reading commands from `R` and printing to `W`.
pub struct TerminalDriver<R, W> {
    lines: Lines<R>,
    out: W,
    player: ExternalPlayer,
    last_frame: Option<String>,
    force_frame: bool,
}

impl<R, W> TerminalDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Driver over a line source and an output sink.
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
            player: ExternalPlayer::default(),
            last_frame: None,
            force_frame: false,
        }
    }

    /// Output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Playback surface.
    pub fn player(&self) -> &ExternalPlayer {
        &self.player
    }

    fn print(&mut self, line: &str) -> Result<(), TerminalError> {
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<R, W> Driver for TerminalDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    type Error = TerminalError;

    async fn poll_input(&mut self) -> Result<Option<Input>, TerminalError> {
        loop {
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };

            let command = commands::parse(&line);
            match command {
                Command::Help => self.print(HELP)?,
                Command::Empty => {},
                Command::Unknown { input } => {
                    self.print(&format!("unknown command {input:?}, try help"))?;
                },
                Command::InvalidArgs { command, error } => {
                    self.print(&format!("{command}: {error}"))?;
                },
                Command::List => {
                    self.force_frame = true;
                    return Ok(Some(Input::Redraw));
                },
                other => return Ok(other.into_input()),
            }
        }
    }

    fn render(&mut self, console: &Console) -> Result<(), TerminalError> {
        let frame = view::console(console);
        if !self.force_frame && self.last_frame.as_deref() == Some(frame.as_str()) {
            return Ok(());
        }
        self.force_frame = false;
        self.print(&frame)?;
        self.last_frame = Some(frame);
        Ok(())
    }

    fn notify(&mut self, error: &OverlayError) -> Result<(), TerminalError> {
        self.print(&view::error(error))
    }

    fn show_hits(&mut self, x: u32, y: u32, hits: &[OverlayId]) -> Result<(), TerminalError> {
        self.print(&view::hits(x, y, hits))
    }

    fn attach_playback(
        &mut self,
        manifest: &Url,
    ) -> Result<Result<PlaybackMode, OverlayError>, TerminalError> {
        let mode = match playback::attach(None, &mut self.player, manifest) {
            Ok(mode) => mode,
            Err(error) => return Ok(Err(error)),
        };
        self.print(&view::playback(manifest, mode))?;
        Ok(Ok(mode))
    }

    fn stop(&mut self) {
        if let Err(error) = self.out.flush() {
            tracing::warn!(%error, "flushing output on exit failed");
        }
    }
}
