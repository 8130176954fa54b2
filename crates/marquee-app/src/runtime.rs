//! Generic runtime loop.
//!
//! One task owns the [`Console`] and every request in flight. Operator input
//! is planned into commands which start executing immediately; completions are
//! reduced in the order they arrive, so overlapping requests on one overlay
//! resolve last-response-wins. Results that have already arrived are reduced
//! before the next input is read. Nothing is cancelled: a new stream leaves the
//! previous stream's requests running and the console drops what no longer
//! applies.

use std::sync::Arc;

use futures::{
    FutureExt, StreamExt,
    future::BoxFuture,
    stream::FuturesUnordered,
};
use marquee_client::{Authority, ClientConfig, execute};
use marquee_core::{Command, Completion, Console, Effect, OverlayError, ValidationError};
use marquee_proto::StreamId;

use crate::{Driver, Input, RuntimeError};

type InFlight = BoxFuture<'static, Completion>;

/// Drives a [`Console`] with input from a [`Driver`] and an [`Authority`].
pub struct Runtime<D, A> {
    driver: D,
    authority: Arc<A>,
    config: ClientConfig,
    console: Console,
    in_flight: FuturesUnordered<InFlight>,
}

impl<D, A> Runtime<D, A>
where
    D: Driver,
    A: Authority + 'static,
{
    /// Runtime with an idle console.
    pub fn new(driver: D, authority: A, config: ClientConfig) -> Self {
        Self {
            driver,
            authority: Arc::new(authority),
            config,
            console: Console::new(),
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Console state.
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Frontend in use.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Authority in use.
    pub fn authority(&self) -> &A {
        &self.authority
    }

    /// Requests dispatched but not yet reduced.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Run until the operator quits or input ends.
    ///
    /// When input ends on its own, outstanding requests are awaited and
    /// reduced first. On [`Input::Quit`] they are abandoned.
    pub async fn run(&mut self) -> Result<(), RuntimeError<D::Error>> {
        let result = self.drive().await;
        if !self.in_flight.is_empty() {
            tracing::debug!(pending = self.in_flight.len(), "abandoning in-flight requests");
        }
        self.driver.stop();
        result
    }

    async fn drive(&mut self) -> Result<(), RuntimeError<D::Error>> {
        self.render()?;
        let mut input_open = true;

        loop {
            if !input_open && self.in_flight.is_empty() {
                return Ok(());
            }

            // Completions that are already in go first, so input typed ahead is
            // planned against the newest state.
            tokio::select! {
                biased;

                Some(completion) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.complete(completion)?;
                },
                input = self.driver.poll_input(), if input_open => {
                    match input.map_err(RuntimeError::Driver)? {
                        Some(Input::Quit) => return Ok(()),
                        Some(input) => self.handle(input)?,
                        None => {
                            tracing::debug!(pending = self.in_flight.len(), "input closed");
                            input_open = false;
                        },
                    }
                },
            }
        }
    }

    fn handle(&mut self, input: Input) -> Result<(), RuntimeError<D::Error>> {
        let planned: Result<Option<Command>, ValidationError> = match input {
            Input::StartStream { rtsp_url } => self.console.start_stream(&rtsp_url).map(Some),
            Input::Refresh => self.console.refresh().map(Some),
            Input::Create(form) => self.console.create(&form).map(Some),
            Input::Update { id, patch } => self.console.update(&id, patch).map(Some),
            Input::ToggleVisibility(id) => self.console.toggle_visibility(&id).map(Some),
            Input::Delete(id) => Ok(Some(self.console.delete(&id))),
            Input::Activate { id, affordance } => self.console.activate(&id, affordance),
            Input::OpenEditor(id) => self.console.open_editor(&id).map(|()| None),
            Input::SetField { field, value } => {
                self.console.set_draft_field(field, value).map(|()| None)
            },
            Input::CommitEdit => self.console.commit_edit().map(Some),
            Input::CancelEdit => {
                if !self.console.cancel_edit() {
                    tracing::debug!("no draft to cancel");
                }
                Ok(None)
            },
            Input::Inspect { x, y } => {
                let hits = self.console.hit_test(x, y);
                return self.driver.show_hits(x, y, &hits).map_err(RuntimeError::Driver);
            },
            Input::PlaybackFailed(message) => {
                tracing::error!(%message, "playback failed");
                return Ok(());
            },
            Input::Redraw | Input::Quit => Ok(None),
        };

        match planned {
            Ok(Some(command)) => self.dispatch(command),
            Ok(None) => {},
            Err(error) => {
                tracing::debug!(%error, "input rejected");
                self.driver.notify(&OverlayError::Validation(error)).map_err(RuntimeError::Driver)?;
            },
        }
        self.render()
    }

    fn dispatch(&mut self, command: Command) {
        tracing::debug!(command = command.name(), pending = self.in_flight.len() + 1, "dispatching");
        let authority = Arc::clone(&self.authority);
        self.in_flight.push(async move { execute(authority.as_ref(), command).await }.boxed());
    }

    fn complete(&mut self, completion: Completion) -> Result<(), RuntimeError<D::Error>> {
        for effect in self.console.apply(completion) {
            match effect {
                Effect::Dispatch(command) => self.dispatch(command),
                Effect::AttachPlayback { stream_id } => self.attach_playback(&stream_id)?,
                Effect::Report(error) => {
                    self.driver.notify(&error).map_err(RuntimeError::Driver)?;
                },
            }
        }
        self.render()
    }

    fn attach_playback(&mut self, stream_id: &StreamId) -> Result<(), RuntimeError<D::Error>> {
        let manifest = match self.config.manifest_url(stream_id) {
            Ok(url) => url,
            Err(error) => {
                tracing::error!(%stream_id, %error, "cannot address manifest");
                return Ok(());
            },
        };

        match self.driver.attach_playback(&manifest).map_err(RuntimeError::Driver)? {
            Ok(mode) => tracing::info!(%stream_id, ?mode, "playback attached"),
            Err(error) => tracing::error!(%stream_id, %error, "playback attach failed"),
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), RuntimeError<D::Error>> {
        self.console.compose();
        self.driver.render(&self.console).map_err(RuntimeError::Driver)
    }
}
