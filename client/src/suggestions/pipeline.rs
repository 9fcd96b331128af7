//! The task that turns keystrokes into displayed key hints.

use std::{rc::Rc, time::Duration};

use common::{search_const::MAX_KEY_HINTS_COUNT, text_highlight::Snippet};
use futures_util::{
    FutureExt, StreamExt,
    future::LocalBoxFuture,
    stream::FuturesUnordered,
};
use tokio::{
    sync::{mpsc, watch},
    time::{Instant, sleep_until},
};

use super::{Debouncer, HintRequest, KeyChange, SuggestionRaceController};
use crate::{
    api::{ApiError, SearchBackend},
    error::ClientError,
    notification::{NotificationSource, Notifier},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionCommand {
    /// The search box now holds this text.
    KeyChanged(String),
    /// A full search was submitted.
    Commit,
    /// The committed query is being edited again.
    Release,
}

type InFlight = LocalBoxFuture<'static, (HintRequest, Result<Vec<Snippet>, ApiError>)>;

/// Single task owning the [`SuggestionRaceController`].
///
/// It waits on three things at once: new commands, the debounce deadline and
/// the hint requests still in flight. Each event is handled to completion
/// before the next one, so the controller needs no locking.
pub struct SuggestionPipeline<B> {
    backend: Rc<B>,
    controller: SuggestionRaceController,
    debouncer: Debouncer<String>,
    commands: mpsc::UnboundedReceiver<SuggestionCommand>,
    hints: watch::Sender<Vec<Snippet>>,
    notifier: Notifier,
}

/// The side of the pipeline held by the UI.
#[derive(Debug, Clone)]
pub struct SuggestionHandle {
    commands: mpsc::UnboundedSender<SuggestionCommand>,
    hints: watch::Receiver<Vec<Snippet>>,
}

impl SuggestionHandle {
    fn send(&self, command: SuggestionCommand) {
        if self.commands.send(command).is_err() {
            tracing::debug!("suggestion pipeline is gone, command dropped");
        }
    }

    pub fn key_changed(&self, key: impl Into<String>) {
        self.send(SuggestionCommand::KeyChanged(key.into()));
    }

    pub fn commit(&self) {
        self.send(SuggestionCommand::Commit);
    }

    pub fn release(&self) {
        self.send(SuggestionCommand::Release);
    }

    /// Receiver notified every time the displayed hints change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Snippet>> {
        self.hints.clone()
    }

    pub fn current_hints(&self) -> Vec<Snippet> {
        self.hints.borrow().clone()
    }
}

impl<B: SearchBackend + 'static> SuggestionPipeline<B> {
    pub fn new(backend: Rc<B>, debounce: Duration, notifier: Notifier) -> (Self, SuggestionHandle) {
        let (command_sender, commands) = mpsc::unbounded_channel();
        let (hints, hints_receiver) = watch::channel(Vec::new());
        let pipeline = Self {
            backend,
            controller: SuggestionRaceController::new(Instant::now()),
            debouncer: Debouncer::new(debounce),
            commands,
            hints,
            notifier,
        };
        (pipeline, SuggestionHandle { commands: command_sender, hints: hints_receiver })
    }

    /// Runs until every [`SuggestionHandle`] is dropped. Requests still in
    /// flight at that point are abandoned.
    pub async fn run(self) {
        let Self { backend, mut controller, mut debouncer, mut commands, hints, notifier } = self;
        let mut in_flight: FuturesUnordered<InFlight> = FuturesUnordered::new();

        loop {
            let deadline = debouncer.deadline();
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    match command {
                        SuggestionCommand::KeyChanged(key) => match controller.on_key_change(&key) {
                            KeyChange::Schedule => debouncer.push(key, Instant::now()),
                            KeyChange::Invalid => {
                                debouncer.cancel();
                            }
                            KeyChange::Ignored => tracing::debug!("query committed, key change ignored"),
                        },
                        SuggestionCommand::Commit => {
                            controller.commit();
                            debouncer.cancel();
                            hints.send_replace(Vec::new());
                        }
                        SuggestionCommand::Release => controller.release(),
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    let now = Instant::now();
                    if let Some(key) = debouncer.take_due(now) {
                        let request = controller.dispatch(key, now);
                        let backend = backend.clone();
                        in_flight.push(
                            async move {
                                let result = backend.key_hints(&request.key).await;
                                (request, result)
                            }
                            .boxed_local(),
                        );
                    }
                }
                Some((request, result)) = in_flight.next(), if !in_flight.is_empty() => match result {
                    Ok(mut key_hints) => {
                        key_hints.truncate(MAX_KEY_HINTS_COUNT);
                        if controller.apply_response(request.timestamp, key_hints) {
                            tracing::debug!(key = %request.key, count = controller.current_hints().len(), "key hints applied");
                            hints.send_replace(controller.current_hints().to_vec());
                        }
                    }
                    Err(err) => notifier.report(NotificationSource::KeyHints, &ClientError::from(err)),
                },
            }
        }
        tracing::debug!(abandoned = in_flight.len(), "suggestion pipeline stopped");
    }
}
