use std::{fmt, ops::ControlFlow, time::Duration};

use async_trait::async_trait;
use futures::Stream;
use tokio::{
    sync::{mpsc, oneshot},
    time::{self, MissedTickBehavior},
};
use tracing::debug;

use crate::services::{common::Property, sync::PlayerState, window::ViewEvent};

/// A player view driven by the view runtime.
///
/// The runtime owns the view's event loop: a periodic sync tick, events
/// from the broker, and commands from the UI, handled one at a time.
#[async_trait]
pub trait ViewTask: Send + 'static {
    /// UI commands this view accepts
    type Command: Send + 'static;

    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Period of the sync tick
    fn interval(&self) -> Duration;

    /// Published state, shared with the handle
    fn state(&self) -> Property<PlayerState>;

    /// Periodic sync check
    async fn on_tick(&mut self);

    /// Event from the broker
    async fn on_event(&mut self, event: ViewEvent) -> ControlFlow<()>;

    /// Command from the UI
    async fn on_command(&mut self, command: Self::Command) -> ControlFlow<()>;

    /// Teardown. Runs exactly once, on every exit path of the loop.
    async fn shutdown(&mut self);
}

struct Envelope<C> {
    command: C,
    done: Option<oneshot::Sender<()>>,
}

/// Handle to a running view.
pub struct ViewHandle<C> {
    commands: mpsc::UnboundedSender<Envelope<C>>,
    state: Property<PlayerState>,
    closed: Property<bool>,
}

impl<C> Clone for ViewHandle<C> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            state: self.state.clone(),
            closed: self.closed.clone(),
        }
    }
}

impl<C> fmt::Debug for ViewHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHandle")
            .field("state", &self.state)
            .field("closed", &self.closed.get())
            .finish()
    }
}

impl<C: Send + 'static> ViewHandle<C> {
    /// Queue a command without waiting. Returns `false` if the view is gone.
    pub fn send(&self, command: C) -> bool {
        self.commands
            .send(Envelope {
                command,
                done: None,
            })
            .is_ok()
    }

    /// Run a command and wait until the view has handled it.
    ///
    /// Returns `false` if the view is gone.
    pub async fn perform(&self, command: C) -> bool {
        let (done, rx) = oneshot::channel();
        let queued = self
            .commands
            .send(Envelope {
                command,
                done: Some(done),
            })
            .is_ok();
        queued && rx.await.is_ok()
    }

    /// Latest published state
    pub fn state(&self) -> PlayerState {
        self.state.get()
    }

    /// Stream of published state
    pub fn state_monitored(&self) -> impl Stream<Item = PlayerState> + Send {
        self.state.watch()
    }

    /// Wait until the published state satisfies `predicate`.
    pub async fn wait_until(&self, predicate: impl FnMut(&PlayerState) -> bool) -> Option<PlayerState> {
        self.state.wait_for(predicate).await
    }

    /// Whether the view has shut down
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Wait for the view to finish shutting down.
    pub async fn closed(&self) {
        self.closed.wait_for(|closed| *closed).await;
    }
}

/// Start `task` on its own tokio task, reading broker events from `inbox`.
pub fn spawn_view<T: ViewTask>(
    task: T,
    inbox: mpsc::UnboundedReceiver<ViewEvent>,
) -> ViewHandle<T::Command> {
    let (commands, commands_rx) = mpsc::unbounded_channel();
    let state = task.state();
    let closed = Property::new(false);

    tokio::spawn(run(task, inbox, commands_rx, closed.clone()));

    ViewHandle {
        commands,
        state,
        closed,
    }
}

async fn run<T: ViewTask>(
    mut task: T,
    mut inbox: mpsc::UnboundedReceiver<ViewEvent>,
    mut commands: mpsc::UnboundedReceiver<Envelope<T::Command>>,
    closed: Property<bool>,
) {
    let name = task.name();
    let mut ticker = time::interval(task.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    debug!(view = name, "View started");

    let mut pending_done = None;
    loop {
        let flow = tokio::select! {
            _ = ticker.tick() => {
                task.on_tick().await;
                ControlFlow::Continue(())
            }
            event = inbox.recv() => match event {
                Some(event) => task.on_event(event).await,
                None => {
                    debug!(view = name, "Broker link closed");
                    ControlFlow::Break(())
                }
            },
            envelope = commands.recv() => match envelope {
                Some(Envelope { command, done }) => {
                    let flow = task.on_command(command).await;
                    if flow.is_break() {
                        pending_done = done;
                    } else if let Some(done) = done {
                        let _ = done.send(());
                    }
                    flow
                }
                None => {
                    debug!(view = name, "All handles dropped");
                    ControlFlow::Break(())
                }
            },
        };

        if flow.is_break() {
            break;
        }
    }

    task.shutdown().await;
    closed.set(true);
    if let Some(done) = pending_done {
        let _ = done.send(());
    }
    debug!(view = name, "View stopped");
}
