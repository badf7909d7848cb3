//! A complete player session on the headless host.
//!
//! Plays the part of the desktop shell: starts the window broker and the
//! main view, and whenever the host launches a miniplayer window it reads
//! the startup parameters from the window's URL and starts a miniplayer
//! view inside it. Window close events from the host are forwarded to the
//! broker.

use std::sync::Arc;

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::Config,
    services::{
        geometry::{Size, WorkArea},
        player::{
            MainCommand, MainView, MiniplayerCommand, MiniplayerView, ViewHandle, spawn_view,
        },
        sync::{SimulatedMedia, SyncSettings, ViewId},
        window::{BrokerHandle, HeadlessHost, HostEvent, MiniplayerOptions, StartupParams, WindowId},
    },
};

/// Display size used when no real display is attached.
pub const HEADLESS_WORK_AREA: WorkArea = Size::new(1920, 1080);

/// A miniplayer view and the window it lives in.
#[derive(Debug, Clone)]
pub struct AttachedMiniplayer {
    /// Hosting window
    pub window: WindowId,
    /// The running view
    pub view: ViewHandle<MiniplayerCommand>,
}

type Attached = watch::Sender<Option<AttachedMiniplayer>>;

/// Broker, host and views wired together.
pub struct Session {
    broker: BrokerHandle,
    host: HeadlessHost,
    main: ViewHandle<MainCommand>,
    miniplayer: watch::Receiver<Option<AttachedMiniplayer>>,
    shell: JoinHandle<()>,
}

impl Session {
    /// Start a session on a headless display of `work_area`.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(config))]
    pub fn start(config: &Config, work_area: WorkArea) -> Self {
        let settings = SyncSettings::from(&config.sync);
        let (host, events) = HeadlessHost::new(work_area);
        let broker = BrokerHandle::spawn(Arc::new(host.clone()), config.miniplayer.clone());

        let link = broker.connect(ViewId::Main, None);
        let main = spawn_view(
            MainView::new(link.relay, SimulatedMedia::new(), settings),
            link.inbox,
        );

        let (attached, miniplayer) = watch::channel(None);
        let shell = tokio::spawn(run_shell(
            broker.clone(),
            settings,
            config.miniplayer.min_width,
            events,
            attached,
        ));

        info!("Session started");
        Self {
            broker,
            host,
            main,
            miniplayer,
            shell,
        }
    }

    /// The window broker
    pub fn broker(&self) -> &BrokerHandle {
        &self.broker
    }

    /// The headless host
    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    /// The main view
    pub fn main(&self) -> &ViewHandle<MainCommand> {
        &self.main
    }

    /// The current miniplayer, if one is attached.
    pub fn miniplayer(&self) -> Option<AttachedMiniplayer> {
        self.miniplayer.borrow().clone()
    }

    /// Toggle the miniplayer from the main view.
    ///
    /// When this opens a window, waits for its view to start and returns it.
    pub async fn toggle_miniplayer(&self) -> Option<AttachedMiniplayer> {
        let previous = self.miniplayer().map(|attached| attached.window);
        self.main.perform(MainCommand::ToggleMiniplayer).await;

        if !self.broker.miniplayer_exists() {
            return None;
        }

        let mut miniplayer = self.miniplayer.clone();
        let attached = miniplayer
            .wait_for(|attached| {
                attached
                    .as_ref()
                    .is_some_and(|attached| Some(attached.window) != previous)
            })
            .await
            .ok()?
            .clone();
        attached
    }

    /// Close every view and stop the broker.
    pub async fn shutdown(self) {
        if let Some(attached) = self.miniplayer() {
            attached.view.perform(MiniplayerCommand::Close).await;
        }
        self.main.perform(MainCommand::Close).await;
        self.broker.shutdown();
        self.shell.abort();
        info!("Session stopped");
    }
}

async fn run_shell(
    broker: BrokerHandle,
    settings: SyncSettings,
    min_width: u32,
    mut events: mpsc::UnboundedReceiver<HostEvent>,
    attached: Attached,
) {
    while let Some(event) = events.recv().await {
        match event {
            HostEvent::Launched { id, options } => {
                attach_miniplayer(&broker, settings, min_width, id, &options, &attached);
            }
            HostEvent::Closed { id } => {
                debug!(window = %id, "Host closed window");
                broker.notify_window_closed(id);
                attached.send_if_modified(|current| {
                    if current.as_ref().is_some_and(|attached| attached.window == id) {
                        *current = None;
                        true
                    } else {
                        false
                    }
                });
            }
        }
    }
}

fn attach_miniplayer(
    broker: &BrokerHandle,
    settings: SyncSettings,
    min_width: u32,
    window: WindowId,
    options: &MiniplayerOptions,
    attached: &Attached,
) {
    let params = match StartupParams::from_url(&options.url) {
        Ok(params) => params,
        Err(e) => {
            warn!(%window, error = %e, "Miniplayer page could not start");
            broker.close_miniplayer(window);
            return;
        }
    };

    let link = broker.connect(ViewId::Miniplayer, Some(window));
    let view = MiniplayerView::new(params, window, link.relay, SimulatedMedia::new(), settings)
        .with_min_width(min_width);
    let view = spawn_view(view, link.inbox);

    debug!(%window, "Miniplayer view attached");
    attached.send_replace(Some(AttachedMiniplayer { window, view }));
}
