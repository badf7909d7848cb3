//! Both views running against a headless broker on a paused clock.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{sync::mpsc, time};

use super::*;
use crate::{
    config::MiniplayerConfig,
    services::{
        geometry::{PointerPosition, PointerTarget, Position, Size},
        queue::VideoQueueEntry,
        sync::{MediaElement, MediaSource, PlayerState, SimulatedMedia, SyncSettings, ViewId},
        window::{BrokerHandle, HeadlessHost, HostEvent, StartupParams, WindowId},
    },
};

const SCREEN: Size = Size::new(1920, 1080);
const PATIENCE: Duration = Duration::from_secs(30);

struct Rig {
    broker: BrokerHandle,
    host: HeadlessHost,
    events: mpsc::UnboundedReceiver<HostEvent>,
    main: ViewHandle<MainCommand>,
    min_width: u32,
}

fn rig() -> Rig {
    rig_with(MiniplayerConfig::default(), SimulatedMedia::new())
}

fn rig_with(config: MiniplayerConfig, main_media: impl MediaElement) -> Rig {
    let min_width = config.min_width;
    let (host, events) = HeadlessHost::new(SCREEN);
    let broker = BrokerHandle::spawn(Arc::new(host.clone()), config);

    let link = broker.connect(ViewId::Main, None);
    let view = MainView::new(link.relay, main_media, SyncSettings::default());
    let main = spawn_view(view, link.inbox);

    Rig {
        broker,
        host,
        events,
        main,
        min_width,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MediaCall {
    Load,
    Seek(f64),
    Play,
    Pause,
}

/// Simulated media that logs every transport call.
struct RecordingMedia {
    inner: SimulatedMedia,
    calls: Arc<Mutex<Vec<MediaCall>>>,
}

impl RecordingMedia {
    fn new() -> (Self, Arc<Mutex<Vec<MediaCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let media = Self {
            inner: SimulatedMedia::new(),
            calls: calls.clone(),
        };
        (media, calls)
    }

    fn record(&self, call: MediaCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MediaElement for RecordingMedia {
    fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    fn seek(&mut self, time: f64) {
        self.record(MediaCall::Seek(time));
        self.inner.seek(time);
    }

    fn play(&mut self) {
        self.record(MediaCall::Play);
        self.inner.play();
    }

    fn pause(&mut self) {
        self.record(MediaCall::Pause);
        self.inner.pause();
    }

    fn is_paused(&self) -> bool {
        self.inner.is_paused()
    }

    fn load(&mut self, source: &MediaSource) {
        self.record(MediaCall::Load);
        self.inner.load(source);
    }

    fn set_volume(&mut self, volume: f64, muted: bool) {
        self.inner.set_volume(volume, muted);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.inner.set_playback_rate(rate);
    }
}

fn entry(name: &str) -> VideoQueueEntry {
    VideoQueueEntry::new(name, MediaSource::new(format!("file:///videos/{name}.mp4")))
}

impl Rig {
    /// Start the miniplayer view for the next launched window, the way a
    /// shell would after the page loads.
    async fn attach_miniplayer(&mut self) -> (WindowId, ViewHandle<MiniplayerCommand>) {
        loop {
            match self.events.recv().await {
                Some(HostEvent::Launched { id, options }) => {
                    let params = StartupParams::from_url(&options.url).unwrap();
                    let link = self.broker.connect(ViewId::Miniplayer, Some(id));
                    let view = MiniplayerView::new(
                        params,
                        id,
                        link.relay,
                        SimulatedMedia::new(),
                        SyncSettings::default(),
                    )
                    .with_min_width(self.min_width);
                    return (id, spawn_view(view, link.inbox));
                }
                Some(_) => continue,
                None => panic!("host event channel closed"),
            }
        }
    }

    async fn open_miniplayer(&mut self) -> (WindowId, ViewHandle<MiniplayerCommand>) {
        assert!(self.main.perform(MainCommand::ToggleMiniplayer).await);
        self.attach_miniplayer().await
    }

    async fn playing_clip(&mut self) {
        assert!(self.main.perform(MainCommand::Load(entry("clip"))).await);
    }
}

async fn until<C: Send + 'static>(
    view: &ViewHandle<C>,
    predicate: impl FnMut(&PlayerState) -> bool,
) -> PlayerState {
    time::timeout(PATIENCE, view.wait_until(predicate))
        .await
        .expect("view never reached the expected state")
        .expect("view stopped")
}

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.5
}

#[tokio::test(start_paused = true)]
async fn opening_hands_current_playback_to_miniplayer() {
    let mut rig = rig();
    rig.playing_clip().await;
    time::sleep(Duration::from_secs(5)).await;

    let (_, mini) = rig.open_miniplayer().await;

    let state = mini.state();
    assert_eq!(state.media_source, MediaSource::new("file:///videos/clip.mp4"));
    assert!(state.is_playing);
    assert!(near(state.current_time, 5.0), "started at {}", state.current_time);
}

#[tokio::test(start_paused = true)]
async fn main_mirrors_miniplayer_while_open() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;

    mini.perform(MiniplayerCommand::Seek(90.0)).await;

    let state = until(&rig.main, |state| near(state.current_time, 90.0)).await;
    assert!(state.is_playing);
}

#[tokio::test(start_paused = true)]
async fn closing_handoff_restores_main_playback() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;

    mini.perform(MiniplayerCommand::Seek(42.0)).await;
    assert!(mini.perform(MiniplayerCommand::Close).await);
    assert!(mini.is_closed());

    let state = until(&rig.main, |state| near(state.current_time, 42.0) && state.is_playing).await;
    assert!(state.is_playing);
    assert!(!rig.broker.miniplayer_exists());

    // Main is the authority again and its own media is running.
    time::sleep(Duration::from_secs(3)).await;
    until(&rig.main, |state| state.current_time > 44.0).await;
}

#[tokio::test(start_paused = true)]
async fn paused_miniplayer_hands_back_paused() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;

    mini.perform(MiniplayerCommand::Seek(30.0)).await;
    mini.perform(MiniplayerCommand::Pause).await;
    mini.perform(MiniplayerCommand::Close).await;

    until(&rig.main, |state| near(state.current_time, 30.0) && !state.is_playing).await;
    time::sleep(Duration::from_secs(3)).await;
    assert!(near(rig.main.state().current_time, 30.0));
}

#[tokio::test(start_paused = true)]
async fn main_toggle_closes_miniplayer_with_handoff() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;
    mini.perform(MiniplayerCommand::Seek(12.0)).await;

    assert!(rig.main.perform(MainCommand::ToggleMiniplayer).await);

    time::timeout(PATIENCE, mini.closed()).await.unwrap();
    until(&rig.main, |state| near(state.current_time, 12.0) && state.is_playing).await;
    assert!(rig.host.open_windows().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn main_resumes_from_handed_back_time_not_its_mirror() {
    let (media, calls) = RecordingMedia::new();
    let mut rig = rig_with(MiniplayerConfig::default(), media);
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;

    mini.perform(MiniplayerCommand::Seek(12.0)).await;
    mini.perform(MiniplayerCommand::Seek(12.45)).await;
    until(&rig.main, |state| state.current_time == 12.0).await;
    calls.lock().unwrap().clear();

    assert!(rig.main.perform(MainCommand::ToggleMiniplayer).await);
    time::timeout(PATIENCE, mini.closed()).await.unwrap();
    until(&rig.main, |state| state.current_time > 12.3 && state.is_playing).await;

    let calls = calls.lock().unwrap().clone();
    let seeks: Vec<f64> = calls
        .iter()
        .filter_map(|call| match call {
            MediaCall::Seek(time) => Some(*time),
            _ => None,
        })
        .collect();
    assert_eq!(seeks.len(), 1, "{calls:?}");
    assert!(seeks[0] > 12.3 && seeks[0] < 12.6, "{calls:?}");

    let seek_at = calls.iter().position(|call| matches!(call, MediaCall::Seek(_)));
    let play_at = calls.iter().position(|call| *call == MediaCall::Play);
    assert!(seek_at < play_at, "played before seeking: {calls:?}");
}

#[tokio::test(start_paused = true)]
async fn user_closing_the_window_hands_playback_back() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (id, mini) = rig.open_miniplayer().await;
    mini.perform(MiniplayerCommand::Seek(20.0)).await;

    assert!(rig.host.close_by_user(id).await);
    rig.broker.notify_window_closed(id);

    time::timeout(PATIENCE, mini.closed()).await.unwrap();
    until(&rig.main, |state| near(state.current_time, 20.0) && state.is_playing).await;
}

#[tokio::test(start_paused = true)]
async fn escape_closes_miniplayer() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;

    mini.perform(MiniplayerCommand::Key("Escape".into())).await;

    time::timeout(PATIENCE, mini.closed()).await.unwrap();
    rig.broker.window_size().await;
    assert!(!rig.broker.miniplayer_exists());
}

#[tokio::test(start_paused = true)]
async fn main_pause_reaches_miniplayer() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;
    mini.perform(MiniplayerCommand::Seek(8.0)).await;

    rig.main.perform(MainCommand::Pause).await;

    let state = until(&mini, |state| !state.is_playing).await;
    assert!(near(state.current_time, 8.0), "suspended main must not move the clock");
}

#[tokio::test(start_paused = true)]
async fn main_shortcuts_are_ignored_while_miniplayer_open() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;

    rig.main.perform(MainCommand::Key(" ".into())).await;
    rig.broker.window_size().await;

    assert!(rig.main.state().is_playing);
    assert!(mini.state().is_playing);
}

#[tokio::test(start_paused = true)]
async fn miniplayer_shortcuts_control_playback() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;
    mini.perform(MiniplayerCommand::Seek(30.0)).await;

    mini.perform(MiniplayerCommand::Key("j".into())).await;
    assert!(near(mini.state().current_time, 20.0));

    mini.perform(MiniplayerCommand::Key("m".into())).await;
    assert!(mini.state().is_muted);

    mini.perform(MiniplayerCommand::Key("ArrowDown".into())).await;
    assert!(near(mini.state().volume, 0.9));

    mini.perform(MiniplayerCommand::Key("k".into())).await;
    assert!(!mini.state().is_playing);
    until(&rig.main, |state| !state.is_playing).await;
}

#[tokio::test(start_paused = true)]
async fn selecting_from_queue_switches_miniplayer_source() {
    let mut rig = rig();
    rig.main.perform(MainCommand::Enqueue(entry("first"))).await;
    rig.main.perform(MainCommand::Enqueue(entry("second"))).await;
    rig.main.perform(MainCommand::Select(0)).await;
    let (_, mini) = rig.open_miniplayer().await;

    rig.main.perform(MainCommand::Next).await;

    let state = until(&mini, |state| {
        state.media_source == MediaSource::new("file:///videos/second.mp4")
    })
    .await;
    assert!(state.is_playing);
    assert!(state.current_time < 0.5);
    assert_eq!(rig.main.state().media_source, state.media_source);
}

#[tokio::test(start_paused = true)]
async fn dragging_moves_window_and_is_remembered() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (id, mini) = rig.open_miniplayer().await;

    mini.perform(MiniplayerCommand::PointerDown {
        target: PointerTarget::Surface,
        pointer: PointerPosition::new(100.0, 100.0),
    })
    .await;
    mini.perform(MiniplayerCommand::PointerMove(PointerPosition::new(50.0, 150.0)))
        .await;
    assert_eq!(rig.broker.window_position().await, Position::new(1530, 70));
    assert_eq!(rig.host.window(id).await.unwrap().position, Position::new(1530, 70));
    mini.perform(MiniplayerCommand::PointerUp).await;

    rig.main.perform(MainCommand::ToggleMiniplayer).await;
    time::timeout(PATIENCE, mini.closed()).await.unwrap();
    let (reopened, _) = rig.open_miniplayer().await;

    assert_eq!(
        rig.host.window(reopened).await.unwrap().position,
        Position::new(1530, 70)
    );
}

#[tokio::test(start_paused = true)]
async fn pointer_on_a_control_does_not_drag() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;

    mini.perform(MiniplayerCommand::PointerDown {
        target: PointerTarget::Control,
        pointer: PointerPosition::new(100.0, 100.0),
    })
    .await;
    mini.perform(MiniplayerCommand::PointerMove(PointerPosition::new(0.0, 300.0)))
        .await;

    assert_eq!(rig.broker.window_position().await, Position::new(1580, 20));
}

#[tokio::test(start_paused = true)]
async fn corner_grip_resizes_proportionally() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;

    mini.perform(MiniplayerCommand::PointerDown {
        target: PointerTarget::ResizeHandle,
        pointer: PointerPosition::new(1800.0, 190.0),
    })
    .await;
    mini.perform(MiniplayerCommand::PointerMove(PointerPosition::new(1960.0, 280.0)))
        .await;

    assert_eq!(rig.broker.window_size().await, Size::new(480, 270));
    assert_eq!(rig.broker.window_position().await, Position::new(1440, 20));
}

#[tokio::test(start_paused = true)]
async fn miniplayer_metadata_locks_aspect_ratio() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (id, mini) = rig.open_miniplayer().await;

    mini.perform(MiniplayerCommand::MetadataLoaded {
        duration: 120.0,
        width: 1440,
        height: 1080,
    })
    .await;

    assert_eq!(rig.broker.window_size().await, Size::new(320, 240));
    assert_eq!(rig.host.window(id).await.unwrap().min_size, Size::new(200, 150));
    until(&rig.main, |state| near(state.aspect_ratio, 4.0 / 3.0)).await;
}

#[tokio::test(start_paused = true)]
async fn media_without_picture_is_evicted_with_error() {
    let mut rig = rig();
    rig.main.perform(MainCommand::Enqueue(entry("keep"))).await;
    rig.main.perform(MainCommand::Load(entry("podcast"))).await;

    rig.main
        .perform(MainCommand::MetadataLoaded {
            duration: 3600.0,
            width: 0,
            height: 0,
        })
        .await;
    rig.broker.window_size().await;

    let state = rig.main.state();
    assert!(!state.has_media());
    assert!(!state.is_playing);

    let dialogs = rig.host.dialogs().await;
    assert_eq!(dialogs.len(), 1);
    assert_eq!(dialogs[0].title, "Unsupported media");
    assert!(dialogs[0].message.contains("podcast"));
}

#[tokio::test(start_paused = true)]
async fn media_without_picture_in_miniplayer_is_evicted_by_main() {
    let mut rig = rig();
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;
    let audio_only = MediaSource::new("file:///videos/audio_only.mp4");

    rig.main.perform(MainCommand::Load(entry("audio_only"))).await;
    until(&mini, |state| state.media_source == audio_only).await;

    mini.perform(MiniplayerCommand::MetadataLoaded {
        duration: 60.0,
        width: 0,
        height: 0,
    })
    .await;

    let state = until(&mini, |state| !state.has_media()).await;
    assert!(!state.is_playing);
    let state = until(&rig.main, |state| !state.has_media()).await;
    assert!(!state.is_playing);
    rig.broker.window_size().await;

    let dialogs = rig.host.dialogs().await;
    assert_eq!(dialogs.len(), 1);
    assert_eq!(dialogs[0].title, "Unsupported media");
    assert!(dialogs[0].message.contains("audio_only"));
    assert!(rig.broker.miniplayer_exists());
}

#[tokio::test(start_paused = true)]
async fn resize_floor_follows_configured_min_width() {
    let config = MiniplayerConfig {
        min_width: 120,
        ..MiniplayerConfig::default()
    };
    let mut rig = rig_with(config, SimulatedMedia::new());
    rig.playing_clip().await;
    let (_, mini) = rig.open_miniplayer().await;

    mini.perform(MiniplayerCommand::PointerDown {
        target: PointerTarget::ResizeHandle,
        pointer: PointerPosition::new(1800.0, 190.0),
    })
    .await;
    mini.perform(MiniplayerCommand::PointerMove(PointerPosition::new(1640.0, 100.0)))
        .await;

    assert_eq!(rig.broker.window_size().await, Size::new(160, 90));
}

#[tokio::test(start_paused = true)]
async fn failed_open_keeps_playback_in_main() {
    let mut rig = rig();
    rig.playing_clip().await;
    rig.host.fail_next_create("no display").await;

    assert!(rig.main.perform(MainCommand::ToggleMiniplayer).await);
    assert!(!rig.broker.miniplayer_exists());

    time::sleep(Duration::from_secs(3)).await;
    until(&rig.main, |state| state.current_time > 2.0 && state.is_playing).await;
}

#[tokio::test(start_paused = true)]
async fn volume_and_rate_apply_locally() {
    let rig = rig();

    rig.main.perform(MainCommand::SetVolume(1.7)).await;
    assert_eq!(rig.main.state().volume, 1.0);

    rig.main.perform(MainCommand::SetPlaybackRate(1.5)).await;
    rig.main.perform(MainCommand::SetPlaybackRate(-1.0)).await;
    assert_eq!(rig.main.state().playback_rate, 1.5);

    rig.main.perform(MainCommand::ToggleMute).await;
    assert!(rig.main.state().is_muted);
}

#[tokio::test(start_paused = true)]
async fn close_stops_the_view() {
    let rig = rig();

    assert!(rig.main.perform(MainCommand::Close).await);

    assert!(rig.main.is_closed());
    assert!(!rig.main.send(MainCommand::Play));
}
