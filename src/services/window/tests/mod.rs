//! Window broker tests against the headless host.

use std::{sync::Arc, time::Duration};

use futures::future::join_all;
use tokio::{sync::mpsc, time};

use crate::{
    config::MiniplayerConfig,
    services::{
        geometry::{Position, Size},
        sync::{GeometryRequest, MediaSource, SyncMessage, ViewId},
        window::{
            BrokerHandle, HeadlessHost, HostEvent, MiniplayerLaunch, StartupParams, ViewEvent,
            WindowId,
        },
    },
};

const SCREEN: Size = Size::new(1920, 1080);

type Setup = (BrokerHandle, HeadlessHost, mpsc::UnboundedReceiver<HostEvent>);

fn setup_with(config: MiniplayerConfig) -> Setup {
    let (host, events) = HeadlessHost::new(SCREEN);
    let broker = BrokerHandle::spawn(Arc::new(host.clone()), config);
    (broker, host, events)
}

fn setup() -> Setup {
    setup_with(MiniplayerConfig::default())
}

fn launch() -> MiniplayerLaunch {
    MiniplayerLaunch::new(MediaSource::new("file:///clip.mp4"), 12.0, true)
}

async fn open(broker: &BrokerHandle, events: &mut mpsc::UnboundedReceiver<HostEvent>) -> WindowId {
    assert!(broker.toggle_miniplayer(launch()).await);
    loop {
        match events.recv().await {
            Some(HostEvent::Launched { id, .. }) => return id,
            Some(_) => continue,
            None => panic!("host event channel closed"),
        }
    }
}

/// Every request before this one has been processed once it returns.
async fn settle(broker: &BrokerHandle) {
    broker.window_size().await;
}

fn drain(inbox: &mut mpsc::UnboundedReceiver<ViewEvent>) -> Vec<ViewEvent> {
    let mut events = Vec::new();
    while let Ok(event) = inbox.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn toggle_leaves_window_iff_called_odd_times() {
    for n in 1..=6 {
        let (broker, host, _events) = setup();
        for _ in 0..n {
            broker.toggle_miniplayer(launch()).await;
        }

        let odd = n % 2 == 1;
        assert_eq!(broker.miniplayer_exists(), odd, "after {n} toggles");
        assert_eq!(host.open_windows().await.len(), usize::from(odd));
    }
}

#[tokio::test]
async fn concurrent_toggles_never_open_two_windows() {
    for n in 1..=7 {
        let (broker, host, _events) = setup();
        let toggles = (0..n).map(|_| {
            let broker = broker.clone();
            tokio::spawn(async move { broker.toggle_miniplayer(launch()).await })
        });

        let opened = join_all(toggles)
            .await
            .into_iter()
            .filter(|result| matches!(result, Ok(true)))
            .count();

        let odd = n % 2 == 1;
        assert_eq!(host.open_windows().await.len(), usize::from(odd), "after {n} toggles");
        assert_eq!(broker.miniplayer_exists(), odd);
        assert_eq!(opened, (n + 1) / 2);
    }
}

#[tokio::test]
async fn new_miniplayer_is_placed_top_right() {
    let (broker, host, mut events) = setup();
    let id = open(&broker, &mut events).await;

    assert_eq!(broker.window_position().await, Position::new(1580, 20));
    assert_eq!(broker.window_size().await, Size::new(320, 180));

    let window = host.window(id).await.unwrap();
    assert!(window.options.always_on_top);
    assert!(window.options.frameless);
    assert_eq!(window.min_size, Size::new(200, 113));
}

#[tokio::test]
async fn requested_position_is_used_only_when_on_screen() {
    let (broker, _host, _events) = setup();

    broker
        .toggle_miniplayer(launch().at(Some(Position::new(100, 200))))
        .await;
    assert_eq!(broker.window_position().await, Position::new(100, 200));

    broker.toggle_miniplayer(launch()).await;
    broker
        .toggle_miniplayer(launch().at(Some(Position::new(1900, 200))))
        .await;
    assert_eq!(broker.window_position().await, Position::new(1580, 20));
}

#[tokio::test]
async fn startup_state_travels_in_the_load_url() {
    let (broker, _host, mut events) = setup();
    broker.toggle_miniplayer(launch()).await;

    let Some(HostEvent::Launched { options, .. }) = events.recv().await else {
        panic!("expected a launch");
    };
    let params = StartupParams::from_url(&options.url).unwrap();

    assert_eq!(params.video_src.as_str(), "file:///clip.mp4");
    assert_eq!(params.time, 12.0);
    assert!(params.is_playing);
}

#[tokio::test]
async fn queries_fall_back_to_defaults_without_miniplayer() {
    let (broker, _host, _events) = setup();

    assert!(!broker.miniplayer_exists());
    assert_eq!(broker.window_position().await, Position::new(0, 0));
    assert_eq!(broker.window_size().await, Size::new(320, 180));
    assert_eq!(broker.screen_work_area().await, SCREEN);
}

#[tokio::test]
async fn messages_reach_the_peer_and_never_the_sender() {
    let (broker, _host, mut events) = setup();
    let mut main = broker.connect(ViewId::Main, None);
    let id = open(&broker, &mut events).await;
    let mut mini = broker.connect(ViewId::Miniplayer, Some(id));

    main.relay.send(SyncMessage::TimeSync { time: 5.0 });
    mini.relay.send(SyncMessage::PlayStateSync {
        is_playing: false,
        time: Some(6.0),
    });
    settle(&broker).await;

    assert_eq!(
        drain(&mut mini.inbox),
        vec![ViewEvent::Message(SyncMessage::TimeSync { time: 5.0 })]
    );
    assert_eq!(
        drain(&mut main.inbox),
        vec![ViewEvent::Message(SyncMessage::PlayStateSync {
            is_playing: false,
            time: Some(6.0)
        })]
    );
}

#[tokio::test]
async fn relay_per_sender_is_fifo() {
    let (broker, _host, mut events) = setup();
    let main = broker.connect(ViewId::Main, None);
    let id = open(&broker, &mut events).await;
    let mut mini = broker.connect(ViewId::Miniplayer, Some(id));

    for time in [1.0, 2.0, 3.0] {
        main.relay.send(SyncMessage::TimeSync { time });
    }
    settle(&broker).await;

    let times: Vec<_> = drain(&mut mini.inbox)
        .into_iter()
        .filter_map(|event| match event {
            ViewEvent::Message(SyncMessage::TimeSync { time }) => Some(time),
            _ => None,
        })
        .collect();
    assert_eq!(times, vec![1.0, 2.0, 3.0]);
}

#[tokio::test]
async fn relay_to_absent_peer_is_dropped() {
    let (broker, _host, _events) = setup();
    let mut main = broker.connect(ViewId::Main, None);

    main.relay.send(SyncMessage::TimeSync { time: 5.0 });
    settle(&broker).await;

    assert!(drain(&mut main.inbox).is_empty());
    assert!(!broker.miniplayer_exists());
}

#[tokio::test]
async fn invalid_messages_are_dropped() {
    let (broker, _host, mut events) = setup();
    let main = broker.connect(ViewId::Main, None);
    let id = open(&broker, &mut events).await;
    let mut mini = broker.connect(ViewId::Miniplayer, Some(id));

    main.relay.send(SyncMessage::TimeSync { time: f64::NAN });
    settle(&broker).await;

    assert!(drain(&mut mini.inbox).is_empty());
}

#[tokio::test]
async fn position_is_clamped_to_work_area() {
    let (broker, _host, mut events) = setup();
    open(&broker, &mut events).await;

    broker.set_miniplayer_position(1920 + 500, -200);

    assert_eq!(broker.window_position().await, Position::new(1600, 0));
}

#[tokio::test]
async fn resize_follows_locked_aspect_ratio() {
    let (broker, host, mut events) = setup();
    let id = open(&broker, &mut events).await;

    broker.update_aspect_ratio(4.0 / 3.0);
    broker.resize_miniplayer(400, 999);
    assert_eq!(broker.window_size().await, Size::new(400, 300));

    broker.resize_miniplayer(100, 1);
    assert_eq!(broker.window_size().await, Size::new(200, 150));
    assert_eq!(host.window(id).await.unwrap().min_size, Size::new(200, 150));
}

#[tokio::test]
async fn aspect_ratio_reshapes_current_window() {
    let (broker, _host, mut events) = setup();
    open(&broker, &mut events).await;

    broker.update_aspect_ratio(2.0);

    assert_eq!(broker.window_size().await, Size::new(320, 160));
}

#[tokio::test]
async fn aspect_ratio_without_miniplayer_is_a_no_op() {
    let (broker, _host, mut events) = setup();
    broker.update_aspect_ratio(4.0 / 3.0);
    open(&broker, &mut events).await;

    broker.resize_miniplayer(400, 0);
    assert_eq!(broker.window_size().await, Size::new(400, 225));
}

#[tokio::test]
async fn resize_pulls_window_back_on_screen() {
    let (broker, _host, mut events) = setup();
    open(&broker, &mut events).await;

    broker.resize_miniplayer(640, 0);

    assert_eq!(broker.window_size().await, Size::new(640, 360));
    assert_eq!(broker.window_position().await, Position::new(1280, 20));
}

#[tokio::test]
async fn geometry_requests_stop_at_the_broker() {
    let (broker, _host, mut events) = setup();
    let mut main = broker.connect(ViewId::Main, None);
    let id = open(&broker, &mut events).await;
    let mini = broker.connect(ViewId::Miniplayer, Some(id));

    mini.relay.send(SyncMessage::GeometryRequest {
        request: GeometryRequest::Move { x: 10, y: 30 },
    });

    assert_eq!(broker.window_position().await, Position::new(10, 30));
    assert!(drain(&mut main.inbox).is_empty());
}

#[tokio::test]
async fn failed_creation_leaves_miniplayer_absent() {
    let (broker, host, _events) = setup();
    host.fail_next_create("display lost").await;

    assert!(!broker.toggle_miniplayer(launch()).await);
    assert!(!broker.miniplayer_exists());
    assert_eq!(broker.window_position().await, Position::new(0, 0));

    assert!(broker.toggle_miniplayer(launch()).await);
}

#[tokio::test]
async fn invalid_load_url_counts_as_failed_creation() {
    let (broker, host, _events) = setup_with(MiniplayerConfig {
        load_url: "index.html".to_string(),
        ..MiniplayerConfig::default()
    });

    assert!(!broker.toggle_miniplayer(launch()).await);
    assert!(host.open_windows().await.is_empty());
}

#[tokio::test]
async fn closing_notifies_main() {
    let (broker, _host, mut events) = setup();
    let mut main = broker.connect(ViewId::Main, None);
    open(&broker, &mut events).await;

    assert!(!broker.toggle_miniplayer(launch()).await);
    settle(&broker).await;

    assert_eq!(drain(&mut main.inbox), vec![ViewEvent::MiniplayerClosed]);
}

#[tokio::test]
async fn user_close_clears_the_slot() {
    let (broker, host, mut events) = setup();
    let mut main = broker.connect(ViewId::Main, None);
    let id = open(&broker, &mut events).await;

    assert!(host.close_by_user(id).await);
    broker.notify_window_closed(id);
    settle(&broker).await;

    assert!(!broker.miniplayer_exists());
    assert_eq!(drain(&mut main.inbox), vec![ViewEvent::MiniplayerClosed]);
}

#[tokio::test]
async fn close_request_is_idempotent_and_never_opens() {
    let (broker, host, mut events) = setup();
    let id = open(&broker, &mut events).await;

    broker.close_miniplayer(id);
    broker.close_miniplayer(id);
    settle(&broker).await;

    assert!(!broker.miniplayer_exists());
    assert!(host.open_windows().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn replaced_miniplayer_cannot_talk_to_main() {
    let (broker, _host, mut events) = setup();
    let mut main = broker.connect(ViewId::Main, None);
    let first = open(&broker, &mut events).await;
    let old = broker.connect(ViewId::Miniplayer, Some(first));

    broker.toggle_miniplayer(launch()).await;
    let second = open(&broker, &mut events).await;
    assert_ne!(first, second);

    old.relay.send(SyncMessage::TimeSync { time: 99.0 });
    broker.close_miniplayer(first);
    settle(&broker).await;

    assert!(broker.miniplayer_exists());
    assert_eq!(drain(&mut main.inbox), vec![ViewEvent::MiniplayerClosed]);
}

#[tokio::test]
async fn toggle_close_waits_for_handoff_before_teardown() {
    let (broker, host, mut events) = setup();
    let mut main = broker.connect(ViewId::Main, None);
    let id = open(&broker, &mut events).await;
    let mut mini = broker.connect(ViewId::Miniplayer, Some(id));
    settle(&broker).await;

    let closing = {
        let broker = broker.clone();
        tokio::spawn(async move { broker.toggle_miniplayer(launch()).await })
    };

    assert_eq!(mini.inbox.recv().await, Some(ViewEvent::CloseRequested));
    assert!(broker.miniplayer_exists());
    assert_eq!(host.open_windows().await, vec![id]);

    mini.relay.send(SyncMessage::ClosingHandoff {
        time: 42.0,
        is_playing: true,
    });
    broker.close_miniplayer(id);

    assert!(!closing.await.unwrap());
    assert!(host.open_windows().await.is_empty());
    assert_eq!(
        drain(&mut main.inbox),
        vec![
            ViewEvent::Message(SyncMessage::ClosingHandoff {
                time: 42.0,
                is_playing: true
            }),
            ViewEvent::MiniplayerClosed,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn silent_miniplayer_is_closed_after_grace_period() {
    let (broker, host, mut events) = setup();
    let mut main = broker.connect(ViewId::Main, None);
    let id = open(&broker, &mut events).await;
    let _mini = broker.connect(ViewId::Miniplayer, Some(id));

    let started = time::Instant::now();
    assert!(!broker.toggle_miniplayer(launch()).await);

    assert!(started.elapsed() >= Duration::from_millis(500));
    assert!(host.open_windows().await.is_empty());
    assert_eq!(drain(&mut main.inbox), vec![ViewEvent::MiniplayerClosed]);
}

#[tokio::test]
async fn messages_after_teardown_are_dropped() {
    let (broker, _host, mut events) = setup();
    let mut main = broker.connect(ViewId::Main, None);
    let id = open(&broker, &mut events).await;
    let mini = broker.connect(ViewId::Miniplayer, Some(id));

    broker.close_miniplayer(id);
    mini.relay.send(SyncMessage::ClosingHandoff {
        time: 42.0,
        is_playing: true,
    });
    settle(&broker).await;

    assert_eq!(drain(&mut main.inbox), vec![ViewEvent::MiniplayerClosed]);
}

#[tokio::test]
async fn rejected_miniplayer_cannot_hand_back() {
    let (broker, _host, mut events) = setup();
    let mut main = broker.connect(ViewId::Main, None);
    let id = open(&broker, &mut events).await;
    assert!(!broker.toggle_miniplayer(launch()).await);

    let mut late = broker.connect(ViewId::Miniplayer, Some(id));
    assert_eq!(late.inbox.recv().await, None);
    late.relay.send(SyncMessage::ClosingHandoff {
        time: 3.0,
        is_playing: false,
    });
    settle(&broker).await;

    assert_eq!(drain(&mut main.inbox), vec![ViewEvent::MiniplayerClosed]);
}

#[tokio::test]
async fn stale_miniplayer_connection_is_rejected() {
    let (broker, _host, mut events) = setup();
    open(&broker, &mut events).await;

    let mut stale = broker.connect(ViewId::Miniplayer, Some(WindowId::new(99)));

    assert_eq!(stale.inbox.recv().await, None);
}

#[tokio::test]
async fn error_dialogs_reach_the_host() {
    let (broker, host, _events) = setup();

    broker.show_error("Unsupported media", "clip.mkv has no video track");
    settle(&broker).await;

    let dialogs = host.dialogs().await;
    assert_eq!(dialogs.len(), 1);
    assert_eq!(dialogs[0].title, "Unsupported media");
}

#[tokio::test]
async fn shutdown_closes_the_miniplayer() {
    let (broker, host, mut events) = setup();
    open(&broker, &mut events).await;

    broker.shutdown();
    let closed = events.recv().await;

    assert!(matches!(closed, Some(HostEvent::Closed { .. })));
    assert!(host.open_windows().await.is_empty());
}
