//! End-to-end over a real websocket served on the loopback interface.

#![allow(unused_results)]

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use livetext_core::{SubjectKind, SubjectStore};
use livetext_realtime::{
    CloseReason, ConnectionManager, ConnectionState, DataSource, DistributionDescriptor,
    MappingTable, MemoryDataSource, Transport, TungsteniteTransport,
};
use livetext_settings::LivetextSettings;
use livetext_transform::{ATTR_TEXT, Attributes, StringTable, TextTransformer, TransformPipeline};
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

const WAIT: Duration = Duration::from_secs(5);

/// Accepts one client, checks its subscriptions, pushes one draft, and
/// reports the close code the client sends.
async fn serve_once(listener: TcpListener, done: oneshot::Sender<(Vec<String>, Option<u16>)>) {
    let (tcp, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();

    let mut subscribed = Vec::new();
    while subscribed.len() < 2 {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => subscribed.push(text.as_str().to_owned()),
            Some(Ok(_)) => {}
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    let update = serde_json::json!({
        "event": "update-draft:abc:42:7:es:101",
        "data": { "text": "Bienvenido", "pluralForm": "none" },
    });
    ws.send(Message::Text(update.to_string().into()))
        .await
        .unwrap();

    let mut close_code = None;
    while let Some(frame) = ws.next().await {
        match frame {
            Ok(Message::Close(frame)) => close_code = frame.map(|f| u16::from(f.code)),
            Ok(_) => {}
            Err(_) => break,
        }
    }
    let _ = done.send((subscribed, close_code));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn receives_update_and_closes_with_configured_code() {
    let server = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    let (done_tx, done_rx) = oneshot::channel();
    let server_task = tokio::spawn(serve_once(server, done_tx));

    let store = Arc::new(SubjectStore::new());
    let strings = Arc::new(StringTable::new().with_string("title", "Welcome"));
    let pipeline = Arc::new(TransformPipeline::new(Arc::clone(&store)));
    pipeline.register(Arc::new(TextTransformer::new(Arc::clone(&store), strings)));
    let label = store.create(SubjectKind::Label, "");
    let label = pipeline
        .transform(Some(label), &Attributes::new().with(ATTR_TEXT, "@string/title"))
        .unwrap();

    let data: Arc<dyn DataSource> = Arc::new(
        MemoryDataSource::new()
            .with_distribution(DistributionDescriptor {
                project_id: "42".into(),
                project_ws_hash: "abc".into(),
                user_id: "7".into(),
            })
            .with_mapping(MappingTable::new("en").with_string("title", "101")),
    );
    let mut settings = LivetextSettings {
        source_language: "en".into(),
        target_language: "es".into(),
        ..LivetextSettings::default()
    };
    settings.realtime.shared_endpoint = format!("ws://{addr}/");

    let transport: Arc<dyn Transport> = Arc::new(TungsteniteTransport::new(Handle::current()));
    let manager = ConnectionManager::new(settings, Some(data), Arc::clone(&pipeline), transport);
    let mut state = manager.subscribe_state();

    manager.open_connection();
    timeout(WAIT, state.wait_for(|s| s.is_open()))
        .await
        .unwrap()
        .unwrap();

    timeout(WAIT, async {
        while store.text(label).as_deref() != Some("Bienvenido") {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    manager.close_connection();
    timeout(WAIT, state.wait_for(|s| !s.is_active()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        manager.state(),
        ConnectionState::Closed(CloseReason::Normal)
    );

    let (subscribed, close_code) = timeout(WAIT, done_rx).await.unwrap().unwrap();
    assert!(subscribed[0].contains("update-draft:abc:42:7:es:101"));
    assert!(subscribed[1].contains("top-suggestion:abc:42:es:101"));
    assert_eq!(close_code, Some(0x3E9));
    server_task.await.unwrap();
}

#[tokio::test]
async fn unreachable_endpoint_closes_abnormally() {
    let server = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    drop(server);

    let data: Arc<dyn DataSource> = Arc::new(
        MemoryDataSource::new()
            .with_distribution(DistributionDescriptor {
                project_id: "42".into(),
                project_ws_hash: "abc".into(),
                user_id: "7".into(),
            })
            .with_mapping(MappingTable::new("en")),
    );
    let mut settings = LivetextSettings::default();
    settings.realtime.shared_endpoint = format!("ws://{addr}/");

    let pipeline = Arc::new(TransformPipeline::new(Arc::new(SubjectStore::new())));
    let transport: Arc<dyn Transport> = Arc::new(TungsteniteTransport::new(Handle::current()));
    let manager = ConnectionManager::new(settings, Some(data), pipeline, transport);
    let mut state = manager.subscribe_state();

    manager.open_connection();
    timeout(WAIT, state.wait_for(|s| !s.is_active()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        manager.state(),
        ConnectionState::Closed(CloseReason::Abnormal)
    );
}
