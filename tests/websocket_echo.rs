//! WebSocket echo sessions.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

mod common;

#[tokio::test]
async fn greeting_then_ordered_echoes() {
    let server = common::start().await;
    let (mut ws, response) = connect_async(server.ws_url("/")).await.unwrap();
    assert_eq!(response.status(), 101);

    let greeting = ws.next().await.unwrap().unwrap();
    let greeting = greeting.into_text().unwrap().as_str().to_owned();
    assert!(
        greeting.starts_with("Request served by ") || greeting.starts_with("Server hostname unknown: "),
        "{greeting}"
    );

    let frames = vec![
        Message::text("first"),
        Message::binary(vec![0u8, 1, 2, 254, 255]),
        Message::text("héllo 世界"),
        Message::text(""),
        Message::binary(Vec::<u8>::new()),
    ];
    for frame in &frames {
        ws.send(frame.clone()).await.unwrap();
    }
    for frame in &frames {
        let echoed = ws.next().await.unwrap().unwrap();
        assert_eq!(&echoed, frame);
    }

    ws.close(None).await.unwrap();
}

#[tokio::test]
async fn client_close_is_answered_with_close_frame() {
    let server = common::start().await;
    let mut request = server.ws_url("/").into_client_request().unwrap();
    request
        .headers_mut()
        .insert("X-Send-Server-Hostname", "false".parse().unwrap());
    let (mut ws, _) = connect_async(request).await.unwrap();

    ws.send(Message::text("last")).await.unwrap();
    assert_eq!(ws.next().await.unwrap().unwrap(), Message::text("last"));

    ws.send(Message::Close(Some(CloseFrame {
        code: CloseCode::Normal,
        reason: "done".into(),
    })))
    .await
    .unwrap();

    let reply = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("server answers the close")
        .unwrap()
        .unwrap();
    match reply {
        Message::Close(Some(frame)) => assert_eq!(frame.code, CloseCode::Normal),
        other => panic!("expected a close frame, got {other:?}"),
    }
    assert!(ws.next().await.is_none());
}

#[tokio::test]
async fn disclosure_disabled_sends_no_greeting() {
    let server = common::start().await;
    let mut request = server.ws_url("/any/path").into_client_request().unwrap();
    request
        .headers_mut()
        .insert("X-Send-Server-Hostname", "false".parse().unwrap());

    let (mut ws, _) = connect_async(request).await.unwrap();
    ws.send(Message::text("only")).await.unwrap();

    let first = ws.next().await.unwrap().unwrap();
    assert_eq!(first, Message::text("only"));
}

#[tokio::test]
async fn upgrade_wins_over_ui_page_path() {
    let env = echo_server::echo::Environment::from_pairs([
        ("SEND_SERVER_HOSTNAME", "false"),
        ("SEND_HEADER_X_ECHO", "ws"),
    ]);
    let server = common::start_with(common::local_config(), env).await;

    let (mut ws, response) = connect_async(server.ws_url("/chat/.ws")).await.unwrap();
    assert_eq!(response.headers()["x-echo"], "ws");

    ws.send(Message::text("hi")).await.unwrap();
    assert_eq!(ws.next().await.unwrap().unwrap(), Message::text("hi"));
}

#[tokio::test]
async fn sessions_are_independent() {
    let env = echo_server::echo::Environment::from_pairs([("SEND_SERVER_HOSTNAME", "false")]);
    let server = common::start_with(common::local_config(), env).await;

    let (mut a, _) = connect_async(server.ws_url("/")).await.unwrap();
    let (mut b, _) = connect_async(server.ws_url("/")).await.unwrap();

    a.send(Message::text("from a")).await.unwrap();
    b.send(Message::text("from b")).await.unwrap();
    drop(a);

    assert_eq!(b.next().await.unwrap().unwrap(), Message::text("from b"));
    b.send(Message::text("still open")).await.unwrap();
    assert_eq!(b.next().await.unwrap().unwrap(), Message::text("still open"));
}
