//! Unary gRPC echo against a running server.

use echo_server::grpc::{EchoClient, EchoRequest};

mod common;

#[tokio::test]
async fn echo_returns_the_message_unchanged() {
    let server = common::start().await;
    let mut client = EchoClient::connect(server.grpc_url()).await.unwrap();

    for message in ["hello", "", "multi-byte: héllo 世界 🚀", "tabs\tand\nnewlines"] {
        let response = client
            .echo(EchoRequest {
                message: message.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.into_inner().message, message);
    }
}

#[tokio::test]
async fn grpc_port_is_not_the_http_port() {
    let server = common::start().await;
    assert_ne!(server.http, server.grpc);

    let res = common::client().get(server.url("/echo.Echo/Echo")).send().await.unwrap();
    assert_eq!(res.status(), 200, "the HTTP port echoes, it does not speak gRPC");
    assert_eq!(res.headers()["content-type"], "text/plain");
}

#[tokio::test]
async fn server_stops_cleanly() {
    let server = common::start().await;
    let mut client = EchoClient::connect(server.grpc_url()).await.unwrap();
    client
        .echo(EchoRequest { message: "ping".into() })
        .await
        .unwrap();
    drop(client);

    assert!(server.stop().await.is_ok());
}
