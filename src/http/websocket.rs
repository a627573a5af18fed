//! WebSocket echo session.
//!
//! # Responsibilities
//! - Complete the upgrade handshake with the client
//! - Optionally greet with the server identity
//! - Echo every text/binary frame back verbatim, same type, same payload
//!
//! # Data Flow
//! ```text
//! Client ──frame──→ session ──same frame──→ Client   (repeat until close/error)
//! ```
//!
//! # Design Decisions
//! - One task per session, no state shared between sessions
//! - Strict read-then-write per frame, so echoes keep client order
//! - Any read or write error ends the session; nothing is retried
//! - Ping/pong is answered by the protocol layer and not echoed

use std::fmt::Display;
use std::net::SocketAddr;

use axum::extract::ws::{Message, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{Sink, SinkExt, Stream, StreamExt};

use crate::echo::ResponsePolicy;
use crate::observability::metrics;

/// Accept the upgrade and spawn the echo session.
pub fn upgrade(
    ws: WebSocketUpgrade,
    peer: SocketAddr,
    greeting: Option<String>,
    policy: &ResponsePolicy,
) -> Response {
    let mut response = ws
        .on_failed_upgrade(move |e| {
            tracing::warn!(remote_addr = %peer, error = %e, "WebSocket upgrade failed");
        })
        .on_upgrade(move |socket| run_session(socket, peer, greeting));
    policy.apply(response.headers_mut());
    response
}

/// Drive one session until the peer closes or an I/O error occurs.
pub async fn run_session<S, E>(mut socket: S, peer: SocketAddr, greeting: Option<String>)
where
    S: Stream<Item = Result<Message, E>> + Sink<Message, Error = E> + Unpin,
    E: Display,
{
    tracing::info!(remote_addr = %peer, "Upgraded to websocket");

    if let Some(greeting) = greeting {
        if let Err(e) = socket.send(Message::Text(greeting.into())).await {
            tracing::info!(remote_addr = %peer, error = %e, "WebSocket closed");
            return;
        }
    }

    loop {
        let message = match socket.next().await {
            Some(Ok(message)) => message,
            Some(Err(e)) => {
                tracing::info!(remote_addr = %peer, error = %e, "WebSocket closed");
                break;
            }
            None => {
                tracing::info!(remote_addr = %peer, "WebSocket closed");
                break;
            }
        };

        let echo = match message {
            Message::Text(text) => {
                tracing::info!(remote_addr = %peer, "txt | {}", text.as_str());
                metrics::record_websocket_frame("text");
                Message::Text(text)
            }
            Message::Binary(data) => {
                tracing::info!(remote_addr = %peer, "bin | {} byte(s)", data.len());
                metrics::record_websocket_frame("binary");
                Message::Binary(data)
            }
            Message::Close(frame) => {
                tracing::info!(remote_addr = %peer, frame = ?frame, "WebSocket closed by peer");
                // Complete the closing handshake with the peer's own code.
                let _ = socket.send(Message::Close(frame)).await;
                break;
            }
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        if let Err(e) = socket.send(echo).await {
            tracing::info!(remote_addr = %peer, error = %e, "WebSocket closed");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::ws::CloseFrame;
    use bytes::Bytes;
    use std::collections::VecDeque;
    use std::convert::Infallible;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// In-memory socket: yields scripted frames, records sent ones.
    #[derive(Default)]
    struct ScriptedSocket {
        incoming: VecDeque<Message>,
        sent: Vec<Message>,
    }

    impl Stream for ScriptedSocket {
        type Item = Result<Message, Infallible>;

        fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            Poll::Ready(self.incoming.pop_front().map(Ok))
        }
    }

    impl Sink<Message> for ScriptedSocket {
        type Error = Infallible;

        fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
            Poll::Ready(Ok(()))
        }

        fn start_send(mut self: Pin<&mut Self>, item: Message) -> Result<(), Infallible> {
            self.sent.push(item);
            Ok(())
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
            Poll::Ready(Ok(()))
        }
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:5000".parse().unwrap()
    }

    #[tokio::test]
    async fn greets_then_echoes_in_order() {
        let frames = vec![
            Message::Text("hello".into()),
            Message::Binary(Bytes::from_static(&[0, 1, 2, 255])),
            Message::Text("".into()),
            Message::Text("héllo wörld".into()),
        ];
        let mut socket = ScriptedSocket {
            incoming: frames.iter().cloned().collect(),
            ..Default::default()
        };

        run_session(&mut socket, peer(), Some("Request served by test".into())).await;

        assert_eq!(socket.sent.len(), frames.len() + 1);
        assert_eq!(socket.sent[0], Message::Text("Request served by test".into()));
        assert_eq!(&socket.sent[1..], &frames[..]);
    }

    #[tokio::test]
    async fn no_greeting_frame_when_disclosure_disabled() {
        let mut socket = ScriptedSocket {
            incoming: VecDeque::from(vec![Message::Text("ping".into())]),
            ..Default::default()
        };

        run_session(&mut socket, peer(), None).await;

        assert_eq!(socket.sent, vec![Message::Text("ping".into())]);
    }

    #[tokio::test]
    async fn close_frame_is_answered_and_ends_session() {
        let mut socket = ScriptedSocket {
            incoming: VecDeque::from(vec![
                Message::Ping(Bytes::from_static(b"p")),
                Message::Text("before".into()),
                Message::Close(Some(CloseFrame {
                    code: 1000,
                    reason: "bye".into(),
                })),
                Message::Text("after".into()),
            ]),
            ..Default::default()
        };

        run_session(&mut socket, peer(), None).await;

        assert_eq!(
            socket.sent,
            vec![
                Message::Text("before".into()),
                Message::Close(Some(CloseFrame {
                    code: 1000,
                    reason: "bye".into(),
                })),
            ]
        );
        assert_eq!(socket.incoming.len(), 1, "frames after close are never read");
    }
}
