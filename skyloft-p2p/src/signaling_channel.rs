//! WebSocket signaling channel
//!
//! A duplex of JSON control messages used to negotiate WebRTC data channels
//! with the domain server's signaling endpoint. One channel serves every
//! data channel of a socket; the `id` field correlates replies with the
//! data channel that is negotiating.

use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Observable states of the signaling channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingChannelState {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// An SDP payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    /// "offer" or "answer".
    #[serde(rename = "type")]
    pub sdp_type: String,
    pub sdp: String,
}

/// One signaling message. All fields are optional on the wire; unknown
/// fields from the server are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalingMessage {
    /// Target node type byte; set by the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<u8>,
    /// Source node type byte; set by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u8>,
    /// Data-channel correlation ID, assigned locally and mirrored by the
    /// server so replies can be demultiplexed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u16>,
    /// Arbitrary JSON the server echoes back; used by connectivity tests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<serde_json::Value>,
    /// An SDP offer or answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<SessionDescription>,
    /// A trickled ICE candidate in RTCIceCandidateInit JSON form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<serde_json::Value>,
}

/// Events delivered to the signaling channel's owner.
#[derive(Debug)]
pub enum SignalingEvent {
    Open,
    Message(SignalingMessage),
    Error(String),
    Closed,
}

enum Command {
    Send(SignalingMessage),
    Close,
}

/// Clonable handle for sending through an open signaling channel.
#[derive(Clone)]
pub struct SignalingSender {
    state: Arc<Mutex<SignalingChannelState>>,
    command_tx: UnboundedSender<Command>,
}

impl SignalingSender {
    /// Queue a message. Negotiation traffic is accepted while the channel
    /// is still connecting and flushed once it opens; a closed channel
    /// errors.
    pub fn send(&self, message: SignalingMessage) -> Result<()> {
        match *self.state.lock().unwrap() {
            SignalingChannelState::Connecting | SignalingChannelState::Open => {
                self.command_tx.send(Command::Send(message)).map_err(|_| Error::SignalingClosed)
            }
            _ => Err(Error::SignalingClosed),
        }
    }
}

/// A WebSocket-backed signaling channel.
pub struct SignalingChannel {
    state: Arc<Mutex<SignalingChannelState>>,
    command_tx: UnboundedSender<Command>,
}

impl SignalingChannel {
    /// Start connecting to a signaling endpoint. Returns immediately in
    /// CONNECTING; the outcome arrives as an `Open` or `Error` event.
    pub fn open(url: &str) -> (Self, UnboundedReceiver<SignalingEvent>) {
        let state = Arc::new(Mutex::new(SignalingChannelState::Connecting));
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_channel(url.to_string(), state.clone(), event_tx, command_rx));

        (Self { state, command_tx }, event_rx)
    }

    /// Current state.
    pub fn state(&self) -> SignalingChannelState {
        *self.state.lock().unwrap()
    }

    /// A clonable sending handle.
    pub fn sender(&self) -> SignalingSender {
        SignalingSender { state: self.state.clone(), command_tx: self.command_tx.clone() }
    }

    /// Queue a message; errors unless the channel is open.
    pub fn send(&self, message: SignalingMessage) -> Result<()> {
        if *self.state.lock().unwrap() != SignalingChannelState::Open {
            return Err(Error::SignalingClosed);
        }
        self.command_tx.send(Command::Send(message)).map_err(|_| Error::SignalingClosed)
    }

    /// Begin closing. Idempotent; the `Closed` event confirms completion.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        match *state {
            SignalingChannelState::Closing | SignalingChannelState::Closed => {}
            _ => {
                *state = SignalingChannelState::Closing;
                let _ = self.command_tx.send(Command::Close);
            }
        }
    }
}

async fn run_channel(
    url: String,
    state: Arc<Mutex<SignalingChannelState>>,
    event_tx: UnboundedSender<SignalingEvent>,
    mut command_rx: UnboundedReceiver<Command>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(error) => {
            warn!("Signaling connection to {url} failed: {error}");
            *state.lock().unwrap() = SignalingChannelState::Closed;
            let _ = event_tx.send(SignalingEvent::Error(error.to_string()));
            let _ = event_tx.send(SignalingEvent::Closed);
            return;
        }
    };

    // The close() call may have raced the connect; honor it.
    {
        let mut state = state.lock().unwrap();
        if *state == SignalingChannelState::Closing {
            *state = SignalingChannelState::Closed;
            let _ = event_tx.send(SignalingEvent::Closed);
            return;
        }
        *state = SignalingChannelState::Open;
    }
    let _ = event_tx.send(SignalingEvent::Open);

    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            command = command_rx.recv() => match command {
                Some(Command::Send(message)) => {
                    let json = match serde_json::to_string(&message) {
                        Ok(json) => json,
                        Err(error) => {
                            warn!("Dropping unserializable signaling message: {error}");
                            continue;
                        }
                    };
                    if let Err(error) = sink.send(Message::Text(json)).await {
                        let _ = event_tx.send(SignalingEvent::Error(error.to_string()));
                        break;
                    }
                }
                Some(Command::Close) | None => {
                    *state.lock().unwrap() = SignalingChannelState::Closing;
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            },
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => match serde_json::from_str(&text) {
                    Ok(message) => {
                        let _ = event_tx.send(SignalingEvent::Message(message));
                    }
                    Err(error) => warn!("Undecodable signaling message: {error}"),
                },
                Some(Ok(Message::Close(_))) | None => {
                    debug!("Signaling connection closed by {url}");
                    break;
                }
                Some(Ok(_)) => {
                    // Binary and ping/pong frames are not part of the protocol.
                }
                Some(Err(error)) => {
                    let _ = event_tx.send(SignalingEvent::Error(error.to_string()));
                    break;
                }
            },
        }
    }

    *state.lock().unwrap() = SignalingChannelState::Closed;
    let _ = event_tx.send(SignalingEvent::Closed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_serialize_with_the_wire_field_names() {
        let message = SignalingMessage {
            to: Some(b'D'),
            id: Some(1),
            description: Some(SessionDescription {
                sdp_type: "offer".to_string(),
                sdp: "v=0".to_string(),
            }),
            ..SignalingMessage::default()
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&message).unwrap()).unwrap();
        assert_eq!(json["to"], 68);
        assert_eq!(json["id"], 1);
        assert_eq!(json["description"]["type"], "offer");
        assert_eq!(json["description"]["sdp"], "v=0");
        // Unset fields stay off the wire entirely.
        assert!(json.get("from").is_none());
        assert!(json.get("candidate").is_none());
    }

    #[test]
    fn unknown_fields_from_the_server_are_ignored() {
        let message: SignalingMessage =
            serde_json::from_str(r#"{"from":68,"echo":"hello","server_build":"1.2.3"}"#).unwrap();
        assert_eq!(message.from, Some(68));
        assert_eq!(message.echo, Some(serde_json::json!("hello")));
    }

    #[tokio::test]
    async fn unreachable_endpoint_reports_error_then_closed() {
        let (channel, mut events) = SignalingChannel::open("ws://0.0.0.0:0");
        assert!(matches!(events.recv().await, Some(SignalingEvent::Error(_))));
        assert!(matches!(events.recv().await, Some(SignalingEvent::Closed)));
        assert_eq!(channel.state(), SignalingChannelState::Closed);

        // Sends after close fail cleanly.
        assert!(channel.send(SignalingMessage::default()).is_err());
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let (channel, mut events) = SignalingChannel::open("ws://0.0.0.0:0");
        channel.close();
        channel.close();
        while events.recv().await.is_some() {}
        assert_eq!(channel.state(), SignalingChannelState::Closed);
    }

    /// Scenario 1 of the transport contract, run against a live domain
    /// server's signaling endpoint.
    #[tokio::test]
    #[ignore = "requires a domain server at ws://127.0.0.1:40102"]
    async fn echo_against_a_live_server() {
        let (channel, mut events) = SignalingChannel::open("ws://127.0.0.1:40102");
        assert!(matches!(events.recv().await, Some(SignalingEvent::Open)));

        channel
            .send(SignalingMessage {
                to: Some(b'D'),
                echo: Some(serde_json::json!("Hello")),
                ..SignalingMessage::default()
            })
            .unwrap();

        loop {
            match events.recv().await {
                Some(SignalingEvent::Message(message)) => {
                    assert_eq!(message.echo, Some(serde_json::json!("Hello")));
                    break;
                }
                Some(_) => continue,
                None => panic!("channel closed before the echo arrived"),
            }
        }
        channel.close();
    }
}
