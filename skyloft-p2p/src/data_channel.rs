//! WebRTC data channel
//!
//! One data channel connects this client to one remote node. The channel
//! owns its peer connection, drives the offer/ICE half of the handshake
//! through the signaling channel, and surfaces everything observable as
//! events: Open, Message, Error, Closed.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::setting_engine::SettingEngine;
use webrtc::api::APIBuilder;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::RTCPeerConnection;

use skyloft_protocol::node_type::NodeType;

use crate::error::Result;
use crate::signaling_channel::{SessionDescription, SignalingMessage};

/// Observable states of a data channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataChannelState {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// Events delivered to the data channel's owner.
#[derive(Debug)]
pub enum DataChannelEvent {
    Open,
    Message(Vec<u8>),
    Error(String),
    Closed,
}

/// A WebRTC data channel to one remote node.
pub struct WebRtcDataChannel {
    node_type: NodeType,
    channel_id: u16,
    state: Arc<Mutex<DataChannelState>>,
    peer_connection: Arc<RTCPeerConnection>,
    data_channel: Arc<RTCDataChannel>,
    event_tx: UnboundedSender<DataChannelEvent>,
}

impl WebRtcDataChannel {
    /// Create a channel to `node_type` and start negotiating.
    ///
    /// Outbound signaling messages (the offer, then trickled ICE
    /// candidates) are pushed into `signal_out` tagged with `channel_id`;
    /// the returned sender accepts the routed replies. Negotiation proceeds
    /// in the background; progress arrives on the event receiver.
    pub async fn connect(
        node_type: NodeType,
        channel_id: u16,
        signal_out: UnboundedSender<SignalingMessage>,
    ) -> Result<(Arc<Self>, UnboundedReceiver<DataChannelEvent>, UnboundedSender<SignalingMessage>)>
    {
        let mut media_engine = MediaEngine::default();
        let mut registry = Registry::new();
        registry = register_default_interceptors(registry, &mut media_engine)?;
        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .with_setting_engine(SettingEngine::default())
            .build();

        let peer_connection =
            Arc::new(api.new_peer_connection(RTCConfiguration::default()).await?);

        // Datagram-style channel: unordered, no retransmits.
        let init = RTCDataChannelInit {
            ordered: Some(false),
            max_retransmits: Some(0),
            ..RTCDataChannelInit::default()
        };
        let data_channel =
            peer_connection.create_data_channel("skyloft-data", Some(init)).await?;

        let state = Arc::new(Mutex::new(DataChannelState::Connecting));
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (signal_in_tx, signal_in_rx) = mpsc::unbounded_channel();

        let channel = Arc::new(Self {
            node_type,
            channel_id,
            state: state.clone(),
            peer_connection: peer_connection.clone(),
            data_channel: data_channel.clone(),
            event_tx: event_tx.clone(),
        });

        channel.install_callbacks(signal_out.clone());
        tokio::spawn(apply_remote_signals(
            peer_connection.clone(),
            state.clone(),
            event_tx.clone(),
            signal_in_rx,
        ));

        // Kick off the handshake: offer out through signaling.
        let offer = peer_connection.create_offer(None).await?;
        peer_connection.set_local_description(offer.clone()).await?;
        let message = SignalingMessage {
            to: Some(node_type.as_u8()),
            id: Some(channel_id),
            description: Some(SessionDescription {
                sdp_type: "offer".to_string(),
                sdp: offer.sdp,
            }),
            ..SignalingMessage::default()
        };
        if signal_out.send(message).is_err() {
            channel.fail("signaling channel went away before the offer was sent");
        }

        Ok((channel, event_rx, signal_in_tx))
    }

    fn install_callbacks(&self, signal_out: UnboundedSender<SignalingMessage>) {
        let state = self.state.clone();
        let event_tx = self.event_tx.clone();
        self.data_channel.on_open(Box::new(move || {
            *state.lock().unwrap() = DataChannelState::Open;
            let _ = event_tx.send(DataChannelEvent::Open);
            Box::pin(async {})
        }));

        let event_tx = self.event_tx.clone();
        self.data_channel.on_message(Box::new(move |message: DataChannelMessage| {
            let _ = event_tx.send(DataChannelEvent::Message(message.data.to_vec()));
            Box::pin(async {})
        }));

        let state = self.state.clone();
        let event_tx = self.event_tx.clone();
        self.data_channel.on_close(Box::new(move || {
            let mut state = state.lock().unwrap();
            if *state != DataChannelState::Closed {
                *state = DataChannelState::Closed;
                let _ = event_tx.send(DataChannelEvent::Closed);
            }
            Box::pin(async {})
        }));

        let node_type = self.node_type;
        let channel_id = self.channel_id;
        self.peer_connection.on_ice_candidate(Box::new(move |candidate: Option<RTCIceCandidate>| {
            if let Some(candidate) = candidate {
                match candidate.to_json() {
                    Ok(init) => {
                        let message = SignalingMessage {
                            to: Some(node_type.as_u8()),
                            id: Some(channel_id),
                            candidate: serde_json::to_value(init).ok(),
                            ..SignalingMessage::default()
                        };
                        let _ = signal_out.send(message);
                    }
                    Err(error) => warn!("Cannot serialize ICE candidate: {error}"),
                }
            }
            Box::pin(async {})
        }));

        let state = self.state.clone();
        let event_tx = self.event_tx.clone();
        self.peer_connection.on_peer_connection_state_change(Box::new(
            move |connection_state: RTCPeerConnectionState| {
                match connection_state {
                    RTCPeerConnectionState::Failed | RTCPeerConnectionState::Disconnected => {
                        let mut state = state.lock().unwrap();
                        if *state != DataChannelState::Closed {
                            *state = DataChannelState::Closed;
                            let _ = event_tx.send(DataChannelEvent::Error(format!(
                                "peer connection {connection_state}"
                            )));
                            let _ = event_tx.send(DataChannelEvent::Closed);
                        }
                    }
                    _ => {}
                }
                Box::pin(async {})
            },
        ));
    }

    /// The remote node type this channel serves.
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// The signaling correlation ID bound to this channel.
    pub fn channel_id(&self) -> u16 {
        self.channel_id
    }

    /// Current state.
    pub fn ready_state(&self) -> DataChannelState {
        *self.state.lock().unwrap()
    }

    /// Send a payload. Succeeds only in OPEN; a send on a closed channel
    /// returns false and emits an error event rather than throwing.
    pub async fn send(&self, payload: &[u8]) -> bool {
        if self.ready_state() != DataChannelState::Open {
            let _ = self
                .event_tx
                .send(DataChannelEvent::Error("send on a channel that is not open".to_string()));
            return false;
        }
        match self.data_channel.send(&Bytes::copy_from_slice(payload)).await {
            Ok(_) => true,
            Err(error) => {
                let _ = self.event_tx.send(DataChannelEvent::Error(error.to_string()));
                false
            }
        }
    }

    /// Close the channel. Idempotent; transitions through CLOSING to CLOSED.
    pub async fn close(&self) {
        {
            let mut state = self.state.lock().unwrap();
            match *state {
                DataChannelState::Closing | DataChannelState::Closed => return,
                _ => *state = DataChannelState::Closing,
            }
        }
        let _ = self.data_channel.close().await;
        let _ = self.peer_connection.close().await;
        let mut state = self.state.lock().unwrap();
        if *state != DataChannelState::Closed {
            *state = DataChannelState::Closed;
            let _ = self.event_tx.send(DataChannelEvent::Closed);
        }
    }

    /// Fail the channel while it is still negotiating, e.g. because the
    /// signaling channel died under it. No-op once open or closed.
    pub fn fail(&self, reason: &str) {
        let mut state = self.state.lock().unwrap();
        if *state == DataChannelState::Connecting {
            *state = DataChannelState::Closed;
            let _ = self.event_tx.send(DataChannelEvent::Error(reason.to_string()));
            let _ = self.event_tx.send(DataChannelEvent::Closed);
        }
    }
}

/// Apply answers and ICE candidates routed back from the signaling channel.
async fn apply_remote_signals(
    peer_connection: Arc<RTCPeerConnection>,
    state: Arc<Mutex<DataChannelState>>,
    event_tx: UnboundedSender<DataChannelEvent>,
    mut signal_in_rx: UnboundedReceiver<SignalingMessage>,
) {
    while let Some(message) = signal_in_rx.recv().await {
        if let Some(description) = message.description {
            if description.sdp_type != "answer" {
                debug!("Ignoring non-answer description: {}", description.sdp_type);
                continue;
            }
            let answer = match RTCSessionDescription::answer(description.sdp) {
                Ok(answer) => answer,
                Err(error) => {
                    fail_negotiation(&state, &event_tx, &format!("bad answer SDP: {error}"));
                    continue;
                }
            };
            if let Err(error) = peer_connection.set_remote_description(answer).await {
                fail_negotiation(&state, &event_tx, &format!("cannot apply answer: {error}"));
            }
        } else if let Some(candidate) = message.candidate {
            let init: RTCIceCandidateInit = match serde_json::from_value(candidate) {
                Ok(init) => init,
                Err(error) => {
                    warn!("Undecodable ICE candidate: {error}");
                    continue;
                }
            };
            if let Err(error) = peer_connection.add_ice_candidate(init).await {
                warn!("Cannot add ICE candidate: {error}");
            }
        }
    }
}

fn fail_negotiation(
    state: &Arc<Mutex<DataChannelState>>,
    event_tx: &UnboundedSender<DataChannelEvent>,
    reason: &str,
) {
    let mut state = state.lock().unwrap();
    if *state == DataChannelState::Connecting {
        *state = DataChannelState::Closed;
        let _ = event_tx.send(DataChannelEvent::Error(reason.to_string()));
        let _ = event_tx.send(DataChannelEvent::Closed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_channel_starts_connecting_and_offers() {
        let (signal_tx, mut signal_rx) = mpsc::unbounded_channel();
        let (channel, _events, _signals) =
            WebRtcDataChannel::connect(NodeType::DomainServer, 7, signal_tx).await.unwrap();

        assert_eq!(channel.ready_state(), DataChannelState::Connecting);
        assert_eq!(channel.node_type(), NodeType::DomainServer);

        // The first outbound signaling message is the offer, tagged with
        // this channel's correlation ID.
        let offer = signal_rx.recv().await.unwrap();
        assert_eq!(offer.to, Some(b'D'));
        assert_eq!(offer.id, Some(7));
        let description = offer.description.unwrap();
        assert_eq!(description.sdp_type, "offer");
        assert!(description.sdp.contains("webrtc-datachannel"));

        channel.close().await;
    }

    #[tokio::test]
    async fn send_after_close_returns_false_and_reports() {
        let (signal_tx, _signal_rx) = mpsc::unbounded_channel();
        let (channel, mut events, _signals) =
            WebRtcDataChannel::connect(NodeType::AudioMixer, 1, signal_tx).await.unwrap();

        channel.close().await;
        assert_eq!(channel.ready_state(), DataChannelState::Closed);
        assert!(!channel.send(b"echo:Hello").await);

        let mut saw_error = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, DataChannelEvent::Error(_)) {
                saw_error = true;
            }
        }
        assert!(saw_error);
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let (signal_tx, _signal_rx) = mpsc::unbounded_channel();
        let (channel, _events, _signals) =
            WebRtcDataChannel::connect(NodeType::EntityServer, 2, signal_tx).await.unwrap();

        channel.close().await;
        channel.close().await;
        assert_eq!(channel.ready_state(), DataChannelState::Closed);
    }

    #[tokio::test]
    async fn signaling_loss_fails_a_negotiating_channel() {
        let (signal_tx, _signal_rx) = mpsc::unbounded_channel();
        let (channel, mut events, _signals) =
            WebRtcDataChannel::connect(NodeType::AvatarMixer, 3, signal_tx).await.unwrap();

        channel.fail("signaling channel closed");
        assert_eq!(channel.ready_state(), DataChannelState::Closed);

        let mut saw_error = false;
        let mut saw_closed = false;
        while let Ok(event) = events.try_recv() {
            match event {
                DataChannelEvent::Error(_) => saw_error = true,
                DataChannelEvent::Closed => saw_closed = true,
                _ => {}
            }
        }
        assert!(saw_error && saw_closed);
    }
}
