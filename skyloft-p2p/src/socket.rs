//! One-to-many WebRTC socket
//!
//! The socket owns exactly one signaling channel and an arena of data
//! channels keyed by small `ChannelId` handles, with indexes by remote node
//! type and by bound socket address. A router task demultiplexes signaling
//! replies to the negotiating channel by correlation ID; each channel's
//! events are pumped into a shared datagram queue and a socket event queue
//! for the node list to consume from one select loop.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use skyloft_protocol::node_type::NodeType;

use crate::config::Config;
use crate::data_channel::{DataChannelEvent, DataChannelState, WebRtcDataChannel};
use crate::error::{Error, Result};
use crate::signaling_channel::{
    SignalingChannel, SignalingChannelState, SignalingEvent, SignalingMessage,
};

/// Handle to one data-channel slot in the socket's arena.
pub type ChannelId = u16;

/// Connection state of one peer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    Unconnected,
    Connecting,
    Connected,
}

/// One received datagram.
#[derive(Debug)]
pub struct Datagram {
    pub channel_id: ChannelId,
    pub node_type: NodeType,
    /// The bound remote address, once the node list has bound one.
    pub from: Option<SocketAddr>,
    pub bytes: Vec<u8>,
}

/// Lifecycle events of the socket's channels.
#[derive(Debug)]
pub enum SocketEvent {
    ChannelOpened { channel_id: ChannelId, node_type: NodeType },
    ChannelClosed { channel_id: ChannelId, node_type: NodeType, error: Option<String> },
}

struct ChannelEntry {
    channel: Arc<WebRtcDataChannel>,
    node_type: NodeType,
}

/// Routing table shared with the signaling router task.
type Routes = Arc<Mutex<HashMap<ChannelId, RouteEntry>>>;

struct RouteEntry {
    signal_tx: UnboundedSender<SignalingMessage>,
    channel: Arc<WebRtcDataChannel>,
}

/// The socket's receive side: datagrams from every channel plus channel
/// lifecycle events, consumed from the owner's select loop.
pub struct SocketReceivers {
    pub datagrams: UnboundedReceiver<Datagram>,
    pub events: UnboundedReceiver<SocketEvent>,
}

/// A one-to-many datagram socket over WebRTC data channels.
pub struct WebRtcSocket {
    config: Config,
    signaling: Option<SignalingChannel>,
    channels: HashMap<ChannelId, ChannelEntry>,
    by_type: HashMap<NodeType, ChannelId>,
    by_addr: HashMap<SocketAddr, ChannelId>,
    next_channel_id: ChannelId,
    routes: Routes,
    datagram_tx: UnboundedSender<Datagram>,
    event_tx: UnboundedSender<SocketEvent>,
    bound_addrs: Arc<Mutex<HashMap<ChannelId, SocketAddr>>>,
}

impl WebRtcSocket {
    pub fn new(config: Config) -> (Self, SocketReceivers) {
        let (datagram_tx, datagram_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let socket = Self {
            config,
            signaling: None,
            channels: HashMap::new(),
            by_type: HashMap::new(),
            by_addr: HashMap::new(),
            next_channel_id: 0,
            routes: Arc::new(Mutex::new(HashMap::new())),
            datagram_tx,
            event_tx,
            bound_addrs: Arc::new(Mutex::new(HashMap::new())),
        };
        (socket, SocketReceivers { datagrams: datagram_rx, events: event_rx })
    }

    /// The configuration this socket was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open a data channel to `node_type` at `url`, reusing the signaling
    /// channel when one is already open. Returns while negotiation is still
    /// in progress; completion arrives as a `ChannelOpened` event.
    ///
    /// At most one channel exists per node type; a second connect to the
    /// same type while one is live returns the existing handle.
    pub async fn connect_to_host(&mut self, url: &str, node_type: NodeType) -> Result<ChannelId> {
        if let Some(&channel_id) = self.by_type.get(&node_type) {
            if self.state(node_type) != SocketState::Unconnected {
                return Ok(channel_id);
            }
            self.drop_channel(channel_id);
        }

        let signaling_ok = matches!(
            self.signaling.as_ref().map(|signaling| signaling.state()),
            Some(SignalingChannelState::Connecting) | Some(SignalingChannelState::Open)
        );
        if !signaling_ok {
            info!("Opening signaling channel to {url}");
            let (signaling, events) = SignalingChannel::open(url);
            tokio::spawn(route_signaling(events, self.routes.clone()));
            self.signaling = Some(signaling);
        }

        let channel_id = self.next_channel_id;
        self.next_channel_id = self.next_channel_id.wrapping_add(1);

        // Outbound signaling from the channel goes through a forwarder so
        // the channel itself never holds the signaling handle.
        let (signal_out_tx, signal_out_rx) = mpsc::unbounded_channel();
        let sender = match self.signaling.as_ref() {
            Some(signaling) => signaling.sender(),
            None => return Err(Error::SignalingClosed),
        };
        tokio::spawn(forward_outbound_signals(signal_out_rx, sender));

        let (channel, events, signal_in_tx) =
            WebRtcDataChannel::connect(node_type, channel_id, signal_out_tx).await?;

        self.routes
            .lock()
            .unwrap()
            .insert(channel_id, RouteEntry { signal_tx: signal_in_tx, channel: channel.clone() });
        self.channels.insert(channel_id, ChannelEntry { channel: channel.clone(), node_type });
        self.by_type.insert(node_type, channel_id);

        tokio::spawn(pump_channel_events(
            channel_id,
            node_type,
            events,
            self.datagram_tx.clone(),
            self.event_tx.clone(),
            self.bound_addrs.clone(),
        ));

        Ok(channel_id)
    }

    /// Connection state of the slot serving `node_type`.
    pub fn state(&self, node_type: NodeType) -> SocketState {
        match self.by_type.get(&node_type).and_then(|id| self.channels.get(id)) {
            Some(entry) => match entry.channel.ready_state() {
                DataChannelState::Connecting => SocketState::Connecting,
                DataChannelState::Open => SocketState::Connected,
                DataChannelState::Closing | DataChannelState::Closed => SocketState::Unconnected,
            },
            None => SocketState::Unconnected,
        }
    }

    /// Bind a remote address to a channel so datagrams can be addressed to
    /// it. A node's public and local addresses may both bind to one channel.
    pub fn bind_addr(&mut self, addr: SocketAddr, channel_id: ChannelId) {
        self.by_addr.insert(addr, channel_id);
        if self.channels.contains_key(&channel_id) {
            self.bound_addrs.lock().unwrap().entry(channel_id).or_insert(addr);
        }
    }

    /// Send to a bound address. False if no open channel serves it.
    pub async fn write_datagram(&self, addr: SocketAddr, bytes: &[u8]) -> bool {
        match self.by_addr.get(&addr).and_then(|id| self.channels.get(id)) {
            Some(entry) => entry.channel.send(bytes).await,
            None => {
                debug!("No channel bound to {addr}");
                false
            }
        }
    }

    /// Send to a channel by its handle. False if the slot is gone.
    pub async fn write_datagram_to_channel(&self, channel_id: ChannelId, bytes: &[u8]) -> bool {
        match self.channels.get(&channel_id) {
            Some(entry) => entry.channel.send(bytes).await,
            None => {
                debug!("No channel in slot {channel_id}");
                false
            }
        }
    }

    /// Send to the channel serving a node type. False if none is open.
    pub async fn write_datagram_to_type(&self, node_type: NodeType, bytes: &[u8]) -> bool {
        match self.by_type.get(&node_type).and_then(|id| self.channels.get(id)) {
            Some(entry) => entry.channel.send(bytes).await,
            None => {
                debug!("No channel serving {node_type}");
                false
            }
        }
    }

    /// Close one channel and free its slot.
    pub async fn close_channel(&mut self, channel_id: ChannelId) {
        if let Some(entry) = self.channels.get(&channel_id) {
            entry.channel.close().await;
        }
        self.drop_channel(channel_id);
    }

    /// Close every data channel and the signaling channel. The socket is
    /// immediately reusable; the next connect reopens signaling.
    pub async fn clear_connections(&mut self) {
        info!("Clearing {} data channel(s)", self.channels.len());
        for entry in self.channels.values() {
            entry.channel.close().await;
        }
        self.channels.clear();
        self.by_type.clear();
        self.by_addr.clear();
        self.routes.lock().unwrap().clear();
        self.bound_addrs.lock().unwrap().clear();
        if let Some(signaling) = self.signaling.take() {
            signaling.close();
        }
    }

    /// Drop everything without the closing handshake.
    pub async fn abort(&mut self) {
        warn!("Aborting socket with {} data channel(s)", self.channels.len());
        self.clear_connections().await;
    }

    fn drop_channel(&mut self, channel_id: ChannelId) {
        if let Some(entry) = self.channels.remove(&channel_id) {
            if self.by_type.get(&entry.node_type) == Some(&channel_id) {
                self.by_type.remove(&entry.node_type);
            }
        }
        self.by_addr.retain(|_, id| *id != channel_id);
        self.routes.lock().unwrap().remove(&channel_id);
        self.bound_addrs.lock().unwrap().remove(&channel_id);
    }
}

/// Demultiplex signaling replies to the owning channel; fail all channels
/// that are still negotiating when the signaling channel dies.
async fn route_signaling(mut events: UnboundedReceiver<SignalingEvent>, routes: Routes) {
    while let Some(event) = events.recv().await {
        match event {
            SignalingEvent::Open => debug!("Signaling channel open"),
            SignalingEvent::Message(message) => match message.id {
                Some(channel_id) => {
                    let signal_tx = routes
                        .lock()
                        .unwrap()
                        .get(&channel_id)
                        .map(|entry| entry.signal_tx.clone());
                    match signal_tx {
                        Some(signal_tx) => {
                            let _ = signal_tx.send(message);
                        }
                        None => debug!("Signaling reply for unknown channel {channel_id}"),
                    }
                }
                None => debug!("Signaling message without a channel id"),
            },
            SignalingEvent::Error(error) => {
                warn!("Signaling channel error: {error}");
            }
            SignalingEvent::Closed => {
                let channels: Vec<_> = routes
                    .lock()
                    .unwrap()
                    .values()
                    .map(|entry| entry.channel.clone())
                    .collect();
                for channel in channels {
                    channel.fail("signaling channel closed during negotiation");
                }
                break;
            }
        }
    }
}

/// Forward a channel's outbound signaling into the shared signaling channel.
async fn forward_outbound_signals(
    mut signal_out_rx: UnboundedReceiver<SignalingMessage>,
    sender: crate::signaling_channel::SignalingSender,
) {
    while let Some(message) = signal_out_rx.recv().await {
        if let Err(error) = sender.send(message) {
            debug!("Dropping outbound signal: {error}");
        }
    }
}

/// Turn one channel's events into datagrams and socket events.
async fn pump_channel_events(
    channel_id: ChannelId,
    node_type: NodeType,
    mut events: UnboundedReceiver<DataChannelEvent>,
    datagram_tx: UnboundedSender<Datagram>,
    event_tx: UnboundedSender<SocketEvent>,
    bound_addrs: Arc<Mutex<HashMap<ChannelId, SocketAddr>>>,
) {
    let mut last_error = None;
    while let Some(event) = events.recv().await {
        match event {
            DataChannelEvent::Open => {
                let _ = event_tx.send(SocketEvent::ChannelOpened { channel_id, node_type });
            }
            DataChannelEvent::Message(bytes) => {
                let from = bound_addrs.lock().unwrap().get(&channel_id).copied();
                let _ = datagram_tx.send(Datagram { channel_id, node_type, from, bytes });
            }
            DataChannelEvent::Error(error) => {
                warn!("Data channel {channel_id} ({node_type}): {error}");
                last_error = Some(error);
            }
            DataChannelEvent::Closed => {
                let _ = event_tx.send(SocketEvent::ChannelClosed {
                    channel_id,
                    node_type,
                    error: last_error.take(),
                });
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    /// A signaling endpoint that accepts connections and swallows whatever
    /// arrives, keeping channels parked in CONNECTING.
    async fn spawn_signaling_stub() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    if let Ok(mut socket) = tokio_tungstenite::accept_async(stream).await {
                        while let Some(Ok(_)) = socket.next().await {}
                    }
                });
            }
        });
        format!("ws://{addr}")
    }

    #[tokio::test]
    async fn fresh_socket_is_unconnected_everywhere() {
        let (socket, _receivers) = WebRtcSocket::new(Config::default());
        assert_eq!(socket.state(NodeType::DomainServer), SocketState::Unconnected);
        assert_eq!(socket.state(NodeType::AudioMixer), SocketState::Unconnected);
    }

    #[tokio::test]
    async fn writes_to_unknown_destinations_fail_softly() {
        let (socket, _receivers) = WebRtcSocket::new(Config::default());
        assert!(!socket.write_datagram("127.0.0.1:40102".parse().unwrap(), b"hello").await);
        assert!(!socket.write_datagram_to_type(NodeType::AvatarMixer, b"hello").await);
    }

    #[tokio::test]
    async fn connect_creates_a_connecting_slot_and_reuses_it() {
        let url = spawn_signaling_stub().await;
        let (mut socket, _receivers) = WebRtcSocket::new(Config::default());

        let first = socket.connect_to_host(&url, NodeType::DomainServer).await.unwrap();
        assert_eq!(socket.state(NodeType::DomainServer), SocketState::Connecting);

        // A second connect for the same live slot hands back the same id.
        let second = socket.connect_to_host(&url, NodeType::DomainServer).await.unwrap();
        assert_eq!(first, second);

        socket.clear_connections().await;
        assert_eq!(socket.state(NodeType::DomainServer), SocketState::Unconnected);
    }

    #[tokio::test]
    async fn clear_connections_leaves_the_socket_reusable() {
        let url = spawn_signaling_stub().await;
        let (mut socket, _receivers) = WebRtcSocket::new(Config::default());
        socket.connect_to_host(&url, NodeType::DomainServer).await.unwrap();
        socket.clear_connections().await;

        // Connecting again after a clear allocates a fresh slot.
        let id = socket.connect_to_host(&url, NodeType::DomainServer).await.unwrap();
        assert_eq!(socket.state(NodeType::DomainServer), SocketState::Connecting);
        socket.close_channel(id).await;
        socket.clear_connections().await;
    }

    #[tokio::test]
    async fn bound_addresses_route_to_their_channel() {
        let url = spawn_signaling_stub().await;
        let (mut socket, _receivers) = WebRtcSocket::new(Config::default());
        let id = socket.connect_to_host(&url, NodeType::EntityServer).await.unwrap();

        let public: SocketAddr = "203.0.113.9:40102".parse().unwrap();
        let local: SocketAddr = "192.168.1.9:40102".parse().unwrap();
        socket.bind_addr(public, id);
        socket.bind_addr(local, id);

        // The channel never opened, so sends fail, but through the channel
        // rather than the missing-binding path.
        assert!(!socket.write_datagram(public, b"ping").await);
        assert!(!socket.write_datagram(local, b"ping").await);

        socket.clear_connections().await;
    }

    #[tokio::test]
    async fn two_sockets_keep_their_signaling_streams_apart() {
        // Scenario: two independent signaling channels, one data channel
        // each, against the same server; neither sees the other's traffic.
        let url = spawn_signaling_stub().await;
        let (mut one, _receivers_one) = WebRtcSocket::new(Config::default());
        let (mut two, _receivers_two) = WebRtcSocket::new(Config::default());

        let id_one = one.connect_to_host(&url, NodeType::DomainServer).await.unwrap();
        let id_two = two.connect_to_host(&url, NodeType::DomainServer).await.unwrap();

        assert_eq!(one.state(NodeType::DomainServer), SocketState::Connecting);
        assert_eq!(two.state(NodeType::DomainServer), SocketState::Connecting);

        // Closing one socket leaves the other's slot untouched.
        one.clear_connections().await;
        assert_eq!(one.state(NodeType::DomainServer), SocketState::Unconnected);
        assert_eq!(two.state(NodeType::DomainServer), SocketState::Connecting);

        let _ = (id_one, id_two);
        two.clear_connections().await;
    }
}
