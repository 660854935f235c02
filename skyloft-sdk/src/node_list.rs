//! Node list
//!
//! The node list owns the socket, the roster and the domain handler, and
//! runs the whole connection lifecycle from one select loop: the 1 Hz
//! check-in timer drives connect and list requests, datagrams dispatch
//! through the packet receiver, and socket lifecycle events feed node
//! activation and recovery. Everything the interfaces observe flows out as
//! broadcast events and updates to the context's shared state.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::broadcast;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use skyloft_p2p::config::Config;
use skyloft_p2p::socket::{
    ChannelId, Datagram, SocketEvent, SocketReceivers, SocketState, WebRtcSocket,
};
use skyloft_protocol::entity::{decode_entity_edit, EntityEdit};
use skyloft_protocol::node_type::NodeType;
use skyloft_protocol::packet::{build_packet, PacketHeader, SequenceNumber};
use skyloft_protocol::packet_receiver::{PacketReceiver, ReceivedMessage};
use skyloft_protocol::packet_type::PacketType;
use skyloft_protocol::packets::{
    DomainConnectRequest, DomainConnectionDenied, DomainDisconnectRequest, DomainList,
    DomainListRequest, DomainServerAddedNode, DomainServerRemovedNode, NodeRecord, Ping,
    PingKind, PingReply,
};
use skyloft_support::reader::PacketDataReader;

use crate::context::SharedState;
use crate::domain_handler::{DomainHandler, DomainState};
use crate::mixers::AssignmentClientState;
use crate::node::{ActiveSocket, Node};

/// Events broadcast to the SDK interfaces.
#[derive(Debug, Clone)]
pub enum NodeListEvent {
    DomainStateChanged(DomainState),
    /// First DomainList of a connection cycle.
    ConnectedToDomain,
    NodeAdded { uuid: Uuid, node_type: NodeType },
    NodeActivated { uuid: Uuid, node_type: NodeType },
    NodeKilled { uuid: Uuid, node_type: NodeType },
    MixerStateChanged { node_type: NodeType, state: AssignmentClientState },
    EntityData(EntityEdit),
}

/// Commands from the SDK interfaces to the driver.
#[derive(Debug)]
pub enum NodeListCommand {
    Connect(String),
    Disconnect,
    /// Wrap a body in a header and send it to the node of a type.
    SendPacket { node_type: NodeType, packet_type: PacketType, body: Vec<u8> },
}

/// The assignment-client types a client is interested in.
const DEFAULT_INTEREST: [NodeType; 4] = [
    NodeType::AvatarMixer,
    NodeType::AudioMixer,
    NodeType::EntityServer,
    NodeType::MessagesMixer,
];

/// Roster of peers plus the domain handler, driven by `run`.
pub struct NodeList {
    config: Config,
    socket: WebRtcSocket,
    domain: DomainHandler,
    nodes: HashMap<Uuid, Node>,
    interest: Vec<NodeType>,
    sequences: HashMap<u8, SequenceNumber>,
    receiver: PacketReceiver,
    parsed_rx: UnboundedReceiver<ReceivedMessage>,
    event_tx: broadcast::Sender<NodeListEvent>,
    shared: Arc<Mutex<SharedState>>,
    last_disconnect: Option<Instant>,
    pending_connect: Option<String>,
}

impl NodeList {
    pub(crate) fn new(
        config: Config,
        shared: Arc<Mutex<SharedState>>,
        event_tx: broadcast::Sender<NodeListEvent>,
    ) -> (Self, SocketReceivers) {
        let (socket, receivers) = WebRtcSocket::new(config.clone());

        let (parsed_tx, parsed_rx) = mpsc::unbounded_channel();
        let mut receiver = PacketReceiver::new();
        for packet_type in [
            PacketType::Ping,
            PacketType::PingReply,
            PacketType::DomainList,
            PacketType::DomainConnectionDenied,
            PacketType::DomainServerAddedNode,
            PacketType::DomainServerRemovedNode,
            PacketType::EntityData,
            PacketType::EntityEdit,
        ] {
            let parsed_tx = parsed_tx.clone();
            receiver.register(
                packet_type,
                Box::new(move |message| {
                    let _ = parsed_tx.send(message.clone());
                }),
            );
        }

        let list = Self {
            config,
            socket,
            domain: DomainHandler::default(),
            nodes: HashMap::new(),
            interest: DEFAULT_INTEREST.to_vec(),
            sequences: HashMap::new(),
            receiver,
            parsed_rx,
            event_tx,
            shared,
            last_disconnect: None,
            pending_connect: None,
        };
        (list, receivers)
    }

    /// Drive the connection lifecycle until every command sender is gone.
    pub(crate) async fn run(
        mut self,
        receivers: SocketReceivers,
        mut command_rx: UnboundedReceiver<NodeListCommand>,
    ) {
        let SocketReceivers { mut datagrams, mut events } = receivers;
        let mut check_in = tokio::time::interval(self.config.check_in_period);
        check_in.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = command_rx.recv() => match command {
                    Some(NodeListCommand::Connect(url)) => self.start_connect(url).await,
                    Some(NodeListCommand::Disconnect) => self.disconnect().await,
                    Some(NodeListCommand::SendPacket { node_type, packet_type, body }) => {
                        let bytes = self.build_packet_bytes(packet_type, body);
                        self.socket.write_datagram_to_type(node_type, &bytes).await;
                    }
                    None => {
                        self.disconnect().await;
                        break;
                    }
                },
                _ = check_in.tick() => self.check_in_tick().await,
                datagram = datagrams.recv() => match datagram {
                    Some(datagram) => self.deliver(datagram).await,
                    None => break,
                },
                event = events.recv() => match event {
                    Some(event) => self.handle_socket_event(event).await,
                    None => break,
                },
            }
        }
    }

    // ---- check-in ----

    pub(crate) async fn check_in_tick(&mut self) {
        if let Some(url) = self.pending_connect.clone() {
            let settled = self
                .last_disconnect
                .map_or(true, |at| at.elapsed() >= self.config.reconnect_min_delay);
            if settled {
                self.pending_connect = None;
                self.begin_connect(url).await;
            }
            return;
        }

        let url = match self.domain.url() {
            Some(url) => url.to_string(),
            None => return,
        };
        match self.domain.state() {
            // Refused and errored domains stop check-ins until a new
            // connect; a deliberate disconnect stays disconnected.
            DomainState::Refused | DomainState::Error | DomainState::Disconnected => return,
            DomainState::Connecting | DomainState::Connected => {}
        }

        match self.socket.state(NodeType::DomainServer) {
            SocketState::Unconnected => {
                info!("Check-in: opening domain connection to {url}");
                if let Err(error) =
                    self.socket.connect_to_host(&url, NodeType::DomainServer).await
                {
                    warn!("Cannot open domain connection: {error}");
                }
            }
            SocketState::Connecting => {}
            SocketState::Connected => {
                if self.domain.is_connected() {
                    let request = DomainListRequest {
                        session_id: self.domain.session_id(),
                        interest: self.interest.clone(),
                    };
                    let mut body = Vec::new();
                    request.write_payload(&mut body);
                    self.send_to_domain(PacketType::DomainListRequest, body).await;
                } else {
                    let request = DomainConnectRequest {
                        session_id: self.domain.session_id(),
                        interest: self.interest.clone(),
                    };
                    let mut body = Vec::new();
                    request.write_payload(&mut body);
                    self.send_to_domain(PacketType::DomainConnectRequest, body).await;
                }
            }
        }

        self.remove_silent_nodes().await;
    }

    /// Kill assignment-client nodes that have been silent too long. The
    /// domain server is not in the roster and is never pruned here; its
    /// liveness belongs to the check-in protocol.
    pub(crate) async fn remove_silent_nodes(&mut self) {
        if !self.domain.is_connected() {
            return;
        }
        let timeout = self.config.silent_node_timeout;
        let silent: Vec<Uuid> = self
            .nodes
            .values()
            .filter(|node| node.is_silent(timeout))
            .map(|node| node.uuid())
            .collect();
        for uuid in silent {
            self.kill_node(uuid, "silent too long").await;
        }
    }

    // ---- commands ----

    pub(crate) async fn start_connect(&mut self, url: String) {
        if !(url.starts_with("ws://") || url.starts_with("wss://"))
            || url.trim_start_matches("wss://").trim_start_matches("ws://").is_empty()
        {
            warn!("Cannot connect: invalid signaling URL {url:?}");
            self.domain.set_error(format!("invalid URL: {url}"));
            self.publish_domain_state();
            return;
        }

        let same_host = self.domain.url() == Some(url.as_str());
        let in_barrier = self
            .last_disconnect
            .map_or(false, |at| at.elapsed() < self.config.reconnect_min_delay);
        if same_host && in_barrier {
            // Let the previous peer connections finish tearing down; the
            // check-in timer picks this up once the barrier has passed.
            debug!("Deferring reconnect to {url}");
            self.pending_connect = Some(url);
            return;
        }

        self.begin_connect(url).await;
    }

    async fn begin_connect(&mut self, url: String) {
        info!("Connecting to domain {url}");
        self.domain.start_connecting(url.clone());
        self.publish_domain_state();
        if let Err(error) = self.socket.connect_to_host(&url, NodeType::DomainServer).await {
            warn!("Cannot open domain connection: {error}");
        }
    }

    pub(crate) async fn disconnect(&mut self) {
        if self.socket.state(NodeType::DomainServer) == SocketState::Connected {
            // Best effort goodbye.
            let mut body = Vec::new();
            DomainDisconnectRequest.write_payload(&mut body);
            self.send_to_domain(PacketType::DomainDisconnectRequest, body).await;
        }

        self.domain.set_disconnected();
        self.publish_domain_state();

        let uuids: Vec<Uuid> = self.nodes.keys().copied().collect();
        for uuid in uuids {
            self.kill_node(uuid, "domain disconnect").await;
        }

        self.socket.clear_connections().await;
        self.last_disconnect = Some(Instant::now());
    }

    // ---- datagram delivery ----

    async fn deliver(&mut self, datagram: Datagram) {
        if let Some(node) =
            self.nodes.values_mut().find(|node| node.channel_id == Some(datagram.channel_id))
        {
            node.heard_from();
        }

        if !self.receiver.handle(&datagram.bytes, datagram.from) {
            return;
        }
        while let Ok(message) = self.parsed_rx.try_recv() {
            self.process_message(message, Some(datagram.channel_id)).await;
        }
    }

    pub(crate) async fn process_message(
        &mut self,
        message: ReceivedMessage,
        channel_id: Option<ChannelId>,
    ) {
        match message.header.packet_type {
            PacketType::DomainList => self.process_domain_list(&message).await,
            PacketType::DomainConnectionDenied => self.process_denial(&message),
            PacketType::DomainServerAddedNode => self.process_added_node(&message).await,
            PacketType::DomainServerRemovedNode => self.process_removed_node(&message).await,
            PacketType::Ping => self.process_ping(&message, channel_id).await,
            PacketType::PingReply => self.process_ping_reply(&message).await,
            PacketType::EntityData | PacketType::EntityEdit => self.process_entity_data(&message),
            _ => {}
        }
    }

    pub(crate) async fn process_domain_list(&mut self, message: &ReceivedMessage) {
        let mut reader = PacketDataReader::new(&message.payload);
        let list = match DomainList::read_payload(&mut reader) {
            Ok(list) => list,
            Err(error) => {
                warn!("Undecodable DomainList: {error}");
                return;
            }
        };

        // A DomainList supersedes a refusal; the server changed its mind.
        let first = !self.domain.is_connected();
        self.domain.set_connected(list.domain_id, list.local_id, list.session_id);
        self.publish_domain_state();
        if first {
            info!("Connected to domain {} as {}", list.domain_id, list.session_id);
            let _ = self.event_tx.send(NodeListEvent::ConnectedToDomain);
        }

        let advertised: HashSet<Uuid> = list.nodes.iter().map(|record| record.uuid).collect();
        for record in &list.nodes {
            if let Some(node) = self.nodes.get_mut(&record.uuid) {
                node.update_from(record);
                if let Some(id) = node.channel_id {
                    self.socket.bind_addr(record.public_addr, id);
                    self.socket.bind_addr(record.local_addr, id);
                }
            } else {
                self.add_node(record).await;
            }
        }

        let stale: Vec<Uuid> =
            self.nodes.keys().filter(|uuid| !advertised.contains(uuid)).copied().collect();
        for uuid in stale {
            self.kill_node(uuid, "absent from domain list").await;
        }
    }

    pub(crate) fn process_denial(&mut self, message: &ReceivedMessage) {
        let mut reader = PacketDataReader::new(&message.payload);
        let denial = match DomainConnectionDenied::read_payload(&mut reader) {
            Ok(denial) => denial,
            Err(error) => {
                warn!("Undecodable DomainConnectionDenied: {error}");
                return;
            }
        };
        warn!("Domain refused connection: {} ({:?})", denial.reason, denial.reason_code);
        self.domain.set_refused(denial.reason);
        self.publish_domain_state();
    }

    pub(crate) async fn process_added_node(&mut self, message: &ReceivedMessage) {
        let mut reader = PacketDataReader::new(&message.payload);
        match DomainServerAddedNode::read_payload(&mut reader) {
            Ok(added) => {
                if self.nodes.contains_key(&added.node.uuid) {
                    return;
                }
                self.add_node(&added.node).await;
            }
            Err(error) => warn!("Undecodable DomainServerAddedNode: {error}"),
        }
    }

    pub(crate) async fn process_removed_node(&mut self, message: &ReceivedMessage) {
        let mut reader = PacketDataReader::new(&message.payload);
        match DomainServerRemovedNode::read_payload(&mut reader) {
            Ok(removed) => {
                if !self.domain.session_id().is_nil()
                    && removed.node_id == self.domain.session_id()
                {
                    // The server naming our own session here has never been
                    // observed against a real domain.
                    unimplemented!("kill request naming the local session");
                }
                self.kill_node(removed.node_id, "removed by domain server").await;
            }
            Err(error) => warn!("Undecodable DomainServerRemovedNode: {error}"),
        }
    }

    async fn process_ping(&mut self, message: &ReceivedMessage, channel_id: Option<ChannelId>) {
        let mut reader = PacketDataReader::new(&message.payload);
        let ping = match Ping::read_payload(&mut reader) {
            Ok(ping) => ping,
            Err(error) => {
                warn!("Undecodable Ping: {error}");
                return;
            }
        };
        let reply = PingReply {
            kind: ping.kind,
            ping_timestamp: ping.timestamp,
            reply_timestamp: now_micros(),
        };
        let mut body = Vec::new();
        reply.write_payload(&mut body);
        let bytes = self.build_packet_bytes(PacketType::PingReply, body);
        if let Some(channel_id) = channel_id {
            self.socket.write_datagram_to_channel(channel_id, &bytes).await;
        }
    }

    async fn process_ping_reply(&mut self, message: &ReceivedMessage) {
        let mut reader = PacketDataReader::new(&message.payload);
        let reply = match PingReply::read_payload(&mut reader) {
            Ok(reply) => reply,
            Err(error) => {
                warn!("Undecodable PingReply: {error}");
                return;
            }
        };

        let sender = message.header.sender_id;
        let (uuid, node_type, newly_active) = match self.nodes.get_mut(&sender) {
            Some(node) => {
                node.heard_from();
                let newly_active = node.active_socket == ActiveSocket::None;
                if newly_active {
                    // First address to answer wins.
                    node.active_socket = match reply.kind {
                        PingKind::Local => ActiveSocket::Local,
                        PingKind::Public => ActiveSocket::Public,
                    };
                }
                (node.uuid(), node.node_type, newly_active)
            }
            None => return,
        };

        if newly_active {
            debug!("Activated {} via {:?} address", node_type, reply.kind);
            self.set_mixer_state(node_type, AssignmentClientState::Connected);
            let _ = self.event_tx.send(NodeListEvent::NodeActivated { uuid, node_type });
        }
    }

    fn process_entity_data(&mut self, message: &ReceivedMessage) {
        match decode_entity_edit(&message.payload) {
            Ok(edit) => {
                let _ = self.event_tx.send(NodeListEvent::EntityData(edit));
            }
            Err(error) => warn!("Undecodable entity data: {error}"),
        }
    }

    // ---- socket lifecycle ----

    pub(crate) async fn handle_socket_event(&mut self, event: SocketEvent) {
        match event {
            SocketEvent::ChannelOpened { channel_id, node_type } => {
                debug!("Channel {channel_id} to {node_type} open");
                if node_type == NodeType::DomainServer {
                    // The next check-in tick sends the connect request.
                    return;
                }
                self.probe_node_addresses(channel_id).await;
            }
            SocketEvent::ChannelClosed { channel_id, node_type, error } => {
                if let Some(reason) = error {
                    warn!("Channel {channel_id} to {node_type} closed: {reason}");
                }
                if node_type == NodeType::DomainServer {
                    match self.domain.state() {
                        DomainState::Connected | DomainState::Connecting => {
                            // Auto-recovery: the check-in timer reopens the
                            // transport and re-requests the roster.
                            self.domain.set_reconnecting();
                            self.publish_domain_state();
                        }
                        _ => {}
                    }
                } else {
                    let uuid = self
                        .nodes
                        .values()
                        .find(|node| node.channel_id == Some(channel_id))
                        .map(|node| node.uuid());
                    if let Some(uuid) = uuid {
                        self.kill_node(uuid, "data channel closed").await;
                    }
                }
            }
        }
    }

    /// Ping both advertised addresses of the node behind a fresh channel;
    /// the first reply latches the active address.
    async fn probe_node_addresses(&mut self, channel_id: ChannelId) {
        let (public_addr, local_addr, node_type) = match self
            .nodes
            .values_mut()
            .find(|node| node.channel_id == Some(channel_id))
        {
            Some(node) => {
                node.heard_from();
                (node.public_addr, node.local_addr, node.node_type)
            }
            None => return,
        };
        self.set_mixer_state(node_type, AssignmentClientState::Disconnected);

        for (kind, addr) in [(PingKind::Public, public_addr), (PingKind::Local, local_addr)] {
            let ping = Ping { kind, timestamp: now_micros() };
            let mut body = Vec::new();
            ping.write_payload(&mut body);
            let bytes = self.build_packet_bytes(PacketType::Ping, body);
            self.socket.write_datagram(addr, &bytes).await;
        }
    }

    // ---- roster maintenance ----

    pub(crate) async fn add_node(&mut self, record: &NodeRecord) {
        let mut node = Node::new(record);
        if let Some(url) = self.domain.url().map(str::to_string) {
            match self.socket.connect_to_host(&url, record.node_type).await {
                Ok(channel_id) => {
                    node.channel_id = Some(channel_id);
                    self.socket.bind_addr(record.public_addr, channel_id);
                    self.socket.bind_addr(record.local_addr, channel_id);
                }
                Err(error) => warn!("Cannot open channel to {}: {error}", record.node_type),
            }
        }

        info!("Added {} {}", record.node_type, record.uuid);
        self.set_mixer_state(record.node_type, AssignmentClientState::Disconnected);
        let _ = self
            .event_tx
            .send(NodeListEvent::NodeAdded { uuid: record.uuid, node_type: record.node_type });
        self.nodes.insert(record.uuid, node);
    }

    pub(crate) async fn kill_node(&mut self, uuid: Uuid, reason: &str) {
        let node = match self.nodes.remove(&uuid) {
            Some(node) => node,
            None => return,
        };
        info!("Killed {} {uuid}: {reason}", node.node_type);
        if let Some(channel_id) = node.channel_id {
            self.socket.close_channel(channel_id).await;
        }
        self.set_mixer_state(node.node_type, AssignmentClientState::Unavailable);
        let _ = self
            .event_tx
            .send(NodeListEvent::NodeKilled { uuid, node_type: node.node_type });
    }

    // ---- outgoing packets ----

    fn build_packet_bytes(&mut self, packet_type: PacketType, body: Vec<u8>) -> Vec<u8> {
        let sequence = self.sequences.entry(packet_type.as_u8()).or_default().next();
        let sender_id = if packet_type.is_sourceless() {
            Uuid::nil()
        } else {
            self.domain.session_id()
        };
        let header = PacketHeader::new(packet_type, sequence, sender_id);
        let mut packet = build_packet(&header, &body);
        header.sign(&mut packet);
        packet
    }

    async fn send_to_domain(&mut self, packet_type: PacketType, body: Vec<u8>) {
        let bytes = self.build_packet_bytes(packet_type, body);
        if !self.socket.write_datagram_to_type(NodeType::DomainServer, &bytes).await {
            debug!("Domain send of {packet_type:?} failed");
        }
    }

    // ---- shared state ----

    fn publish_domain_state(&self) {
        let mut shared = self.shared.lock().unwrap();
        shared.domain_state = self.domain.state();
        shared.refusal_reason = self.domain.refusal_reason().map(str::to_string);
        shared.session_id = self.domain.session_id();
        drop(shared);
        let _ = self.event_tx.send(NodeListEvent::DomainStateChanged(self.domain.state()));
    }

    fn set_mixer_state(&self, node_type: NodeType, state: AssignmentClientState) {
        let changed = {
            let mut shared = self.shared.lock().unwrap();
            shared.mixers.insert(node_type, state) != Some(state)
        };
        if changed {
            let _ = self.event_tx.send(NodeListEvent::MixerStateChanged { node_type, state });
        }
    }

    // ---- accessors for the interfaces and tests ----

    pub(crate) fn domain(&self) -> &DomainHandler {
        &self.domain
    }

    pub(crate) fn nodes(&self) -> &HashMap<Uuid, Node> {
        &self.nodes
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, uuid: &Uuid) -> Option<&mut Node> {
        self.nodes.get_mut(uuid)
    }
}

/// Microseconds since the epoch.
pub(crate) fn now_micros() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_micros() as u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SharedState;
    use skyloft_protocol::packets::DeniedReason;
    use std::time::Duration;

    fn new_list() -> (NodeList, broadcast::Receiver<NodeListEvent>) {
        let shared = Arc::new(Mutex::new(SharedState::default()));
        let (event_tx, event_rx) = broadcast::channel(64);
        let (list, _receivers) = NodeList::new(Config::default(), shared, event_tx);
        (list, event_rx)
    }

    fn message_of(packet_type: PacketType, payload: Vec<u8>) -> ReceivedMessage {
        ReceivedMessage {
            header: PacketHeader::new(packet_type, 0, Uuid::nil()),
            payload,
            sender_addr: None,
        }
    }

    fn record(node_type: NodeType, uuid: u128) -> NodeRecord {
        NodeRecord {
            node_type,
            uuid: Uuid::from_u128(uuid),
            public_addr: "203.0.113.4:40102".parse().unwrap(),
            local_addr: "192.168.0.4:40102".parse().unwrap(),
            local_id: 4,
        }
    }

    fn domain_list(nodes: Vec<NodeRecord>) -> ReceivedMessage {
        let list = DomainList {
            domain_id: Uuid::from_u128(10),
            domain_local_id: 1,
            session_id: Uuid::from_u128(20),
            local_id: 2,
            nodes,
        };
        let mut payload = Vec::new();
        list.write_payload(&mut payload).unwrap();
        message_of(PacketType::DomainList, payload)
    }

    fn drain(rx: &mut broadcast::Receiver<NodeListEvent>) -> Vec<NodeListEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn domain_list_populates_the_roster() {
        let (mut list, mut events) = new_list();
        let message = domain_list(vec![
            record(NodeType::AvatarMixer, 1),
            record(NodeType::EntityServer, 2),
        ]);

        list.process_domain_list(&message).await;

        assert!(list.domain().is_connected());
        assert_eq!(list.domain().session_id(), Uuid::from_u128(20));
        assert_eq!(list.domain().local_id(), 2);
        assert_eq!(list.nodes().len(), 2);

        let events = drain(&mut events);
        assert!(events.iter().any(|e| matches!(e, NodeListEvent::ConnectedToDomain)));
        assert!(events
            .iter()
            .any(|e| matches!(e, NodeListEvent::DomainStateChanged(DomainState::Connected))));
        assert_eq!(
            events.iter().filter(|e| matches!(e, NodeListEvent::NodeAdded { .. })).count(),
            2
        );
    }

    #[tokio::test]
    async fn nodes_missing_from_a_later_list_are_killed() {
        let (mut list, mut events) = new_list();
        list.process_domain_list(&domain_list(vec![
            record(NodeType::AvatarMixer, 1),
            record(NodeType::AudioMixer, 2),
        ]))
        .await;
        drain(&mut events);

        list.process_domain_list(&domain_list(vec![record(NodeType::AvatarMixer, 1)])).await;

        assert_eq!(list.nodes().len(), 1);
        assert!(list.nodes().contains_key(&Uuid::from_u128(1)));
        let events = drain(&mut events);
        assert!(events.iter().any(
            |e| matches!(e, NodeListEvent::NodeKilled { uuid, .. } if *uuid == Uuid::from_u128(2))
        ));
    }

    #[tokio::test]
    async fn removed_node_packets_kill_the_named_node() {
        let (mut list, mut events) = new_list();
        list.process_domain_list(&domain_list(vec![record(NodeType::MessagesMixer, 7)])).await;
        drain(&mut events);

        let removed = DomainServerRemovedNode { node_id: Uuid::from_u128(7) };
        let mut payload = Vec::new();
        removed.write_payload(&mut payload);
        list.process_removed_node(&message_of(PacketType::DomainServerRemovedNode, payload))
            .await;

        assert!(list.nodes().is_empty());
        let events = drain(&mut events);
        assert!(events.iter().any(|e| matches!(e, NodeListEvent::NodeKilled { .. })));
    }

    #[tokio::test]
    async fn silent_nodes_are_pruned() {
        let (mut list, mut events) = new_list();
        list.process_domain_list(&domain_list(vec![record(NodeType::AvatarMixer, 3)])).await;
        drain(&mut events);

        // Quiet for longer than the 2 s default.
        if let Some(node) = list.node_mut(&Uuid::from_u128(3)) {
            node.last_heard = Instant::now() - Duration::from_secs(3);
        }
        list.remove_silent_nodes().await;

        assert!(list.nodes().is_empty());
        let events = drain(&mut events);
        assert!(events.iter().any(|e| matches!(e, NodeListEvent::NodeKilled { .. })));
    }

    #[tokio::test]
    async fn fresh_nodes_survive_the_prune() {
        let (mut list, _events) = new_list();
        list.process_domain_list(&domain_list(vec![record(NodeType::AvatarMixer, 3)])).await;
        list.remove_silent_nodes().await;
        assert_eq!(list.nodes().len(), 1);
    }

    #[tokio::test]
    async fn denial_refuses_until_a_new_domain_list() {
        let (mut list, mut events) = new_list();
        let denial = DomainConnectionDenied {
            reason_code: DeniedReason::TooManyUsers,
            reason: "Domain is at capacity".to_string(),
        };
        let mut payload = Vec::new();
        denial.write_payload(&mut payload);
        list.process_denial(&message_of(PacketType::DomainConnectionDenied, payload));

        assert_eq!(list.domain().state(), DomainState::Refused);
        assert_eq!(list.domain().refusal_reason(), Some("Domain is at capacity"));
        let drained = drain(&mut events);
        assert!(drained
            .iter()
            .any(|e| matches!(e, NodeListEvent::DomainStateChanged(DomainState::Refused))));

        // The server may change policy and send a list anyway.
        list.process_domain_list(&domain_list(vec![])).await;
        assert_eq!(list.domain().state(), DomainState::Connected);
    }

    #[tokio::test]
    async fn invalid_urls_move_the_domain_to_error() {
        let (mut list, mut events) = new_list();
        list.start_connect("not-a-websocket-url".to_string()).await;
        assert_eq!(list.domain().state(), DomainState::Error);
        let drained = drain(&mut events);
        assert!(drained
            .iter()
            .any(|e| matches!(e, NodeListEvent::DomainStateChanged(DomainState::Error))));
    }

    #[tokio::test]
    async fn ping_replies_latch_the_first_address() {
        let (mut list, mut events) = new_list();
        list.process_domain_list(&domain_list(vec![record(NodeType::AudioMixer, 9)])).await;
        drain(&mut events);

        let reply = PingReply { kind: PingKind::Local, ping_timestamp: 1, reply_timestamp: 2 };
        let mut payload = Vec::new();
        reply.write_payload(&mut payload);
        let mut message = message_of(PacketType::PingReply, payload);
        message.header.sender_id = Uuid::from_u128(9);
        list.process_ping_reply(&message).await;

        let node = &list.nodes()[&Uuid::from_u128(9)];
        assert_eq!(node.active_socket, ActiveSocket::Local);
        assert_eq!(node.active_addr(), Some(node.local_addr));
        let drained = drain(&mut events);
        assert!(drained.iter().any(|e| matches!(e, NodeListEvent::NodeActivated { .. })));

        // A later reply for the other address does not steal activation.
        let reply = PingReply { kind: PingKind::Public, ping_timestamp: 3, reply_timestamp: 4 };
        let mut payload = Vec::new();
        reply.write_payload(&mut payload);
        let mut message = message_of(PacketType::PingReply, payload);
        message.header.sender_id = Uuid::from_u128(9);
        list.process_ping_reply(&message).await;
        assert_eq!(
            list.nodes()[&Uuid::from_u128(9)].active_socket,
            ActiveSocket::Local
        );
    }

    #[tokio::test]
    async fn mixer_states_walk_their_lifecycle() {
        let (mut list, mut events) = new_list();

        // Unadvertised: no state yet, which the interfaces read as
        // Unavailable. Advertised: Disconnected until a ping answers.
        list.process_domain_list(&domain_list(vec![record(NodeType::AudioMixer, 9)])).await;

        let reply = PingReply { kind: PingKind::Public, ping_timestamp: 1, reply_timestamp: 2 };
        let mut payload = Vec::new();
        reply.write_payload(&mut payload);
        let mut message = message_of(PacketType::PingReply, payload);
        message.header.sender_id = Uuid::from_u128(9);
        list.process_ping_reply(&message).await;

        list.kill_node(Uuid::from_u128(9), "test teardown").await;

        let observed: Vec<AssignmentClientState> = drain(&mut events)
            .into_iter()
            .filter_map(|event| match event {
                NodeListEvent::MixerStateChanged { node_type: NodeType::AudioMixer, state } => {
                    Some(state)
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            observed,
            vec![
                AssignmentClientState::Disconnected,
                AssignmentClientState::Connected,
                AssignmentClientState::Unavailable,
            ]
        );
    }

    #[tokio::test]
    async fn disconnect_clears_everything() {
        let (mut list, mut events) = new_list();
        list.process_domain_list(&domain_list(vec![
            record(NodeType::AvatarMixer, 1),
            record(NodeType::AudioMixer, 2),
        ]))
        .await;
        drain(&mut events);

        list.disconnect().await;

        assert!(list.nodes().is_empty());
        assert_eq!(list.domain().state(), DomainState::Disconnected);
        assert_eq!(list.domain().session_id(), Uuid::nil());
        let drained = drain(&mut events);
        assert!(drained
            .iter()
            .any(|e| matches!(e, NodeListEvent::DomainStateChanged(DomainState::Disconnected))));
        assert_eq!(
            drained.iter().filter(|e| matches!(e, NodeListEvent::NodeKilled { .. })).count(),
            2
        );
    }
}
