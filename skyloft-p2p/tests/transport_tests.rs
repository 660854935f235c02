use skyloft_p2p::config::Config;
use skyloft_p2p::data_channel::DataChannelState;
use skyloft_p2p::socket::{SocketEvent, SocketState, WebRtcSocket};
use skyloft_protocol::node_type::NodeType;

#[tokio::test]
async fn unreachable_signaling_closes_the_channel_with_an_error() {
    // Opening against an address nothing listens on must surface as the
    // channel failing, not as a hang or a panic.
    let (mut socket, mut receivers) = WebRtcSocket::new(Config::default());
    socket.connect_to_host("ws://0.0.0.0:0", NodeType::DomainServer).await.unwrap();

    match receivers.events.recv().await {
        Some(SocketEvent::ChannelClosed { node_type, error, .. }) => {
            assert_eq!(node_type, NodeType::DomainServer);
            assert!(error.is_some());
        }
        other => panic!("expected ChannelClosed, got {other:?}"),
    }
    assert_eq!(socket.state(NodeType::DomainServer), SocketState::Unconnected);

    // No datagrams were delivered along the way.
    assert!(receivers.datagrams.try_recv().is_err());
}

#[tokio::test]
async fn aborting_mid_negotiation_is_clean() {
    let (mut socket, _receivers) = WebRtcSocket::new(Config::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = tokio_tungstenite::accept_async(stream).await;
            });
        }
    });

    socket.connect_to_host(&url, NodeType::AudioMixer).await.unwrap();
    socket.abort().await;
    assert_eq!(socket.state(NodeType::AudioMixer), SocketState::Unconnected);
}

/// Scenario: echo over a data channel against a live domain server.
/// Expected ready states in order: CONNECTING, OPEN, CLOSING, CLOSED.
#[tokio::test]
#[ignore = "requires a domain server at ws://127.0.0.1:40102"]
async fn echo_over_a_live_data_channel() -> anyhow::Result<()> {
    use skyloft_p2p::data_channel::{DataChannelEvent, WebRtcDataChannel};
    use skyloft_p2p::signaling_channel::{SignalingChannel, SignalingEvent};
    use tokio::sync::mpsc;

    let (signaling, mut signaling_events) = SignalingChannel::open("ws://127.0.0.1:40102");
    assert!(matches!(signaling_events.recv().await, Some(SignalingEvent::Open)));

    let (signal_out, mut signal_out_rx) = mpsc::unbounded_channel();
    let (channel, mut events, signal_in) =
        WebRtcDataChannel::connect(NodeType::DomainServer, 0, signal_out).await?;
    assert_eq!(channel.ready_state(), DataChannelState::Connecting);

    // Bridge the channel to the live signaling connection.
    let sender = signaling.sender();
    tokio::spawn(async move {
        while let Some(message) = signal_out_rx.recv().await {
            let _ = sender.send(message);
        }
    });
    tokio::spawn(async move {
        while let Some(event) = signaling_events.recv().await {
            if let SignalingEvent::Message(message) = event {
                let _ = signal_in.send(message);
            }
        }
    });

    assert!(matches!(events.recv().await, Some(DataChannelEvent::Open)));
    assert_eq!(channel.ready_state(), DataChannelState::Open);

    assert!(channel.send(b"echo:Hello").await);
    match events.recv().await {
        Some(DataChannelEvent::Message(bytes)) => assert_eq!(bytes, b"echo:Hello"),
        other => panic!("expected the echo back, got {other:?}"),
    }

    channel.close().await;
    assert_eq!(channel.ready_state(), DataChannelState::Closed);
    signaling.close();
    Ok(())
}

/// Scenario: two data channels over two signaling channels; each receives
/// only its own echo.
#[tokio::test]
#[ignore = "requires a domain server at ws://127.0.0.1:40102"]
async fn two_independent_channels_do_not_share_traffic() -> anyhow::Result<()> {
    let (mut one, mut receivers_one) = WebRtcSocket::new(Config::default());
    let (mut two, mut receivers_two) = WebRtcSocket::new(Config::default());
    one.connect_to_host("ws://127.0.0.1:40102", NodeType::DomainServer).await?;
    two.connect_to_host("ws://127.0.0.1:40102", NodeType::DomainServer).await?;

    assert!(matches!(
        receivers_one.events.recv().await,
        Some(SocketEvent::ChannelOpened { .. })
    ));
    assert!(matches!(
        receivers_two.events.recv().await,
        Some(SocketEvent::ChannelOpened { .. })
    ));

    assert!(one.write_datagram_to_type(NodeType::DomainServer, b"echo:Hello").await);
    assert!(two.write_datagram_to_type(NodeType::DomainServer, b"echo:Goodbye").await);

    let datagram = receivers_one.datagrams.recv().await.unwrap();
    assert_eq!(datagram.bytes, b"echo:Hello");
    let datagram = receivers_two.datagrams.recv().await.unwrap();
    assert_eq!(datagram.bytes, b"echo:Goodbye");

    one.clear_connections().await;
    two.clear_connections().await;
    Ok(())
}
