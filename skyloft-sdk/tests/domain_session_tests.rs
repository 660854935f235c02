use std::sync::{Arc, Mutex};
use std::time::Duration;

use serial_test::serial;

use skyloft_p2p::config::Config;
use skyloft_sdk::{AssignmentClientState, AudioMixer, AvatarMixer, DomainServer, DomainState};

async fn wait_for_state(domain: &DomainServer, wanted: DomainState) -> bool {
    for _ in 0..100 {
        if domain.state() == wanted {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
#[serial]
async fn a_session_walks_disconnected_connecting_disconnected() {
    let domain = DomainServer::new(Config::default()).unwrap();
    let states: Arc<Mutex<Vec<DomainState>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = states.clone();
    domain.on_state_changed(move |state| sink.lock().unwrap().push(state));

    assert_eq!(domain.state(), DomainState::Disconnected);

    // Nothing listens here; the session stays in CONNECTING until told to
    // stop, which is exactly what the recovery policy wants.
    domain.connect("ws://127.0.0.1:1").unwrap();
    assert!(wait_for_state(&domain, DomainState::Connecting).await);

    domain.disconnect().unwrap();
    assert!(wait_for_state(&domain, DomainState::Disconnected).await);

    let states = states.lock().unwrap().clone();
    let connecting = states.iter().position(|s| *s == DomainState::Connecting);
    let disconnected = states.iter().rposition(|s| *s == DomainState::Disconnected);
    assert!(connecting.is_some());
    assert!(disconnected.is_some());
    assert!(connecting < disconnected, "observed {states:?}");
}

#[tokio::test]
#[serial]
async fn mixers_attach_to_the_domain_server_context() {
    let domain = DomainServer::new(Config::default()).unwrap();
    let avatar = AvatarMixer::new(domain.context_id()).unwrap();
    let audio = AudioMixer::new(domain.context_id()).unwrap();
    assert_eq!(avatar.state(), AssignmentClientState::Unavailable);
    assert_eq!(audio.state(), AssignmentClientState::Unavailable);
}

#[tokio::test]
#[serial]
async fn two_contexts_are_independent() {
    let one = DomainServer::new(Config::default()).unwrap();
    let two = DomainServer::new(Config::default()).unwrap();
    assert_ne!(one.context_id(), two.context_id());

    one.connect("ws://127.0.0.1:1").unwrap();
    assert!(wait_for_state(&one, DomainState::Connecting).await);
    assert_eq!(two.state(), DomainState::Disconnected);

    one.disconnect().unwrap();
}

/// Scenario: full connect/disconnect cycle plus recovery from a transport
/// interruption against a live domain server.
#[tokio::test]
#[serial]
#[ignore = "requires a domain server at ws://127.0.0.1:40102"]
async fn live_domain_cycle_and_recovery() -> anyhow::Result<()> {
    let domain = DomainServer::new(Config::default())?;
    domain.connect("ws://127.0.0.1:40102")?;
    assert!(wait_for_state(&domain, DomainState::Connected).await);

    // Transport interruptions surface as reconnects within a check-in
    // period or two; the roster then re-activates by itself. Pulling the
    // network here has to be done by hand, so this test just verifies the
    // steady state holds and a clean cycle ends DISCONNECTED.
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(domain.state(), DomainState::Connected);

    domain.disconnect()?;
    assert!(wait_for_state(&domain, DomainState::Disconnected).await);
    Ok(())
}
