//! Domain server interface
//!
//! The entry point of the SDK: create one `DomainServer` per world
//! connection, `connect(url)` to join, and watch `state` /
//! `on_state_changed` for the lifecycle. Everything else — check-ins, node
//! management, recovery — runs on the context's driver task.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use skyloft_p2p::config::Config;

use crate::context::{create_context, get_context, Context, ContextId};
use crate::domain_handler::DomainState;
use crate::error::{Error, Result};
use crate::node_list::{NodeListCommand, NodeListEvent};

/// A connection to one domain.
pub struct DomainServer {
    context_id: ContextId,
    context: Arc<Context>,
}

impl DomainServer {
    /// Create a domain connection with its own context. Must be called
    /// from within a tokio runtime; the driver task starts immediately,
    /// idle until `connect`.
    pub fn new(config: Config) -> Result<Self> {
        let context_id = create_context(config);
        Ok(Self { context_id, context: get_context(context_id)? })
    }

    /// The context other interfaces attach to.
    pub fn context_id(&self) -> ContextId {
        self.context_id
    }

    /// Begin connecting to a domain's signaling endpoint,
    /// e.g. `ws://127.0.0.1:40102`. Non-blocking; watch `on_state_changed`.
    pub fn connect(&self, url: &str) -> Result<()> {
        self.context
            .command_tx
            .send(NodeListCommand::Connect(url.to_string()))
            .map_err(|_| Error::ContextShutDown)
    }

    /// Leave the domain: best-effort goodbye, roster cleared, channels and
    /// signaling closed. The context survives for a later `connect`.
    pub fn disconnect(&self) -> Result<()> {
        self.context
            .command_tx
            .send(NodeListCommand::Disconnect)
            .map_err(|_| Error::ContextShutDown)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DomainState {
        self.context.shared.lock().unwrap().domain_state
    }

    /// Why the domain refused us, when `state` is REFUSED or ERROR.
    pub fn refusal_reason(&self) -> Option<String> {
        self.context.shared.lock().unwrap().refusal_reason.clone()
    }

    /// The session UUID the domain assigned, or nil before joining.
    pub fn session_id(&self) -> Uuid {
        self.context.shared.lock().unwrap().session_id
    }

    /// Invoke `callback` on every domain state change.
    pub fn on_state_changed<F>(&self, callback: F)
    where
        F: Fn(DomainState) + Send + 'static,
    {
        let mut events = self.context.event_tx.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(NodeListEvent::DomainStateChanged(state)) => callback(state),
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Mutex;

    #[tokio::test]
    #[serial]
    async fn starts_disconnected_with_no_session() {
        let domain = DomainServer::new(Config::default()).unwrap();
        assert_eq!(domain.state(), DomainState::Disconnected);
        assert_eq!(domain.session_id(), Uuid::nil());
        assert_eq!(domain.refusal_reason(), None);
    }

    #[tokio::test]
    #[serial]
    async fn invalid_url_reports_error_state() {
        let domain = DomainServer::new(Config::default()).unwrap();

        let seen: Arc<Mutex<Vec<DomainState>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        domain.on_state_changed(move |state| sink.lock().unwrap().push(state));

        domain.connect("definitely not a url").unwrap();

        // Give the driver task a moment to process the command.
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            if domain.state() == DomainState::Error {
                break;
            }
        }
        assert_eq!(domain.state(), DomainState::Error);
        assert!(seen.lock().unwrap().contains(&DomainState::Error));
    }

    #[tokio::test]
    #[serial]
    async fn connect_moves_to_connecting() {
        let domain = DomainServer::new(Config::default()).unwrap();
        domain.connect("ws://127.0.0.1:40102").unwrap();
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            if domain.state() == DomainState::Connecting {
                break;
            }
        }
        assert_eq!(domain.state(), DomainState::Connecting);
        domain.disconnect().unwrap();
    }
}
