//! Domain handler
//!
//! The domain server does not live in the node roster; this distinguished
//! record tracks its identity and the lifecycle of our relationship to it.

use uuid::Uuid;

/// Lifecycle states of the domain connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainState {
    Disconnected,
    Connecting,
    Connected,
    /// The domain refused our connect request; see the refusal reason.
    Refused,
    /// Local error, e.g. an unusable URL.
    Error,
}

/// The distinguished domain-server record.
#[derive(Debug, Clone)]
pub struct DomainHandler {
    url: Option<String>,
    state: DomainState,
    domain_id: Uuid,
    local_id: u16,
    session_id: Uuid,
    refusal_reason: Option<String>,
}

impl Default for DomainHandler {
    fn default() -> Self {
        Self {
            url: None,
            state: DomainState::Disconnected,
            domain_id: Uuid::nil(),
            local_id: 0,
            session_id: Uuid::nil(),
            refusal_reason: None,
        }
    }
}

impl DomainHandler {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn state(&self) -> DomainState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == DomainState::Connected
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn local_id(&self) -> u16 {
        self.local_id
    }

    pub fn domain_id(&self) -> Uuid {
        self.domain_id
    }

    pub fn refusal_reason(&self) -> Option<&str> {
        self.refusal_reason.as_deref()
    }

    /// Point the handler at a domain and begin connecting.
    pub fn start_connecting(&mut self, url: String) {
        self.url = Some(url);
        self.state = DomainState::Connecting;
        self.refusal_reason = None;
    }

    /// The domain accepted us and assigned identity.
    pub fn set_connected(&mut self, domain_id: Uuid, local_id: u16, session_id: Uuid) {
        self.domain_id = domain_id;
        self.local_id = local_id;
        self.session_id = session_id;
        self.state = DomainState::Connected;
        self.refusal_reason = None;
    }

    /// The domain refused us; connect requests stop until a new connect or
    /// a spontaneous DomainList.
    pub fn set_refused(&mut self, reason: String) {
        self.state = DomainState::Refused;
        self.refusal_reason = Some(reason);
    }

    /// A local failure that a reconnect cannot fix without a new URL.
    pub fn set_error(&mut self, reason: String) {
        self.state = DomainState::Error;
        self.refusal_reason = Some(reason);
    }

    /// Transport lost; the check-in timer will drive reconnection.
    pub fn set_reconnecting(&mut self) {
        self.state = DomainState::Connecting;
    }

    /// Full disconnect: identity cleared, URL retained for a later connect.
    pub fn set_disconnected(&mut self) {
        self.state = DomainState::Disconnected;
        self.domain_id = Uuid::nil();
        self.local_id = 0;
        self.session_id = Uuid::nil();
        self.refusal_reason = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_round_trip() {
        let mut handler = DomainHandler::default();
        assert_eq!(handler.state(), DomainState::Disconnected);

        handler.start_connecting("ws://127.0.0.1:40102".to_string());
        assert_eq!(handler.state(), DomainState::Connecting);

        handler.set_connected(Uuid::from_u128(1), 7, Uuid::from_u128(2));
        assert!(handler.is_connected());
        assert_eq!(handler.local_id(), 7);
        assert_eq!(handler.session_id(), Uuid::from_u128(2));

        handler.set_disconnected();
        assert_eq!(handler.state(), DomainState::Disconnected);
        assert_eq!(handler.session_id(), Uuid::nil());
        // The URL survives for the next connect.
        assert_eq!(handler.url(), Some("ws://127.0.0.1:40102"));
    }

    #[test]
    fn refusal_keeps_the_reason() {
        let mut handler = DomainHandler::default();
        handler.start_connecting("ws://127.0.0.1:40102".to_string());
        handler.set_refused("Domain is at capacity".to_string());
        assert_eq!(handler.state(), DomainState::Refused);
        assert_eq!(handler.refusal_reason(), Some("Domain is at capacity"));

        // A spontaneous DomainList flips the state back.
        handler.set_connected(Uuid::from_u128(1), 1, Uuid::from_u128(2));
        assert!(handler.is_connected());
        assert_eq!(handler.refusal_reason(), None);
    }
}
