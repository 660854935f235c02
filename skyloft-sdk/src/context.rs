//! Context registry
//!
//! A client may host several independent world connections at once; each
//! gets a context holding its own node list, socket and event stream. The
//! registry is the SDK's only process-global state: `DomainServer::new`
//! allocates a context and the other interfaces attach by `ContextId`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use skyloft_p2p::config::Config;
use skyloft_protocol::node_type::NodeType;

use crate::domain_handler::DomainState;
use crate::error::{Error, Result};
use crate::mixers::AssignmentClientState;
use crate::node_list::{NodeList, NodeListCommand, NodeListEvent};

/// Identifies one independent world connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(pub(crate) usize);

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State the driver publishes for the interfaces to read synchronously.
#[derive(Debug)]
pub(crate) struct SharedState {
    pub domain_state: DomainState,
    pub refusal_reason: Option<String>,
    pub session_id: Uuid,
    pub mixers: HashMap<NodeType, AssignmentClientState>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            domain_state: DomainState::Disconnected,
            refusal_reason: None,
            session_id: Uuid::nil(),
            mixers: HashMap::new(),
        }
    }
}

/// One registered context.
pub(crate) struct Context {
    pub config: Config,
    pub command_tx: mpsc::UnboundedSender<NodeListCommand>,
    pub event_tx: broadcast::Sender<NodeListEvent>,
    pub shared: Arc<Mutex<SharedState>>,
}

static CONTEXTS: OnceLock<Mutex<Vec<Arc<Context>>>> = OnceLock::new();

fn registry() -> &'static Mutex<Vec<Arc<Context>>> {
    CONTEXTS.get_or_init(|| Mutex::new(Vec::new()))
}

/// Allocate a context and spawn its node-list driver. Must be called from
/// within a tokio runtime.
pub(crate) fn create_context(config: Config) -> ContextId {
    let shared = Arc::new(Mutex::new(SharedState::default()));
    let (event_tx, _keepalive) = broadcast::channel(256);
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let (node_list, receivers) = NodeList::new(config.clone(), shared.clone(), event_tx.clone());
    tokio::spawn(node_list.run(receivers, command_rx));

    let context = Arc::new(Context { config, command_tx, event_tx, shared });
    let mut contexts = registry().lock().unwrap();
    contexts.push(context);
    ContextId(contexts.len() - 1)
}

/// Look up a context by ID.
pub(crate) fn get_context(id: ContextId) -> Result<Arc<Context>> {
    registry().lock().unwrap().get(id.0).cloned().ok_or(Error::UnknownContext(id.0))
}
