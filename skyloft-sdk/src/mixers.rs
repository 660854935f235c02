//! Assignment-client interfaces
//!
//! Each mixer interface reports the availability of one assignment-client
//! type in a context: UNAVAILABLE while the domain has not advertised one,
//! DISCONNECTED while its data channel is coming up, CONNECTED once an
//! address probe has answered.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;

use skyloft_protocol::node_type::NodeType;

use crate::context::{get_context, Context, ContextId};
use crate::error::Result;
use crate::node_list::NodeListEvent;

/// Availability of one assignment client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentClientState {
    Unavailable,
    Disconnected,
    Connected,
}

/// Shared behavior of the per-type interfaces.
pub(crate) struct AssignmentClient {
    pub(crate) context: Arc<Context>,
    pub(crate) node_type: NodeType,
}

impl AssignmentClient {
    pub(crate) fn new(context_id: ContextId, node_type: NodeType) -> Result<Self> {
        Ok(Self { context: get_context(context_id)?, node_type })
    }

    pub(crate) fn state(&self) -> AssignmentClientState {
        self.context
            .shared
            .lock()
            .unwrap()
            .mixers
            .get(&self.node_type)
            .copied()
            .unwrap_or(AssignmentClientState::Unavailable)
    }

    pub(crate) fn on_state_changed<F>(&self, callback: F)
    where
        F: Fn(AssignmentClientState) + Send + 'static,
    {
        let mut events = self.context.event_tx.subscribe();
        let node_type = self.node_type;
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(NodeListEvent::MixerStateChanged { node_type: changed, state })
                        if changed == node_type =>
                    {
                        callback(state);
                    }
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}

macro_rules! mixer_interface {
    ($(#[$doc:meta])* $name:ident, $node_type:expr) => {
        $(#[$doc])*
        pub struct $name {
            inner: AssignmentClient,
        }

        impl $name {
            /// Attach to the assignment client of a context.
            pub fn new(context_id: ContextId) -> Result<Self> {
                Ok(Self { inner: AssignmentClient::new(context_id, $node_type)? })
            }

            /// Current availability.
            pub fn state(&self) -> AssignmentClientState {
                self.inner.state()
            }

            /// Invoke `callback` on every availability change.
            pub fn on_state_changed<F>(&self, callback: F)
            where
                F: Fn(AssignmentClientState) + Send + 'static,
            {
                self.inner.on_state_changed(callback)
            }
        }
    };
}

mixer_interface!(
    /// The avatar mixer of a context.
    AvatarMixer,
    NodeType::AvatarMixer
);
mixer_interface!(
    /// The audio mixer of a context.
    AudioMixer,
    NodeType::AudioMixer
);
mixer_interface!(
    /// The messages mixer of a context.
    MessagesMixer,
    NodeType::MessagesMixer
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::create_context;
    use serial_test::serial;
    use skyloft_p2p::config::Config;

    #[tokio::test]
    #[serial]
    async fn mixers_start_unavailable() {
        let context_id = create_context(Config::default());
        let avatar = AvatarMixer::new(context_id).unwrap();
        let audio = AudioMixer::new(context_id).unwrap();
        let messages = MessagesMixer::new(context_id).unwrap();
        assert_eq!(avatar.state(), AssignmentClientState::Unavailable);
        assert_eq!(audio.state(), AssignmentClientState::Unavailable);
        assert_eq!(messages.state(), AssignmentClientState::Unavailable);
    }

    #[tokio::test]
    #[serial]
    async fn attaching_to_a_missing_context_fails() {
        assert!(AvatarMixer::new(ContextId(usize::MAX)).is_err());
    }
}
