//! Entity server interface
//!
//! Besides availability, the entity server interface carries the entity
//! traffic: `edit_entity` encodes a property bag into one or more
//! EntityEdit packets (continuing with the properties that did not fit
//! until none remain), and `on_entity_data` delivers decoded entity state
//! from the server.

use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use skyloft_protocol::entity::{encode_entity_edit_requested, EntityEdit, EntityProperties};
use skyloft_protocol::node_type::NodeType;
use skyloft_protocol::packet::PACKET_HEADER_SIZE;
use skyloft_protocol::packet_type::PacketType;
use skyloft_support::octree_packet_data::{AppendState, OctreePacketData};

use crate::context::ContextId;
use crate::error::{Error, Result};
use crate::mixers::{AssignmentClient, AssignmentClientState};
use crate::node_list::{NodeListCommand, NodeListEvent};

/// The entity server of a context.
pub struct EntityServer {
    inner: AssignmentClient,
}

impl EntityServer {
    /// Attach to the entity server of a context.
    pub fn new(context_id: ContextId) -> Result<Self> {
        Ok(Self { inner: AssignmentClient::new(context_id, NodeType::EntityServer)? })
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

    /// Send an edit for `entity_id`. Properties that do not fit in one
    /// packet continue into further packets; an error means some property
    /// can never fit.
    pub fn edit_entity(&self, entity_id: Uuid, properties: &EntityProperties) -> Result<()> {
        let max_payload = self.inner.context.config.max_packet_size - PACKET_HEADER_SIZE;
        let mut requested = properties.changed_properties();
        if requested.is_empty() {
            return Ok(());
        }

        loop {
            let mut data = OctreePacketData::new(max_payload);
            let outcome =
                encode_entity_edit_requested(&entity_id, properties, requested, &mut data);
            if outcome.append_state == AppendState::None {
                return Err(Error::CannotSendEdit(
                    "a property is too large for the packet size".to_string(),
                ));
            }

            self.inner
                .context
                .command_tx
                .send(NodeListCommand::SendPacket {
                    node_type: NodeType::EntityServer,
                    packet_type: PacketType::EntityEdit,
                    body: data.into_bytes(),
                })
                .map_err(|_| Error::ContextShutDown)?;

            if outcome.didnt_fit.is_empty() {
                return Ok(());
            }
            requested = outcome.didnt_fit;
        }
    }

    /// Invoke `callback` for every decoded entity update from the server.
    pub fn on_entity_data<F>(&self, callback: F)
    where
        F: Fn(EntityEdit) + Send + 'static,
    {
        let mut events = self.inner.context.event_tx.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(NodeListEvent::EntityData(edit)) => callback(edit),
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
    use crate::context::create_context;
    use serial_test::serial;
    use skyloft_p2p::config::Config;
    use skyloft_protocol::entity::EntityType;
    use skyloft_support::math::Color;

    #[tokio::test]
    #[serial]
    async fn empty_edits_are_a_no_op() {
        let context_id = create_context(Config::default());
        let server = EntityServer::new(context_id).unwrap();
        let properties = EntityProperties::new(EntityType::Box);
        server.edit_entity(Uuid::from_u128(1), &properties).unwrap();
    }

    #[tokio::test]
    #[serial]
    async fn an_edit_that_cannot_fit_is_an_error() {
        let mut config = Config::default();
        // Too small for even the edit prefix and flag block.
        config.max_packet_size = PACKET_HEADER_SIZE + 32;
        let context_id = create_context(config);
        let server = EntityServer::new(context_id).unwrap();

        let mut properties = EntityProperties::new(EntityType::Box);
        properties.color = Some(Color::new(1, 2, 3));
        let result = server.edit_entity(Uuid::from_u128(1), &properties);
        assert!(matches!(result, Err(Error::CannotSendEdit(_))));
    }

    #[tokio::test]
    #[serial]
    async fn a_fitting_edit_is_accepted() {
        let context_id = create_context(Config::default());
        let server = EntityServer::new(context_id).unwrap();

        let mut properties = EntityProperties::new(EntityType::Box);
        properties.last_edited = 1;
        properties.color = Some(Color::new(240, 37, 148));
        server.edit_entity(Uuid::from_u128(7), &properties).unwrap();
    }
}
