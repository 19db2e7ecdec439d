use std::{collections::HashMap, mem, sync::Arc};

use log::{debug, info, warn};
use smol::channel::{self, Receiver};

use facade_shared::{
    CellPos, Chunk, ClientboundPacket, IdentityRegistry, LocalPos, PeerId, SectionPos,
    ServerboundPacket, StateId, Text,
};

use crate::{
    connection::{
        connection::{Connection, ConnectionKey},
        virtualization::VirtualizationInterceptor,
    },
    handshake::{
        early_play::{EarlyPlayHandler, HandshakeProgress},
        join_handshake::JoinHandshake,
        verified_peers::{InMemoryVerifiedPeers, VerifiedPeers},
    },
    sync::sync_packet_builder::SyncPacketBuilder,
    Events, FacadeServerError, ServerConfig,
};

struct ServerConnection {
    connection: Connection,
    // dropped once the handshake finalizes
    handshake: Option<Box<dyn EarlyPlayHandler>>,
}

/// Owns every connection, drives their join handshakes and routes world
/// synchronization through the identity registry
pub struct Server {
    config: ServerConfig,
    registry: Arc<IdentityRegistry>,
    verified_peers: Arc<dyn VerifiedPeers>,
    sync_builder: SyncPacketBuilder,
    connections: HashMap<ConnectionKey, ServerConnection>,
    next_key: u64,
    incoming_events: Events,
}

impl Server {
    /// Create a new Server, remembering verified peers in memory
    pub fn new(config: ServerConfig, registry: IdentityRegistry) -> Self {
        Self::with_verified_peers(config, registry, Arc::new(InMemoryVerifiedPeers::new()))
    }

    /// Create a new Server backed by the given verified-peer store
    pub fn with_verified_peers(
        config: ServerConfig,
        registry: IdentityRegistry,
        verified_peers: Arc<dyn VerifiedPeers>,
    ) -> Self {
        let registry = Arc::new(registry);
        let sync_builder = SyncPacketBuilder::new(registry.clone(), &config.sync);

        Self {
            config,
            registry,
            verified_peers,
            sync_builder,
            connections: HashMap::new(),
            next_key: 0,
            incoming_events: Events::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn sync_builder(&self) -> &SyncPacketBuilder {
        &self.sync_builder
    }

    pub fn verified_peers(&self) -> &dyn VerifiedPeers {
        self.verified_peers.as_ref()
    }

    /// Returns all events since the last call and resets the buffer
    pub fn receive(&mut self) -> Events {
        mem::replace(&mut self.incoming_events, Events::new())
    }

    // Connections

    /// Registers an identified peer and starts its join handshake. Returns
    /// the connection key and the receiving end of its outbound channel.
    pub fn connect(
        &mut self,
        peer: PeerId,
    ) -> Result<(ConnectionKey, Receiver<ClientboundPacket>), FacadeServerError> {
        let key = ConnectionKey::new(self.next_key);
        self.next_key += 1;

        let (sender, receiver) = channel::unbounded();
        let mut connection = Connection::new(key, peer, sender);
        connection.add_interceptor(Box::new(VirtualizationInterceptor::new(
            self.registry.clone(),
        )));

        let handshake = JoinHandshake::start(
            &mut connection,
            &self.config.handshake,
            self.verified_peers.as_ref(),
        )?;
        let progress = handshake.progress();
        info!("Server: peer {:?} connected as {:?}", peer, key);

        self.connections.insert(
            key,
            ServerConnection {
                connection,
                handshake: Some(Box::new(handshake)),
            },
        );
        if progress == HandshakeProgress::Finalized {
            self.finish_join(&key);
        }

        Ok((key, receiver))
    }

    /// Feeds an inbound packet to the connection's handshake. Packets that
    /// arrive after the handshake are not handled here.
    pub fn handle_packet(
        &mut self,
        key: &ConnectionKey,
        packet: ServerboundPacket,
    ) -> Result<(), FacadeServerError> {
        let Some(entry) = self.connections.get_mut(key) else {
            return Err(FacadeServerError::UnknownConnection { key: *key });
        };
        let Some(handshake) = entry.handshake.as_mut() else {
            debug!("Server: {:?} already joined, ignoring {:?}", key, packet);
            return Ok(());
        };

        let result = match packet {
            ServerboundPacket::BundleStatus(status) => handshake.on_status_event(
                &mut entry.connection,
                self.verified_peers.as_ref(),
                status,
            ),
            ServerboundPacket::KeepAliveReply { parameter } => {
                handshake.on_keepalive_reply(&mut entry.connection, parameter)
            }
        };

        match result {
            Ok(HandshakeProgress::Pending) => {}
            Ok(HandshakeProgress::Finalized) => self.finish_join(key),
            Ok(HandshakeProgress::Disconnected) => self.remove_connection(key),
            Err(error) => {
                warn!("Server: handshake of {:?} failed: {}", key, error);
                self.incoming_events.push_error(error.into());
                self.remove_connection(key);
            }
        }
        Ok(())
    }

    /// Disconnects a connection with `reason`, in any phase
    pub fn disconnect(&mut self, key: &ConnectionKey, reason: Text) -> Result<(), FacadeServerError> {
        let Some(entry) = self.connections.get_mut(key) else {
            return Err(FacadeServerError::UnknownConnection { key: *key });
        };
        let result = entry.connection.disconnect(reason);
        self.remove_connection(key);
        result.map_err(FacadeServerError::from)
    }

    pub fn connection(&self, key: &ConnectionKey) -> Option<&Connection> {
        self.connections.get(key).map(|entry| &entry.connection)
    }

    /// Whether the connection has finished its join handshake
    pub fn is_joined(&self, key: &ConnectionKey) -> bool {
        self.connections
            .get(key)
            .map_or(false, |entry| entry.handshake.is_none())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn finish_join(&mut self, key: &ConnectionKey) {
        let Some(entry) = self.connections.get_mut(key) else {
            return;
        };
        entry.handshake = None;
        let capable = entry.connection.is_capable();

        if self.config.sync.sync_registries_on_join {
            if let Err(error) = self.sync_builder.sync_all_registries(&entry.connection) {
                warn!("Server: registry sync for {:?} failed: {}", key, error);
                self.incoming_events.push_error(error.into());
                self.remove_connection(key);
                return;
            }
        }

        self.incoming_events.push_join(key, capable);
    }

    fn remove_connection(&mut self, key: &ConnectionKey) {
        if let Some(entry) = self.connections.remove(key) {
            info!("Server: {:?} removed", key);
            self.incoming_events
                .push_disconnection(key, entry.connection.peer());
        }
    }

    fn joined_connection(&self, key: &ConnectionKey) -> Result<&Connection, FacadeServerError> {
        let Some(entry) = self.connections.get(key) else {
            return Err(FacadeServerError::UnknownConnection { key: *key });
        };
        if entry.handshake.is_some() {
            return Err(FacadeServerError::JoinPending { key: *key });
        }
        Ok(&entry.connection)
    }

    // World sync

    /// Sends a native world packet through the connection's interceptors,
    /// which hide synthetic states from it
    pub fn send_world_packet(
        &self,
        key: &ConnectionKey,
        packet: ClientboundPacket,
    ) -> Result<(), FacadeServerError> {
        let connection = self.joined_connection(key)?;
        connection.send(packet)?;
        Ok(())
    }

    /// Sends the virtual state of one cell. `Ok(false)` when the connection
    /// is not capable.
    pub fn send_cell_update(
        &self,
        key: &ConnectionKey,
        pos: CellPos,
        state: StateId,
    ) -> Result<bool, FacadeServerError> {
        let connection = self.joined_connection(key)?;
        Ok(self.sync_builder.single_cell_update(connection, pos, state)?)
    }

    /// Sends the virtual states of several cells of one section
    ///
    /// # Panics
    ///
    /// Panics if `positions` and `states` differ in length.
    pub fn send_section_update(
        &self,
        key: &ConnectionKey,
        section: SectionPos,
        positions: &[LocalPos],
        states: &[StateId],
    ) -> Result<bool, FacadeServerError> {
        let connection = self.joined_connection(key)?;
        Ok(self
            .sync_builder
            .multi_cell_update(connection, section, positions, states)?)
    }

    /// Sends the section diff of `chunk`, building it into the chunk's cache
    /// on first use
    pub fn send_chunk(&self, key: &ConnectionKey, chunk: &Chunk) -> Result<usize, FacadeServerError> {
        let connection = self.joined_connection(key)?;
        Ok(self
            .sync_builder
            .chunk_diff_packets(connection, Some(chunk.diff_cache()), chunk)?)
    }

    /// Resends every synthetic registry page
    pub fn sync_registries(&self, key: &ConnectionKey) -> Result<usize, FacadeServerError> {
        let connection = self.joined_connection(key)?;
        Ok(self.sync_builder.sync_all_registries(connection)?)
    }
}
