use facade_server::{
    AssetBundle, ConnectionKey, DisconnectEvent, ErrorEvent, Events, FacadeServerError,
    HandshakeConfig, JoinEvent, Server, ServerConfig,
};
use facade_shared::{BundleStatus, IdentityRegistry, PeerId, ServerboundPacket};

use crate::helpers::TestClient;

pub const TEST_BUNDLE_ADDRESS: &str = "https://assets.example.net/bundle.zip";

/// Config pushing a test bundle, with the given requirement policy
pub fn test_config(required: bool) -> ServerConfig {
    ServerConfig {
        handshake: HandshakeConfig {
            require_bundle: required,
            bundle: Some(AssetBundle::from_bytes(TEST_BUNDLE_ADDRESS, b"bundle bytes")),
            ..HandshakeConfig::default()
        },
        ..ServerConfig::default()
    }
}

/// A server plus the events it produced, collected as the test goes
pub struct TestServer {
    pub server: Server,
    joins: Vec<(ConnectionKey, bool)>,
    disconnections: Vec<(ConnectionKey, PeerId)>,
    errors: Vec<FacadeServerError>,
}

impl TestServer {
    pub fn new(config: ServerConfig, registry: IdentityRegistry) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            server: Server::new(config, registry),
            joins: Vec::new(),
            disconnections: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn connect(&mut self, peer: u128) -> TestClient {
        let (key, receiver) = self.server.connect(PeerId(peer)).expect("connect");
        self.collect();
        TestClient::new(key, receiver)
    }

    /// Connects `peer` and walks it through a successful bundle load,
    /// discarding everything the join sent
    pub fn join_capable(&mut self, peer: u128) -> TestClient {
        let client = self.connect(peer);
        self.send_status(&client, BundleStatus::SuccessfullyLoaded);
        self.send_keepalive(&client, 0);
        assert_eq!(self.joined(&client.key), Some(true), "capable join");
        client.drain();
        client
    }

    /// Connects `peer` and has it decline an optional bundle
    pub fn join_incapable(&mut self, peer: u128) -> TestClient {
        let client = self.connect(peer);
        self.send_status(&client, BundleStatus::Declined);
        self.send_keepalive(&client, 0);
        assert_eq!(self.joined(&client.key), Some(false), "incapable join");
        client.drain();
        client
    }

    pub fn send(&mut self, client: &TestClient, packet: ServerboundPacket) {
        self.server
            .handle_packet(&client.key, packet)
            .expect("handle packet");
        self.collect();
    }

    pub fn send_status(&mut self, client: &TestClient, status: BundleStatus) {
        self.send(client, ServerboundPacket::BundleStatus(status));
    }

    pub fn send_keepalive(&mut self, client: &TestClient, parameter: i32) {
        self.send(client, ServerboundPacket::KeepAliveReply { parameter });
    }

    /// Capability reported when `key` joined, if it has
    pub fn joined(&self, key: &ConnectionKey) -> Option<bool> {
        self.joins
            .iter()
            .find(|(joined, _)| joined == key)
            .map(|(_, capable)| *capable)
    }

    pub fn was_disconnected(&self, key: &ConnectionKey) -> bool {
        self.disconnections.iter().any(|(removed, _)| removed == key)
    }

    pub fn errors(&self) -> &[FacadeServerError] {
        &self.errors
    }

    fn collect(&mut self) {
        let mut events: Events = self.server.receive();
        self.joins.extend(events.read::<JoinEvent>());
        self.disconnections.extend(events.read::<DisconnectEvent>());
        self.errors.extend(events.read::<ErrorEvent>());
    }
}
